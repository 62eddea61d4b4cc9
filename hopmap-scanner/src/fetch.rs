use crate::error::Result;
use std::future::Future;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// A fetched document. Error statuses are surfaced here rather than as
/// `Err` so callers can tell "the server said no" apart from "the server
/// was unreachable". The robots gate relies on that distinction.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

impl FetchedPage {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport seam for the crawler. `Err` means the request never produced
/// an HTTP response (DNS failure, refused connection, timeout).
pub trait Fetcher {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage>> + Send;
}

/// Default reqwest-backed fetcher.
///
/// The client always sends the hopmap product identifier as its HTTP
/// user-agent; the robots user-agent token is configured separately on the
/// crawler and only drives rule matching.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hopmap/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.div_ceil(2)))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage> {
        debug!("Fetching {}", url);
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage { status, body })
    }
}

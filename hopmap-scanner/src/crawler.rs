use crate::error::{CrawlError, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use crate::frontier::{Frontier, FrontierEntry, LevelIndex, VisitedRegistry};
use crate::parse::extract_links;
use crate::report::CrawlReport;
use crate::robots::RobotsGate;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Called with `(level, url)` each time a frontier entry is processed.
pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Breadth-first frontier scheduler.
///
/// Owns no state between runs: the frontier, visited registry, level index
/// and robots gate are created fresh inside [`Crawler::run`], so independent
/// crawls never interfere with each other.
pub struct Crawler<F: Fetcher> {
    fetcher: F,
    user_agent: String,
    politeness_delay: Duration,
    max_depth: Option<usize>,
    max_pages: Option<usize>,
    same_origin_only: bool,
    progress_callback: Option<ProgressCallback>,
}

impl Crawler<HttpFetcher> {
    /// Crawler over a real HTTP client with the default request timeout.
    pub fn over_http() -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new(DEFAULT_TIMEOUT_SECS)?))
    }

    pub fn over_http_with_timeout(timeout_secs: u64) -> Result<Self> {
        Ok(Self::with_fetcher(HttpFetcher::new(timeout_secs)?))
    }
}

impl<F: Fetcher> Crawler<F> {
    pub fn with_fetcher(fetcher: F) -> Self {
        Self {
            fetcher,
            user_agent: "*".to_string(),
            politeness_delay: Duration::from_secs(1),
            max_depth: None,
            max_pages: None,
            same_origin_only: false,
            progress_callback: None,
        }
    }

    /// Robots user-agent token used for rule matching. Defaults to `*`.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Fixed pause before each newly discovered link is scheduled. Defaults
    /// to one second. The pause applies to scheduling, not to fetching the
    /// current page.
    pub fn with_politeness_delay(mut self, delay: Duration) -> Self {
        self.politeness_delay = delay;
        self
    }

    /// Stop scheduling links beyond this hop distance. Unbounded by default.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Stop scheduling once this many URLs have been discovered. Unbounded
    /// by default.
    pub fn with_max_pages(mut self, pages: usize) -> Self {
        self.max_pages = Some(pages);
        self
    }

    /// Only schedule links on the seed's origin. Off by default; the robots
    /// gate still vets every origin the crawl wanders into.
    pub fn with_same_origin_only(mut self, same_origin_only: bool) -> Self {
        self.same_origin_only = same_origin_only;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Run a breadth-first crawl from `seed` until the frontier is empty.
    ///
    /// Every failure past this point is scoped to a single URL: denied or
    /// unconfirmable robots policy, transport errors and error statuses all
    /// skip that URL and the run continues. The returned report maps each
    /// hop distance to the URLs first discovered at that distance.
    pub async fn run(&self, seed: &str) -> Result<CrawlReport> {
        let seed_url = parse_seed(seed)?;
        let seed_origin = seed_url.origin();

        info!(
            "Starting crawl of {} as robots agent {:?}",
            seed_url, self.user_agent
        );

        let started_at = chrono::Utc::now().timestamp();
        let mut visited = VisitedRegistry::new();
        let mut levels = LevelIndex::new();
        let mut frontier = Frontier::new();
        let mut gate = RobotsGate::new(self.user_agent.clone());

        // Re-entrant seed guard. Unreachable with the fresh registry above,
        // kept so the invariant holds even if scheduling ever changes.
        if visited.is_visited(seed_url.as_str()) {
            info!("Already visited {}", seed_url);
            return Ok(self.build_report(&seed_url, started_at, levels));
        }

        if !gate.is_allowed(&self.fetcher, &seed_url).await {
            info!("Crawling not allowed for seed {}", seed_url);
            return Ok(self.build_report(&seed_url, started_at, levels));
        }

        visited.mark_visited(seed_url.as_str());
        levels.record(0, seed_url.as_str());
        frontier.push(FrontierEntry {
            url: seed_url.clone(),
            level: 0,
        });

        while let Some(FrontierEntry { url, level }) = frontier.pop() {
            debug!("Processing {} at level {}", url, level);
            if let Some(callback) = &self.progress_callback {
                callback(level, url.to_string());
            }

            // Per-origin re-check; the seed's verdict is already cached, so
            // this only costs a robots.txt fetch when the crawl reaches a
            // new origin.
            if !gate.is_allowed(&self.fetcher, &url).await {
                info!("Skipping {}: robots policy denies or is unconfirmed", url);
                continue;
            }

            let page = match self.fetcher.fetch(&url).await {
                Ok(page) if page.is_success() => page,
                Ok(page) => {
                    warn!("Skipping {}: HTTP {}", url, page.status);
                    continue;
                }
                Err(e) => {
                    warn!("Skipping {}: {}", url, e);
                    continue;
                }
            };

            let links = extract_links(&page.body, &url);
            debug!("Found {} links on {}", links.len(), url);

            for link in links {
                if self.same_origin_only && link.origin() != seed_origin {
                    debug!("Skipping {}: off the seed origin", link);
                    continue;
                }
                if visited.is_visited(link.as_str()) {
                    continue;
                }
                if let Some(max) = self.max_depth
                    && level + 1 > max
                {
                    continue;
                }
                if let Some(max) = self.max_pages
                    && visited.len() >= max
                {
                    debug!("Page cap {} reached, not scheduling further links", max);
                    break;
                }

                tokio::time::sleep(self.politeness_delay).await;
                visited.mark_visited(link.as_str());
                levels.record(level + 1, link.as_str());
                frontier.push(FrontierEntry {
                    url: link,
                    level: level + 1,
                });
            }
        }

        for (level, urls) in levels.snapshot() {
            info!("Level {}: {} URLs", level, urls.len());
            for url in urls {
                debug!("  - {}", url);
            }
        }
        info!(
            "Crawl complete. {} pages across {} levels",
            levels.total(),
            levels.snapshot().len()
        );

        Ok(self.build_report(&seed_url, started_at, levels))
    }

    fn build_report(&self, seed: &Url, started_at: i64, levels: LevelIndex) -> CrawlReport {
        CrawlReport {
            seed: seed.to_string(),
            user_agent: self.user_agent.clone(),
            started_at,
            finished_at: chrono::Utc::now().timestamp(),
            levels: levels.into_levels(),
        }
    }
}

/// Validate and normalize the seed. Identity inside the run is the WHATWG
/// serialization with the fragment removed, so the seed gets the same
/// treatment as every extracted link.
fn parse_seed(seed: &str) -> Result<Url> {
    let mut url = Url::parse(seed)
        .map_err(|e| CrawlError::InvalidUrl(format!("'{}': {}", seed, e)))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(CrawlError::InvalidUrl(format!(
            "'{}': only http and https seeds are supported",
            seed
        )));
    }
    url.set_fragment(None);
    Ok(url)
}

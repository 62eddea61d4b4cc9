use crate::fetch::Fetcher;
use std::collections::HashMap;
use texting_robots::{Robot, get_robots_url};
use tracing::{debug, error, warn};
use url::Url;

/// Per-origin crawl permission gate backed by robots.txt.
///
/// Verdict semantics are deliberately asymmetric:
/// - robots.txt answers 2xx: the ruleset decides.
/// - robots.txt answers with an error status: the origin has published no
///   usable policy, treat it as unrestricted.
/// - robots.txt is unreachable or unparseable: fail closed. An origin whose
///   policy cannot be confirmed is never fetched.
///
/// Each origin's robots.txt is retrieved at most once per run; the verdict
/// source is cached for the lifetime of the gate.
pub struct RobotsGate {
    user_agent: String,
    cache: HashMap<String, OriginPolicy>,
}

enum OriginPolicy {
    /// Parsed ruleset from a 2xx robots.txt response.
    Ruleset(Box<Robot>),
    /// Confirmed error status: the origin is unrestricted.
    AllowAll,
    /// Transport failure or unparseable body: fail closed.
    DenyAll,
}

impl OriginPolicy {
    fn allows(&self, url: &Url) -> bool {
        match self {
            OriginPolicy::Ruleset(robot) => robot.allowed(url.as_str()),
            OriginPolicy::AllowAll => true,
            OriginPolicy::DenyAll => false,
        }
    }
}

impl RobotsGate {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: user_agent.into(),
            cache: HashMap::new(),
        }
    }

    /// Whether the configured user-agent may fetch `url`, consulting the
    /// cached policy for its origin or retrieving robots.txt on first use.
    pub async fn is_allowed<F: Fetcher>(&mut self, fetcher: &F, url: &Url) -> bool {
        let origin = url.origin().ascii_serialization();

        if let Some(policy) = self.cache.get(&origin) {
            return policy.allows(url);
        }

        let policy = self.retrieve_policy(fetcher, url).await;
        let verdict = policy.allows(url);
        self.cache.insert(origin, policy);
        verdict
    }

    async fn retrieve_policy<F: Fetcher>(&self, fetcher: &F, url: &Url) -> OriginPolicy {
        let robots_url = match get_robots_url(url.as_str())
            .ok()
            .and_then(|raw| Url::parse(&raw).ok())
        {
            Some(u) => u,
            None => {
                warn!("Cannot derive a robots.txt location for {}", url);
                return OriginPolicy::DenyAll;
            }
        };

        match fetcher.fetch(&robots_url).await {
            Ok(page) if page.is_success() => {
                match Robot::new(&self.user_agent, page.body.as_bytes()) {
                    Ok(robot) => OriginPolicy::Ruleset(Box::new(robot)),
                    Err(e) => {
                        warn!("Unparseable robots.txt at {}: {}", robots_url, e);
                        OriginPolicy::DenyAll
                    }
                }
            }
            Ok(page) => {
                debug!(
                    "robots.txt at {} answered {}, treating origin as unrestricted",
                    robots_url, page.status
                );
                OriginPolicy::AllowAll
            }
            Err(e) => {
                error!("Error fetching robots.txt from {}: {}", robots_url, e);
                OriginPolicy::DenyAll
            }
        }
    }
}

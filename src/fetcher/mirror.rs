use std::time::Duration;
use tracing::{debug, info, warn};

use super::PageFetcher;
use crate::models::BypassMode;

/// Startup-time discovery of a reachable mirror
pub struct MirrorProbe;

impl MirrorProbe {
    /// Return the first mirror whose front page fetches successfully in
    /// `mode` within `timeout`, or the first configured mirror when none
    /// respond.
    ///
    /// Returns `None` only for an empty mirror list.
    pub async fn discover(
        fetcher: &dyn PageFetcher,
        mirrors: &[String],
        mode: BypassMode,
        timeout: Duration,
    ) -> Option<String> {
        for mirror in mirrors {
            match tokio::time::timeout(timeout, fetcher.fetch(mirror, mode)).await {
                Ok(Ok(_)) => {
                    info!("Found working mirror: {}", mirror);
                    return Some(mirror.clone());
                }
                Ok(Err(e)) => debug!("Mirror {} unreachable: {}", mirror, e),
                Err(_) => debug!("Mirror {} timed out after {:?}", mirror, timeout),
            }
        }

        let fallback = mirrors.first().cloned();
        if let Some(ref mirror) = fallback {
            warn!("No working mirror found, using fallback: {}", mirror);
        }
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FetchError, FetchResult};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct ReachableOnly {
        reachable: &'static str,
        attempts: Mutex<Vec<(String, BypassMode)>>,
    }

    #[async_trait]
    impl PageFetcher for ReachableOnly {
        async fn fetch(&self, url: &str, mode: BypassMode) -> FetchResult<String> {
            self.attempts.lock().unwrap().push((url.to_string(), mode));
            if url == self.reachable {
                Ok("<html></html>".to_string())
            } else {
                Err(FetchError::Status {
                    status: 503,
                    url: url.to_string(),
                })
            }
        }
    }

    fn mirrors() -> Vec<String> {
        vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
            "https://c.example".to_string(),
        ]
    }

    #[tokio::test]
    async fn test_discover_picks_first_reachable() {
        let fetcher = ReachableOnly {
            reachable: "https://b.example",
            attempts: Mutex::new(Vec::new()),
        };
        let chosen = MirrorProbe::discover(
            &fetcher,
            &mirrors(),
            BypassMode::Challenge,
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(chosen.as_deref(), Some("https://b.example"));
        // Stops probing once a mirror answers
        assert_eq!(fetcher.attempts.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_discover_falls_back_to_first_mirror() {
        let fetcher = ReachableOnly {
            reachable: "https://nowhere.example",
            attempts: Mutex::new(Vec::new()),
        };
        let chosen = MirrorProbe::discover(
            &fetcher,
            &mirrors(),
            BypassMode::Challenge,
            Duration::from_secs(1),
        )
        .await;
        assert_eq!(chosen.as_deref(), Some("https://a.example"));
        assert_eq!(fetcher.attempts.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_discover_empty_list() {
        let fetcher = ReachableOnly {
            reachable: "https://a.example",
            attempts: Mutex::new(Vec::new()),
        };
        assert_eq!(
            MirrorProbe::discover(&fetcher, &[], BypassMode::Challenge, Duration::from_secs(1)).await,
            None
        );
    }

    #[tokio::test]
    async fn test_discover_uses_requested_mode() {
        let fetcher = ReachableOnly {
            reachable: "https://a.example",
            attempts: Mutex::new(Vec::new()),
        };
        let chosen =
            MirrorProbe::discover(&fetcher, &mirrors(), BypassMode::Plain, Duration::from_secs(1))
                .await;
        assert_eq!(chosen.as_deref(), Some("https://a.example"));
        assert_eq!(
            *fetcher.attempts.lock().unwrap(),
            vec![("https://a.example".to_string(), BypassMode::Plain)]
        );
    }
}

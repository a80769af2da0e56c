//! Recursive frame resolution
//!
//! Embedded players are fetched and run through the same analysis as a
//! top-level page, with the frame's own URL as the base. Hops are counted
//! from the top-level page: frames found there are hop 1. Frames found at a
//! hop equal to `max_depth` are dropped, not followed.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::analyzer::PageAnalyzer;
use crate::config::ResolverConfig;
use crate::fetcher::PageFetcher;
use crate::models::{BypassMode, CandidateUrl, ValidatedStream};
use crate::utils::UrlUtils;
use crate::utils::jitter::random_delay;

type ExpandFuture<'a> = Pin<Box<dyn Future<Output = ()> + Send + 'a>>;

pub struct FrameResolver {
    fetcher: Arc<dyn PageFetcher>,
    max_depth: usize,
    delay_min: Duration,
    delay_max: Duration,
}

impl FrameResolver {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ResolverConfig) -> Self {
        Self {
            fetcher,
            max_depth: config.frame_depth,
            delay_min: config.frame_delay_min,
            delay_max: config.frame_delay_max,
        }
    }

    /// Follow `frames` found on a top-level page, appending every stream
    /// validated inside them to `streams` as soon as it is found.
    pub async fn expand(
        &self,
        analyzer: &PageAnalyzer,
        frames: Vec<CandidateUrl>,
        mode: BypassMode,
        streams: &mut Vec<ValidatedStream>,
    ) {
        self.expand_hop(analyzer, frames, 1, mode, streams).await
    }

    fn expand_hop<'a>(
        &'a self,
        analyzer: &'a PageAnalyzer,
        frames: Vec<CandidateUrl>,
        hop: usize,
        mode: BypassMode,
        streams: &'a mut Vec<ValidatedStream>,
    ) -> ExpandFuture<'a> {
        Box::pin(async move {
            if frames.is_empty() {
                return;
            }
            if hop > self.max_depth {
                debug!(
                    "Dropping {} frames beyond depth limit {}",
                    frames.len(),
                    self.max_depth
                );
                return;
            }

            let mut visited = HashSet::new();
            for frame in frames {
                let Some(frame_url) = UrlUtils::absolutize(&frame.raw, &frame.page_url) else {
                    debug!("Skipping unresolvable frame {}", frame.raw);
                    continue;
                };
                if !visited.insert(frame_url.clone()) {
                    continue;
                }

                let delay = random_delay(self.delay_min, self.delay_max);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let text = match self.fetcher.fetch(&frame_url, mode).await {
                    Ok(text) => text,
                    Err(e) => {
                        debug!("Frame fetch failed at hop {}: {}", hop, e);
                        continue;
                    }
                };

                let findings = analyzer.analyze(&text, &frame_url);
                debug!(
                    "Frame {} (hop {}) yielded {} streams and {} nested frames",
                    frame_url,
                    hop,
                    findings.streams.len(),
                    findings.frames.len()
                );
                streams.extend(findings.streams);
                self.expand_hop(analyzer, findings.frames, hop + 1, mode, &mut *streams)
                    .await;
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{FetchError, FetchResult};
    use crate::models::CandidateSource;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct PageMap {
        pages: HashMap<String, String>,
        fetched: Mutex<Vec<String>>,
    }

    impl PageMap {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(u, b)| (u.to_string(), b.to_string()))
                    .collect(),
                fetched: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for PageMap {
        async fn fetch(&self, url: &str, _mode: BypassMode) -> FetchResult<String> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
                status: 404,
                url: url.to_string(),
            })
        }
    }

    fn resolver(fetcher: Arc<PageMap>, depth: usize) -> FrameResolver {
        let config = ResolverConfig {
            frame_depth: depth,
            frame_delay_min: Duration::ZERO,
            frame_delay_max: Duration::ZERO,
            ..ResolverConfig::default()
        };
        FrameResolver::new(fetcher, &config)
    }

    fn frame(raw: &str) -> CandidateUrl {
        CandidateUrl::new(raw, CandidateSource::Frame, "https://site.example/movie/1")
    }

    #[tokio::test]
    async fn test_single_hop_collects_streams() {
        let fetcher = Arc::new(PageMap::new(&[(
            "https://player.example/embed/1",
            r#"<video src="/hls/master.m3u8"></video>"#,
        )]));
        let mut streams = Vec::new();
        resolver(fetcher.clone(), 1)
            .expand(
                &PageAnalyzer::default(),
                vec![frame("//player.example/embed/1")],
                BypassMode::Plain,
                &mut streams,
            )
            .await;

        // Structural and bare-string strategies both see the tag; dedup is the pipeline's job
        assert!(!streams.is_empty());
        assert!(streams
            .iter()
            .all(|s| s.url == "https://player.example/hls/master.m3u8"));
        assert_eq!(streams[0].page_url, "https://player.example/embed/1");
    }

    #[tokio::test]
    async fn test_nested_frames_stop_at_depth_limit() {
        let fetcher = Arc::new(PageMap::new(&[
            (
                "https://player.example/embed/1",
                r#"<iframe src="https://inner.example/embed/2"></iframe>"#,
            ),
            (
                "https://inner.example/embed/2",
                r#"<video src="https://inner.example/deep.mp4"></video>"#,
            ),
        ]));
        let mut streams = Vec::new();
        resolver(fetcher.clone(), 1)
            .expand(
                &PageAnalyzer::default(),
                vec![frame("https://player.example/embed/1")],
                BypassMode::Plain,
                &mut streams,
            )
            .await;

        assert!(streams.is_empty());
        assert_eq!(
            *fetcher.fetched.lock().unwrap(),
            vec!["https://player.example/embed/1".to_string()]
        );
    }

    #[tokio::test]
    async fn test_deeper_limit_follows_nested_frames() {
        let fetcher = Arc::new(PageMap::new(&[
            (
                "https://player.example/embed/1",
                r#"<iframe src="https://inner.example/embed/2"></iframe>"#,
            ),
            (
                "https://inner.example/embed/2",
                r#"<video src="https://inner.example/deep.mp4"></video>"#,
            ),
        ]));
        let mut streams = Vec::new();
        resolver(fetcher, 2)
            .expand(
                &PageAnalyzer::default(),
                vec![frame("https://player.example/embed/1")],
                BypassMode::Plain,
                &mut streams,
            )
            .await;

        assert!(!streams.is_empty());
        assert!(streams.iter().all(|s| s.url == "https://inner.example/deep.mp4"));
    }

    #[tokio::test]
    async fn test_failed_and_duplicate_frames() {
        let fetcher = Arc::new(PageMap::new(&[]));
        let mut streams = Vec::new();
        resolver(fetcher.clone(), 1)
            .expand(
                &PageAnalyzer::default(),
                vec![
                    frame("https://gone.example/embed/1"),
                    frame("https://gone.example/embed/1"),
                ],
                BypassMode::Plain,
                &mut streams,
            )
            .await;

        assert!(streams.is_empty());
        assert_eq!(fetcher.fetched.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_zero_depth_follows_nothing() {
        let fetcher = Arc::new(PageMap::new(&[]));
        let mut streams = Vec::new();
        resolver(fetcher.clone(), 0)
            .expand(
                &PageAnalyzer::default(),
                vec![frame("https://player.example/embed/1")],
                BypassMode::Plain,
                &mut streams,
            )
            .await;

        assert!(fetcher.fetched.lock().unwrap().is_empty());
    }

    /// Records the virtual time at which each URL was fetched
    struct TimedPages {
        page: &'static str,
        fetched_at: Mutex<Vec<(String, tokio::time::Instant)>>,
    }

    #[async_trait]
    impl PageFetcher for TimedPages {
        async fn fetch(&self, url: &str, _mode: BypassMode) -> FetchResult<String> {
            self.fetched_at
                .lock()
                .unwrap()
                .push((url.to_string(), tokio::time::Instant::now()));
            Ok(self.page.to_string())
        }
    }

    fn delayed_resolver(fetcher: Arc<TimedPages>) -> FrameResolver {
        let config = ResolverConfig {
            frame_depth: 1,
            frame_delay_min: Duration::from_secs(2),
            frame_delay_max: Duration::from_secs(3),
            ..ResolverConfig::default()
        };
        FrameResolver::new(fetcher, &config)
    }

    #[tokio::test(start_paused = true)]
    async fn test_frame_fetch_waits_for_jitter() {
        let fetcher = Arc::new(TimedPages {
            page: r#"<video src="/hls/master.m3u8"></video>"#,
            fetched_at: Mutex::new(Vec::new()),
        });
        let start = tokio::time::Instant::now();
        let mut streams = Vec::new();
        delayed_resolver(fetcher.clone())
            .expand(
                &PageAnalyzer::default(),
                vec![frame("https://player.example/embed/1")],
                BypassMode::Plain,
                &mut streams,
            )
            .await;

        let fetched_at = fetcher.fetched_at.lock().unwrap();
        assert_eq!(fetched_at.len(), 1);
        assert_eq!(fetched_at[0].0, "https://player.example/embed/1");
        let waited = fetched_at[0].1 - start;
        assert!(waited >= Duration::from_secs(2));
        assert!(waited <= Duration::from_secs(3));
        // The frame page has no nested frames, so no further delay follows
        assert!(start.elapsed() <= Duration::from_secs(3));
        assert!(!streams.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_frames_means_no_delay() {
        let fetcher = Arc::new(TimedPages {
            page: "",
            fetched_at: Mutex::new(Vec::new()),
        });
        let start = tokio::time::Instant::now();
        let mut streams = Vec::new();
        delayed_resolver(fetcher.clone())
            .expand(&PageAnalyzer::default(), Vec::new(), BypassMode::Plain, &mut streams)
            .await;

        assert_eq!(start.elapsed(), Duration::ZERO);
        assert!(fetcher.fetched_at.lock().unwrap().is_empty());
    }
}

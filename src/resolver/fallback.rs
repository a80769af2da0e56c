//! Template fallthrough
//!
//! Page templates for the request's content kind are tried in order against
//! the active mirror. The first page that yields at least one validated
//! stream (directly or through its frames) ends discovery.

use std::sync::Arc;
use tracing::{debug, info};

use super::analyzer::PageAnalyzer;
use super::frames::FrameResolver;
use crate::config::TemplateConfig;
use crate::fetcher::PageFetcher;
use crate::models::{BypassMode, ContentKind, PageTemplate, ResolutionRequest, ValidatedStream};

/// Progress of one discovery run, owned by the caller so that whatever was
/// found survives cancellation
#[derive(Debug, Default)]
pub struct DiscoveryState {
    /// Streams validated on the page currently (or last) being processed
    pub streams: Vec<ValidatedStream>,
    pub current_page: Option<String>,
    pub pages_tried: usize,
}

impl DiscoveryState {
    fn begin_page(&mut self, url: &str) {
        self.streams.clear();
        self.current_page = Some(url.to_string());
        self.pages_tried += 1;
    }

    /// The page the collected streams came from, if any were found
    pub fn source_page(&self) -> Option<&str> {
        if self.streams.is_empty() {
            None
        } else {
            self.current_page.as_deref()
        }
    }
}

pub struct FallbackController {
    fetcher: Arc<dyn PageFetcher>,
    frames: FrameResolver,
    movie_templates: Vec<PageTemplate>,
    episode_templates: Vec<PageTemplate>,
}

impl FallbackController {
    pub fn new(fetcher: Arc<dyn PageFetcher>, frames: FrameResolver, templates: &TemplateConfig) -> Self {
        Self {
            fetcher,
            frames,
            movie_templates: templates.movie.iter().map(PageTemplate::new).collect(),
            episode_templates: templates.episode.iter().map(PageTemplate::new).collect(),
        }
    }

    pub fn templates_for(&self, kind: ContentKind) -> &[PageTemplate] {
        match kind {
            ContentKind::Movie => &self.movie_templates,
            ContentKind::Episode => &self.episode_templates,
        }
    }

    /// Walk the templates until one page yields streams. On return,
    /// `state.streams` holds that page's streams in discovery order, or is
    /// empty when every template was exhausted.
    pub async fn discover(
        &self,
        analyzer: &PageAnalyzer,
        mirror: &str,
        mode: BypassMode,
        request: &ResolutionRequest,
        state: &mut DiscoveryState,
    ) {
        for template in self.templates_for(request.kind()) {
            let page_url = template.url_for(mirror, request);
            state.begin_page(&page_url);
            info!("Trying template {} -> {}", template.pattern, page_url);

            let text = match self.fetcher.fetch(&page_url, mode).await {
                Ok(text) => text,
                Err(e) => {
                    debug!("Template page fetch failed: {}", e);
                    continue;
                }
            };

            let findings = analyzer.analyze(&text, &page_url);
            debug!(
                "{} yielded {} streams and {} frames",
                page_url,
                findings.streams.len(),
                findings.frames.len()
            );
            state.streams.extend(findings.streams);
            self.frames
                .expand(analyzer, findings.frames, mode, &mut state.streams)
                .await;

            if !state.streams.is_empty() {
                info!("Found {} streams on {}", state.streams.len(), page_url);
                return;
            }
        }

        info!(
            "No streams found for {} {} after {} pages",
            request.kind().as_str(),
            request.content_id(),
            state.pages_tried
        );
    }
}

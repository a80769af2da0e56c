//! Request to result orchestration
//!
//! `resolve` never fails. Whatever discovery produces is ranked, deduplicated
//! and truncated; when nothing validated, a single synthetic record pointing
//! at the site's direct autoplay link is returned instead.

use std::collections::HashSet;
use std::sync::{Arc, RwLock};
use tokio::time::Instant;
use tracing::{info, warn};

use super::analyzer::PageAnalyzer;
use super::fallback::{DiscoveryState, FallbackController};
use super::frames::FrameResolver;
use crate::config::Config;
use crate::fetcher::PageFetcher;
use crate::models::{
    BypassMode, PageTemplate, ResolutionRequest, ResolutionResult, StreamRecord, ValidatedStream,
};
use crate::utils::UrlUtils;

/// Per-call view of the mutable, process-wide resolver settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverContext {
    /// Active mirror base URL
    pub mirror: String,
    pub bypass_mode: BypassMode,
}

impl ResolverContext {
    pub fn new<S: Into<String>>(mirror: S, bypass_mode: BypassMode) -> Self {
        Self {
            mirror: mirror.into(),
            bypass_mode,
        }
    }
}

/// Shared handle to the current [`ResolverContext`]
///
/// Readers take a snapshot at the start of a call and keep it for the whole
/// call; `replace` only affects calls that start afterwards.
#[derive(Debug, Clone)]
pub struct ContextHandle {
    current: Arc<RwLock<Arc<ResolverContext>>>,
}

impl ContextHandle {
    pub fn new(context: ResolverContext) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(context))),
        }
    }

    pub fn snapshot(&self) -> Arc<ResolverContext> {
        let guard = self.current.read().unwrap_or_else(|e| e.into_inner());
        Arc::clone(&*guard)
    }

    pub fn replace(&self, context: ResolverContext) {
        let mut guard = self.current.write().unwrap_or_else(|e| e.into_inner());
        *guard = Arc::new(context);
    }
}

/// Lowercase, dash-separated form of a provider name for grouping keys
pub fn provider_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

pub struct ResolutionPipeline {
    context: ContextHandle,
    analyzer: PageAnalyzer,
    controller: FallbackController,
    provider: String,
    provider_slug: String,
    max_results: usize,
    country_whitelist: Vec<String>,
    fallback_label: String,
    movie_direct: PageTemplate,
    episode_direct: PageTemplate,
}

impl ResolutionPipeline {
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>, context: ContextHandle) -> Self {
        let frames = FrameResolver::new(fetcher.clone(), &config.resolver);
        Self {
            context,
            analyzer: PageAnalyzer::from_config(config),
            controller: FallbackController::new(fetcher, frames, &config.templates),
            provider: config.source.name.clone(),
            provider_slug: provider_slug(&config.source.name),
            max_results: config.resolver.max_results,
            country_whitelist: config.resolver.country_whitelist.clone(),
            fallback_label: config.resolver.fallback_quality_label.clone(),
            movie_direct: PageTemplate::new(config.templates.movie_direct.as_str()),
            episode_direct: PageTemplate::new(config.templates.episode_direct.as_str()),
        }
    }

    pub fn context(&self) -> &ContextHandle {
        &self.context
    }

    /// Resolve without a deadline; every fetch is still bounded by the
    /// fetcher's own timeout.
    pub async fn resolve(&self, request: &ResolutionRequest) -> ResolutionResult {
        self.run(request, None).await
    }

    /// Resolve, abandoning in-flight work at `deadline` and answering with
    /// whatever had already validated.
    pub async fn resolve_until(
        &self,
        request: &ResolutionRequest,
        deadline: Instant,
    ) -> ResolutionResult {
        self.run(request, Some(deadline)).await
    }

    /// The answer for a request whose deadline passed before discovery could
    /// start: the direct link, flagged as timed out
    pub fn expired(&self, request: &ResolutionRequest) -> ResolutionResult {
        let context = self.context.snapshot();
        self.finish(request, &context, DiscoveryState::default(), true)
    }

    async fn run(&self, request: &ResolutionRequest, deadline: Option<Instant>) -> ResolutionResult {
        let context = self.context.snapshot();
        let mut state = DiscoveryState::default();

        let discovery = self.controller.discover(
            &self.analyzer,
            &context.mirror,
            context.bypass_mode,
            request,
            &mut state,
        );
        let timed_out = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, discovery).await.is_err(),
            None => {
                discovery.await;
                false
            }
        };
        if timed_out {
            warn!(
                "Deadline reached resolving {} {} with {} streams collected",
                request.kind().as_str(),
                request.content_id(),
                state.streams.len()
            );
        }

        self.finish(request, &context, state, timed_out)
    }

    fn finish(
        &self,
        request: &ResolutionRequest,
        context: &ResolverContext,
        state: DiscoveryState,
        timed_out: bool,
    ) -> ResolutionResult {
        let source_page = state.source_page().map(str::to_string);
        let ranked = self.analyzer.ranker().rank(state.streams);

        let mut seen = HashSet::new();
        let unique: Vec<ValidatedStream> = ranked
            .into_iter()
            .filter(|stream| seen.insert(UrlUtils::canonical(&stream.url)))
            .take(self.max_results)
            .collect();

        if unique.is_empty() {
            info!(
                "No validated streams for {} {}, returning direct link",
                request.kind().as_str(),
                request.content_id()
            );
            return ResolutionResult {
                streams: vec![self.direct_link(request, context)],
                source_page: None,
                used_fallback: true,
                timed_out,
            };
        }

        let streams = unique
            .into_iter()
            .enumerate()
            .map(|(index, stream)| StreamRecord {
                title: self.title(request, &stream.quality_label, index + 1),
                quality_label: stream.quality_label,
                url: stream.url,
                group_key: self.group_key(request),
                country_whitelist: Some(self.country_whitelist.clone()),
            })
            .collect();

        ResolutionResult {
            streams,
            source_page,
            used_fallback: false,
            timed_out,
        }
    }

    fn title(&self, request: &ResolutionRequest, label: &str, source_number: usize) -> String {
        match request.episode_marker() {
            Some(marker) => format!(
                "{} - {} {} (Source {})",
                self.provider, marker, label, source_number
            ),
            None => format!("{} - {} (Source {})", self.provider, label, source_number),
        }
    }

    fn group_key(&self, request: &ResolutionRequest) -> String {
        let kind = match request {
            ResolutionRequest::Movie { .. } => "movie",
            ResolutionRequest::Episode { .. } => "series",
        };
        format!("{}-{}-{}", self.provider_slug, kind, request.content_id())
    }

    fn direct_link(&self, request: &ResolutionRequest, context: &ResolverContext) -> StreamRecord {
        let (template, title) = match request.episode_marker() {
            Some(marker) => (
                &self.episode_direct,
                format!("{} - {} Direct Link", self.provider, marker),
            ),
            None => (&self.movie_direct, format!("{} - Direct Link", self.provider)),
        };
        StreamRecord {
            url: template.url_for(&context.mirror, request),
            title,
            quality_label: self.fallback_label.clone(),
            group_key: self.group_key(request),
            country_whitelist: None,
        }
    }
}

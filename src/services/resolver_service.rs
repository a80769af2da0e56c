//! Resolver Service
//!
//! Runs independent resolution requests concurrently, bounded by a
//! semaphore, and gives every request its own deadline.

use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::models::{ResolutionRequest, ResolutionResult};
use crate::resolver::ResolutionPipeline;

pub struct ResolverService {
    pipeline: Arc<ResolutionPipeline>,
    permits: Arc<Semaphore>,
    request_timeout: Duration,
}

impl ResolverService {
    pub fn new(pipeline: Arc<ResolutionPipeline>, config: &ResolverConfig) -> Self {
        Self {
            pipeline,
            permits: Arc::new(Semaphore::new(config.max_concurrent_requests.max(1))),
            request_timeout: config.request_timeout,
        }
    }

    /// Number of requests that could start right now
    pub fn available_slots(&self) -> usize {
        self.permits.available_permits()
    }

    /// Resolve one request. Time spent waiting for a slot counts against
    /// the request's deadline.
    pub async fn resolve(&self, request: &ResolutionRequest) -> ResolutionResult {
        let deadline = Instant::now() + self.request_timeout;

        let _permit = match tokio::time::timeout_at(deadline, self.permits.acquire()).await {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => {
                warn!("Resolver service is shut down, returning direct link");
                return self.pipeline.expired(request);
            }
            Err(_) => {
                warn!(
                    "Timed out waiting for a resolver slot for {}",
                    request.content_id()
                );
                return self.pipeline.expired(request);
            }
        };

        debug!(
            "Resolving {} {} ({} slots left)",
            request.kind().as_str(),
            request.content_id(),
            self.permits.available_permits()
        );
        self.pipeline.resolve_until(request, deadline).await
    }

    /// Resolve many requests concurrently; results are in input order
    pub async fn resolve_batch(&self, requests: &[ResolutionRequest]) -> Vec<ResolutionResult> {
        join_all(requests.iter().map(|request| self.resolve(request))).await
    }
}

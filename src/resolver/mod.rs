//! Stream resolution core
//!
//! Flow for one request: the fallback controller walks page templates on the
//! active mirror; each fetched page is analyzed (extract, validate, score);
//! embedded players are expanded by the frame resolver; the pipeline ranks,
//! deduplicates and builds the outward records.

pub mod analyzer;
pub mod fallback;
pub mod frames;
pub mod pipeline;
pub mod quality;
pub mod validator;

pub use analyzer::{PageAnalyzer, PageFindings};
pub use fallback::{DiscoveryState, FallbackController};
pub use frames::FrameResolver;
pub use pipeline::{ContextHandle, ResolutionPipeline, ResolverContext, provider_slug};
pub use quality::QualityRanker;
pub use validator::UrlValidator;

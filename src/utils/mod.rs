//! Utility modules for the stream resolver
//!
//! Small, pure helpers shared by the extractor, validator and frame resolver.

pub mod encoding;
pub mod jitter;
pub mod url;

pub use url::UrlUtils;

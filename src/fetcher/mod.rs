//! Page fetching
//!
//! The resolution core only knows the [`PageFetcher`] contract. Any error a
//! fetcher returns is treated as "this page produced nothing".

pub mod fingerprint;
pub mod http;
pub mod mirror;

use async_trait::async_trait;

use crate::errors::FetchResult;
use crate::models::BypassMode;

pub use fingerprint::BrowserFingerprint;
pub use http::HttpPageFetcher;
pub use mirror::MirrorProbe;

/// Fetch raw page text. Implementations must bound every call with their own
/// timeout.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str, mode: BypassMode) -> FetchResult<String>;
}

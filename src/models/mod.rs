use serde::{Deserialize, Serialize};

pub mod request;
pub mod stream;

pub use request::{ContentKind, PageTemplate, ResolutionRequest, zero_pad};
pub use stream::{CandidateSource, CandidateUrl, ResolutionResult, StreamRecord, ValidatedStream};

/// How the page fetcher should approach a source site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BypassMode {
    /// Browser-like client with a cookie jar and full fingerprint headers
    #[default]
    Challenge,
    /// Bare HTTP client
    Plain,
}

impl BypassMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BypassMode::Challenge => "challenge",
            BypassMode::Plain => "plain",
        }
    }
}

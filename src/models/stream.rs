use serde::{Deserialize, Serialize};

/// Which extraction strategy produced a candidate
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    /// `src` of native `<video>`/`<source>` elements
    StructuralTag,
    /// `file: "..."`-style script literals
    ScriptLiteral,
    /// Any quoted string ending in a media extension
    BareExtension,
    /// Quoted string with a streaming keyword and a media extension
    IndicatorLiteral,
    /// Decoded `atob("...")` argument
    Base64,
    /// Literal recovered from `\xNN`/`\uNNNN` escaped script
    EscapedScript,
    /// Embedded player to be fetched and re-extracted
    Frame,
}

impl CandidateSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CandidateSource::StructuralTag => "structural_tag",
            CandidateSource::ScriptLiteral => "script_literal",
            CandidateSource::BareExtension => "bare_extension",
            CandidateSource::IndicatorLiteral => "indicator_literal",
            CandidateSource::Base64 => "base64",
            CandidateSource::EscapedScript => "escaped_script",
            CandidateSource::Frame => "frame",
        }
    }
}

/// A raw URL-like string pulled from a page, not yet validated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CandidateUrl {
    pub raw: String,
    pub source: CandidateSource,
    /// Page the candidate was found on, used as base for relative URLs
    pub page_url: String,
}

impl CandidateUrl {
    pub fn new<R: Into<String>, P: Into<String>>(raw: R, source: CandidateSource, page_url: P) -> Self {
        Self {
            raw: raw.into(),
            source,
            page_url: page_url.into(),
        }
    }

    pub fn is_frame(&self) -> bool {
        self.source == CandidateSource::Frame
    }
}

/// A candidate that passed validation: absolute `http(s)` URL plus its
/// derived quality.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidatedStream {
    pub url: String,
    pub score: u8,
    pub quality_label: String,
    pub source: CandidateSource,
    pub page_url: String,
}

/// Outward stream record handed to the caller
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StreamRecord {
    pub url: String,
    pub title: String,
    pub quality_label: String,
    /// Lets players group alternate-quality streams of the same title
    pub group_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_whitelist: Option<Vec<String>>,
}

/// Final, ordered answer for one request. Never empty.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResolutionResult {
    pub streams: Vec<StreamRecord>,
    /// Page whose template yielded the streams
    pub source_page: Option<String>,
    /// True when the only record is the synthetic direct link
    pub used_fallback: bool,
    /// True when the caller's deadline cut discovery short
    pub timed_out: bool,
}

impl ResolutionResult {
    pub fn urls(&self) -> Vec<&str> {
        self.streams.iter().map(|s| s.url.as_str()).collect()
    }
}

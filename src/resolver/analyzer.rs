//! Single-page analysis
//!
//! Runs every extraction strategy over one page, validates and scores the
//! results, and hands embedded players back to the caller for following.

use tracing::trace;

use crate::config::Config;
use crate::extraction::CandidateExtractor;
use crate::models::{CandidateUrl, ValidatedStream};

use super::quality::QualityRanker;
use super::validator::UrlValidator;

/// What one page yielded: validated streams in discovery order, plus the
/// embedded players still to be followed
#[derive(Debug, Default)]
pub struct PageFindings {
    pub streams: Vec<ValidatedStream>,
    pub frames: Vec<CandidateUrl>,
}

/// Extract, validate and score the candidates on a single page
pub struct PageAnalyzer {
    extractor: CandidateExtractor,
    validator: UrlValidator,
    ranker: QualityRanker,
}

impl PageAnalyzer {
    pub fn new(extractor: CandidateExtractor, validator: UrlValidator, ranker: QualityRanker) -> Self {
        Self {
            extractor,
            validator,
            ranker,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CandidateExtractor::with_default_strategies(&config.keywords),
            UrlValidator::new(&config.keywords),
            QualityRanker::new(config.quality.clone()),
        )
    }

    pub fn ranker(&self) -> &QualityRanker {
        &self.ranker
    }

    pub fn analyze(&self, text: &str, page_url: &str) -> PageFindings {
        let mut findings = PageFindings::default();
        for candidate in self.extractor.extract(text, page_url) {
            if candidate.is_frame() {
                findings.frames.push(candidate);
                continue;
            }
            let Some(url) = self.validator.validate(&candidate.raw, &candidate.page_url) else {
                continue;
            };
            trace!("Accepted {} ({})", url, candidate.source.as_str());
            findings.streams.push(ValidatedStream {
                score: self.ranker.score(&url),
                quality_label: self.ranker.label(&url),
                url,
                source: candidate.source,
                page_url: candidate.page_url,
            });
        }
        findings
    }
}

impl Default for PageAnalyzer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

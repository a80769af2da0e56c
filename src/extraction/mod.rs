//! Candidate URL extraction
//!
//! A page is scanned by an ordered list of [`ExtractionStrategy`]
//! implementations. Each one looks for a different way sites embed media
//! references; their outputs are concatenated in strategy order. No
//! validation happens here, so duplicates and junk are expected.

pub mod strategies;

use tracing::trace;

use crate::config::KeywordConfig;
use crate::models::CandidateUrl;

pub use strategies::{
    Base64Strategy, BareExtensionStrategy, EscapedScriptStrategy, FrameStrategy,
    IndicatorLiteralStrategy, ScriptLiteralStrategy, StructuralTagStrategy,
};

/// One way of pulling candidate URLs out of page text
pub trait ExtractionStrategy: Send + Sync {
    /// Stable identifier used in logs
    fn name(&self) -> &'static str;

    /// Return candidates in document order. Must never fail; unparseable
    /// input yields an empty list.
    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl>;
}

/// Runs every registered strategy over a page
pub struct CandidateExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl CandidateExtractor {
    /// An extractor with no strategies
    pub fn empty() -> Self {
        Self {
            strategies: Vec::new(),
        }
    }

    /// The built-in strategy set, in precedence order
    pub fn with_default_strategies(keywords: &KeywordConfig) -> Self {
        let mut extractor = Self::empty();
        extractor.push(StructuralTagStrategy);
        extractor.push(ScriptLiteralStrategy);
        extractor.push(BareExtensionStrategy);
        extractor.push(IndicatorLiteralStrategy);
        extractor.push(Base64Strategy);
        extractor.push(FrameStrategy::new(&keywords.frame_host_indicators));
        extractor.push(EscapedScriptStrategy);
        extractor
    }

    /// Append a strategy; it runs after all previously registered ones
    pub fn push<S: ExtractionStrategy + 'static>(&mut self, strategy: S) {
        self.strategies.push(Box::new(strategy));
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Concatenate the output of every strategy, in registration order
    pub fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        let mut candidates = Vec::new();
        for strategy in &self.strategies {
            let found = strategy.extract(text, page_url);
            if !found.is_empty() {
                trace!(
                    "Strategy {} found {} candidates on {}",
                    strategy.name(),
                    found.len(),
                    page_url
                );
            }
            candidates.extend(found);
        }
        candidates
    }
}

impl Default for CandidateExtractor {
    fn default() -> Self {
        Self::with_default_strategies(&KeywordConfig::default())
    }
}

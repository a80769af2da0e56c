//! Quality scoring
//!
//! Score and label are pure functions of the URL text. Precedence:
//! explicit resolution token, then container/protocol, then generic
//! superiority keyword, then the default.

use crate::config::{QualityConfig, QualityRule};
use crate::models::ValidatedStream;

#[derive(Debug, Clone)]
pub struct QualityRanker {
    config: QualityConfig,
}

fn find_rule<'a>(rules: &'a [QualityRule], lower_url: &str) -> Option<&'a QualityRule> {
    rules
        .iter()
        .find(|rule| lower_url.contains(rule.pattern.to_ascii_lowercase().as_str()))
}

fn mentions_any(lower_url: &str, keywords: &[String]) -> bool {
    keywords
        .iter()
        .any(|k| lower_url.contains(k.to_ascii_lowercase().as_str()))
}

impl QualityRanker {
    pub fn new(config: QualityConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, url: &str) -> u8 {
        let lower = url.to_ascii_lowercase();
        if let Some(rule) = find_rule(&self.config.tokens, &lower) {
            return rule.score;
        }
        if let Some(rule) = find_rule(&self.config.formats, &lower) {
            return rule.score;
        }
        if mentions_any(&lower, &self.config.superior_keywords) {
            return self.config.superior_score;
        }
        self.config.default_score
    }

    pub fn label(&self, url: &str) -> String {
        let lower = url.to_ascii_lowercase();
        if let Some(rule) = find_rule(&self.config.tokens, &lower) {
            return rule.label.clone();
        }
        if let Some(rule) = find_rule(&self.config.formats, &lower) {
            return rule.label.clone();
        }
        if mentions_any(&lower, &self.config.hd_label_keywords) {
            return "HD".to_string();
        }
        if mentions_any(&lower, &self.config.sd_label_keywords) {
            return "SD".to_string();
        }
        self.config.default_label.clone()
    }

    /// Stable sort, highest score first; equal scores keep discovery order
    pub fn rank(&self, mut streams: Vec<ValidatedStream>) -> Vec<ValidatedStream> {
        streams.sort_by(|a, b| b.score.cmp(&a.score));
        streams
    }
}

impl Default for QualityRanker {
    fn default() -> Self {
        Self::new(QualityConfig::default())
    }
}

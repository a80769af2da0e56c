//! Candidate acceptance and normalization
//!
//! Rules run in a fixed order and the first decisive one wins:
//! length, scheme denylist, static-asset denylist, media extension
//! allowlist, then the weaker "looks like a streaming endpoint" heuristic.
//! Survivors are normalized to an absolute `http(s)` URL. Candidates starting
//! with `/` are resolved against the page first and the rules run on the
//! result.

use tracing::trace;

use crate::config::KeywordConfig;
use crate::utils::UrlUtils;

#[derive(Debug, Clone)]
pub struct UrlValidator {
    min_length: usize,
    rejected_schemes: Vec<String>,
    asset_indicators: Vec<String>,
    media_extensions: Vec<String>,
    streaming_indicators: Vec<String>,
    adaptive_keywords: Vec<String>,
}

fn lowercase_all(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.to_ascii_lowercase()).collect()
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}

impl UrlValidator {
    pub fn new(keywords: &KeywordConfig) -> Self {
        Self {
            min_length: keywords.min_url_length,
            rejected_schemes: lowercase_all(&keywords.rejected_schemes),
            asset_indicators: lowercase_all(&keywords.asset_indicators),
            media_extensions: lowercase_all(&keywords.media_extensions),
            streaming_indicators: lowercase_all(&keywords.streaming_indicators),
            adaptive_keywords: lowercase_all(&keywords.adaptive_keywords),
        }
    }

    /// Accept or reject `candidate`, returning the normalized absolute URL
    /// on acceptance. Pure: the same inputs always give the same answer.
    pub fn validate(&self, candidate: &str, base: &str) -> Option<String> {
        let trimmed = candidate.trim();

        // Root- and protocol-relative references are judged in resolved form
        if trimmed.starts_with('/') {
            let Some(resolved) = UrlUtils::absolutize(trimmed, base) else {
                trace!("Rejected {}: not resolvable against {}", trimmed, base);
                return None;
            };
            return self.accepts(&resolved).then_some(resolved);
        }

        if !self.accepts(trimmed) {
            return None;
        }
        let normalized = UrlUtils::absolutize(trimmed, base);
        if normalized.is_none() {
            trace!("Rejected {}: not resolvable to http(s) against {}", trimmed, base);
        }
        normalized
    }

    fn accepts(&self, candidate: &str) -> bool {
        if candidate.chars().count() < self.min_length {
            trace!("Rejected {}: too short", candidate);
            return false;
        }

        let lower = candidate.to_ascii_lowercase();
        if self
            .rejected_schemes
            .iter()
            .any(|scheme| lower.starts_with(scheme.as_str()))
        {
            trace!("Rejected {}: disallowed scheme", candidate);
            return false;
        }

        if contains_any(&lower, &self.asset_indicators) {
            trace!("Rejected {}: static asset", candidate);
            return false;
        }

        if contains_any(&lower, &self.media_extensions) {
            return true;
        }

        if !contains_any(&lower, &self.streaming_indicators) {
            trace!("Rejected {}: no media or streaming indicator", candidate);
            return false;
        }

        contains_any(&lower, &self.adaptive_keywords) || Self::has_host_and_path(candidate)
    }

    fn has_host_and_path(candidate: &str) -> bool {
        UrlUtils::parse_lenient(candidate).is_some_and(|url| {
            url.host_str().is_some_and(|h| !h.is_empty()) && url.path().len() > 1
        })
    }
}

impl Default for UrlValidator {
    fn default() -> Self {
        Self::new(&KeywordConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("http://x.com/style.css")]
    #[case("https://cdn.example/app.js?v=2")]
    #[case("https://cdn.example/poster.JPG")]
    #[case("https://fonts.example/roboto.woff2")]
    #[case("data:video/mp4;base64,AAAA")]
    #[case("javascript:play('a.mp4')")]
    #[case("a.mp4")]
    #[case("/s")]
    #[case("https://example.com/about-us")]
    fn test_rejects(#[case] candidate: &str) {
        let validator = UrlValidator::default();
        assert_eq!(validator.validate(candidate, "https://site.com/watch/1"), None);
    }

    #[rstest]
    #[case("http://x.com/movie.m3u8", "http://x.com/movie.m3u8")]
    #[case("/movie/1.mp4", "https://site.com/movie/1.mp4")]
    #[case("//cdn.site.com/a.mp4", "https://cdn.site.com/a.mp4")]
    #[case("/s/x.m3u8", "https://site.com/s/x.m3u8")]
    #[case("hls/index.m3u8", "https://site.com/watch/hls/index.m3u8")]
    #[case("https://cdn.example/MASTER.M3U8", "https://cdn.example/MASTER.M3U8")]
    #[case("https://api.example/player/hls/42", "https://api.example/player/hls/42")]
    #[case("https://host.example/stream/abc", "https://host.example/stream/abc")]
    fn test_accepts_and_normalizes(#[case] candidate: &str, #[case] expected: &str) {
        let validator = UrlValidator::default();
        assert_eq!(
            validator.validate(candidate, "https://site.com/watch/1").as_deref(),
            Some(expected)
        );
    }

    #[test]
    fn test_indicator_without_path_or_adaptive_keyword() {
        let validator = UrlValidator::default();
        // Streaming indicator, but bare host and no adaptive keyword
        assert_eq!(validator.validate("https://stream.example/", "https://site.com"), None);
    }

    #[test]
    fn test_media_extension_without_http_result_is_rejected() {
        let validator = UrlValidator::default();
        assert_eq!(validator.validate("ftp://files.example/a.mp4", "https://site.com"), None);
    }

    #[test]
    fn test_custom_keywords() {
        let keywords = KeywordConfig {
            media_extensions: vec![".ogv".to_string()],
            ..KeywordConfig::default()
        };
        let validator = UrlValidator::new(&keywords);
        assert_eq!(
            validator.validate("https://cdn.example/clip.ogv", "https://site.com").as_deref(),
            Some("https://cdn.example/clip.ogv")
        );
        assert_eq!(validator.validate("https://cdn.example/clip.mkv", "https://site.com"), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn candidate() -> impl Strategy<Value = String> {
            let prefix = prop::sample::select(vec![
                "", "/", "//", "./", "../", "http://", "https://", "HTTPS://", "ftp://", "data:",
                "blob:https://", "javascript:",
            ]);
            let body = "[a-zA-Z0-9./_?=&%:-]{0,40}";
            let suffix = prop::sample::select(vec![
                "", ".m3u8", ".mp4", ".mkv", ".css", "/hls/master", "/stream/1", "?x=1",
            ]);
            prop_oneof![
                (prefix, body, suffix).prop_map(|(p, b, s)| format!("{p}{b}{s}")),
                any::<String>(),
            ]
        }

        proptest! {
            #[test]
            fn test_accepted_urls_are_absolute_http(candidate in candidate()) {
                let validator = UrlValidator::default();
                let base = "https://site.com/watch/1";
                let first = validator.validate(&candidate, base);
                if let Some(url) = &first {
                    prop_assert!(UrlUtils::parse_http(url).is_some(), "{} -> {}", candidate, url);
                }
                // Same input, same answer
                prop_assert_eq!(validator.validate(&candidate, base), first);
            }
        }
    }
}

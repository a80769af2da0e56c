//! Built-in extraction strategies
//!
//! Markup-aware strategies parse the page with `scraper`; the rest are plain
//! regex scans over the raw text so they also see URLs hidden in inline
//! scripts, JSON blobs and attribute soup the HTML parser would not expose.

use regex::Regex;
use scraper::{Html, Selector};
use std::sync::OnceLock;

use super::ExtractionStrategy;
use crate::models::{CandidateSource, CandidateUrl};
use crate::utils::encoding::{decode_base64, has_js_escapes, unescape_js};

fn cached(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("extraction pattern is valid"))
}

/// Collect capture group 1 of every match as candidates
fn capture_candidates(
    pattern: &Regex,
    text: &str,
    source: CandidateSource,
    page_url: &str,
) -> Vec<CandidateUrl> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|raw| !raw.is_empty())
        .map(|raw| CandidateUrl::new(raw, source, page_url))
        .collect()
}

/// `src` attributes of native `<video>` and `<source>` elements
pub struct StructuralTagStrategy;

impl ExtractionStrategy for StructuralTagStrategy {
    fn name(&self) -> &'static str {
        "structural_tag"
    }

    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        let Ok(selector) = Selector::parse("video[src], source[src]") else {
            return Vec::new();
        };
        let document = Html::parse_document(text);
        document
            .select(&selector)
            .filter_map(|element| element.value().attr("src"))
            .map(str::trim)
            .filter(|src| !src.is_empty())
            .map(|src| CandidateUrl::new(src, CandidateSource::StructuralTag, page_url))
            .collect()
    }
}

/// `file: "...mp4"`-style key/value literals in player setup scripts
pub struct ScriptLiteralStrategy;

impl ExtractionStrategy for ScriptLiteralStrategy {
    fn name(&self) -> &'static str {
        "script_literal"
    }

    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = cached(
            &PATTERN,
            r#"(?i)\b(?:src|file|video|url|link|playlist|manifest)["']?\s*:\s*["']([^"']+\.(?:m3u8|mpd|mp4|webm|avi|mkv|mov|flv|ts))["']"#,
        );
        capture_candidates(pattern, text, CandidateSource::ScriptLiteral, page_url)
    }
}

/// Any quoted string ending in a streaming or container extension
pub struct BareExtensionStrategy;

impl ExtractionStrategy for BareExtensionStrategy {
    fn name(&self) -> &'static str {
        "bare_extension"
    }

    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = cached(
            &PATTERN,
            r#"(?i)["']([^"']+\.(?:m3u8|mpd|mp4|webm|avi|mkv)(?:\?[^"']*)?)["']"#,
        );
        capture_candidates(pattern, text, CandidateSource::BareExtension, page_url)
    }
}

/// Quoted strings that mention a streaming keyword and end in a media extension
pub struct IndicatorLiteralStrategy;

impl ExtractionStrategy for IndicatorLiteralStrategy {
    fn name(&self) -> &'static str {
        "indicator_literal"
    }

    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = cached(
            &PATTERN,
            r#"(?i)["']([^"']*(?:stream|video|play|embed|player)[^"']*\.(?:m3u8|mp4|webm|ts)(?:\?[^"']*)?)["']"#,
        );
        capture_candidates(pattern, text, CandidateSource::IndicatorLiteral, page_url)
    }
}

/// String arguments to `atob(...)`, decoded
pub struct Base64Strategy;

impl ExtractionStrategy for Base64Strategy {
    fn name(&self) -> &'static str {
        "base64"
    }

    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = cached(&PATTERN, r#"(?i)\batob\s*\(\s*["']([^"']+)["']"#);
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .filter_map(|m| decode_base64(m.as_str()))
            .map(|decoded| CandidateUrl::new(decoded, CandidateSource::Base64, page_url))
            .collect()
    }
}

/// Media literals hidden behind `\xNN` / `\uNNNN` escapes
pub struct EscapedScriptStrategy;

impl ExtractionStrategy for EscapedScriptStrategy {
    fn name(&self) -> &'static str {
        "escaped_script"
    }

    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        if !has_js_escapes(text) {
            return Vec::new();
        }
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let pattern = cached(
            &PATTERN,
            r#"(?i)["']([^"']+\.(?:m3u8|mp4|webm|ts)(?:\?[^"']*)?)["']"#,
        );
        let decoded = unescape_js(text);
        capture_candidates(pattern, &decoded, CandidateSource::EscapedScript, page_url)
            .into_iter()
            // Literals visible without unescaping are other strategies' business
            .filter(|candidate| !text.contains(candidate.raw.as_str()))
            .collect()
    }
}

/// Embedded players: `src`/`data-src` of frame-like elements whose URL
/// mentions a known player host or keyword
pub struct FrameStrategy {
    host_indicators: Vec<String>,
}

impl FrameStrategy {
    pub fn new<I, S>(host_indicators: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            host_indicators: host_indicators
                .into_iter()
                .map(|s| s.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn is_player_url(&self, url: &str) -> bool {
        let lower = url.to_ascii_lowercase();
        self.host_indicators
            .iter()
            .any(|indicator| lower.contains(indicator.as_str()))
    }
}

impl ExtractionStrategy for FrameStrategy {
    fn name(&self) -> &'static str {
        "frame"
    }

    fn extract(&self, text: &str, page_url: &str) -> Vec<CandidateUrl> {
        let Ok(selector) = Selector::parse("iframe, frame, embed") else {
            return Vec::new();
        };
        let document = Html::parse_document(text);
        document
            .select(&selector)
            .filter_map(|element| {
                let attrs = element.value();
                ["src", "data-src"]
                    .iter()
                    .filter_map(|name| attrs.attr(name))
                    .map(str::trim)
                    .find(|value| !value.is_empty())
            })
            .filter(|src| self.is_player_url(src))
            .map(|src| CandidateUrl::new(src, CandidateSource::Frame, page_url))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = "https://site.example/movie/tt1";

    fn raws(candidates: Vec<CandidateUrl>) -> Vec<String> {
        candidates.into_iter().map(|c| c.raw).collect()
    }

    #[test]
    fn test_structural_tags() {
        let html = r#"<video src="/v/main.mp4"></video>
            <video controls><source src="//cdn.example/a.m3u8" type="application/x-mpegURL"></video>
            <img src="/poster.jpg">"#;
        assert_eq!(
            raws(StructuralTagStrategy.extract(html, PAGE)),
            vec!["/v/main.mp4", "//cdn.example/a.m3u8"]
        );
    }

    #[test]
    fn test_script_literals() {
        let script = r#"player.setup({ file: "https://cdn.example/v/1080p.mp4", image: "x.jpg" });
            var cfg = {"playlist": "https://cdn.example/list.m3u8"};
            var other = { title: "not-media.html" };"#;
        assert_eq!(
            raws(ScriptLiteralStrategy.extract(script, PAGE)),
            vec![
                "https://cdn.example/v/1080p.mp4",
                "https://cdn.example/list.m3u8"
            ]
        );
    }

    #[test]
    fn test_bare_extension_with_query() {
        let text = r#"var a = 'https://cdn.example/master.m3u8?token=abc&exp=1'; var b = "x.css";"#;
        assert_eq!(
            raws(BareExtensionStrategy.extract(text, PAGE)),
            vec!["https://cdn.example/master.m3u8?token=abc&exp=1"]
        );
    }

    #[test]
    fn test_indicator_literal_requires_keyword() {
        let text = r#"["https://cdn.example/stream/seg.ts", "https://cdn.example/other/seg.ts"]"#;
        assert_eq!(
            raws(IndicatorLiteralStrategy.extract(text, PAGE)),
            vec!["https://cdn.example/stream/seg.ts"]
        );
    }

    #[test]
    fn test_base64_decodes_atob_arguments() {
        let text = r#"var s = atob("aHR0cHM6Ly9jZG4uZXhhbXBsZS5jb20vaGxzL21hc3Rlci5tM3U4"); atob('%%%');"#;
        let candidates = Base64Strategy.extract(text, PAGE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].raw, "https://cdn.example.com/hls/master.m3u8");
        assert_eq!(candidates[0].source, CandidateSource::Base64);
    }

    #[test]
    fn test_escaped_script() {
        let text = r#"var u = "https:\x2f\x2fcdn.example\x2fhidden.m3u8"; var v = "plain.mp4";"#;
        assert_eq!(
            raws(EscapedScriptStrategy.extract(text, PAGE)),
            vec!["https://cdn.example/hidden.m3u8"]
        );
        assert!(EscapedScriptStrategy.extract(r#""plain.mp4""#, PAGE).is_empty());
    }

    #[test]
    fn test_frames_filtered_by_host_indicators() {
        let strategy = FrameStrategy::new(["vidsrc", "embed"]);
        let html = r#"<iframe src="https://vidsrc.example/e/123"></iframe>
            <iframe data-src="//player.host/embed/9"></iframe>
            <iframe src="https://ads.example.net/banner"></iframe>
            <embed src="/embed/local">"#;
        let candidates = strategy.extract(html, PAGE);
        assert!(candidates.iter().all(CandidateUrl::is_frame));
        assert_eq!(
            raws(candidates),
            vec![
                "https://vidsrc.example/e/123",
                "//player.host/embed/9",
                "/embed/local"
            ]
        );
    }
}

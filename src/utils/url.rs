//! URL utilities for consistent URL handling
//!
//! Candidate URLs scraped from pages come in every shape: absolute,
//! protocol-relative, root-relative, bare relative, or with stray whitespace
//! and HTML entities. These helpers turn them into absolute `http(s)` URLs.

use url::Url;

/// URL utilities for consistent URL handling
pub struct UrlUtils;

impl UrlUtils {
    /// Resolve a candidate against the page it was found on.
    ///
    /// - `//host/path` gets an `https:` prefix
    /// - `/path` and `path` are joined onto `base`
    /// - absolute URLs are returned as-is (trimmed)
    ///
    /// Returns `None` when the result is not an absolute `http(s)` URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stream_resolver::utils::url::UrlUtils;
    ///
    /// assert_eq!(
    ///     UrlUtils::absolutize("//cdn.site.com/a.mp4", "https://site.com/watch/1").as_deref(),
    ///     Some("https://cdn.site.com/a.mp4")
    /// );
    /// assert_eq!(
    ///     UrlUtils::absolutize("/movie/1.mp4", "https://site.com/watch/1").as_deref(),
    ///     Some("https://site.com/movie/1.mp4")
    /// );
    /// ```
    pub fn absolutize(candidate: &str, base: &str) -> Option<String> {
        let trimmed = Self::clean(candidate);
        if trimmed.is_empty() {
            return None;
        }

        if trimmed.starts_with("//") {
            let absolute = format!("https:{trimmed}");
            return Self::parse_http(&absolute).map(|_| absolute);
        }

        if Self::has_scheme(&trimmed) {
            return Self::parse_http(&trimmed).map(|_| trimmed);
        }

        let base_url = Url::parse(base).ok()?;
        let joined = base_url.join(&trimmed).ok()?;
        matches!(joined.scheme(), "http" | "https").then(|| joined.to_string())
    }

    /// Parse `url` and keep it only when it is `http(s)` with a host
    pub fn parse_http(url: &str) -> Option<Url> {
        let parsed = Url::parse(url).ok()?;
        let is_http = matches!(parsed.scheme(), "http" | "https");
        (is_http && parsed.host_str().is_some_and(|h| !h.is_empty())).then_some(parsed)
    }

    /// Comparison key for an absolute URL: scheme and host lowercased,
    /// default port dropped. Unparseable input is its own key.
    ///
    /// ```rust
    /// use stream_resolver::utils::url::UrlUtils;
    ///
    /// assert_eq!(
    ///     UrlUtils::canonical("https://VF.example:443/s/x.m3u8"),
    ///     UrlUtils::canonical("https://vf.example/s/x.m3u8")
    /// );
    /// ```
    pub fn canonical(url: &str) -> String {
        Url::parse(url).map_or_else(|_| url.to_string(), String::from)
    }

    /// Parse a candidate for host/path inspection, treating
    /// protocol-relative input as `https:`
    pub fn parse_lenient(candidate: &str) -> Option<Url> {
        let trimmed = candidate.trim();
        if trimmed.starts_with("//") {
            Url::parse(&format!("https:{trimmed}")).ok()
        } else {
            Url::parse(trimmed).ok()
        }
    }

    /// Strip whitespace, JSON-escaped slashes and `&amp;` left over from markup
    fn clean(candidate: &str) -> String {
        candidate.trim().replace("\\/", "/").replace("&amp;", "&")
    }

    fn has_scheme(candidate: &str) -> bool {
        match candidate.find(':') {
            Some(pos) if pos > 0 => candidate[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
            _ => false,
        }
    }
}

//! Browser fingerprint rotation for the challenge client
//!
//! Each request picks a random desktop browser profile and sends the header
//! set that browser would send for a top-level navigation. Client hints are
//! only emitted for Chromium profiles.

use rand::rng;
use rand::seq::IndexedRandom;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// One desktop browser identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrowserFingerprint {
    pub user_agent: &'static str,
    /// `Sec-CH-UA` brand list, Chromium only
    pub client_hints: Option<&'static str>,
    pub platform: &'static str,
}

const PROFILES: &[BrowserFingerprint] = &[
    BrowserFingerprint {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        client_hints: Some(r#""Not A(Brand";v="99", "Google Chrome";v="121", "Chromium";v="121""#),
        platform: r#""Windows""#,
    },
    BrowserFingerprint {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        client_hints: Some(r#""Not_A Brand";v="8", "Chromium";v="120", "Google Chrome";v="120""#),
        platform: r#""Windows""#,
    },
    BrowserFingerprint {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36",
        client_hints: Some(r#""Not A(Brand";v="99", "Google Chrome";v="121", "Chromium";v="121""#),
        platform: r#""macOS""#,
    },
    BrowserFingerprint {
        user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:122.0) Gecko/20100101 Firefox/122.0",
        client_hints: None,
        platform: r#""Windows""#,
    },
    BrowserFingerprint {
        user_agent: "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2.1 Safari/605.1.15",
        client_hints: None,
        platform: r#""macOS""#,
    },
];

impl BrowserFingerprint {
    /// All known profiles
    pub fn profiles() -> &'static [BrowserFingerprint] {
        PROFILES
    }

    /// Pick a profile at random
    pub fn random() -> Self {
        PROFILES.choose(&mut rng()).copied().unwrap_or(PROFILES[0])
    }

    /// Navigation headers for this profile
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let mut insert = |name: &'static str, value: &'static str| {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        };

        insert("user-agent", self.user_agent);
        insert(
            "accept",
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8",
        );
        insert("accept-language", "en-US,en;q=0.9");
        insert("upgrade-insecure-requests", "1");
        insert("sec-fetch-dest", "document");
        insert("sec-fetch-mode", "navigate");
        insert("sec-fetch-site", "none");
        insert("sec-fetch-user", "?1");
        insert("cache-control", "max-age=0");
        insert("dnt", "1");
        if let Some(hints) = self.client_hints {
            insert("sec-ch-ua", hints);
            insert("sec-ch-ua-mobile", "?0");
            insert("sec-ch-ua-platform", self.platform);
        }
        headers
    }
}

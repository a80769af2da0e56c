use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

use super::{BrowserFingerprint, PageFetcher};
use crate::config::FetcherConfig;
use crate::errors::{AppResult, FetchError, FetchResult};
use crate::models::BypassMode;

/// reqwest-backed page fetcher
///
/// Challenge mode uses a client with a cookie jar (so anti-bot cookies set by
/// an interstitial survive into the next request) and sends a freshly
/// rotated browser fingerprint on every call. Plain mode is a bare client.
pub struct HttpPageFetcher {
    challenge_client: Client,
    plain_client: Client,
    timeout: Duration,
    retry_plain_on_failure: bool,
}

impl HttpPageFetcher {
    pub fn new(config: &FetcherConfig) -> AppResult<Self> {
        let challenge_client = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .connect_timeout(config.connect_timeout)
            .build()?;
        let plain_client = Client::builder()
            .gzip(true)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            challenge_client,
            plain_client,
            timeout: config.timeout,
            retry_plain_on_failure: config.retry_plain_on_failure,
        })
    }

    async fn fetch_once(&self, url: &str, mode: BypassMode) -> FetchResult<String> {
        let request = match mode {
            BypassMode::Challenge => self
                .challenge_client
                .get(url)
                .headers(BrowserFingerprint::random().headers()),
            BypassMode::Plain => self.plain_client.get(url),
        };

        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;
        debug!(
            "Fetched {} characters from {} ({})",
            body.len(),
            url,
            mode.as_str()
        );
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, mode: BypassMode) -> FetchResult<String> {
        match self.fetch_once(url, mode).await {
            Ok(body) => Ok(body),
            Err(e) if mode == BypassMode::Challenge && self.retry_plain_on_failure => {
                warn!("Challenge fetch failed ({}), retrying with plain client", e);
                self.fetch_once(url, BypassMode::Plain).await
            }
            Err(e) => Err(e),
        }
    }
}

use anyhow::Result;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

use crate::errors::{AppError, AppResult};
use crate::models::BypassMode;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

/// Environment variable prefix; nested keys are separated by `__`,
/// e.g. `STREAM_RESOLVER_RESOLVER__MAX_RESULTS=3`.
pub const ENV_PREFIX: &str = "STREAM_RESOLVER_";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub templates: TemplateConfig,
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub keywords: KeywordConfig,
    #[serde(default)]
    pub quality: QualityConfig,
}

/// The source site family being scraped
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Display name used in stream titles and grouping keys
    #[serde(default = "default_provider_name")]
    pub name: String,
    /// Candidate base hosts, probed in order at startup
    #[serde(default = "default_mirrors")]
    pub mirrors: Vec<String>,
    #[serde(default = "default_mirror_probe_timeout", with = "duration_serde")]
    pub mirror_probe_timeout: Duration,
}

/// Page path templates per content kind
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    #[serde(default = "default_movie_templates")]
    pub movie: Vec<String>,
    #[serde(default = "default_episode_templates")]
    pub episode: Vec<String>,
    /// Direct autoplay link used for the synthetic fallback record
    #[serde(default = "default_movie_direct_template")]
    pub movie_direct: String,
    #[serde(default = "default_episode_direct_template")]
    pub episode_direct: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Per-call timeout, independent of any caller deadline
    #[serde(default = "default_fetch_timeout", with = "duration_serde")]
    pub timeout: Duration,
    #[serde(default = "default_connect_timeout", with = "duration_serde")]
    pub connect_timeout: Duration,
    #[serde(default)]
    pub bypass_mode: BypassMode,
    /// Retry a failed challenge-mode fetch once with the plain client
    #[serde(default = "default_retry_plain_on_failure")]
    pub retry_plain_on_failure: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverConfig {
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Embedded player hops followed below the top-level page
    #[serde(default = "default_frame_depth")]
    pub frame_depth: usize,
    #[serde(default = "default_frame_delay_min", with = "duration_serde")]
    pub frame_delay_min: Duration,
    #[serde(default = "default_frame_delay_max", with = "duration_serde")]
    pub frame_delay_max: Duration,
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    #[serde(default = "default_country_whitelist")]
    pub country_whitelist: Vec<String>,
    #[serde(default = "default_fallback_quality_label")]
    pub fallback_quality_label: String,
}

/// Keyword allow/deny lists shared by the extractor and validator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordConfig {
    #[serde(default = "default_min_url_length")]
    pub min_url_length: usize,
    #[serde(default = "default_rejected_schemes")]
    pub rejected_schemes: Vec<String>,
    #[serde(default = "default_asset_indicators")]
    pub asset_indicators: Vec<String>,
    #[serde(default = "default_media_extensions")]
    pub media_extensions: Vec<String>,
    #[serde(default = "default_streaming_indicators")]
    pub streaming_indicators: Vec<String>,
    #[serde(default = "default_adaptive_keywords")]
    pub adaptive_keywords: Vec<String>,
    /// Known third-party player hosts/keywords for iframe following
    #[serde(default = "default_frame_host_indicators")]
    pub frame_host_indicators: Vec<String>,
}

/// One row of a quality table
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QualityRule {
    pub pattern: String,
    pub score: u8,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Explicit resolution tokens, highest preference first
    #[serde(default = "default_quality_tokens")]
    pub tokens: Vec<QualityRule>,
    /// Container/protocol preference when no token is present
    #[serde(default = "default_format_scores")]
    pub formats: Vec<QualityRule>,
    #[serde(default = "default_superior_keywords")]
    pub superior_keywords: Vec<String>,
    #[serde(default = "default_superior_score")]
    pub superior_score: u8,
    #[serde(default = "default_hd_label_keywords")]
    pub hd_label_keywords: Vec<String>,
    #[serde(default = "default_sd_label_keywords")]
    pub sd_label_keywords: Vec<String>,
    #[serde(default = "default_quality_score")]
    pub default_score: u8,
    #[serde(default = "default_quality_label")]
    pub default_label: String,
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

fn rules(values: &[(&str, u8, &str)]) -> Vec<QualityRule> {
    values
        .iter()
        .map(|(pattern, score, label)| QualityRule {
            pattern: pattern.to_string(),
            score: *score,
            label: label.to_string(),
        })
        .collect()
}

// Source defaults
fn default_provider_name() -> String {
    DEFAULT_PROVIDER_NAME.to_string()
}

fn default_mirrors() -> Vec<String> {
    strings(DEFAULT_MIRRORS)
}

fn default_mirror_probe_timeout() -> Duration {
    Duration::from_secs(DEFAULT_MIRROR_PROBE_TIMEOUT_SECS)
}

// Template defaults
fn default_movie_templates() -> Vec<String> {
    strings(DEFAULT_MOVIE_TEMPLATES)
}

fn default_episode_templates() -> Vec<String> {
    strings(DEFAULT_EPISODE_TEMPLATES)
}

fn default_movie_direct_template() -> String {
    DEFAULT_MOVIE_DIRECT_TEMPLATE.to_string()
}

fn default_episode_direct_template() -> String {
    DEFAULT_EPISODE_DIRECT_TEMPLATE.to_string()
}

// Fetcher defaults
fn default_fetch_timeout() -> Duration {
    Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)
}

fn default_connect_timeout() -> Duration {
    Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS)
}

fn default_retry_plain_on_failure() -> bool {
    DEFAULT_RETRY_PLAIN_ON_FAILURE
}

// Resolver defaults
fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

fn default_frame_depth() -> usize {
    DEFAULT_FRAME_DEPTH
}

fn default_frame_delay_min() -> Duration {
    Duration::from_millis(DEFAULT_FRAME_DELAY_MIN_MS)
}

fn default_frame_delay_max() -> Duration {
    Duration::from_millis(DEFAULT_FRAME_DELAY_MAX_MS)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
}

fn default_max_concurrent_requests() -> usize {
    DEFAULT_MAX_CONCURRENT_REQUESTS
}

fn default_country_whitelist() -> Vec<String> {
    strings(DEFAULT_COUNTRY_WHITELIST)
}

fn default_fallback_quality_label() -> String {
    DEFAULT_FALLBACK_QUALITY_LABEL.to_string()
}

// Keyword defaults
fn default_min_url_length() -> usize {
    DEFAULT_MIN_URL_LENGTH
}

fn default_rejected_schemes() -> Vec<String> {
    strings(DEFAULT_REJECTED_SCHEMES)
}

fn default_asset_indicators() -> Vec<String> {
    strings(DEFAULT_ASSET_INDICATORS)
}

fn default_media_extensions() -> Vec<String> {
    strings(DEFAULT_MEDIA_EXTENSIONS)
}

fn default_streaming_indicators() -> Vec<String> {
    strings(DEFAULT_STREAMING_INDICATORS)
}

fn default_adaptive_keywords() -> Vec<String> {
    strings(DEFAULT_ADAPTIVE_KEYWORDS)
}

fn default_frame_host_indicators() -> Vec<String> {
    strings(DEFAULT_FRAME_HOST_INDICATORS)
}

// Quality defaults
fn default_quality_tokens() -> Vec<QualityRule> {
    rules(DEFAULT_QUALITY_TOKENS)
}

fn default_format_scores() -> Vec<QualityRule> {
    rules(DEFAULT_FORMAT_SCORES)
}

fn default_superior_keywords() -> Vec<String> {
    strings(DEFAULT_SUPERIOR_KEYWORDS)
}

fn default_superior_score() -> u8 {
    DEFAULT_SUPERIOR_SCORE
}

fn default_hd_label_keywords() -> Vec<String> {
    strings(DEFAULT_HD_LABEL_KEYWORDS)
}

fn default_sd_label_keywords() -> Vec<String> {
    strings(DEFAULT_SD_LABEL_KEYWORDS)
}

fn default_quality_score() -> u8 {
    DEFAULT_QUALITY_SCORE
}

fn default_quality_label() -> String {
    DEFAULT_QUALITY_LABEL.to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            name: default_provider_name(),
            mirrors: default_mirrors(),
            mirror_probe_timeout: default_mirror_probe_timeout(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            movie: default_movie_templates(),
            episode: default_episode_templates(),
            movie_direct: default_movie_direct_template(),
            episode_direct: default_episode_direct_template(),
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout: default_fetch_timeout(),
            connect_timeout: default_connect_timeout(),
            bypass_mode: BypassMode::default(),
            retry_plain_on_failure: default_retry_plain_on_failure(),
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            frame_depth: default_frame_depth(),
            frame_delay_min: default_frame_delay_min(),
            frame_delay_max: default_frame_delay_max(),
            request_timeout: default_request_timeout(),
            max_concurrent_requests: default_max_concurrent_requests(),
            country_whitelist: default_country_whitelist(),
            fallback_quality_label: default_fallback_quality_label(),
        }
    }
}

impl Default for KeywordConfig {
    fn default() -> Self {
        Self {
            min_url_length: default_min_url_length(),
            rejected_schemes: default_rejected_schemes(),
            asset_indicators: default_asset_indicators(),
            media_extensions: default_media_extensions(),
            streaming_indicators: default_streaming_indicators(),
            adaptive_keywords: default_adaptive_keywords(),
            frame_host_indicators: default_frame_host_indicators(),
        }
    }
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            tokens: default_quality_tokens(),
            formats: default_format_scores(),
            superior_keywords: default_superior_keywords(),
            superior_score: default_superior_score(),
            hd_label_keywords: default_hd_label_keywords(),
            sd_label_keywords: default_sd_label_keywords(),
            default_score: default_quality_score(),
            default_label: default_quality_label(),
        }
    }
}

impl Config {
    /// Layered configuration: built-in defaults, then the optional TOML file,
    /// then `STREAM_RESOLVER_*` environment variables.
    pub fn figment(config_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let config: Config = Self::figment(config_file).extract()?;
        config.validate()?;
        debug!(
            "Configuration loaded: {} mirrors, {} movie templates, {} episode templates",
            config.source.mirrors.len(),
            config.templates.movie.len(),
            config.templates.episode.len()
        );
        Ok(config)
    }

    /// Reject settings the resolver cannot operate with
    pub fn validate(&self) -> AppResult<()> {
        if self.source.mirrors.is_empty() {
            return Err(AppError::configuration("source.mirrors must not be empty"));
        }
        if self.templates.movie.is_empty() || self.templates.episode.is_empty() {
            return Err(AppError::configuration(
                "templates.movie and templates.episode must not be empty",
            ));
        }
        if self.resolver.max_results == 0 {
            return Err(AppError::configuration(
                "resolver.max_results must be at least 1",
            ));
        }
        if self.resolver.max_concurrent_requests == 0 {
            return Err(AppError::configuration(
                "resolver.max_concurrent_requests must be at least 1",
            ));
        }
        if self.resolver.frame_delay_min > self.resolver.frame_delay_max {
            return Err(AppError::configuration(format!(
                "resolver.frame_delay_min ({}) exceeds resolver.frame_delay_max ({})",
                humantime::format_duration(self.resolver.frame_delay_min),
                humantime::format_duration(self.resolver.frame_delay_max)
            )));
        }
        Ok(())
    }
}

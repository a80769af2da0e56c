//! Error type definitions for the stream resolver
//!
//! Fetch failures are the only errors the resolution core ever sees, and it
//! swallows them: a page that cannot be fetched simply contributes no
//! candidates. Everything else here belongs to the boundary (request parsing,
//! configuration, startup).

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid or inconsistent configuration
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Malformed input rejected at the boundary
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Page fetch failures
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// HTTP client construction errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Page fetcher errors
///
/// All variants are treated identically by the resolver ("zero candidates from
/// this page"); the distinction only matters for logging.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The per-call timeout elapsed
    #[error("Request timed out: {url}")]
    Timeout { url: String },

    /// Upstream answered with a non-success status
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    /// Connection, TLS or protocol failure
    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    /// Response body could not be read or decoded
    #[error("Failed to read body from {url}: {message}")]
    Body { url: String, message: String },
}

impl FetchError {
    /// Classify a reqwest error for the given URL
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                url: url.to_string(),
            }
        } else if err.is_body() || err.is_decode() {
            Self::Body {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_display() {
        let err = FetchError::Status {
            status: 503,
            url: "https://example.com/movie/1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "HTTP status 503 from https://example.com/movie/1"
        );
    }

    #[test]
    fn test_app_error_from_fetch_error() {
        let err: AppError = FetchError::Timeout {
            url: "https://example.com".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Fetch(FetchError::Timeout { .. })));
    }

    #[test]
    fn test_validation_helper() {
        let err = AppError::validation("missing season");
        assert_eq!(err.to_string(), "Validation error: missing season");
    }
}

//! Centralized error handling for the stream resolver
//!
//! # Error Categories
//!
//! - **Fetch Errors**: network failures, timeouts and non-2xx answers from source pages
//! - **Validation Errors**: malformed requests rejected at the boundary
//! - **Configuration Errors**: invalid settings detected at startup
//!
//! Validation *rejections* of candidate URLs are not errors at all; they are
//! ordinary filtering and never surface here.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for page fetch Results
pub type FetchResult<T> = Result<T, FetchError>;

//! Service layer
//!
//! Services sit between the boundary (CLI or an HTTP front end) and the
//! resolution core, adding concurrency limits and request deadlines.

pub mod resolver_service;

pub use resolver_service::ResolverService;

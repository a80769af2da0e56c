//! Stream resolver library
//!
//! Turns a movie id, or a series id with season and episode, into a ranked
//! list of directly playable stream URLs by crawling the source site's pages,
//! following embedded players and scoring what it finds.

pub mod config;
pub mod errors;
pub mod extraction;
pub mod fetcher;
pub mod models;
pub mod resolver;
pub mod services;
pub mod utils;

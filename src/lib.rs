//! Mediatone Library
//!
//! Fetches media tone and attention-volume timelines from the GDELT Doc API,
//! caches raw payloads on disk, normalizes them into canonical time series,
//! and derives descriptive statistics and terminal comparisons. Exposed as a
//! library for use in integration tests.

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod report;

//! Cache module for persisting raw API payloads to disk
//!
//! This module provides a permanent, label-keyed store for raw tabular API
//! responses. There is no eviction, expiry, or versioning: a cached payload
//! stays fixed until externally deleted, so analyses run against pinned
//! historical data do not silently change across runs.

mod store;

pub use store::{CacheError, CacheStore};

//! GDELT Doc API client and fetch-normalize pipeline
//!
//! `GdeltClient::fetch` turns a query descriptor into a canonical time
//! series: it loads the raw payload from the cache when present, downloads
//! and persists it otherwise, then normalizes it. The pipeline is fail-soft
//! by design: transport failures, non-success statuses, and unreadable
//! payloads are logged and degrade to the empty series, so one bad sub-query
//! never aborts a multi-query analysis run.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use reqwest::Client;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{info, warn};

use crate::cache::{CacheError, CacheStore};
use crate::config::AppConfig;

use super::{normalize, QueryDescriptor, TimeSeries};

/// Base URL for the GDELT Doc 2.0 API
const GDELT_DOC_API_URL: &str = "https://api.gdeltproject.org/api/v2/doc/doc";

/// Errors that can occur inside the fetch pipeline
///
/// These never cross the `fetch` boundary; they exist so the internal steps
/// can propagate with `?` before the pipeline converts them to the empty
/// series.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Cache read or write failed
    #[error("{0}")]
    Cache(#[from] CacheError),
}

/// Per-label lock registry
///
/// Serializes the check-cache/download/store sequence for a given label so
/// concurrent callers cannot race to download the same payload twice.
/// Distinct labels proceed independently.
#[derive(Debug, Default)]
struct LabelLocks {
    inner: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl LabelLocks {
    /// Acquires the lock for the given label, creating it on first use
    async fn acquire(&self, label: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(map.entry(label.to_string()).or_default())
        };
        lock.lock_owned().await
    }
}

/// Client for fetching tone and volume timelines from the GDELT Doc API
#[derive(Debug)]
pub struct GdeltClient {
    /// HTTP client with the configured per-request timeout
    http_client: Client,
    /// Store for raw payloads
    cache: CacheStore,
    /// Endpoint URL (overridable for testing)
    base_url: String,
    /// Per-label mutual exclusion for the check-then-store sequence
    locks: LabelLocks,
}

impl GdeltClient {
    /// Creates a client from the application configuration
    ///
    /// # Returns
    /// * `Ok(GdeltClient)` ready to fetch
    /// * `Err(FetchError)` if the HTTP client cannot be constructed
    pub fn new(config: &AppConfig) -> Result<Self, FetchError> {
        let http_client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            http_client,
            cache: CacheStore::new(config.cache_dir.clone()),
            base_url: GDELT_DOC_API_URL.to_string(),
            locks: LabelLocks::default(),
        })
    }

    /// Replaces the endpoint URL
    ///
    /// Useful for pointing the client at a local fixture server in tests.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Fetches and normalizes the series identified by the descriptor
    ///
    /// # Behavior
    /// - Cache hit: loads the persisted payload, no network request
    /// - Cache miss: downloads the payload and persists it before proceeding
    /// - Any failure: logs a warning and returns the empty series
    ///
    /// Normalization runs on every call; the cache holds raw bytes only.
    pub async fn fetch(&self, descriptor: &QueryDescriptor) -> TimeSeries {
        match self.fetch_payload(descriptor).await {
            Ok(raw) => normalize::normalize_payload(&raw),
            Err(error) => {
                warn!(label = %descriptor.label, %error, "fetch failed, using empty series");
                TimeSeries::empty()
            }
        }
    }

    /// Loads the raw payload from the cache or downloads and persists it
    async fn fetch_payload(&self, descriptor: &QueryDescriptor) -> Result<Vec<u8>, FetchError> {
        let _guard = self.locks.acquire(&descriptor.label).await;

        if self.cache.exists(&descriptor.label) {
            info!(label = %descriptor.label, "loading from cache");
            return Ok(self.cache.load(&descriptor.label)?);
        }

        info!(label = %descriptor.label, "downloading from API");
        let response = self
            .http_client
            .get(&self.base_url)
            .query(&[
                ("query", descriptor.query.as_str()),
                ("mode", descriptor.mode.as_api_param()),
                ("format", "csv"),
                ("STARTDATETIME", &descriptor.date_range.start_param()),
                ("ENDDATETIME", &descriptor.date_range.end_param()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let raw = response.bytes().await?.to_vec();
        self.cache.store(&descriptor.label, &raw)?;
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Mode;
    use std::time::Duration;
    use tempfile::TempDir;

    fn test_config(dir: &TempDir) -> AppConfig {
        AppConfig::default()
            .with_cache_dir(dir.path().to_path_buf())
            .with_request_timeout(Duration::from_millis(250))
    }

    #[tokio::test]
    async fn test_transport_failure_yields_empty_series() {
        let temp_dir = TempDir::new().unwrap();
        // Reserved TEST-NET-1 address: connection fails fast, nothing listens
        let client = GdeltClient::new(&test_config(&temp_dir))
            .unwrap()
            .with_base_url("http://192.0.2.1:9/api");

        let descriptor = QueryDescriptor::new("\"China\" sourcecountry:US", Mode::Tone, "US_Tone");
        let series = client.fetch(&descriptor).await;

        assert!(series.is_empty(), "Transport failure should degrade to the empty series");
    }

    #[tokio::test]
    async fn test_transport_failure_leaves_no_cache_entry() {
        let temp_dir = TempDir::new().unwrap();
        let client = GdeltClient::new(&test_config(&temp_dir))
            .unwrap()
            .with_base_url("http://192.0.2.1:9/api");

        let descriptor = QueryDescriptor::new("q", Mode::Volume, "failed_label");
        client.fetch(&descriptor).await;

        assert!(
            !CacheStore::new(temp_dir.path().to_path_buf()).exists("failed_label"),
            "A failed download must not leave a payload behind"
        );
    }

    #[tokio::test]
    async fn test_cached_payload_is_served_without_network() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());
        store
            .store("US_Tone", b"Date,Value\n2020-01-01,1.5\n2020-01-02,-0.5\n")
            .unwrap();

        // Unreachable endpoint: a network attempt would produce an empty series
        let client = GdeltClient::new(&test_config(&temp_dir))
            .unwrap()
            .with_base_url("http://192.0.2.1:9/api");

        let descriptor = QueryDescriptor::new("\"China\" sourcecountry:US", Mode::Tone, "US_Tone");
        let series = client.fetch(&descriptor).await;

        assert_eq!(series.len(), 2);
        assert!((series.points()[0].value - 1.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_repeated_fetch_returns_equal_series() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());
        store.store("stable", b"Date,Value\n2020-01-01,2.0\n").unwrap();

        let client = GdeltClient::new(&test_config(&temp_dir))
            .unwrap()
            .with_base_url("http://192.0.2.1:9/api");
        let descriptor = QueryDescriptor::new("q", Mode::Tone, "stable");

        let first = client.fetch(&descriptor).await;
        let second = client.fetch(&descriptor).await;

        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[tokio::test]
    async fn test_cached_garbage_degrades_to_empty_series() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());
        store.store("garbage", b"\xff\xfe not a table").unwrap();

        let client = GdeltClient::new(&test_config(&temp_dir))
            .unwrap()
            .with_base_url("http://192.0.2.1:9/api");
        let descriptor = QueryDescriptor::new("q", Mode::Tone, "garbage");

        let series = client.fetch(&descriptor).await;
        assert!(series.is_empty());
    }

    #[tokio::test]
    async fn test_label_locks_serialize_same_label() {
        let locks = LabelLocks::default();

        let first = locks.acquire("label").await;
        // A second acquire for the same label must wait for the first guard
        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire("label")).await;
        assert!(second.is_err(), "Second acquire should not complete while held");

        drop(first);
        let third = tokio::time::timeout(Duration::from_millis(50), locks.acquire("label")).await;
        assert!(third.is_ok(), "Lock should be available after the guard drops");
    }

    #[tokio::test]
    async fn test_label_locks_allow_distinct_labels() {
        let locks = LabelLocks::default();

        let _a = locks.acquire("a").await;
        let _b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("b"))
            .await
            .expect("Distinct labels must not block each other");
    }
}

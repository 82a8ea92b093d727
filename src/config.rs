//! Application configuration
//!
//! Collects the knobs the reference behavior kept as implicit globals into
//! one explicit object handed to the cache and pipeline constructors at
//! startup: cache directory, per-request network timeout, and the default
//! date range.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;

use crate::data::DateRange;

/// Per-request network timeout used when none is configured
const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Fallback cache directory when no XDG path can be determined
const FALLBACK_CACHE_DIR: &str = "data/raw";

/// Configuration passed to the pipeline and cache constructors
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory where raw payloads are cached
    pub cache_dir: PathBuf,
    /// Fixed per-request network timeout
    pub request_timeout: Duration,
    /// Date range applied to descriptors that do not override it
    pub date_range: DateRange,
}

impl AppConfig {
    /// Returns the XDG-compliant cache directory for this application
    ///
    /// `~/.cache/mediatone/` on Linux, or the platform equivalent. Falls
    /// back to a relative `data/raw` directory when no home directory is
    /// available (e.g., minimal CI environments).
    pub fn default_cache_dir() -> PathBuf {
        ProjectDirs::from("", "", "mediatone")
            .map(|dirs| dirs.cache_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(FALLBACK_CACHE_DIR))
    }

    /// Replaces the cache directory
    pub fn with_cache_dir(mut self, cache_dir: PathBuf) -> Self {
        self.cache_dir = cache_dir;
        self
    }

    /// Replaces the per-request timeout
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Replaces the default date range
    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = date_range;
        self
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            cache_dir: Self::default_cache_dir(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            date_range: DateRange::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_45_seconds() {
        let config = AppConfig::default();
        assert_eq!(config.request_timeout, Duration::from_secs(45));
    }

    #[test]
    fn test_builders_override_fields() {
        let config = AppConfig::default()
            .with_cache_dir(PathBuf::from("/tmp/somewhere"))
            .with_request_timeout(Duration::from_secs(5));

        assert_eq!(config.cache_dir, PathBuf::from("/tmp/somewhere"));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_default_cache_dir_is_nonempty() {
        let dir = AppConfig::default_cache_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}

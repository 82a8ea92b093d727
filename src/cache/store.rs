//! Cache store for persisting raw API payloads to disk
//!
//! Provides a `CacheStore` that maps a caller-assigned label to one flat file
//! holding the raw API response verbatim. Writes go through a temporary file
//! in the same directory followed by a rename, so a failure mid-write never
//! leaves a payload that `exists` reports present but `load` reads truncated.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use tempfile::NamedTempFile;
use thiserror::Error;

/// File extension used for cached payloads
const PAYLOAD_EXT: &str = "csv";

/// Errors that can occur when reading or writing the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Filesystem operation failed
    #[error("cache I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Label-keyed store for raw payloads on durable storage
///
/// The storage key is the label alone, not the (query, mode) pair behind it.
/// Distinct queries sharing a label silently alias the same file; keeping
/// labels unique per (query, mode) is a caller invariant.
#[derive(Debug, Clone)]
pub struct CacheStore {
    /// Directory where payload files are stored
    cache_dir: PathBuf,
}

impl CacheStore {
    /// Creates a store rooted at the given directory
    ///
    /// The directory is created lazily on the first `store` call.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Returns the path of the payload file for the given label
    fn payload_path(&self, label: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.{}", label, PAYLOAD_EXT))
    }

    /// Ensures the cache directory exists
    fn ensure_dir(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir)
    }

    /// Whether a payload is cached under the given label
    pub fn exists(&self, label: &str) -> bool {
        self.payload_path(label).is_file()
    }

    /// Loads the raw payload stored under the given label
    ///
    /// # Returns
    /// * `Ok(bytes)` with the payload exactly as it was stored
    /// * `Err(CacheError)` if the file is missing or unreadable
    pub fn load(&self, label: &str) -> Result<Vec<u8>, CacheError> {
        Ok(fs::read(self.payload_path(label))?)
    }

    /// Stores raw payload bytes under the given label
    ///
    /// Overwrites any existing payload for the label. The write is complete
    /// before this call returns: bytes land in a temporary file next to the
    /// final path, which is then renamed into place.
    pub fn store(&self, label: &str, raw: &[u8]) -> Result<(), CacheError> {
        self.ensure_dir()?;

        let mut tmp = NamedTempFile::new_in(&self.cache_dir)?;
        tmp.write_all(raw)?;
        tmp.flush()?;
        tmp.persist(self.payload_path(label))
            .map_err(|e| CacheError::Io(e.error))?;
        Ok(())
    }
}

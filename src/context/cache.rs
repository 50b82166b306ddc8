//! Disk-backed TTL cache for formatted repository context.
//!
//! One JSON record per repository identity lives under
//! `<cache_dir>/repo_context/`. Every failure is logged at debug level and
//! treated as a miss (on read) or dropped (on write).

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::config::RepoContextConfig;
use crate::error::ContextError;

/// Subdirectory of the configured cache directory holding records.
const CACHE_SUBDIR: &str = "repo_context";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// On-disk cache record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheRecord {
    /// Repository identity, e.g. `owner/repo`.
    pub repo: String,
    /// Formatted context text.
    pub context: String,
    /// Unix timestamp of the write, in seconds.
    pub ts: i64,
}

/// TTL cache keyed by repository identity.
#[derive(Debug, Clone)]
pub struct ContextCache {
    dir: PathBuf,
    enabled: bool,
    ttl_hours: f64,
}

impl ContextCache {
    /// Creates a cache rooted at `cache_dir`.
    pub fn new(cache_dir: impl Into<PathBuf>, enabled: bool, ttl_hours: f64) -> Self {
        Self {
            dir: cache_dir.into().join(CACHE_SUBDIR),
            enabled,
            ttl_hours,
        }
    }

    /// Creates a cache from the repository context configuration.
    pub fn from_config(config: &RepoContextConfig) -> Self {
        Self::new(
            &config.repo_context_cache_dir,
            config.enable_repo_context_cache,
            config.repo_context_cache_ttl_hours,
        )
    }

    /// Record file for a repository identity.
    pub fn path_for(&self, repo: &str) -> PathBuf {
        let file_name = repo.replace(['/', '\\'], "__");
        self.dir.join(format!("{file_name}.json"))
    }

    /// Returns the cached context if present and fresh.
    ///
    /// An expired record is deleted.
    pub fn get(&self, repo: &str) -> Option<String> {
        if !self.enabled || self.ttl_hours <= 0.0 {
            return None;
        }

        let path = self.path_for(repo);
        if !path.exists() {
            return None;
        }

        let record = match read_record(&path) {
            Ok(record) => record,
            Err(e) => {
                debug!("Repo context cache read failed: {e}");
                return None;
            }
        };

        let expired = match Utc::now().timestamp().checked_sub(record.ts) {
            Some(age_secs) => age_secs as f64 > self.ttl_hours * SECONDS_PER_HOUR,
            None => true,
        };
        if expired {
            debug!("Repo context cache expired for {repo}");
            if let Err(e) = fs::remove_file(&path) {
                debug!("Failed to remove expired cache record {}: {e}", path.display());
            }
            return None;
        }

        if record.context.is_empty() {
            return None;
        }
        debug!("Repo context cache hit for {repo}");
        Some(record.context)
    }

    /// Stores the context for a repository, replacing any previous record.
    pub fn set(&self, repo: &str, context: &str) {
        if !self.enabled {
            return;
        }

        let record = CacheRecord {
            repo: repo.to_string(),
            context: context.to_string(),
            ts: Utc::now().timestamp(),
        };
        match self.write_record(&record) {
            Ok(path) => debug!("Repo context cached for {repo} at {}", path.display()),
            Err(e) => debug!("Repo context cache write failed: {e}"),
        }
    }

    /// Removes the record for a repository. Returns true if one existed.
    pub fn clear(&self, repo: &str) -> Result<bool, ContextError> {
        let path = self.path_for(repo);
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(source) => Err(ContextError::CacheIo { path, source }),
        }
    }

    /// Reads the raw record for a repository, ignoring the TTL.
    pub fn record(&self, repo: &str) -> Result<Option<CacheRecord>, ContextError> {
        let path = self.path_for(repo);
        if !path.exists() {
            return Ok(None);
        }
        read_record(&path).map(Some)
    }

    /// Writes to a temporary file in the cache directory, then renames it
    /// over the record.
    fn write_record(&self, record: &CacheRecord) -> Result<PathBuf, ContextError> {
        let path = self.path_for(&record.repo);
        let io_err = |source: std::io::Error| ContextError::CacheIo {
            path: path.clone(),
            source,
        };

        fs::create_dir_all(&self.dir).map_err(io_err)?;
        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(io_err)?;
        serde_json::to_writer(&mut tmp, record).map_err(|source| ContextError::CacheDecode {
            path: path.clone(),
            source,
        })?;
        tmp.flush().map_err(io_err)?;
        tmp.persist(&path).map_err(|e| io_err(e.error))?;
        Ok(path)
    }
}

fn read_record(path: &Path) -> Result<CacheRecord, ContextError> {
    let content = fs::read_to_string(path).map_err(|source| ContextError::CacheIo {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ContextError::CacheDecode {
        path: path.to_path_buf(),
        source,
    })
}

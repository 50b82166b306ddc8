//! Repository context error handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving or caching repository context.
///
/// None of these reach the review engine: the provider logs them and
/// degrades to a smaller (or empty) context.
#[derive(Error, Debug)]
pub enum ContextError {
    /// Shallow clone of a remote repository failed.
    #[error("Failed to clone {remote}: {source}")]
    CloneFailed {
        /// Remote URL that was being cloned.
        remote: String,
        /// Underlying git error.
        #[source]
        source: git2::Error,
    },

    /// Shallow clone did not finish within the configured timeout.
    #[error("Clone of {remote} exceeded {timeout_secs}s timeout")]
    CloneTimedOut {
        /// Remote URL that was being cloned.
        remote: String,
        /// Timeout that was exceeded.
        timeout_secs: u64,
    },

    /// Clone destination could not be prepared.
    #[error("Failed to prepare clone destination {path}: {source}")]
    CloneDestination {
        /// Destination directory.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A repository identity could not be derived from the given URL.
    #[error("Cannot derive repository identity from: {0}")]
    InvalidIdentity(String),

    /// Cache record could not be read or written.
    #[error("Cache I/O failed for {path}: {source}")]
    CacheIo {
        /// Cache record path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Cache record exists but is not a valid record.
    #[error("Corrupt cache record {path}: {source}")]
    CacheDecode {
        /// Cache record path.
        path: PathBuf,
        /// Underlying decode error.
        #[source]
        source: serde_json::Error,
    },
}

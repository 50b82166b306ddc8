//! Version-control capability consumed by the context provider.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use git2::build::RepoBuilder;
use git2::{CertificateCheckStatus, FetchOptions, RemoteCallbacks, Repository};
use tracing::debug;

use super::remote::{clone_url_for, repo_identity};
use crate::error::ContextError;

/// Name of the remote used to derive repository identity.
const ORIGIN: &str = "origin";

/// Default upper bound for a clone.
pub const DEFAULT_CLONE_TIMEOUT: Duration = Duration::from_secs(120);

/// A checkout produced by [`GitProvider::clone_repo`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClonedRepo {
    /// Working directory of the clone.
    pub path: PathBuf,
}

/// Source of repository locations and clones.
pub trait GitProvider {
    /// Local working directory, if the repository is checked out.
    fn repo_path(&self) -> Option<PathBuf>;

    /// Clonable URL of the repository, preferring the pull request's.
    fn repo_url(&self, pr_url: Option<&str>) -> Option<String>;

    /// Repository identity (`owner/repo`) used as the cache key.
    fn repo_full_name(&self, pr_url: Option<&str>) -> Option<String>;

    /// Clones `remote` into `dest`.
    ///
    /// With `remove_dest_folder` an existing `dest` is deleted first.
    fn clone_repo(
        &self,
        remote: &str,
        dest: &Path,
        remove_dest_folder: bool,
    ) -> Result<ClonedRepo, ContextError>;
}

/// [`GitProvider`] backed by libgit2.
#[derive(Debug, Clone)]
pub struct Git2Provider {
    workdir: Option<PathBuf>,
    remote_url: Option<String>,
    clone_timeout: Duration,
}

impl Git2Provider {
    /// Discovers the repository containing `path`.
    pub fn discover(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .with_context(|| format!("Not in a git repository: {}", path.display()))?;
        let workdir = repo.workdir().map(Path::to_path_buf);
        let remote_url = repo
            .find_remote(ORIGIN)
            .ok()
            .and_then(|remote| remote.url().map(str::to_string));

        debug!(
            "Discovered repository at {:?} with origin {:?}",
            workdir, remote_url
        );
        Ok(Self {
            workdir,
            remote_url,
            clone_timeout: DEFAULT_CLONE_TIMEOUT,
        })
    }

    /// Provider for a repository known only by its remote URL.
    pub fn from_remote(url: impl Into<String>) -> Self {
        Self {
            workdir: None,
            remote_url: Some(url.into()),
            clone_timeout: DEFAULT_CLONE_TIMEOUT,
        }
    }

    /// Provider with no repository; every lookup comes from the PR URL.
    pub fn detached() -> Self {
        Self {
            workdir: None,
            remote_url: None,
            clone_timeout: DEFAULT_CLONE_TIMEOUT,
        }
    }

    /// Sets the clone timeout.
    #[must_use]
    pub fn with_clone_timeout(mut self, timeout: Duration) -> Self {
        self.clone_timeout = timeout;
        self
    }
}

impl GitProvider for Git2Provider {
    fn repo_path(&self) -> Option<PathBuf> {
        self.workdir.clone()
    }

    fn repo_url(&self, pr_url: Option<&str>) -> Option<String> {
        pr_url
            .and_then(|url| clone_url_for(url).ok())
            .or_else(|| self.remote_url.clone())
    }

    fn repo_full_name(&self, pr_url: Option<&str>) -> Option<String> {
        pr_url
            .into_iter()
            .chain(self.remote_url.as_deref())
            .find_map(|uri| repo_identity(uri).ok())
    }

    fn clone_repo(
        &self,
        remote: &str,
        dest: &Path,
        remove_dest_folder: bool,
    ) -> Result<ClonedRepo, ContextError> {
        if remove_dest_folder && dest.exists() {
            fs::remove_dir_all(dest).map_err(|source| ContextError::CloneDestination {
                path: dest.to_path_buf(),
                source,
            })?;
        }

        let deadline = Instant::now() + self.clone_timeout;
        let timed_out = Cell::new(false);
        let expired = || {
            if Instant::now() >= deadline {
                timed_out.set(true);
            }
            timed_out.get()
        };

        let mut callbacks = RemoteCallbacks::new();
        callbacks.transfer_progress(|_| !expired());
        callbacks.sideband_progress(|_| !expired());
        callbacks.certificate_check(|_, _| {
            if expired() {
                return Err(git2::Error::from_str("clone deadline exceeded"));
            }
            Ok(CertificateCheckStatus::CertificatePassthrough)
        });

        let mut fetch_options = FetchOptions::new();
        fetch_options.remote_callbacks(callbacks);
        // The local transport does not support shallow fetches.
        if !is_local_remote(remote) {
            fetch_options.depth(1);
        }

        debug!("Cloning {remote} into {}", dest.display());
        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options);

        let result = builder.clone(remote, dest);
        // Checkout runs after the last fetch callback.
        if expired() {
            return Err(ContextError::CloneTimedOut {
                remote: remote.to_string(),
                timeout_secs: self.clone_timeout.as_secs(),
            });
        }
        match result {
            Ok(repo) => Ok(ClonedRepo {
                path: repo
                    .workdir()
                    .map_or_else(|| dest.to_path_buf(), Path::to_path_buf),
            }),
            Err(source) => Err(ContextError::CloneFailed {
                remote: remote.to_string(),
                source,
            }),
        }
    }
}

fn is_local_remote(remote: &str) -> bool {
    remote.starts_with("file://") || Path::new(remote).exists()
}

//! The `context` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::config::RepoContextConfig;
use crate::context::RepositoryContextProvider;
use crate::git::Git2Provider;

/// Prints the repository context for modified files.
#[derive(Parser)]
pub struct ContextCommand {
    /// Modified files, relative to the repository root.
    pub files: Vec<String>,

    /// Local repository checkout (defaults to the enclosing repository).
    #[arg(long, conflicts_with = "remote")]
    pub repo: Option<PathBuf>,

    /// Remote repository to clone instead of using a local checkout.
    #[arg(long)]
    pub remote: Option<String>,

    /// Pull request URL used for repository identity and cloning.
    #[arg(long)]
    pub pr_url: Option<String>,

    /// Maximum number of repository files to list (0 = unlimited).
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Bypasses the on-disk cache.
    #[arg(long)]
    pub no_cache: bool,

    /// Enables analysis even if the configuration disables it.
    #[arg(long)]
    pub enable: bool,

    /// Path to custom context directory (defaults to .repo-context/).
    #[arg(long)]
    pub context_dir: Option<PathBuf>,
}

impl ContextCommand {
    /// Executes the context command.
    pub fn execute(self) -> Result<()> {
        let config = self.effective_config(super::load_config(self.context_dir.as_deref())?);
        let git = self.git_provider(&config);

        let provider = RepositoryContextProvider::new(git, config);
        let text = provider.get_context_str(&self.files, self.pr_url.as_deref());
        if text.is_empty() {
            debug!("No repository context produced");
        } else {
            print!("{text}");
        }
        Ok(())
    }

    /// Applies command-line overrides on top of the loaded configuration.
    fn effective_config(&self, mut config: RepoContextConfig) -> RepoContextConfig {
        if self.enable {
            config.repo_context_enabled = true;
        }
        if self.no_cache {
            config.enable_repo_context_cache = false;
        }
        if let Some(max_files) = self.max_files {
            config.repo_context_max_files = max_files;
        }
        config
    }

    fn git_provider(&self, config: &RepoContextConfig) -> Git2Provider {
        let timeout = Duration::from_secs(config.repo_context_clone_timeout_secs);
        let provider = if let Some(remote) = &self.remote {
            Git2Provider::from_remote(remote.clone())
        } else {
            let start = self.repo.clone().unwrap_or_else(|| PathBuf::from("."));
            Git2Provider::discover(&start).unwrap_or_else(|e| {
                debug!("No local repository: {e:#}");
                Git2Provider::detached()
            })
        };
        provider.with_clone_timeout(timeout)
    }
}

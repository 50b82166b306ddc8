//! The `cache` command.

use std::path::PathBuf;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};

use crate::context::ContextCache;

/// Cache operations.
#[derive(Parser)]
pub struct CacheCommand {
    /// Cache subcommand to execute.
    #[command(subcommand)]
    pub command: CacheSubcommands,

    /// Path to custom context directory (defaults to .repo-context/).
    #[arg(long, global = true)]
    pub context_dir: Option<PathBuf>,
}

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheSubcommands {
    /// Shows the cached record for a repository.
    Show {
        /// Repository identity, e.g. `owner/repo`.
        repo: String,
    },
    /// Removes the cached record for a repository.
    Clear {
        /// Repository identity, e.g. `owner/repo`.
        repo: String,
    },
}

impl CacheCommand {
    /// Executes the cache command.
    pub fn execute(self) -> Result<()> {
        let config = super::load_config(self.context_dir.as_deref())?;
        let cache = ContextCache::from_config(&config);

        match self.command {
            CacheSubcommands::Show { repo } => match cache.record(&repo)? {
                Some(record) => {
                    let written = DateTime::<Utc>::from_timestamp(record.ts, 0)
                        .map_or_else(|| record.ts.to_string(), |dt| dt.to_rfc3339());
                    println!("Repository: {}", record.repo);
                    println!("Written: {written}");
                    println!("Path: {}", cache.path_for(&repo).display());
                    println!();
                    print!("{}", record.context);
                }
                None => println!("No cached context for {repo}"),
            },
            CacheSubcommands::Clear { repo } => {
                if cache.clear(&repo)? {
                    println!("Cleared cached context for {repo}");
                } else {
                    println!("No cached context for {repo}");
                }
            }
        }
        Ok(())
    }
}

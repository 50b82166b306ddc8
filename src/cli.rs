//! CLI interface for repo-context.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod cache;
pub mod config;
pub mod context;

/// repo-context: repository context for code review prompts.
#[derive(Parser)]
#[command(name = "repo-context")]
#[command(about = "Repository context for code review prompts", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The main command to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Main command categories.
#[derive(Subcommand)]
pub enum Commands {
    /// Prints the repository context for a set of modified files.
    Context(context::ContextCommand),
    /// Inspects or drops cached context records.
    Cache(cache::CacheCommand),
    /// Configuration operations.
    Config(config::ConfigCommand),
}

impl Cli {
    /// Executes the CLI command.
    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Context(context_cmd) => context_cmd.execute(),
            Commands::Cache(cache_cmd) => cache_cmd.execute(),
            Commands::Config(config_cmd) => config_cmd.execute(),
        }
    }
}

/// Loads configuration for an optional context directory override.
pub(crate) fn load_config(
    context_dir: Option<&std::path::Path>,
) -> Result<crate::config::RepoContextConfig> {
    let dir = crate::config::resolve_context_dir(context_dir);
    crate::config::RepoContextConfig::load(&dir)
}

//! # repo-context
//!
//! Lightweight structural and dependency profile of a repository, built to
//! ground automated code review of a change set.
//!
//! ## Features
//!
//! - Import resolution for dotted modules and relative path specifiers
//! - Architecture, naming and language heuristics over path listings
//! - Local checkouts or scoped temporary shallow clones
//! - Disk-backed TTL cache keyed by repository identity
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use repo_context::config::RepoContextConfig;
//! use repo_context::context::RepositoryContextProvider;
//! use repo_context::git::Git2Provider;
//!
//! let config = RepoContextConfig {
//!     repo_context_enabled: true,
//!     ..RepoContextConfig::default()
//! };
//! let git = Git2Provider::discover(std::path::Path::new(".")).unwrap();
//! let provider = RepositoryContextProvider::new(git, config);
//! println!("{}", provider.get_context_str(&["src/main.py".to_string()], None));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod git;
pub mod utils;

pub use crate::cli::Cli;
pub use crate::context::{get_repo_context, RepoContextAnalyzer, RepositoryContextProvider};
pub use crate::error::ContextError;

/// The current version of repo-context.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Repository context analysis.
//!
//! [`RepositoryContextProvider`] is the entry point used by the review
//! engine: it finds a repository root, runs [`RepoContextAnalyzer`] and
//! renders the result, caching it per repository in [`ContextCache`].

pub mod analyzer;
pub mod cache;
pub mod files;
pub mod imports;
pub mod patterns;
pub mod provider;

pub use analyzer::RepoContextAnalyzer;
pub use cache::{CacheRecord, ContextCache};
pub use files::{list_repo_files, normalize_path, FileSetIndex};
pub use imports::{DependencyView, ImportEdge, ImportResolver, ResolutionStrategy};
pub use patterns::{HeuristicTables, PatternDetector};
pub use provider::{format_context, get_repo_context, RepositoryContextProvider};

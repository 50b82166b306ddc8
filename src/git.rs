//! Git integration: repository discovery, identity and clones.

pub mod provider;
pub mod remote;

pub use provider::{ClonedRepo, Git2Provider, GitProvider};
pub use remote::{clone_url_for, repo_identity};

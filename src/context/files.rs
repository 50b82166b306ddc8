//! Repository file listing and the path membership index.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, trace};
use walkdir::{DirEntry, WalkDir};

/// Version control metadata directories never descended into.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Immutable set of normalized repository-relative paths.
///
/// Paths use forward slashes and carry no leading `./`. The index only
/// answers membership questions; it never touches the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSetIndex {
    paths: HashSet<String>,
}

impl FileSetIndex {
    /// Builds an index from repository-relative paths.
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            paths: paths
                .into_iter()
                .map(|p| normalize_path(p.as_ref()))
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Returns true if the normalized path is part of the repository.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    /// Number of indexed paths.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns true if no path is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterates over the indexed paths in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }
}

/// Normalizes a relative path to forward slashes without a leading `./`.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = path.replace('\\', "/");
    while let Some(stripped) = normalized.strip_prefix("./") {
        normalized = stripped.to_string();
    }
    normalized
}

/// Lists repository files relative to `root`, in file-name order.
///
/// Stops as soon as `max_files` paths are collected (`0` means no limit), so
/// large repositories are only partially listed. VCS metadata directories and
/// paths matching any `exclude` glob are skipped.
pub fn list_repo_files(root: &Path, max_files: usize, exclude: &[String]) -> Result<Vec<String>> {
    let excludes = build_exclude_set(exclude)?;
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_pruned(entry, root, &excludes));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                trace!("Skipping unreadable entry under {}: {e}", root.display());
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(rel_path) = relative_path(entry.path(), root) else {
            continue;
        };
        if excludes.is_match(&rel_path) {
            continue;
        }

        files.push(rel_path);
        if max_files > 0 && files.len() >= max_files {
            debug!(
                "Repository listing capped at {max_files} files for {}",
                root.display()
            );
            break;
        }
    }

    Ok(files)
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob =
            Glob::new(pattern).with_context(|| format!("Invalid exclude pattern: {pattern}"))?;
        builder.add(glob);
    }
    builder.build().context("Failed to build exclude patterns")
}

/// Prunes VCS directories and excluded directories before descending.
fn is_pruned(entry: &DirEntry, root: &Path, excludes: &GlobSet) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    if VCS_DIRS.iter().any(|dir| *dir == name) {
        return true;
    }
    relative_path(entry.path(), root).is_some_and(|rel| excludes.is_match(&rel))
}

fn relative_path(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let rel = normalize_path(&rel.to_string_lossy());
    (!rel.is_empty()).then_some(rel)
}

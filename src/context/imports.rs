//! Import statement resolution and the dependency view.
//!
//! Two unrelated resolution schemes are supported: dotted module names
//! (`import a.b`, `from ..c import d`) and relative path specifiers
//! (`import x from './y'`, `require('../z')`). Every candidate target is
//! checked against the [`FileSetIndex`]; targets outside the index are
//! dropped, never recorded.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace};

use super::files::{normalize_path, FileSetIndex};

/// Extension of dotted-module source files.
pub const MODULE_EXTENSION: &str = ".py";

/// File that turns a directory into an importable package.
pub const PACKAGE_INIT_FILE: &str = "__init__.py";

/// Extensions of relative-path source files, in resolution order.
pub const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".ts", ".jsx", ".tsx", ".mjs", ".cjs"];

/// Implicit directory entry file for relative-path imports.
const INDEX_FILE_STEM: &str = "index";

// Import statement regexes
#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static MODULE_IMPORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*import[ \t]+([A-Za-z0-9_.][A-Za-z0-9_., \t]*)").unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static MODULE_FROM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*from[ \t]+([A-Za-z0-9_.]+)[ \t]+import\b").unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SCRIPT_FROM_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^[ \t]*(?:import|export)\b[^;'"]*?\bfrom[ \t]*['"]([^'"\n]+)['"]"#).unwrap()
});

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SCRIPT_BARE_IMPORT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^[ \t]*import[ \t]*['"]([^'"\n]+)['"]"#).unwrap());

#[allow(clippy::unwrap_used)] // Compile-time constant regex pattern
static SCRIPT_CALL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\b(?:require|import)\(\s*['"]([^'"\n]+)['"]\s*\)"#).unwrap()
});

/// How a source file's imports are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionStrategy {
    /// Dot-separated module names rooted at the repository root.
    DottedModule,
    /// `./` and `../` path specifiers relative to the importing file.
    RelativePath,
}

/// Directed import relation between two repository files.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ImportEdge {
    /// Importing file.
    pub from: String,
    /// Imported file, always a member of the file set.
    pub to: String,
}

/// Stateless import resolver.
pub struct ImportResolver;

impl ImportResolver {
    /// Selects the resolution strategy for a path by extension.
    #[must_use]
    pub fn strategy_for(path: &str) -> Option<ResolutionStrategy> {
        let file_name = path.rsplit('/').next().unwrap_or(path);
        if file_name.ends_with(MODULE_EXTENSION) {
            Some(ResolutionStrategy::DottedModule)
        } else if SCRIPT_EXTENSIONS.iter().any(|ext| file_name.ends_with(ext)) {
            Some(ResolutionStrategy::RelativePath)
        } else {
            None
        }
    }

    /// Resolves the imports of `path` whose text is `source`.
    ///
    /// Files with an unrecognized extension yield no targets.
    pub fn resolve(path: &str, source: &str, index: &FileSetIndex) -> BTreeSet<String> {
        match Self::strategy_for(path) {
            Some(ResolutionStrategy::DottedModule) => {
                Self::resolve_module_imports(path, source, index)
            }
            Some(ResolutionStrategy::RelativePath) => {
                Self::resolve_relative_imports(path, source, index)
            }
            None => BTreeSet::new(),
        }
    }

    /// Resolves imports of `path` into edges.
    pub fn edges(path: &str, source: &str, index: &FileSetIndex) -> Vec<ImportEdge> {
        Self::resolve(path, source, index)
            .into_iter()
            .map(|to| ImportEdge {
                from: path.to_string(),
                to,
            })
            .collect()
    }

    /// Resolves `import a, b as c` and `from a import x` statements.
    pub fn resolve_module_imports(
        path: &str,
        source: &str,
        index: &FileSetIndex,
    ) -> BTreeSet<String> {
        let mut targets = BTreeSet::new();

        for captures in MODULE_IMPORT_PATTERN.captures_iter(source) {
            for module in captures[1].split(',') {
                // `a.b as c` -> `a.b`
                if let Some(name) = module.split_whitespace().next() {
                    targets.extend(resolve_module(path, name, index));
                }
            }
        }

        for captures in MODULE_FROM_PATTERN.captures_iter(source) {
            targets.extend(resolve_module(path, &captures[1], index));
        }

        targets
    }

    /// Resolves `import ... from`, bare `import`, `export ... from`,
    /// `require()` and dynamic `import()` specifiers.
    pub fn resolve_relative_imports(
        path: &str,
        source: &str,
        index: &FileSetIndex,
    ) -> BTreeSet<String> {
        let mut targets = BTreeSet::new();

        for pattern in [
            &*SCRIPT_FROM_PATTERN,
            &*SCRIPT_BARE_IMPORT_PATTERN,
            &*SCRIPT_CALL_PATTERN,
        ] {
            for captures in pattern.captures_iter(source) {
                targets.extend(resolve_specifier(path, captures[1].trim(), index));
            }
        }

        targets
    }
}

/// Resolves one dotted module name relative to the importing file.
fn resolve_module(path: &str, module: &str, index: &FileSetIndex) -> BTreeSet<String> {
    if module.is_empty() {
        return BTreeSet::new();
    }

    let leading_dots = module.chars().take_while(|c| *c == '.').count();
    let mut segments = if leading_dots > 0 {
        let mut dir = parent_segments(path);
        // One dot is the importing package itself; each further dot climbs.
        for _ in 1..leading_dots {
            if dir.pop().is_none() {
                return BTreeSet::new();
            }
        }
        dir
    } else {
        Vec::new()
    };
    segments.extend(module[leading_dots..].split('.').filter(|s| !s.is_empty()));

    let candidates = if segments.is_empty() {
        vec![PACKAGE_INIT_FILE.to_string()]
    } else {
        let base = segments.join("/");
        vec![
            format!("{base}{MODULE_EXTENSION}"),
            format!("{base}/{PACKAGE_INIT_FILE}"),
        ]
    };
    existing(candidates, index)
}

/// Resolves one `./` or `../` specifier; anything else is an external
/// package and yields nothing.
fn resolve_specifier(path: &str, specifier: &str, index: &FileSetIndex) -> BTreeSet<String> {
    if !(specifier.starts_with("./") || specifier.starts_with("../")) {
        return BTreeSet::new();
    }

    let mut segments = parent_segments(path);
    for part in specifier.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                if segments.pop().is_none() {
                    return BTreeSet::new();
                }
            }
            other => segments.push(other),
        }
    }

    let Some(last) = segments.last() else {
        return BTreeSet::new();
    };
    let base = segments.join("/");

    let candidates = if has_extension(last) {
        vec![base]
    } else {
        SCRIPT_EXTENSIONS
            .iter()
            .map(|ext| format!("{base}{ext}"))
            .chain(
                SCRIPT_EXTENSIONS
                    .iter()
                    .map(|ext| format!("{base}/{INDEX_FILE_STEM}{ext}")),
            )
            .collect()
    };
    existing(candidates, index)
}

/// Directory components of a normalized relative path.
fn parent_segments(path: &str) -> Vec<&str> {
    let mut segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    segments.pop();
    segments
}

/// Returns true if a file name carries an extension; leading dots do not
/// count.
fn has_extension(file_name: &str) -> bool {
    file_name.trim_start_matches('.').contains('.')
}

fn existing(candidates: Vec<String>, index: &FileSetIndex) -> BTreeSet<String> {
    candidates
        .into_iter()
        .filter(|candidate| index.contains(candidate))
        .collect()
}

/// Bidirectional import relations restricted to the modified files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyView {
    /// Modified file to the files it imports.
    pub imports_from: BTreeMap<String, BTreeSet<String>>,
    /// Modified file to the files importing it.
    pub imported_by: BTreeMap<String, BTreeSet<String>>,
}

impl DependencyView {
    /// Reads every resolvable file in the index once and builds the view.
    ///
    /// Unreadable files contribute no edges.
    pub fn scan(root: &Path, index: &FileSetIndex, modified_files: &[String]) -> Self {
        let mut edges = Vec::new();
        let mut scanned = 0usize;

        for path in index.iter() {
            if ImportResolver::strategy_for(path).is_none() {
                continue;
            }
            let bytes = match fs::read(root.join(path)) {
                Ok(bytes) => bytes,
                Err(e) => {
                    trace!("Skipping unreadable file {path}: {e}");
                    continue;
                }
            };
            scanned += 1;
            let source = String::from_utf8_lossy(&bytes);
            edges.extend(ImportResolver::edges(path, &source, index));
        }

        debug!(
            "Import scan read {scanned} files and found {} edges",
            edges.len()
        );
        Self::from_edges(edges, modified_files)
    }

    /// Builds the view from resolved edges.
    pub fn from_edges<I>(edges: I, modified_files: &[String]) -> Self
    where
        I: IntoIterator<Item = ImportEdge>,
    {
        let modified: BTreeSet<String> = modified_files.iter().map(|f| normalize_path(f)).collect();
        let mut view = Self::default();

        for edge in edges {
            if modified.contains(&edge.from) {
                view.imports_from
                    .entry(edge.from.clone())
                    .or_default()
                    .insert(edge.to.clone());
            }
            if modified.contains(&edge.to) {
                view.imported_by
                    .entry(edge.to)
                    .or_default()
                    .insert(edge.from);
            }
        }

        view
    }

    /// All files imported by any modified file, sorted.
    #[must_use]
    pub fn all_imports(&self) -> Vec<String> {
        union(&self.imports_from)
    }

    /// All files importing any modified file, sorted.
    #[must_use]
    pub fn all_importers(&self) -> Vec<String> {
        union(&self.imported_by)
    }
}

fn union(map: &BTreeMap<String, BTreeSet<String>>) -> Vec<String> {
    map.values()
        .flatten()
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

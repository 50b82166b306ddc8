//! Resolves a repository root, runs the analyzer and renders the result.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use super::analyzer::RepoContextAnalyzer;
use super::cache::ContextCache;
use super::files::list_repo_files;
use crate::config::RepoContextConfig;
use crate::data::context::{NamingConvention, RepositoryContext};
use crate::git::GitProvider;

/// Repository root usable for a full analysis.
///
/// A cloned root owns its temporary directory, which is removed when the
/// value is dropped.
#[derive(Debug)]
enum ResolvedRoot {
    Local(PathBuf),
    Cloned { _dir: TempDir, path: PathBuf },
    Unavailable,
}

impl ResolvedRoot {
    fn path(&self) -> Option<&Path> {
        match self {
            Self::Local(path) | Self::Cloned { path, .. } => Some(path.as_path()),
            Self::Unavailable => None,
        }
    }
}

/// Produces the repository context text embedded into review prompts.
pub struct RepositoryContextProvider<G: GitProvider> {
    git: G,
    analyzer: RepoContextAnalyzer,
    cache: ContextCache,
}

impl<G: GitProvider> RepositoryContextProvider<G> {
    /// Creates a provider with the on-disk cache described by `config`.
    pub fn new(git: G, config: RepoContextConfig) -> Self {
        let cache = ContextCache::from_config(&config);
        Self::with_cache(git, RepoContextAnalyzer::new(config), cache)
    }

    /// Creates a provider from explicit parts.
    pub fn with_cache(git: G, analyzer: RepoContextAnalyzer, cache: ContextCache) -> Self {
        Self {
            git,
            analyzer,
            cache,
        }
    }

    /// Returns the formatted context for the modified files.
    ///
    /// Returns an empty string when analysis is disabled, when it fails, or
    /// when there is nothing to report. Never returns an error.
    pub fn get_context_str(&self, modified_files: &[String], pr_url: Option<&str>) -> String {
        if !self.analyzer.config().repo_context_enabled {
            return String::new();
        }

        let identity = self.git.repo_full_name(pr_url);
        if let Some(repo) = identity.as_deref() {
            if let Some(cached) = self.cache.get(repo) {
                return cached;
            }
        }

        let context = self.build_context(modified_files, pr_url);
        let text = format_context(&context);

        match identity.as_deref() {
            Some(repo) if !text.is_empty() => self.cache.set(repo, &text),
            None => debug!("No repository identity, context not cached"),
            _ => {}
        }
        text
    }

    /// Runs the analyzer against the best available root.
    pub fn build_context(&self, modified_files: &[String], pr_url: Option<&str>) -> RepositoryContext {
        let root = self.resolve_root(pr_url);
        let Some(path) = root.path() else {
            return self
                .analyzer
                .get_repository_context(modified_files, None, None);
        };

        let config = self.analyzer.config();
        match list_repo_files(
            path,
            config.repo_context_max_files,
            &config.repo_context_exclude,
        ) {
            Ok(files) if !files.is_empty() => {
                debug!("Using {} repository files for context analysis", files.len());
                self.analyzer
                    .get_repository_context(modified_files, Some(&files), Some(path))
            }
            Ok(_) => self
                .analyzer
                .get_repository_context(modified_files, None, Some(path)),
            Err(e) => {
                warn!("Failed to list repository files under {}: {e:#}", path.display());
                self.analyzer
                    .get_repository_context(modified_files, None, None)
            }
        }
    }

    fn resolve_root(&self, pr_url: Option<&str>) -> ResolvedRoot {
        if let Some(path) = self.git.repo_path() {
            if path.is_dir() {
                return ResolvedRoot::Local(path);
            }
            debug!("Repository path {} is not a directory", path.display());
        }

        let Some(remote) = self.git.repo_url(pr_url) else {
            return ResolvedRoot::Unavailable;
        };
        let remote_path = Path::new(&remote);
        if remote_path.is_dir() && !is_bare(remote_path) {
            return ResolvedRoot::Local(remote_path.to_path_buf());
        }

        let dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Failed to create clone directory: {e}");
                return ResolvedRoot::Unavailable;
            }
        };
        match self.git.clone_repo(&remote, dir.path(), false) {
            Ok(cloned) => ResolvedRoot::Cloned {
                path: cloned.path,
                _dir: dir,
            },
            Err(e) => {
                warn!("Falling back to modified files only: {e}");
                ResolvedRoot::Unavailable
            }
        }
    }
}

/// A bare repository has no working tree to list.
fn is_bare(path: &Path) -> bool {
    path.join("HEAD").is_file() && path.join("objects").is_dir()
}

/// Formats a context for prompt embedding.
///
/// Sections without content are omitted; an empty context yields `""`.
pub fn format_context(context: &RepositoryContext) -> String {
    let mut sections: Vec<Vec<String>> = Vec::new();

    let related = &context.related_files;
    let mut lines = Vec::new();
    list_line(&mut lines, "Test files", &related.test_files);
    list_line(&mut lines, "Config files", &related.config_files);
    list_line(&mut lines, "Documentation", &related.documentation_files);
    list_line(&mut lines, "Imports", &related.imports_from);
    list_line(&mut lines, "Imported by", &related.imported_by);
    push_section(&mut sections, "Related Files", lines);

    let architecture = &context.architectural_patterns;
    let mut lines = Vec::new();
    if let Some(kind) = architecture.architecture_type {
        lines.push(format!("- Type: {kind}"));
    }
    list_line(&mut lines, "Layers", &architecture.layers);
    let modules: Vec<String> = architecture
        .module_organization
        .iter()
        .map(|(module, files)| format!("{module} ({})", files.len()))
        .collect();
    list_line(&mut lines, "Modules", &modules);
    push_section(&mut sections, "Architecture", lines);

    let conventions = &context.language_conventions;
    let mut lines = Vec::new();
    if let Some(language) = &conventions.primary_language {
        lines.push(format!("- Language: {language}"));
    }
    if conventions.file_naming != NamingConvention::Unknown {
        lines.push(format!("- File naming: {}", conventions.file_naming));
    }
    push_section(&mut sections, "Code Conventions", lines);

    let impact = &context.dependencies_impact;
    if !impact.modified_dependencies.is_empty() {
        push_section(
            &mut sections,
            "Dependencies Modified",
            vec![
                format!("- {}", impact.modified_dependencies.join(", ")),
                format!("- Breaking changes risk: {}", impact.breaking_changes_risk),
            ],
        );
    }

    let mut lines = Vec::new();
    if let Some(framework) = &context.code_patterns.testing_framework {
        lines.push(format!("- Testing: {framework}"));
    }
    push_section(&mut sections, "Code Patterns", lines);

    let mut lines = Vec::new();
    list_line(&mut lines, "Same name", &context.similar_implementations);
    push_section(&mut sections, "Similar Implementations", lines);

    if sections.is_empty() {
        return String::new();
    }

    let mut parts = vec!["# Repository Context\n".to_string()];
    for section in sections {
        parts.extend(section);
        parts.push(String::new());
    }
    parts.join("\n")
}

fn list_line(lines: &mut Vec<String>, label: &str, items: &[String]) {
    if !items.is_empty() {
        lines.push(format!("- {label}: {}", items.join(", ")));
    }
}

fn push_section(sections: &mut Vec<Vec<String>>, title: &str, lines: Vec<String>) {
    if lines.is_empty() {
        return;
    }
    let mut section = vec![format!("## {title}")];
    section.extend(lines);
    sections.push(section);
}

/// Formatted context for the modified files using a fresh provider.
pub fn get_repo_context<G: GitProvider>(
    git: G,
    config: RepoContextConfig,
    modified_files: &[String],
    pr_url: Option<&str>,
) -> String {
    RepositoryContextProvider::new(git, config).get_context_str(modified_files, pr_url)
}

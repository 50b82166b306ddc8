//! Orchestrates the import resolver and the pattern detector.

use std::path::Path;

use anyhow::Result;
use tracing::{debug, warn};

use super::files::{normalize_path, FileSetIndex};
use super::imports::DependencyView;
use super::patterns::PatternDetector;
use crate::config::RepoContextConfig;
use crate::data::context::{
    ArchitecturalPatterns, CodePatterns, LanguageConventions, RelatedFiles, RepositoryContext,
};

/// Builds a [`RepositoryContext`] for one change set.
///
/// Each section is computed in isolation: a failing section is logged and
/// left at its default value while the others are still filled in.
#[derive(Debug, Clone)]
pub struct RepoContextAnalyzer {
    config: RepoContextConfig,
    detector: PatternDetector,
}

impl RepoContextAnalyzer {
    /// Creates an analyzer with the default heuristic tables.
    pub fn new(config: RepoContextConfig) -> Self {
        Self::with_detector(config, PatternDetector::default())
    }

    /// Creates an analyzer with a custom detector.
    pub fn with_detector(config: RepoContextConfig, detector: PatternDetector) -> Self {
        Self { config, detector }
    }

    /// Configuration this analyzer was built with.
    pub fn config(&self) -> &RepoContextConfig {
        &self.config
    }

    /// Analyzes the modified files against the repository listing.
    ///
    /// Without `repo_files` only the modified files are analysed and the
    /// import scan is skipped. The scan also needs `repo_root` to read
    /// sources. Returns the empty context when analysis is disabled.
    pub fn get_repository_context(
        &self,
        modified_files: &[String],
        repo_files: Option<&[String]>,
        repo_root: Option<&Path>,
    ) -> RepositoryContext {
        if !self.config.repo_context_enabled {
            return RepositoryContext::default();
        }

        let modified: Vec<String> = modified_files.iter().map(|f| normalize_path(f)).collect();
        let files: Vec<String> = match repo_files {
            Some(files) => files.iter().map(|f| normalize_path(f)).collect(),
            None => modified.clone(),
        };
        let index = FileSetIndex::new(&files);
        let scan_root = repo_files.and(repo_root);

        let context = RepositoryContext {
            related_files: isolated("related files", || {
                Ok(self.related_files(&modified, &index, scan_root))
            }),
            architectural_patterns: isolated("architecture", || {
                Ok(ArchitecturalPatterns {
                    layers: self.detector.layers(&files),
                    architecture_type: Some(self.detector.architecture_type(&files, repo_root)?),
                    module_organization: self.detector.module_organization(&files),
                })
            }),
            language_conventions: isolated("conventions", || {
                Ok(LanguageConventions {
                    primary_language: self.detector.primary_language(&files),
                    file_naming: self.detector.naming_convention(&files),
                })
            }),
            dependencies_impact: isolated("dependency impact", || {
                Ok(self.detector.dependency_impact(&modified))
            }),
            code_patterns: isolated("code patterns", || {
                Ok(CodePatterns {
                    testing_framework: self.detector.testing_framework(&files)?,
                })
            }),
            similar_implementations: isolated("similar implementations", || {
                Ok(self.detector.similar_implementations(&modified, &files))
            }),
        };

        debug!(
            "Repository context: {} modified, {} indexed, {} tests, {} imports, {} importers, {} layers",
            modified.len(),
            index.len(),
            context.related_files.test_files.len(),
            context.related_files.imports_from.len(),
            context.related_files.imported_by.len(),
            context.architectural_patterns.layers.len()
        );
        context
    }

    fn related_files(
        &self,
        modified: &[String],
        index: &FileSetIndex,
        scan_root: Option<&Path>,
    ) -> RelatedFiles {
        let view = scan_root
            .map(|root| DependencyView::scan(root, index, modified))
            .unwrap_or_default();

        RelatedFiles {
            test_files: self.detector.test_files(modified, index),
            config_files: self.detector.config_files(index),
            documentation_files: self.detector.documentation_files(modified, index),
            imports_from: view.all_imports(),
            imported_by: view.all_importers(),
        }
    }
}

/// Runs one section, logging and defaulting on failure.
fn isolated<T: Default>(section: &str, compute: impl FnOnce() -> Result<T>) -> T {
    compute().unwrap_or_else(|e| {
        warn!("Repository context section '{section}' failed: {e:#}");
        T::default()
    })
}

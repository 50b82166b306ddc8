//! Repository context data structures.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural and dependency profile of a repository for one change set.
///
/// Built fresh by every analysis call. The default value is the empty
/// context returned when analysis is disabled.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RepositoryContext {
    /// Files related to the modified files.
    pub related_files: RelatedFiles,
    /// Layers and overall architecture style.
    pub architectural_patterns: ArchitecturalPatterns,
    /// Language and naming conventions.
    pub language_conventions: LanguageConventions,
    /// Impact of the change on dependency manifests.
    pub dependencies_impact: DependenciesImpact,
    /// Repository-wide code practices.
    pub code_patterns: CodePatterns,
    /// Files elsewhere in the repository sharing a modified file's name.
    pub similar_implementations: Vec<String>,
}

impl RepositoryContext {
    /// Returns true if no section carries any information.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.related_files.is_empty()
            && self.architectural_patterns.is_empty()
            && self.language_conventions.is_empty()
            && self.dependencies_impact.modified_dependencies.is_empty()
            && self.code_patterns.testing_framework.is_none()
            && self.similar_implementations.is_empty()
    }
}

/// Files related to the change set.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RelatedFiles {
    /// Test files matching the modified files.
    pub test_files: Vec<String>,
    /// Root configuration files present in the repository.
    pub config_files: Vec<String>,
    /// Documentation files related to the change.
    pub documentation_files: Vec<String>,
    /// Files imported by the modified files.
    pub imports_from: Vec<String>,
    /// Files importing the modified files.
    pub imported_by: Vec<String>,
}

impl RelatedFiles {
    /// Returns true if no related file was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.test_files.is_empty()
            && self.config_files.is_empty()
            && self.documentation_files.is_empty()
            && self.imports_from.is_empty()
            && self.imported_by.is_empty()
    }
}

/// Architectural layering and style.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ArchitecturalPatterns {
    /// Observed layers, sorted.
    pub layers: Vec<String>,
    /// Classified architecture style.
    pub architecture_type: Option<ArchitectureType>,
    /// Top-level directory to the files it contains.
    pub module_organization: BTreeMap<String, Vec<String>>,
}

impl ArchitecturalPatterns {
    /// Returns true if nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
            && self.architecture_type.is_none()
            && self.module_organization.is_empty()
    }
}

/// Coarse architecture classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ArchitectureType {
    /// Service and API paths side by side.
    Microservices,
    /// Model/view/controller layering.
    Mvc,
    /// Package markers at the repository root.
    Modular,
    /// None of the above.
    Monolithic,
}

impl fmt::Display for ArchitectureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Microservices => write!(f, "microservices"),
            Self::Mvc => write!(f, "mvc"),
            Self::Modular => write!(f, "modular"),
            Self::Monolithic => write!(f, "monolithic"),
        }
    }
}

/// Language-level conventions.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct LanguageConventions {
    /// Most frequent language, if any file has a known extension.
    pub primary_language: Option<String>,
    /// Dominant file naming style.
    pub file_naming: NamingConvention,
}

impl LanguageConventions {
    /// Returns true if nothing was detected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary_language.is_none() && self.file_naming == NamingConvention::Unknown
    }
}

/// File naming style.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
pub enum NamingConvention {
    /// `file_name.ext`
    #[serde(rename = "snake_case")]
    SnakeCase,
    /// `file-name.ext`
    #[serde(rename = "kebab_case")]
    KebabCase,
    /// `fileName.ext`
    #[serde(rename = "camelCase")]
    CamelCase,
    /// No clear majority.
    #[default]
    #[serde(rename = "unknown")]
    Unknown,
}

impl fmt::Display for NamingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SnakeCase => write!(f, "snake_case"),
            Self::KebabCase => write!(f, "kebab_case"),
            Self::CamelCase => write!(f, "camelCase"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Impact of the change on dependency manifests.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct DependenciesImpact {
    /// Modified manifest files.
    pub modified_dependencies: Vec<String>,
    /// Risk of breaking changes.
    pub breaking_changes_risk: RiskLevel,
}

/// Breaking-change risk.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No manifest touched.
    #[default]
    Low,
    /// At least one manifest touched.
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Repository-wide code practices.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CodePatterns {
    /// Detected testing framework.
    pub testing_framework: Option<String>,
}

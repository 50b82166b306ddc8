//! Data structures produced by repository context analysis.

pub mod context;

pub use context::{
    ArchitecturalPatterns, ArchitectureType, CodePatterns, DependenciesImpact,
    LanguageConventions, NamingConvention, RelatedFiles, RepositoryContext, RiskLevel,
};

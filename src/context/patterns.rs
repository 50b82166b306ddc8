//! Path-based architecture and convention heuristics.
//!
//! Everything here looks at paths only; file contents are never read. The
//! lookup tables live in [`HeuristicTables`] so callers can substitute their
//! own. Several rules are order-sensitive (first match wins, first declared
//! wins a tie), so table order is significant.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use globset::Glob;

use super::files::FileSetIndex;
use crate::data::context::{ArchitectureType, DependenciesImpact, NamingConvention, RiskLevel};

/// Layer name to the path substrings that indicate it.
pub const LAYER_INDICATORS: &[(&str, &[&str])] = &[
    ("models", &["models/", "model.py", "entities/"]),
    ("views", &["views/", "view.py", "ui/", "templates/"]),
    (
        "controllers",
        &["controllers/", "controller.py", "handlers/", "handlers.py"],
    ),
    ("services", &["services/", "service.py", "business/"]),
    (
        "repositories",
        &["repositories/", "repository.py", "repos/", "data/"],
    ),
    ("middleware", &["middleware/", "middlewares/"]),
    ("utils", &["utils/", "util.py", "helpers/"]),
];

/// Bare layer names checked as whole entries by the MVC rule.
pub const MVC_LAYER_NAMES: &[&str] = &["models", "views", "controllers"];

/// Files whose presence at the repository root marks a package layout.
pub const PACKAGE_MARKERS: &[&str] = &["__init__.py"];

/// Extension to language, in tie-break order.
pub const LANGUAGES: &[(&str, &str)] = &[
    (".py", "python"),
    (".js", "javascript"),
    (".ts", "typescript"),
    (".java", "java"),
    (".go", "go"),
    (".rs", "rust"),
    (".cpp", "cpp"),
    (".cs", "csharp"),
];

/// Dependency manifest file names.
pub const MANIFEST_FILES: &[&str] = &[
    "requirements.txt",
    "package.json",
    "pyproject.toml",
    "Gemfile",
    "go.mod",
];

/// Root configuration files reported when present.
pub const CONFIG_FILES: &[&str] = &[
    "setup.py",
    "pyproject.toml",
    "requirements.txt",
    "package.json",
    "tsconfig.json",
    "webpack.config.js",
    ".env",
    "docker-compose.yml",
    "Dockerfile",
    "Makefile",
    "CMakeLists.txt",
];

/// Extensions tried for same-basename documentation.
pub const DOC_EXTENSIONS: &[&str] = &[".md", ".rst", ".txt"];

/// Repository-level documents reported when present.
pub const ROOT_DOCS: &[&str] = &["README.md", "CHANGELOG.md", "docs/index.md"];

/// Directory names next to which test directories are looked for.
pub const SOURCE_DIRS: &[&str] = &["src", "lib", "main"];

/// Test directory names.
pub const TEST_DIRS: &[&str] = &["test", "tests", "__tests__"];

/// Glob marking a testing framework, in detection order.
pub const TESTING_MARKERS: &[(&str, &str)] = &[
    ("**/pytest.ini", "pytest"),
    ("**/conftest.py", "pytest"),
    ("**/jest.config.*", "jest"),
    ("**/.mocharc*", "mocha"),
    ("**/karma.conf.js", "jasmine"),
    ("**/*_test.go", "go test"),
    ("**/src/test/java/**", "junit"),
];

/// File names too generic to suggest a similar implementation.
pub const GENERIC_STEMS: &[&str] = &["__init__", "index", "mod", "main"];

/// Lookup tables driving [`PatternDetector`].
#[derive(Debug, Clone, Copy)]
pub struct HeuristicTables {
    /// Layer name to indicator substrings.
    pub layer_indicators: &'static [(&'static str, &'static [&'static str])],
    /// Bare names for the MVC rule.
    pub mvc_layer_names: &'static [&'static str],
    /// Root package marker files.
    pub package_markers: &'static [&'static str],
    /// Extension to language.
    pub languages: &'static [(&'static str, &'static str)],
    /// Dependency manifests.
    pub manifest_files: &'static [&'static str],
    /// Root configuration files.
    pub config_files: &'static [&'static str],
    /// Documentation extensions.
    pub doc_extensions: &'static [&'static str],
    /// Repository-level documents.
    pub root_docs: &'static [&'static str],
    /// Source directory names that get a sibling test directory.
    pub source_dirs: &'static [&'static str],
    /// Test directory names.
    pub test_dirs: &'static [&'static str],
    /// Stems skipped when looking for similar implementations.
    pub generic_stems: &'static [&'static str],
    /// Testing framework globs.
    pub testing_markers: &'static [(&'static str, &'static str)],
}

impl Default for HeuristicTables {
    fn default() -> Self {
        Self {
            layer_indicators: LAYER_INDICATORS,
            mvc_layer_names: MVC_LAYER_NAMES,
            package_markers: PACKAGE_MARKERS,
            languages: LANGUAGES,
            manifest_files: MANIFEST_FILES,
            config_files: CONFIG_FILES,
            doc_extensions: DOC_EXTENSIONS,
            root_docs: ROOT_DOCS,
            source_dirs: SOURCE_DIRS,
            test_dirs: TEST_DIRS,
            generic_stems: GENERIC_STEMS,
            testing_markers: TESTING_MARKERS,
        }
    }
}

/// Stateless path heuristics.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternDetector {
    tables: HeuristicTables,
}

impl PatternDetector {
    /// Creates a detector over the given tables.
    #[must_use]
    pub fn new(tables: HeuristicTables) -> Self {
        Self { tables }
    }

    /// Test files belonging to the modified files.
    pub fn test_files(&self, modified_files: &[String], index: &FileSetIndex) -> Vec<String> {
        let mut found = Vec::new();
        for file in modified_files {
            for candidate in self.test_candidates(file) {
                if candidate != *file && index.contains(&candidate) {
                    push_unique(&mut found, candidate);
                }
            }
        }
        found
    }

    /// Root configuration files present in the repository.
    pub fn config_files(&self, index: &FileSetIndex) -> Vec<String> {
        self.tables
            .config_files
            .iter()
            .filter(|config| index.contains(config))
            .map(|config| (*config).to_string())
            .collect()
    }

    /// Same-basename docs for the modified files, then repository docs.
    pub fn documentation_files(
        &self,
        modified_files: &[String],
        index: &FileSetIndex,
    ) -> Vec<String> {
        let mut docs = Vec::new();
        for file in modified_files {
            let base = strip_extension(file);
            for ext in self.tables.doc_extensions {
                let candidate = format!("{base}{ext}");
                if candidate != *file && index.contains(&candidate) {
                    push_unique(&mut docs, candidate);
                }
            }
        }
        for doc in self.tables.root_docs {
            if index.contains(doc) {
                push_unique(&mut docs, (*doc).to_string());
            }
        }
        docs
    }

    /// Layers observed anywhere in the path list, sorted.
    pub fn layers(&self, files: &[String]) -> Vec<String> {
        let mut layers = BTreeSet::new();
        for file in files {
            for (layer, indicators) in self.tables.layer_indicators {
                if indicators.iter().any(|indicator| file.contains(indicator)) {
                    layers.insert((*layer).to_string());
                }
            }
        }
        layers.into_iter().collect()
    }

    /// Classifies the architecture; the first matching rule wins.
    ///
    /// The MVC rule compares whole entries against bare layer names, so it
    /// only fires for a path literally named `models`, `views` or
    /// `controllers`.
    pub fn architecture_type(
        &self,
        files: &[String],
        repo_root: Option<&Path>,
    ) -> Result<ArchitectureType> {
        if files.iter().any(|f| f.contains("service")) && files.iter().any(|f| f.contains("api")) {
            return Ok(ArchitectureType::Microservices);
        }
        if self
            .tables
            .mvc_layer_names
            .iter()
            .any(|layer| files.iter().any(|f| f == layer))
        {
            return Ok(ArchitectureType::Mvc);
        }
        if self.has_package_marker(files, repo_root)? {
            return Ok(ArchitectureType::Modular);
        }
        Ok(ArchitectureType::Monolithic)
    }

    /// Checks the repository root (or, without one, root-level entries of
    /// the path list) for a package marker.
    fn has_package_marker(&self, files: &[String], repo_root: Option<&Path>) -> Result<bool> {
        let markers = self.tables.package_markers;
        match repo_root {
            Some(root) => {
                let entries = fs::read_dir(root)
                    .with_context(|| format!("Failed to list {}", root.display()))?;
                Ok(entries.flatten().any(|entry| {
                    let name = entry.file_name();
                    let name = name.to_string_lossy();
                    entry.file_type().is_ok_and(|t| t.is_file())
                        && markers.iter().any(|marker| *marker == name)
                }))
            }
            None => Ok(files.iter().any(|f| markers.contains(&f.as_str()))),
        }
    }

    /// Groups files by top-level directory.
    pub fn module_organization(&self, files: &[String]) -> BTreeMap<String, Vec<String>> {
        let mut modules: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for file in files {
            if let Some((module, _)) = file.split_once('/') {
                modules
                    .entry(module.to_string())
                    .or_default()
                    .push(file.clone());
            }
        }
        modules
    }

    /// Most frequent language by extension; ties go to the language
    /// declared first in the table.
    pub fn primary_language(&self, files: &[String]) -> Option<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for file in files {
            let ext = extension(file);
            if let Some((_, language)) = self.tables.languages.iter().find(|(e, _)| *e == ext) {
                *counts.entry(*language).or_insert(0) += 1;
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (_, language) in self.tables.languages {
            let count = counts.get(language).copied().unwrap_or(0);
            if count > 0 && best.map_or(true, |(_, c)| count > c) {
                best = Some((*language, count));
            }
        }
        best.map(|(language, _)| language.to_string())
    }

    /// Dominant file naming style by basename; a tie is `Unknown`.
    pub fn naming_convention(&self, files: &[String]) -> NamingConvention {
        let mut snake = 0usize;
        let mut kebab = 0usize;
        let mut camel = 0usize;

        for file in files {
            let name = basename(file);
            if name.contains('_') {
                snake += 1;
            }
            if name.contains('-') {
                kebab += 1;
            }
            let mut chars = name.chars();
            if chars.next().is_some_and(char::is_lowercase) && chars.any(char::is_uppercase) {
                camel += 1;
            }
        }

        let ranked = [
            (NamingConvention::SnakeCase, snake),
            (NamingConvention::KebabCase, kebab),
            (NamingConvention::CamelCase, camel),
        ];
        let top = ranked.iter().map(|(_, count)| *count).max().unwrap_or(0);
        if top == 0 || ranked.iter().filter(|(_, count)| *count == top).count() > 1 {
            return NamingConvention::Unknown;
        }
        ranked
            .iter()
            .find(|(_, count)| *count == top)
            .map_or(NamingConvention::Unknown, |(convention, _)| *convention)
    }

    /// Flags modified dependency manifests.
    pub fn dependency_impact(&self, modified_files: &[String]) -> DependenciesImpact {
        let mut impact = DependenciesImpact::default();
        for file in modified_files {
            if self.tables.manifest_files.contains(&basename(file)) {
                impact.modified_dependencies.push(file.clone());
                impact.breaking_changes_risk = RiskLevel::High;
            }
        }
        impact
    }

    /// Detects the testing framework from marker files.
    ///
    /// Falls back to `detected` when only test-like paths exist.
    pub fn testing_framework(&self, files: &[String]) -> Result<Option<String>> {
        for (pattern, framework) in self.tables.testing_markers {
            let matcher = Glob::new(pattern)
                .with_context(|| format!("Invalid testing marker: {pattern}"))?
                .compile_matcher();
            if files.iter().any(|f| matcher.is_match(f)) {
                return Ok(Some((*framework).to_string()));
            }
        }

        if files.iter().any(|f| f.to_lowercase().contains("test")) {
            return Ok(Some("detected".to_string()));
        }
        Ok(None)
    }

    /// Files elsewhere in the repository with a modified file's basename.
    pub fn similar_implementations(
        &self,
        modified_files: &[String],
        files: &[String],
    ) -> Vec<String> {
        let mut similar = Vec::new();
        for modified in modified_files {
            let name = basename(modified);
            if self.tables.generic_stems.contains(&strip_extension(name)) {
                continue;
            }
            for file in files {
                if basename(file) == name && !modified_files.contains(file) {
                    push_unique(&mut similar, file.clone());
                }
            }
        }
        similar
    }

    /// Candidate test paths for a source file.
    fn test_candidates(&self, file: &str) -> Vec<String> {
        let (dir, name) = match file.rsplit_once('/') {
            Some((dir, name)) => (format!("{dir}/"), name),
            None => (String::new(), file),
        };
        let stem = strip_extension(name);
        let ext = extension(name);

        let mut candidates: Vec<String> = match ext {
            ".py" => vec![
                format!("{dir}{stem}_test.py"),
                format!("{dir}{stem}.test.py"),
                format!("{dir}test_{stem}.py"),
            ],
            ".js" | ".jsx" | ".ts" | ".tsx" | ".mjs" | ".cjs" => vec![
                format!("{dir}{stem}.test{ext}"),
                format!("{dir}{stem}.spec{ext}"),
            ],
            ".go" => vec![format!("{dir}{stem}_test.go")],
            _ => Vec::new(),
        };

        let parts: Vec<&str> = file.split('/').collect();
        for (i, part) in parts.iter().enumerate() {
            if self.tables.source_dirs.contains(part) {
                for test_dir in self.tables.test_dirs {
                    let mut path = parts[..i].to_vec();
                    path.push(*test_dir);
                    path.extend_from_slice(&parts[i..]);
                    candidates.push(path.join("/"));
                }
            }
        }

        candidates
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Extension of the last path component including the dot, or `""`.
/// A leading dot (`.env`) is not an extension.
fn extension(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(pos) if name[..pos].chars().any(|c| c != '.') => &name[pos..],
        _ => "",
    }
}

/// The path without the extension of its last component.
fn strip_extension(path: &str) -> &str {
    let ext = extension(path);
    &path[..path.len() - ext.len()]
}

fn push_unique(list: &mut Vec<String>, item: String) {
    if !list.contains(&item) {
        list.push(item);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    fn detector() -> PatternDetector {
        PatternDetector::default()
    }

    // ── companion files ────────────────────────────────────────────

    #[test]
    fn finds_python_test_sibling() {
        let index = FileSetIndex::new(["src/foo.py", "src/foo_test.py"]);
        let tests = detector().test_files(&paths(&["src/foo.py"]), &index);
        assert_eq!(tests, vec!["src/foo_test.py"]);
    }

    #[test]
    fn finds_spec_and_test_directory_variants() {
        let index = FileSetIndex::new([
            "web/app.ts",
            "web/app.spec.ts",
            "tests/src/util.js",
            "src/util.js",
        ]);
        let tests = detector().test_files(&paths(&["web/app.ts", "src/util.js"]), &index);
        assert_eq!(tests, vec!["web/app.spec.ts", "tests/src/util.js"]);
    }

    #[test]
    fn finds_go_test_file() {
        let index = FileSetIndex::new(["pkg/server.go", "pkg/server_test.go"]);
        let tests = detector().test_files(&paths(&["pkg/server.go"]), &index);
        assert_eq!(tests, vec!["pkg/server_test.go"]);
    }

    #[test]
    fn absent_candidates_are_not_reported() {
        let index = FileSetIndex::new(["src/foo.py"]);
        assert!(detector()
            .test_files(&paths(&["src/foo.py"]), &index)
            .is_empty());
    }

    #[test]
    fn config_files_only_when_present() {
        let index = FileSetIndex::new(["package.json", "Dockerfile", "src/setup.py"]);
        assert_eq!(
            detector().config_files(&index),
            vec!["package.json", "Dockerfile"]
        );
    }

    #[test]
    fn documentation_variants_and_root_docs() {
        let index = FileSetIndex::new([
            "docs/api.py",
            "docs/api.rst",
            "README.md",
            "docs/index.md",
        ]);
        let docs = detector().documentation_files(&paths(&["docs/api.py"]), &index);
        assert_eq!(docs, vec!["docs/api.rst", "README.md", "docs/index.md"]);
    }

    #[test]
    fn modified_doc_is_not_its_own_documentation() {
        let index = FileSetIndex::new(["requirements.txt", "requirements.md", "README.md"]);
        let docs = detector().documentation_files(&paths(&["requirements.txt"]), &index);
        assert_eq!(docs, vec!["requirements.md", "README.md"]);
    }

    #[test]
    fn substituted_test_directory_tables() {
        const APP_DIRS: &[&str] = &["app"];
        const SPEC_DIRS: &[&str] = &["spec"];
        let detector = PatternDetector::new(HeuristicTables {
            source_dirs: APP_DIRS,
            test_dirs: SPEC_DIRS,
            ..HeuristicTables::default()
        });
        let index = FileSetIndex::new(["app/user.rb", "spec/app/user.rb", "tests/app/user.rb"]);
        let tests = detector.test_files(&paths(&["app/user.rb"]), &index);
        assert_eq!(tests, vec!["spec/app/user.rb"]);
    }

    #[test]
    fn substituted_generic_stems() {
        const NONE: &[&str] = &[];
        let files = paths(&["billing/__init__.py", "shipping/__init__.py"]);
        let modified = paths(&["billing/__init__.py"]);

        assert!(detector().similar_implementations(&modified, &files).is_empty());
        let detector = PatternDetector::new(HeuristicTables {
            generic_stems: NONE,
            ..HeuristicTables::default()
        });
        assert_eq!(
            detector.similar_implementations(&modified, &files),
            vec!["shipping/__init__.py"]
        );
    }

    #[test]
    fn documentation_is_deduplicated() {
        let index = FileSetIndex::new(["README.md"]);
        let docs = detector().documentation_files(&paths(&["README.md"]), &index);
        assert_eq!(docs, vec!["README.md"]);
    }

    // ── layers and architecture ────────────────────────────────────

    #[test]
    fn layers_from_substrings() {
        let layers = detector().layers(&paths(&[
            "app/models/user.py",
            "app/handlers.py",
            "app/data/store.py",
            "lib/helpers/fmt.py",
        ]));
        assert_eq!(layers, vec!["controllers", "models", "repositories", "utils"]);
    }

    #[test]
    fn one_file_can_flag_several_layers() {
        let layers = detector().layers(&paths(&["services/models/base.py"]));
        assert_eq!(layers, vec!["models", "services"]);
    }

    #[test]
    fn microservices_when_service_and_api() {
        let kind = detector()
            .architecture_type(&paths(&["api/service.py", "api/routes.py"]), None)
            .unwrap();
        assert_eq!(kind, ArchitectureType::Microservices);
    }

    #[test]
    fn monolithic_without_markers() {
        let kind = detector()
            .architecture_type(&paths(&["main.py", "utils.py"]), None)
            .unwrap();
        assert_eq!(kind, ArchitectureType::Monolithic);
    }

    #[test]
    fn mvc_needs_bare_layer_entry() {
        let kind = detector()
            .architecture_type(&paths(&["app/models/user.py"]), None)
            .unwrap();
        assert_eq!(kind, ArchitectureType::Monolithic);

        let kind = detector()
            .architecture_type(&paths(&["models", "app.py"]), None)
            .unwrap();
        assert_eq!(kind, ArchitectureType::Mvc);
    }

    #[test]
    fn modular_when_root_has_marker() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("__init__.py"), "").unwrap();
        let kind = detector()
            .architecture_type(&paths(&["main.py"]), Some(dir.path()))
            .unwrap();
        assert_eq!(kind, ArchitectureType::Modular);
    }

    #[test]
    fn nested_marker_is_not_modular() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("pkg")).unwrap();
        std::fs::write(dir.path().join("pkg/__init__.py"), "").unwrap();
        let kind = detector()
            .architecture_type(&paths(&["pkg/__init__.py"]), Some(dir.path()))
            .unwrap();
        assert_eq!(kind, ArchitectureType::Monolithic);
    }

    #[test]
    fn unreadable_root_is_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("gone");
        assert!(detector()
            .architecture_type(&paths(&["main.py"]), Some(&missing))
            .is_err());
    }

    #[test]
    fn module_organization_groups_top_level() {
        let modules =
            detector().module_organization(&paths(&["api/a.py", "api/b.py", "core/c.py", "x.py"]));
        assert_eq!(modules.len(), 2);
        assert_eq!(modules["api"], vec!["api/a.py", "api/b.py"]);
    }

    // ── conventions ────────────────────────────────────────────────

    #[test]
    fn primary_language_by_frequency() {
        let language = detector().primary_language(&paths(&["a.ts", "b.ts", "c.py"]));
        assert_eq!(language.as_deref(), Some("typescript"));
    }

    #[test]
    fn primary_language_tie_goes_to_first_declared() {
        let language = detector().primary_language(&paths(&["b.go", "a.py"]));
        assert_eq!(language.as_deref(), Some("python"));
    }

    #[test]
    fn primary_language_unknown_without_known_extensions() {
        assert_eq!(detector().primary_language(&paths(&["README", ".env"])), None);
    }

    #[test]
    fn substituted_language_table() {
        const ONLY_RUBY: &[(&str, &str)] = &[(".rb", "ruby")];
        let detector = PatternDetector::new(HeuristicTables {
            languages: ONLY_RUBY,
            ..HeuristicTables::default()
        });
        assert_eq!(
            detector.primary_language(&paths(&["a.rb", "b.py", "c.py"])).as_deref(),
            Some("ruby")
        );
    }

    #[test]
    fn snake_case_majority() {
        let naming = detector().naming_convention(&paths(&[
            "src/user_model.py",
            "src/api_routes.py",
            "src/db_utils.py",
            "web/main-page.js",
        ]));
        assert_eq!(naming, NamingConvention::SnakeCase);
    }

    #[test]
    fn kebab_case_majority() {
        let naming = detector().naming_convention(&paths(&["a-b.js", "c-d.js", "e_f.js"]));
        assert_eq!(naming, NamingConvention::KebabCase);
    }

    #[test]
    fn camel_case_majority() {
        let naming = detector().naming_convention(&paths(&["userModel.ts", "apiClient.ts"]));
        assert_eq!(naming, NamingConvention::CamelCase);
    }

    #[test]
    fn naming_tie_is_unknown() {
        let naming = detector().naming_convention(&paths(&["a_b.py", "c-d.py"]));
        assert_eq!(naming, NamingConvention::Unknown);
    }

    #[test]
    fn naming_without_signal_is_unknown() {
        let naming = detector().naming_convention(&paths(&["main.py", "app.py"]));
        assert_eq!(naming, NamingConvention::Unknown);
    }

    // ── dependency impact ──────────────────────────────────────────

    #[test]
    fn manifest_change_is_high_risk() {
        let impact =
            detector().dependency_impact(&paths(&["services/web/package.json", "src/app.js"]));
        assert_eq!(impact.modified_dependencies, vec!["services/web/package.json"]);
        assert_eq!(impact.breaking_changes_risk, RiskLevel::High);
    }

    #[test]
    fn source_change_is_low_risk() {
        let impact = detector().dependency_impact(&paths(&["src/app.js"]));
        assert!(impact.modified_dependencies.is_empty());
        assert_eq!(impact.breaking_changes_risk, RiskLevel::Low);
    }

    // ── code patterns ──────────────────────────────────────────────

    #[test]
    fn testing_framework_from_markers() {
        let framework = detector()
            .testing_framework(&paths(&["pyproject.toml", "tests/conftest.py"]))
            .unwrap();
        assert_eq!(framework.as_deref(), Some("pytest"));

        let framework = detector()
            .testing_framework(&paths(&["jest.config.ts", "src/a.test.ts"]))
            .unwrap();
        assert_eq!(framework.as_deref(), Some("jest"));
    }

    #[test]
    fn testing_framework_generic_fallback() {
        let framework = detector()
            .testing_framework(&paths(&["src/a.rs", "tests/integration.rs"]))
            .unwrap();
        assert_eq!(framework.as_deref(), Some("detected"));

        let framework = detector().testing_framework(&paths(&["src/a.rs"])).unwrap();
        assert_eq!(framework, None);
    }

    #[test]
    fn invalid_testing_marker_is_error() {
        const BROKEN: &[(&str, &str)] = &[("a[", "broken")];
        let detector = PatternDetector::new(HeuristicTables {
            testing_markers: BROKEN,
            ..HeuristicTables::default()
        });
        assert!(detector.testing_framework(&paths(&["a.py"])).is_err());
    }

    #[test]
    fn similar_implementations_share_basename() {
        let files = paths(&[
            "billing/client.py",
            "shipping/client.py",
            "shipping/__init__.py",
            "billing/__init__.py",
        ]);
        let similar = detector().similar_implementations(
            &paths(&["billing/client.py", "billing/__init__.py"]),
            &files,
        );
        assert_eq!(similar, vec!["shipping/client.py"]);
    }

    // ── path helpers ───────────────────────────────────────────────

    #[test]
    fn extension_helpers() {
        assert_eq!(extension("a/b.test.ts"), ".ts");
        assert_eq!(extension(".env"), "");
        assert_eq!(extension("a.b/c"), "");
        assert_eq!(strip_extension("a/b.py"), "a/b");
        assert_eq!(strip_extension("Makefile"), "Makefile");
    }
}

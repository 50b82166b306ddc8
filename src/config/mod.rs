//! Repository context configuration.
//!
//! Configuration is an explicit value handed to each component at
//! construction. It is read from `config.yaml` through the usual resolution
//! chain and then overlaid with `REPO_CONTEXT_*` environment variables.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::Settings;

/// Name of the configuration file inside a context directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Default context directory, relative to the working directory.
pub const DEFAULT_CONTEXT_DIR: &str = ".repo-context";

/// Repository context configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RepoContextConfig {
    /// Master switch for repository context analysis.
    pub repo_context_enabled: bool,

    /// Maximum number of repository files to list (0 = unlimited).
    pub repo_context_max_files: usize,

    /// Base directory for cached context records.
    pub repo_context_cache_dir: PathBuf,

    /// Whether formatted context is cached on disk.
    pub enable_repo_context_cache: bool,

    /// Maximum age of a cache record, in hours. Zero or less disables reads.
    pub repo_context_cache_ttl_hours: f64,

    /// Extra glob patterns excluded from the repository walk.
    pub repo_context_exclude: Vec<String>,

    /// Upper bound for a temporary shallow clone, in seconds.
    pub repo_context_clone_timeout_secs: u64,
}

impl Default for RepoContextConfig {
    fn default() -> Self {
        Self {
            repo_context_enabled: false,
            repo_context_max_files: 50,
            repo_context_cache_dir: default_cache_dir(),
            enable_repo_context_cache: true,
            repo_context_cache_ttl_hours: 24.0,
            repo_context_exclude: Vec::new(),
            repo_context_clone_timeout_secs: 120,
        }
    }
}

impl RepoContextConfig {
    /// Loads configuration for a context directory and applies environment
    /// overrides.
    pub fn load(context_dir: &Path) -> Result<Self> {
        let path = resolve_config_file(context_dir, CONFIG_FILE_NAME);
        let mut config = Self::load_from_path(&path)?;
        let settings = Settings::load().unwrap_or_else(|e| {
            debug!("Ignoring unreadable settings file: {e}");
            Settings::default()
        });
        config.apply_env_overrides(&settings)?;
        Ok(config)
    }

    /// Loads configuration from a YAML file; a missing file yields defaults.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Overlays `REPO_CONTEXT_*` variables (process env, then settings file).
    pub fn apply_env_overrides(&mut self, settings: &Settings) -> Result<()> {
        if let Some(value) = settings.get_env_var("REPO_CONTEXT_ENABLED") {
            self.repo_context_enabled = parse_bool("REPO_CONTEXT_ENABLED", &value)?;
        }
        if let Some(value) = settings.get_env_var("REPO_CONTEXT_MAX_FILES") {
            self.repo_context_max_files = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid REPO_CONTEXT_MAX_FILES: {value}"))?;
        }
        if let Some(value) = settings.get_env_var("REPO_CONTEXT_CACHE_DIR") {
            if !value.is_empty() {
                self.repo_context_cache_dir = PathBuf::from(value);
            }
        }
        if let Some(value) = settings.get_env_var("REPO_CONTEXT_CACHE") {
            self.enable_repo_context_cache = parse_bool("REPO_CONTEXT_CACHE", &value)?;
        }
        if let Some(value) = settings.get_env_var("REPO_CONTEXT_CACHE_TTL_HOURS") {
            self.repo_context_cache_ttl_hours = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid REPO_CONTEXT_CACHE_TTL_HOURS: {value}"))?;
        }
        Ok(())
    }
}

/// Returns `$HOME/.repo-context/cache`, or a relative fallback without a home.
fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".repo-context")
        .join("cache")
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("Invalid boolean for {key}: {other}"),
    }
}

/// Returns the XDG config directory for repo-context.
///
/// Reads `XDG_CONFIG_HOME` directly because `dirs::config_dir()` points at
/// `~/Library/Application Support/` on macOS.
fn xdg_config_dir() -> Option<PathBuf> {
    if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_home.is_empty() {
            return Some(PathBuf::from(xdg_home).join("repo-context"));
        }
    }

    dirs::home_dir().map(|home| home.join(".config").join("repo-context"))
}

/// Resolves a configuration file path.
///
/// Priority:
/// 1. `{dir}/local/{filename}` (local override)
/// 2. `{dir}/{filename}` (shared project config)
/// 3. `$XDG_CONFIG_HOME/repo-context/{filename}`
/// 4. `$HOME/.repo-context/{filename}`
pub fn resolve_config_file(dir: &Path, filename: &str) -> PathBuf {
    let local_path = dir.join("local").join(filename);
    if local_path.exists() {
        return local_path;
    }

    let project_path = dir.join(filename);
    if project_path.exists() {
        return project_path;
    }

    if let Some(xdg_dir) = xdg_config_dir() {
        let xdg_path = xdg_dir.join(filename);
        if xdg_path.exists() {
            return xdg_path;
        }
    }

    if let Some(home_dir) = dirs::home_dir() {
        let home_path = home_dir.join(".repo-context").join(filename);
        if home_path.exists() {
            return home_path;
        }
    }

    project_path
}

/// Resolves the context directory from an optional CLI override.
///
/// Priority: `override_dir`, then `REPO_CONTEXT_CONFIG_DIR`, then
/// `.repo-context`.
pub fn resolve_context_dir(override_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = override_dir {
        return dir.to_path_buf();
    }

    if let Ok(env_dir) = std::env::var("REPO_CONTEXT_CONFIG_DIR") {
        if !env_dir.is_empty() {
            return PathBuf::from(env_dir);
        }
    }

    PathBuf::from(DEFAULT_CONTEXT_DIR)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());

    fn settings_with(pairs: &[(&str, &str)]) -> Settings {
        Settings {
            env: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect::<HashMap<_, _>>(),
        }
    }

    #[test]
    fn defaults_match_documented_options() {
        let config = RepoContextConfig::default();
        assert!(!config.repo_context_enabled);
        assert_eq!(config.repo_context_max_files, 50);
        assert!(config.enable_repo_context_cache);
        assert!((config.repo_context_cache_ttl_hours - 24.0).abs() < f64::EPSILON);
        assert!(config.repo_context_cache_dir.ends_with(".repo-context/cache"));
    }

    #[test]
    fn missing_file_yields_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let config = RepoContextConfig::load_from_path(&dir.path().join("config.yaml"))?;
        assert_eq!(config, RepoContextConfig::default());
        Ok(())
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            "repo_context_enabled: true\nrepo_context_max_files: 0\nrepo_context_exclude:\n  - \"node_modules/**\"\n",
        )?;

        let config = RepoContextConfig::load_from_path(&path)?;
        assert!(config.repo_context_enabled);
        assert_eq!(config.repo_context_max_files, 0);
        assert_eq!(config.repo_context_exclude, vec!["node_modules/**"]);
        assert!(config.enable_repo_context_cache);
        Ok(())
    }

    #[test]
    fn malformed_yaml_is_error() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("config.yaml");
        fs::write(&path, "repo_context_max_files: [not, a, number]\n")?;
        assert!(RepoContextConfig::load_from_path(&path).is_err());
        Ok(())
    }

    #[test]
    fn settings_overrides_apply() -> Result<()> {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut config = RepoContextConfig::default();
        let settings = settings_with(&[
            ("REPO_CONTEXT_ENABLED", "true"),
            ("REPO_CONTEXT_MAX_FILES", "200"),
            ("REPO_CONTEXT_CACHE", "off"),
            ("REPO_CONTEXT_CACHE_TTL_HOURS", "0.5"),
            ("REPO_CONTEXT_CACHE_DIR", "/tmp/rc-cache"),
        ]);

        config.apply_env_overrides(&settings)?;
        assert!(config.repo_context_enabled);
        assert_eq!(config.repo_context_max_files, 200);
        assert!(!config.enable_repo_context_cache);
        assert!((config.repo_context_cache_ttl_hours - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.repo_context_cache_dir, PathBuf::from("/tmp/rc-cache"));
        Ok(())
    }

    #[test]
    fn invalid_override_is_error() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let mut config = RepoContextConfig::default();
        let settings = settings_with(&[("REPO_CONTEXT_ENABLED", "maybe")]);
        assert!(config.apply_env_overrides(&settings).is_err());
    }

    #[test]
    fn local_override_wins() -> Result<()> {
        let dir = TempDir::new()?;
        fs::create_dir_all(dir.path().join("local"))?;
        fs::write(dir.path().join("local").join(CONFIG_FILE_NAME), "")?;
        fs::write(dir.path().join(CONFIG_FILE_NAME), "")?;

        let resolved = resolve_config_file(dir.path(), CONFIG_FILE_NAME);
        assert_eq!(resolved, dir.path().join("local").join(CONFIG_FILE_NAME));
        Ok(())
    }

    #[test]
    fn context_dir_uses_override() {
        let _lock = ENV_MUTEX.lock().unwrap();
        let custom = PathBuf::from("custom-config");
        assert_eq!(resolve_context_dir(Some(&custom)), custom);
    }

    #[test]
    fn context_dir_env_var() {
        let _lock = ENV_MUTEX.lock().unwrap();
        std::env::set_var("REPO_CONTEXT_CONFIG_DIR", "/tmp/rc-config");
        let result = resolve_context_dir(None);
        std::env::remove_var("REPO_CONTEXT_CONFIG_DIR");
        assert_eq!(result, PathBuf::from("/tmp/rc-config"));
    }
}

//! Settings file support.
//!
//! Reads `$HOME/.repo-context/settings.json` and uses its `env` map as a
//! fallback for environment variables that are not set in the process.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Settings loaded from `$HOME/.repo-context/settings.json`.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Environment variable overrides.
    #[serde(default)]
    pub env: HashMap<String, String>,
}

impl Settings {
    /// Loads settings from the default location.
    pub fn load() -> Result<Self> {
        let settings_path = Self::get_settings_path()?;
        Self::load_from_path(&settings_path)
    }

    /// Loads settings from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        serde_json::from_str::<Settings>(&content)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    /// Returns the default settings path.
    pub fn get_settings_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to determine home directory")?;

        Ok(home_dir.join(".repo-context").join("settings.json"))
    }

    /// Returns an environment variable with fallback to settings.
    pub fn get_env_var(&self, key: &str) -> Option<String> {
        match env::var(key) {
            Ok(value) => Some(value),
            Err(_) => self.env.get(key).cloned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn settings_load_from_path() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(
            &settings_path,
            r#"{ "env": { "REPO_CONTEXT_TEST_MAX": "25" } }"#,
        )
        .unwrap();

        let settings = Settings::load_from_path(&settings_path).unwrap();
        assert_eq!(settings.env.get("REPO_CONTEXT_TEST_MAX").unwrap(), "25");
    }

    #[test]
    fn settings_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load_from_path(temp_dir.path().join("absent.json")).unwrap();
        assert!(settings.env.is_empty());
    }

    #[test]
    fn settings_malformed_file_is_error() {
        let temp_dir = TempDir::new().unwrap();
        let settings_path = temp_dir.path().join("settings.json");
        fs::write(&settings_path, "{ not json").unwrap();
        assert!(Settings::load_from_path(&settings_path).is_err());
    }

    #[test]
    fn settings_fallback_when_env_unset() {
        let mut env_map = HashMap::new();
        env_map.insert(
            "REPO_CONTEXT_SETTINGS_ONLY_KEY".to_string(),
            "from-settings".to_string(),
        );
        let settings = Settings { env: env_map };

        assert_eq!(
            settings.get_env_var("REPO_CONTEXT_SETTINGS_ONLY_KEY"),
            Some("from-settings".to_string())
        );
        assert_eq!(settings.get_env_var("REPO_CONTEXT_NOT_ANYWHERE"), None);
    }
}

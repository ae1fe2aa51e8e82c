//! Repository-level settings read from `.dotman.toml`.
pub mod toml_loader;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Name of the optional settings file at the repository root.
pub const SETTINGS_FILE: &str = ".dotman.toml";

/// Default name of the mapping file inside each module directory.
pub const DEFAULT_MAPPING_FILE: &str = "dotman";

/// Settings for a dotman repository.
///
/// ```toml
/// mapping_file = "dotman"
/// ignore = ["scratch", "archive"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// File name that marks a directory as a module.
    pub mapping_file: String,
    /// Module names skipped during discovery.
    pub ignore: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mapping_file: DEFAULT_MAPPING_FILE.to_string(),
            ignore: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from `<root>/.dotman.toml`, falling back to defaults
    /// when the file is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if `mapping_file` is empty.
    pub fn load(root: &Path) -> Result<Self> {
        let settings: Self = toml_loader::load_config(&root.join(SETTINGS_FILE))
            .with_context(|| format!("loading {SETTINGS_FILE}"))?;
        if settings.mapping_file.trim().is_empty() {
            anyhow::bail!("{SETTINGS_FILE}: mapping_file must not be empty");
        }
        Ok(settings)
    }

    /// Whether a module with this name should be skipped.
    #[must_use]
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore.iter().any(|n| n == name)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.mapping_file, "dotman");
    }

    #[test]
    fn reads_keys() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            "mapping_file = \"map\"\nignore = [\"old\"]\n",
        )
        .unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.mapping_file, "map");
        assert!(settings.is_ignored("old"));
        assert!(!settings.is_ignored("new"));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "ignore = [\"x\"]\n").unwrap();
        let settings = Settings::load(dir.path()).unwrap();
        assert_eq!(settings.mapping_file, "dotman");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "mapping = \"x\"\n").unwrap();
        assert!(Settings::load(dir.path()).is_err());
    }

    #[test]
    fn empty_mapping_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SETTINGS_FILE), "mapping_file = \" \"\n").unwrap();
        let err = Settings::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("mapping_file"));
    }
}

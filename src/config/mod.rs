//! Configuration for `inline-svg.toml`.
//!
//! # Sections
//!
//! | Section       | Purpose                                            |
//! |---------------|----------------------------------------------------|
//! | `[build]`     | Where `src` paths resolve and where pages are written |
//! | `[optimizer]` | Overrides merged over the default optimizer options |
//!
//! A missing config file is not an error: every field has a default.

mod error;
mod util;

pub use error::ConfigError;
pub use util::find_config_file;

use crate::log;
use crate::svg::OptionMap;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name.
pub const CONFIG_FILE: &str = "inline-svg.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing inline-svg.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InlineConfig {
    /// Absolute path to the config file, empty when none was found
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub build: BuildConfig,

    /// Optimizer overrides, passed through unchanged
    #[serde(default)]
    pub optimizer: OptionMap,
}

/// `[build]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Base directory for resolving `src` paths (default: working directory)
    #[serde(default)]
    pub root: Option<PathBuf>,

    /// Output directory (default: rewrite pages in place)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl InlineConfig {
    /// Load the config named `name`, searching upward from the working
    /// directory. Falls back to defaults when nothing is found.
    pub fn load(name: &Path) -> Result<Self, ConfigError> {
        match find_config_file(name) {
            Some(path) => Self::from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file path with unknown field detection.
    ///
    /// Values are not validated here; call [`Self::validate`] once command-line
    /// overrides are applied.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        config.config_path = path.to_path_buf();
        if let Some(base) = path.parent() {
            config.normalize_paths(base);
        }
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Unknown `[optimizer]` keys are legitimate; only other sections get here.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "ignoring unknown fields in {}: {}", display_path, fields.join(", "));
    }

    /// Resolve relative build paths against the config file's directory.
    fn normalize_paths(&mut self, base: &Path) {
        for path in [&mut self.build.root, &mut self.build.output]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }

    /// Check field values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(root) = &self.build.root
            && !root.is_dir()
        {
            return Err(ConfigError::Validation(format!(
                "build.root `{}` is not a directory",
                root.display()
            )));
        }
        Ok(())
    }

    /// Overrides to hand to the pipeline, `None` when the table is empty.
    pub fn overrides(&self) -> Option<&OptionMap> {
        (!self.optimizer.is_empty()).then_some(&self.optimizer)
    }

    /// Override the build section from command-line flags.
    pub fn apply_build_args(&mut self, root: Option<&Path>, output: Option<&Path>) {
        if let Some(root) = root {
            self.build.root = Some(root.to_path_buf());
        }
        if let Some(output) = output {
            self.build.output = Some(output.to_path_buf());
        }
    }
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_from_str_defaults() {
        let config = InlineConfig::from_str("").unwrap();
        assert!(config.build.root.is_none());
        assert!(config.build.output.is_none());
        assert!(config.overrides().is_none());
    }

    #[test]
    fn test_optimizer_table_keeps_order() {
        let config = InlineConfig::from_str(
            r#"
            [optimizer]
            removeDimensions = true
            cleanupNumericValues = { floatPrecision = 2 }
            prefixIds = "icon-"
            "#,
        )
        .unwrap();

        let keys: Vec<_> = config.optimizer.keys().map(String::as_str).collect();
        assert_eq!(keys, ["removeDimensions", "cleanupNumericValues", "prefixIds"]);
        assert_eq!(
            config.optimizer.get("cleanupNumericValues"),
            Some(&json!({ "floatPrecision": 2 }))
        );
    }

    #[test]
    fn test_from_path_resolves_relative_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("public")).unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[build]\nroot = \"public\"\noutput = \"dist\"\n").unwrap();

        let config = InlineConfig::from_path(&path).unwrap();
        assert_eq!(config.config_path, path);
        assert_eq!(config.build.root, Some(dir.path().join("public")));
        assert_eq!(config.build.output, Some(dir.path().join("dist")));
    }

    #[test]
    fn test_missing_root_fails_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[build]\nroot = \"nowhere\"\n").unwrap();

        let config = InlineConfig::from_path(&path).unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_invalid_toml() {
        let err = InlineConfig::from_str("[build\nroot =").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_unreadable_file() {
        let dir = TempDir::new().unwrap();
        let err = InlineConfig::from_path(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_build_args_override_before_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[build]\nroot = \"nowhere\"\n").unwrap();

        let mut config = InlineConfig::from_path(&path).unwrap();
        config.apply_build_args(Some(dir.path()), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_build_args() {
        let mut config = InlineConfig::default();
        config.apply_build_args(Some(Path::new("site")), None);
        assert_eq!(config.build.root, Some(PathBuf::from("site")));
        assert!(config.build.output.is_none());
    }
}

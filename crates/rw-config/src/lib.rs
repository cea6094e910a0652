//! Configuration management for RW bibliography processing.
//!
//! Parses the `[bibliography]` section of `rw.toml` with serde and provides
//! auto-discovery of config files in parent directories. Other sections of
//! the file are ignored.
//!
//! ```toml
//! [bibliography]
//! default_style = "Harvard"
//! ```
//!
//! Host overrides can be applied during load via [`ConfigOverrides`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `bibliography.default_style`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Host settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Override the default citation style.
    pub default_style: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "rw.toml";

/// Style used when neither the document nor the config names one.
///
/// Must name a built-in style of `rw-bibliography`.
pub const DEFAULT_STYLE: &str = "Harvard";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Bibliography processing configuration.
    pub bibliography: BibliographyConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Bibliography processing configuration.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BibliographyConfig {
    /// Citation style used when a reference list has no `style` attribute.
    pub default_style: String,
}

impl Default for BibliographyConfig {
    fn default() -> Self {
        Self {
            default_style: DEFAULT_STYLE.to_owned(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`bibliography.default_style`").
        field: String,
        /// Error message (e.g., "${`RW_STYLE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional host overrides.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `rw.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// Overrides are applied after loading and validated with the rest of
    /// the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or a value is invalid.
    pub fn load(
        config_path: Option<&Path>,
        overrides: Option<&ConfigOverrides>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(overrides) = overrides {
            config.apply_overrides(overrides);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text.
    ///
    /// Expands environment variables and validates the result.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply host overrides to the configuration.
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(default_style) = &overrides.default_style {
            self.bibliography.default_style.clone_from(default_style);
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_bibliography()
    }

    /// Validate bibliography configuration.
    fn validate_bibliography(&self) -> Result<(), ConfigError> {
        let style = &self.bibliography.default_style;
        require_non_empty(style, "bibliography.default_style")?;

        // Style names are matched exactly against registered names
        if style.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "bibliography.default_style cannot contain whitespace: '{style}'"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.bibliography.default_style = expand::expand_env(
            &self.bibliography.default_style,
            "bibliography.default_style",
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.bibliography.default_style, "Harvard");
        assert!(config.config_path.is_none());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.bibliography, BibliographyConfig::default());
    }

    #[test]
    fn test_parse_bibliography_config() {
        let toml = r#"
[bibliography]
default_style = "Chicago"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.bibliography.default_style, "Chicago");
    }

    #[test]
    fn test_unrelated_sections_ignored() {
        let toml = r#"
[server]
port = 9000

[bibliography]
default_style = "Harvard"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.bibliography.default_style, "Harvard");
    }

    #[test]
    fn test_parse_error() {
        let err = Config::from_toml_str("[bibliography\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_wrong_type_is_parse_error() {
        let err = Config::from_toml_str("[bibliography]\ndefault_style = 3\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_expand_env_vars_default_style() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("TEST_RW_BIB_STYLE", "Vancouver");
        }

        let toml = r#"
[bibliography]
default_style = "${TEST_RW_BIB_STYLE}"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.bibliography.default_style, "Vancouver");

        unsafe {
            std::env::remove_var("TEST_RW_BIB_STYLE");
        }
    }

    #[test]
    fn test_expand_env_vars_fallback() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("TEST_RW_BIB_STYLE_UNSET");
        }

        let toml = r#"
[bibliography]
default_style = "${TEST_RW_BIB_STYLE_UNSET:-Harvard}"
"#;
        let config = Config::from_toml_str(toml).unwrap();
        assert_eq!(config.bibliography.default_style, "Harvard");
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("MISSING_VAR_BIB_CONFIG_TEST");
        }

        let toml = r#"
[bibliography]
default_style = "${MISSING_VAR_BIB_CONFIG_TEST}"
"#;
        let err = Config::from_toml_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("MISSING_VAR_BIB_CONFIG_TEST"));
    }

    // Validation tests

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let result = config.validate();
        assert!(result.is_err(), "Expected validation to fail");
        let err = result.unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(
                msg.contains(s),
                "Expected error to contain '{s}', got: {msg}"
            );
        }
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_default_style_empty() {
        let mut config = Config::default();
        config.bibliography.default_style = String::new();
        assert_validation_error(&config, &["default_style", "empty"]);
    }

    #[test]
    fn test_validate_default_style_whitespace() {
        let mut config = Config::default();
        config.bibliography.default_style = "Harvard ".to_owned();
        assert_validation_error(&config, &["default_style", "whitespace"]);
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&ConfigOverrides {
            default_style: Some("Chicago".to_owned()),
        });
        assert_eq!(config.bibliography.default_style, "Chicago");
    }

    #[test]
    fn test_apply_overrides_empty() {
        let mut config = Config::default();
        config.apply_overrides(&ConfigOverrides::default());
        assert_eq!(config.bibliography.default_style, "Harvard");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[bibliography]\ndefault_style = \"Chicago\"\n").unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.bibliography.default_style, "Chicago");
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_explicit_path_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(ref p) if *p == path));
    }

    #[test]
    fn test_load_with_overrides_validated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rw.toml");
        std::fs::write(&path, "").unwrap();

        let overrides = ConfigOverrides {
            default_style: Some(String::new()),
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_load_invalid_file_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rw.toml");
        std::fs::write(&path, "[bibliography]\ndefault_style = \"\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs").join("chapter");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(dir.path().join(CONFIG_FILENAME))
        );
    }

    #[test]
    fn test_discover_config_prefers_nearest() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("docs");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        std::fs::write(nested.join(CONFIG_FILENAME), "").unwrap();

        assert_eq!(
            Config::discover_config(&nested),
            Some(nested.join(CONFIG_FILENAME))
        );
    }
}

//! Configuration loading, validation, and management for contentdef.
//!
//! Loads configuration from `~/.contentdef/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.contentdef/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Definition store configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Capability flags newly added types receive
    #[serde(default)]
    pub defaults: TypeDefaultsConfig,

    /// What happens to an alteration when an editor hook reports errors
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Technical name generation
    #[serde(default)]
    pub naming: NamingConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Definitions live only as long as the process
    Memory,
    /// Definitions persisted to a JSON file (default)
    #[default]
    File,
}

impl std::str::FromStr for StoreBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreBackend::Memory),
            "file" => Ok(StoreBackend::File),
            other => Err(ConfigError::ValidationError(format!(
                "unknown store backend '{other}' (expected \"memory\" or \"file\")"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,

    /// Definitions file; defaults to `~/.contentdef/definitions.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl StoreConfig {
    /// The configured definitions file, or the default location.
    pub fn resolved_path(&self) -> PathBuf {
        self.path
            .clone()
            .unwrap_or_else(|| AppConfig::config_dir().join("definitions.json"))
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            path: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDefaultsConfig {
    #[serde(default = "default_true")]
    pub creatable: bool,

    #[serde(default = "default_true")]
    pub draftable: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TypeDefaultsConfig {
    fn default() -> Self {
        Self {
            creatable: true,
            draftable: true,
        }
    }
}

/// Policy for alterations during which a hook recorded validation errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Commit anyway and hand the errors back to the caller (default)
    #[default]
    Commit,
    /// Abort the transaction the error was recorded in, and every enclosing one
    Reject,
}

impl std::str::FromStr for ValidationPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "commit" => Ok(ValidationPolicy::Commit),
            "reject" => Ok(ValidationPolicy::Reject),
            other => Err(ConfigError::ValidationError(format!(
                "unknown validation policy '{other}' (expected \"commit\" or \"reject\")"
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default)]
    pub policy: ValidationPolicy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    /// Maximum length of a generated technical name
    #[serde(default = "default_max_length")]
    pub max_length: usize,
}

fn default_max_length() -> usize {
    128
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            max_length: default_max_length(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.contentdef/config.toml).
    ///
    /// Environment overrides (highest priority):
    /// - `CONTENTDEF_STORE_BACKEND`
    /// - `CONTENTDEF_STORE_PATH`
    /// - `CONTENTDEF_VALIDATION_POLICY`
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(backend) = std::env::var("CONTENTDEF_STORE_BACKEND") {
            self.store.backend = backend.parse()?;
        }

        if let Ok(path) = std::env::var("CONTENTDEF_STORE_PATH") {
            self.store.path = Some(PathBuf::from(path));
        }

        if let Ok(policy) = std::env::var("CONTENTDEF_VALIDATION_POLICY") {
            self.validation.policy = policy.parse()?;
        }

        Ok(())
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".contentdef")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.naming.max_length == 0 {
            return Err(ConfigError::ValidationError(
                "naming.max_length must be > 0".into(),
            ));
        }

        if let Some(path) = &self.store.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "store.path must not be empty".into(),
                ));
            }
        }

        Ok(())
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.store.backend, StoreBackend::File);
        assert!(config.defaults.creatable);
        assert!(config.defaults.draftable);
        assert_eq!(config.validation.policy, ValidationPolicy::Commit);
        assert_eq!(config.naming.max_length, 128);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.store.backend, config.store.backend);
        assert_eq!(parsed.naming.max_length, config.naming.max_length);
    }

    #[test]
    fn zero_max_length_rejected() {
        let config = AppConfig {
            naming: NamingConfig { max_length: 0 },
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let result = AppConfig::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_ok());
        assert_eq!(result.unwrap().validation.policy, ValidationPolicy::Commit);
    }

    #[test]
    fn parses_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[store]
backend = "memory"

[defaults]
draftable = false

[validation]
policy = "reject"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert!(config.defaults.creatable);
        assert!(!config.defaults.draftable);
        assert_eq!(config.validation.policy, ValidationPolicy::Reject);
        assert_eq!(config.naming.max_length, 128);
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[validation]\npolicy = \"sometimes\"\n").unwrap();
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn policy_and_backend_from_str() {
        assert_eq!("Reject".parse::<ValidationPolicy>().unwrap(), ValidationPolicy::Reject);
        assert_eq!(" file ".parse::<StoreBackend>().unwrap(), StoreBackend::File);
        assert!("sql".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("[store]"));
        assert!(toml_str.contains("backend = \"file\""));
        assert!(toml_str.contains("policy = \"commit\""));
    }

    #[test]
    fn resolved_path_prefers_configured() {
        let store = StoreConfig {
            backend: StoreBackend::File,
            path: Some(PathBuf::from("/srv/defs.json")),
        };
        assert_eq!(store.resolved_path(), PathBuf::from("/srv/defs.json"));
        assert!(StoreConfig::default().resolved_path().ends_with("definitions.json"));
    }
}

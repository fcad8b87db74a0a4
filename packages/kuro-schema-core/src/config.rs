//! Tool configuration.
//!
//! Supports TOML config files, environment variable overrides, and defaults.

use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SchemaError};
use crate::inference::{DEFAULT_MAX_CANDIDATES, DEFAULT_SAMPLE_ROWS};

/// Configuration for inference and catalog persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Catalog file (default: "kurodlc_schema.json")
    pub catalog_path: PathBuf,
    /// Copy the previous catalog to `<catalog>.backup` before saving (default: true)
    pub backup_on_save: bool,
    /// Non-null values sampled per column during inference (default: 20)
    pub sample_rows: usize,
    /// Maximum candidate layouts kept per table (default: 10)
    pub max_candidates: usize,
    /// Maximum retry attempts for transient I/O errors (default: 3)
    pub io_max_retries: u32,
    /// Delay between retry attempts in milliseconds (default: 100)
    pub io_retry_delay_ms: u64,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("kurodlc_schema.json"),
            backup_on_save: true,
            sample_rows: DEFAULT_SAMPLE_ROWS,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            io_max_retries: 3,
            io_retry_delay_ms: 100,
        }
    }
}

impl ToolConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| SchemaError::ConfigError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        toml::from_str(toml_str).map_err(|e| SchemaError::ConfigError(format!("Invalid TOML: {}", e)))
    }

    /// Saves the configuration to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| SchemaError::ConfigError(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path.as_ref(), toml)
            .map_err(|e| SchemaError::ConfigError(format!("Failed to write config file: {}", e)))?;
        Ok(())
    }

    /// Applies environment variable overrides.
    ///
    /// Variables are prefixed with `KURO_SCHEMA_`, e.g.
    /// `KURO_SCHEMA_CATALOG=/path` overrides `catalog_path`.
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|name| env::var(name).ok())
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("KURO_SCHEMA_CATALOG") {
            self.catalog_path = PathBuf::from(val);
        }
        if let Some(val) = lookup("KURO_SCHEMA_BACKUP") {
            self.backup_on_save = val
                .parse()
                .map_err(|_| SchemaError::ConfigError(format!("Invalid backup_on_save: {}", val)))?;
        }
        if let Some(val) = lookup("KURO_SCHEMA_SAMPLE_ROWS") {
            self.sample_rows = val
                .parse()
                .map_err(|_| SchemaError::ConfigError(format!("Invalid sample_rows: {}", val)))?;
        }
        if let Some(val) = lookup("KURO_SCHEMA_MAX_CANDIDATES") {
            self.max_candidates = val.parse().map_err(|_| {
                SchemaError::ConfigError(format!("Invalid max_candidates: {}", val))
            })?;
        }
        Ok(())
    }

    /// Validates the configuration values.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rows == 0 {
            return Err(SchemaError::ConfigError(
                "sample_rows must be greater than 0".into(),
            ));
        }
        if self.max_candidates == 0 {
            return Err(SchemaError::ConfigError(
                "max_candidates must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ntest::timeout;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[timeout(1000)]
    #[test]
    fn test_defaults() {
        let config = ToolConfig::default();
        assert_eq!(config.catalog_path, PathBuf::from("kurodlc_schema.json"));
        assert!(config.backup_on_save);
        assert_eq!(config.sample_rows, 20);
        assert_eq!(config.max_candidates, 10);
        assert!(config.validate().is_ok());
    }

    #[timeout(1000)]
    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ToolConfig::from_toml("catalog_path = \"schemas/kuro.json\"\nmax_candidates = 4\n")
            .unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("schemas/kuro.json"));
        assert_eq!(config.max_candidates, 4);
        assert_eq!(config.sample_rows, 20);
    }

    #[timeout(1000)]
    #[test]
    fn test_invalid_toml() {
        let err = ToolConfig::from_toml("sample_rows = \"many\"").unwrap_err();
        assert!(matches!(err, SchemaError::ConfigError(_)));
    }

    #[timeout(1000)]
    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("kuro-schema.toml");
        let config = ToolConfig {
            backup_on_save: false,
            sample_rows: 5,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();
        assert_eq!(ToolConfig::from_file(&path).unwrap(), config);
    }

    #[timeout(1000)]
    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("KURO_SCHEMA_CATALOG", "/tmp/catalog.json"),
            ("KURO_SCHEMA_BACKUP", "false"),
            ("KURO_SCHEMA_SAMPLE_ROWS", "7"),
        ]
        .into_iter()
        .collect();
        let mut config = ToolConfig::default();
        config
            .apply_overrides(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(config.catalog_path, PathBuf::from("/tmp/catalog.json"));
        assert!(!config.backup_on_save);
        assert_eq!(config.sample_rows, 7);
        assert_eq!(config.max_candidates, 10);

        let err = config
            .apply_overrides(|name| (name == "KURO_SCHEMA_MAX_CANDIDATES").then(|| "x".to_string()))
            .unwrap_err();
        assert!(matches!(err, SchemaError::ConfigError(_)));
    }

    #[timeout(1000)]
    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = ToolConfig {
            sample_rows: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = ToolConfig {
            max_candidates: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}

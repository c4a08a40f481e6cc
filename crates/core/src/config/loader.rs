//! Configuration file loading

use super::schema::ConfigSchema;
use crate::error::{Error, ErrorCode, Result};
use std::path::{Path, PathBuf};

/// Configuration wrapper
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub schema: ConfigSchema,
    pub path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from a file path or use defaults
    ///
    /// An explicit path must exist. Without one, the standard locations
    /// are searched and defaults are used if none exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) if !p.exists() => return Err(Error::config_not_found(p)),
            Some(p) => Some(p.to_path_buf()),
            None => find_config_file(),
        };

        let schema = match config_path {
            Some(ref p) => load_config_file(p)?,
            None => ConfigSchema::default(),
        };

        let config = Self {
            schema,
            path: config_path,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        let config = Self {
            schema: toml::from_str(content)?,
            path: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges that the schema types cannot express
    pub fn validate(&self) -> Result<()> {
        let schema = &self.schema;

        if schema.scan.display_cap == 0 {
            return Err(Error::new(
                ErrorCode::ConfigValidationError,
                "scan.display_cap must be at least 1",
            ));
        }

        if schema.normalizer.candidate_min_len >= schema.normalizer.candidate_max_len {
            return Err(Error::new(
                ErrorCode::ConfigValidationError,
                format!(
                    "normalizer.candidate_min_len ({}) must be below candidate_max_len ({})",
                    schema.normalizer.candidate_min_len, schema.normalizer.candidate_max_len
                ),
            ));
        }

        Ok(())
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let mut candidates = vec![PathBuf::from(".mydna.toml"), PathBuf::from("mydna.toml")];

    if let Some(dir) = dirs::config_dir() {
        candidates.push(dir.join("mydna").join("config.toml"));
    }

    candidates.into_iter().find(|candidate| candidate.exists())
}

/// Load and parse a TOML configuration file
fn load_config_file(path: &Path) -> Result<ConfigSchema> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("Failed to read config file {}: {}", path.display(), e))
            .with_source(e)
    })?;

    toml::from_str(&content).map_err(|e| {
        Error::new(
            ErrorCode::ConfigParseError,
            format!("Failed to parse config file {}: {}", path.display(), e),
        )
        .with_source(e)
    })
}

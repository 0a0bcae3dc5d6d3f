//! Executor configuration via `ftkit.toml`
//!
//! Everything has a default, so an empty file (or no file at all) gives the
//! stock RediSearch command names.

use ftkit_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file name looked up by applications that keep one.
pub const CONFIG_FILE_NAME: &str = "ftkit.toml";

fn default_create_command() -> String {
    "FT.CREATE".to_string()
}

fn default_aggregate_command() -> String {
    "FT.AGGREGATE".to_string()
}

fn default_cursor_command() -> String {
    "FT.CURSOR".to_string()
}

/// Executor configuration.
///
/// # Example
///
/// ```toml
/// create_command = "FT.CREATE"
/// aggregate_command = "FT.AGGREGATE"
/// cursor_command = "FT.CURSOR"
/// default_dialect = 2
/// log_commands = false
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Command name for index creation
    #[serde(default = "default_create_command")]
    pub create_command: String,
    /// Command name for aggregations
    #[serde(default = "default_aggregate_command")]
    pub aggregate_command: String,
    /// Command name for cursor reads
    #[serde(default = "default_cursor_command")]
    pub cursor_command: String,
    /// Dialect appended to aggregations that do not set one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_dialect: Option<u32>,
    /// Log every outgoing command line at `info`
    #[serde(default)]
    pub log_commands: bool,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            create_command: default_create_command(),
            aggregate_command: default_aggregate_command(),
            cursor_command: default_cursor_command(),
            default_dialect: None,
            log_commands: false,
        }
    }
}

impl ExecutorConfig {
    /// Parse config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the text is not valid TOML for this
    /// struct or fails validation.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: ExecutorConfig = toml::from_str(content).map_err(|e| Error::Config {
            reason: format!("failed to parse config: {}", e),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            reason: format!("failed to read config file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| Error::Config {
            reason: format!("failed to serialize config: {}", e),
        })?;
        std::fs::write(path, content).map_err(|e| Error::Config {
            reason: format!("failed to write config file '{}': {}", path.display(), e),
        })
    }

    /// Check values the engine would reject.
    pub fn validate(&self) -> Result<()> {
        let names = [
            ("create_command", &self.create_command),
            ("aggregate_command", &self.aggregate_command),
            ("cursor_command", &self.cursor_command),
        ];
        if let Some((key, _)) = names.iter().find(|(_, name)| name.trim().is_empty()) {
            return Err(Error::Config {
                reason: format!("{} must not be empty", key),
            });
        }
        if self.default_dialect == Some(0) {
            return Err(Error::Config {
                reason: "default_dialect starts at 1".to_string(),
            });
        }
        Ok(())
    }
}

//! Shell configuration
//!
//! One JSON document configures the router, the host bridge, lazy module
//! loading and logging. Every section is optional.

use crosswing_host_bridge::HostBridgeConfig;
use crosswing_lazy::LazyConfig;
use crosswing_router::RouterConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Config file error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON for this schema
    #[error("Config parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Result type for configuration loading
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level shell configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShellConfig {
    /// Router settings
    pub router: RouterConfig,

    /// Host bridge settings
    pub host_bridge: HostBridgeConfig,

    /// Defaults for lazy modules
    pub lazy: LazyConfig,

    /// Default `tracing` filter when `RUST_LOG` is unset
    pub log_filter: String,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            router: RouterConfig::default(),
            host_bridge: HostBridgeConfig::default(),
            lazy: LazyConfig::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl ShellConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ShellConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check values the shell cannot use
    pub fn validate(&self) -> Result<()> {
        self.router
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.lazy.timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "lazy.timeoutMs must be greater than zero".to_string(),
            ));
        }
        if self
            .host_bridge
            .allowed_schemes
            .iter()
            .any(|s| s.is_empty() || s.contains(':'))
        {
            return Err(ConfigError::Invalid(
                "hostBridge.allowedSchemes entries must be bare scheme names".to_string(),
            ));
        }
        Ok(())
    }
}

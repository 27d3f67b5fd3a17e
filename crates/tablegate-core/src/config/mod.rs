//! Configuration types for Tablegate.
//!
//! # Configuration Files
//!
//! - **gateway.yaml** (optional): process-level settings, currently only the
//!   location of the table filter file
//! - **table_filters.yaml**: the `included_tables` allow-list of glob patterns
//!
//! The gateway settings can also come from the environment
//! (`PINOT_TABLE_FILTER_FILE`), which is how the query gateway is usually
//! deployed.

pub mod filter;

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use filter::FilterConfig;

/// Environment variable naming the table filter file.
pub const TABLE_FILTER_FILE_ENV: &str = "PINOT_TABLE_FILTER_FILE";

/// Process-level settings consumed by the authorization layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Path to the table filter file. `None` disables filtering.
    #[serde(default)]
    pub table_filter_file: Option<PathBuf>,
}

impl GatewayConfig {
    /// Build the settings from the process environment.
    ///
    /// An unset or blank `PINOT_TABLE_FILTER_FILE` leaves filtering disabled.
    pub fn from_env() -> Self {
        let table_filter_file = env::var_os(TABLE_FILTER_FILE_ENV)
            .filter(|v| !v.to_string_lossy().trim().is_empty())
            .map(PathBuf::from);

        Self { table_filter_file }
    }

    /// Load gateway settings from a YAML file.
    ///
    /// A relative `table_filter_file` is resolved against the directory that
    /// contains the gateway file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = read_config_file(path)?;
        let mut config = Self::from_yaml(&content)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(filter_file) = &config.table_filter_file {
            if filter_file.is_relative() {
                config.table_filter_file = Some(base_dir.join(filter_file));
            }
        }

        Ok(config)
    }

    /// Parse gateway settings from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if is_blank_document(content) {
            return Ok(Self::default());
        }
        let parsed: Option<Self> = serde_yaml::from_str(content)?;
        Ok(parsed.unwrap_or_default())
    }

    /// Load the table filter this process should enforce.
    ///
    /// Returns the allow-all configuration when no filter file is configured.
    /// A configured file that does not exist is an error: the caller must not
    /// fall back to allow-all in that case.
    pub fn load_filter(&self) -> Result<FilterConfig, ConfigError> {
        match &self.table_filter_file {
            Some(path) => FilterConfig::load(path),
            None => {
                tracing::warn!("no table filter file configured; all tables are allowed");
                Ok(FilterConfig::default())
            }
        }
    }
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configured file does not exist or cannot be read.
    #[error("configuration file not found or unreadable: {}: {source}", .path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl ConfigError {
    /// True when the error means a configured file is missing or unreadable.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::FileNotFound { .. })
    }
}

/// Read a configuration file. Any failure to read a configured path is
/// reported as [`ConfigError::FileNotFound`].
pub(crate) fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })
}

/// True for documents with nothing but whitespace and `#` comments.
pub(crate) fn is_blank_document(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

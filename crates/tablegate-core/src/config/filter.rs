//! Table filter configuration (`included_tables`).

use super::{is_blank_document, read_config_file, ConfigError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Allow-list of table-name glob patterns.
///
/// An empty list disables filtering entirely: every table is allowed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Glob patterns (`*`, `?`) a table name must match to be reachable.
    /// Order is kept for diagnostics only.
    #[serde(default, deserialize_with = "deserialize_patterns")]
    pub included_tables: Vec<String>,
}

impl FilterConfig {
    /// Build a filter configuration from in-memory patterns.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            included_tables: patterns.into_iter().map(Into::into).collect(),
        }
    }

    /// Load the filter file at `path`.
    ///
    /// A missing or unreadable file is reported as
    /// [`ConfigError::FileNotFound`]. An empty
    /// file, or one without `included_tables`, yields the allow-all filter.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = read_config_file(path)?;
        let config = Self::from_yaml(&content)?;

        tracing::info!(
            path = %path.display(),
            patterns = config.included_tables.len(),
            "loaded table filter configuration"
        );
        if config.is_allow_all() {
            tracing::warn!(
                path = %path.display(),
                "table filter file has no included_tables; all tables are allowed"
            );
        }

        Ok(config)
    }

    /// Parse a filter configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        if is_blank_document(content) {
            return Ok(Self::default());
        }

        let parsed: Option<Self> = serde_yaml::from_str(content)?;
        let config = parsed.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// True when no patterns are configured.
    pub fn is_allow_all(&self) -> bool {
        self.included_tables.is_empty()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(idx) = self
            .included_tables
            .iter()
            .position(|p| p.trim().is_empty())
        {
            return Err(ConfigError::Config(format!(
                "included_tables[{}] is an empty pattern",
                idx
            )));
        }
        Ok(())
    }
}

/// `included_tables: ~` is treated like a missing key.
fn deserialize_patterns<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let patterns: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(patterns.unwrap_or_default())
}

//! CLI command implementations for Tablegate.

pub mod access;
pub mod check;
pub mod filter;
pub mod tool;

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tablegate_core::GatewayConfig;
use tablegate_mcp::AuthorizationGate;

/// Outcome of a command that completed without a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Allowed,
    Denied,
}

impl Outcome {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Outcome::Allowed => ExitCode::SUCCESS,
            Outcome::Denied => ExitCode::from(1),
        }
    }
}

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Optional gateway YAML file.
    pub config: Option<PathBuf>,
    /// Filter file; overrides the one named in `config`.
    pub filter_file: Option<PathBuf>,
    /// Print machine-readable JSON instead of text.
    pub json: bool,
}

impl Settings {
    /// Resolve the gateway settings from the CLI flags.
    pub fn gateway_config(&self) -> Result<GatewayConfig> {
        let mut config = match &self.config {
            Some(path) => GatewayConfig::from_file(path)
                .with_context(|| format!("Failed to load gateway config from {:?}", path))?,
            None => GatewayConfig::default(),
        };

        if let Some(filter_file) = &self.filter_file {
            config.table_filter_file = Some(filter_file.clone());
        }
        Ok(config)
    }

    /// Build the gate. A configured but missing filter file is an error.
    pub fn gate(&self) -> Result<AuthorizationGate> {
        let config = self.gateway_config()?;
        tracing::debug!(filter_file = ?config.table_filter_file, "building authorization gate");
        AuthorizationGate::from_gateway_config(&config).context("Failed to load table filter")
    }
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Settings;
    use std::fs;
    use tempfile::TempDir;

    /// Settings pointing at a fresh filter file holding `yaml`.
    pub fn settings_with_filter(yaml: &str) -> (TempDir, Settings) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("table_filter.yaml");
        fs::write(&path, yaml).unwrap();
        let settings = Settings {
            config: None,
            filter_file: Some(path),
            json: false,
        };
        (dir, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_filter_flag_overrides_gateway_file() {
        let dir = tempdir().unwrap();
        let gateway = dir.path().join("gateway.yaml");
        fs::write(&gateway, "table_filter_file: filters.yaml\n").unwrap();

        let settings = Settings {
            config: Some(gateway),
            filter_file: None,
            json: false,
        };
        assert_eq!(
            settings.gateway_config().unwrap().table_filter_file,
            Some(dir.path().join("filters.yaml"))
        );

        let settings = Settings {
            filter_file: Some(PathBuf::from("/etc/override.yaml")),
            ..settings
        };
        assert_eq!(
            settings.gateway_config().unwrap().table_filter_file,
            Some(PathBuf::from("/etc/override.yaml"))
        );
    }

    #[test]
    fn test_missing_filter_file_fails() {
        let dir = tempdir().unwrap();
        let settings = Settings {
            config: None,
            filter_file: Some(dir.path().join("absent.yaml")),
            json: false,
        };
        let err = settings.gate().unwrap_err();
        assert!(format!("{err:#}").contains("configuration file not found"));
    }
}

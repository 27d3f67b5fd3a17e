//! `tablegate check-config` command implementation.
//!
//! Loads the configured filter the same way the gateway does at startup and
//! prints the effective policy. A configured file that does not exist is an
//! error here too.

use super::{print_json, Outcome, Settings};
use anyhow::{Context, Result};
use serde::Serialize;
use tablegate_mcp::AuthorizationGate;

/// Effective filter policy.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyReport {
    pub filter_file: Option<String>,
    pub allow_all: bool,
    pub patterns: Vec<String>,
}

pub fn report(settings: &Settings) -> Result<PolicyReport> {
    let config = settings.gateway_config()?;
    let gate = AuthorizationGate::from_gateway_config(&config)
        .context("Failed to load table filter")?;

    Ok(PolicyReport {
        filter_file: config
            .table_filter_file
            .as_ref()
            .map(|p| p.display().to_string()),
        allow_all: gate.filter().is_allow_all(),
        patterns: gate.filter().pattern_list(),
    })
}

pub fn run(settings: &Settings) -> Result<Outcome> {
    let report = report(settings)?;

    if settings.json {
        print_json(&report)?;
        return Ok(Outcome::Allowed);
    }

    println!("✔ Table filter configuration is valid");
    match &report.filter_file {
        Some(path) => println!("   File: {}", path),
        None => println!("   File: (not configured)"),
    }
    if report.allow_all {
        println!("   Mode: allow-all (no patterns configured)");
    } else {
        println!("   Patterns ({}):", report.patterns.len());
        for pattern in &report.patterns {
            println!("     - {}", pattern);
        }
    }

    Ok(Outcome::Allowed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::settings_with_filter;

    #[test]
    fn test_report_lists_patterns_in_order() {
        let (_dir, settings) = settings_with_filter("included_tables:\n  - prod_*\n  - dim_country\n");
        let report = report(&settings).unwrap();
        assert!(!report.allow_all);
        assert_eq!(report.patterns, vec!["prod_*", "dim_country"]);
        assert!(report.filter_file.unwrap().ends_with("table_filter.yaml"));
    }

    #[test]
    fn test_empty_file_reports_allow_all() {
        let (_dir, settings) = settings_with_filter("# nothing here\n");
        let report = report(&settings).unwrap();
        assert!(report.allow_all);
        assert!(report.patterns.is_empty());
    }

    #[test]
    fn test_unconfigured_reports_allow_all() {
        let report = report(&Settings::default()).unwrap();
        assert!(report.allow_all);
        assert_eq!(report.filter_file, None);
    }
}

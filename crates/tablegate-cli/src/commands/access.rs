//! `tablegate query`, `tablegate table` and `tablegate schema`.
//!
//! Run one authorization check and print the decision. Exit status reflects
//! the decision.

use super::{join_or_none, print_json, Outcome, Settings};
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::{self, Read};
use tablegate_mcp::AuthorizationDecision;
use tablegate_sql::TableExtractor;

/// Decision for a SQL query, with what the extractor saw.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReport {
    pub tables: Vec<String>,
    pub extraction: String,
    #[serde(flatten)]
    pub decision: AuthorizationDecision,
}

/// Read SQL from the argument, or from stdin when it is `-`.
fn read_sql(sql: &str) -> Result<String> {
    if sql != "-" {
        return Ok(sql.to_string());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("Failed to read SQL from stdin")?;
    Ok(buf)
}

pub fn query_report(settings: &Settings, sql: &str) -> Result<QueryReport> {
    let gate = settings.gate()?;
    let (tables, method) = TableExtractor::new().extract_with_method(sql);
    let decision = gate.authorize_query(sql);

    Ok(QueryReport {
        tables: tables.into_vec(),
        extraction: method.to_string(),
        decision,
    })
}

pub fn query(settings: &Settings, sql: &str) -> Result<Outcome> {
    let sql = read_sql(sql)?;
    let report = query_report(settings, &sql)?;

    if settings.json {
        print_json(&report)?;
    } else {
        println!("Tables ({}): {}", report.extraction, join_or_none(&report.tables));
        print_decision(&report.decision);
    }
    Ok(outcome(&report.decision))
}

pub fn table(settings: &Settings, name: &str) -> Result<Outcome> {
    let decision = settings.gate()?.authorize_table_access(name);
    finish(settings, &decision)
}

pub fn schema(settings: &Settings, name: &str) -> Result<Outcome> {
    let decision = settings.gate()?.authorize_schema_access(name);
    finish(settings, &decision)
}

fn finish(settings: &Settings, decision: &AuthorizationDecision) -> Result<Outcome> {
    if settings.json {
        print_json(decision)?;
    } else {
        print_decision(decision);
    }
    Ok(outcome(decision))
}

fn print_decision(decision: &AuthorizationDecision) {
    match decision.message() {
        None => println!("✔ allowed"),
        Some(message) => println!("✖ {}", message),
    }
}

fn outcome(decision: &AuthorizationDecision) -> Outcome {
    if decision.is_allowed() {
        Outcome::Allowed
    } else {
        Outcome::Denied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::settings_with_filter;

    #[test]
    fn test_query_report_denied() {
        let (_dir, settings) = settings_with_filter("included_tables: [allowed_table, \"prod_*\"]\n");
        let report = query_report(
            &settings,
            "SELECT * FROM allowed_table JOIN other_table ON allowed_table.id = other_table.id",
        )
        .unwrap();

        assert_eq!(report.tables, vec!["allowed_table", "other_table"]);
        assert_eq!(report.extraction, "parsed");
        assert!(!report.decision.allowed);
        assert_eq!(report.decision.denied_names, vec!["other_table"]);
        assert_eq!(outcome(&report.decision), Outcome::Denied);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["deniedNames"], serde_json::json!(["other_table"]));
    }

    #[test]
    fn test_table_and_schema_outcomes() {
        let (_dir, settings) = settings_with_filter("included_tables: [\"prod_*\"]\n");
        assert_eq!(table(&settings, "prod_orders").unwrap(), Outcome::Allowed);
        assert_eq!(table(&settings, "test_tmp").unwrap(), Outcome::Denied);
        assert_eq!(schema(&settings, "prod_orders").unwrap(), Outcome::Allowed);
    }
}

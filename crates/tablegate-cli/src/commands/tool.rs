//! `tablegate tool` - classify and authorize one MCP tool call offline.
//!
//! Prints what the gateway would do with the call: forward it, or answer
//! with the tool error an agent would receive.

use super::{print_json, Outcome, Settings};
use anyhow::{Context, Result};
use serde_json::{json, Value};
use tablegate_mcp::{CallToolResponse, GateError, ToolRequest};

/// Outer error: bad `--args` or configuration. Inner: the gate's verdict.
pub fn evaluate(
    settings: &Settings,
    name: &str,
    args: &str,
) -> Result<Result<Option<ToolRequest>, GateError>> {
    let arguments: Value =
        serde_json::from_str(args).with_context(|| format!("--args is not valid JSON: {}", args))?;
    let gate = settings.gate()?;
    Ok(gate.authorize_tool_call(name, &arguments))
}

pub fn run(settings: &Settings, name: &str, args: &str) -> Result<Outcome> {
    match evaluate(settings, name, args)? {
        Ok(request) => {
            if settings.json {
                print_json(&json!({
                    "tool": name,
                    "allowed": true,
                    "request": describe(request.as_ref()),
                }))?;
            } else {
                println!("✔ {} allowed ({})", name, describe(request.as_ref()));
                if matches!(request, Some(ToolRequest::Listing)) {
                    println!("   Listing output will be filtered");
                }
            }
            Ok(Outcome::Allowed)
        }
        Err(err) => {
            let response = CallToolResponse::from_gate_error(&err);
            if settings.json {
                print_json(&response)?;
            } else {
                println!("✖ {} rejected", name);
                println!("   {}", err);
            }
            Ok(Outcome::Denied)
        }
    }
}

fn describe(request: Option<&ToolRequest>) -> String {
    match request {
        None => "no table scope".to_string(),
        Some(ToolRequest::Query { .. }) => "query".to_string(),
        Some(ToolRequest::Table { table }) => format!("table {}", table),
        Some(ToolRequest::Schema { schema }) => format!("schema {}", schema),
        Some(ToolRequest::Listing) => "listing".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::settings_with_filter;

    #[test]
    fn test_tool_call_decisions() {
        let (_dir, settings) = settings_with_filter("included_tables: [\"prod_*\"]\n");

        let allowed = evaluate(&settings, "get-schema", r#"{"schemaName": "prod_orders"}"#).unwrap();
        assert_eq!(
            allowed.unwrap(),
            Some(ToolRequest::Schema {
                schema: "prod_orders".to_string()
            })
        );

        let denied = evaluate(&settings, "read-query", r#"{"query": "SELECT * FROM secret"}"#)
            .unwrap()
            .unwrap_err();
        assert!(denied.is_unauthorized());

        assert_eq!(
            run(&settings, "drop-table", "{}").unwrap(),
            Outcome::Denied
        );
    }

    #[test]
    fn test_invalid_args_json_is_an_error() {
        let (_dir, settings) = settings_with_filter("included_tables: [\"prod_*\"]\n");
        assert!(evaluate(&settings, "read-query", "{not json").is_err());
    }
}

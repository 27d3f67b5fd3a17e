//! The authorization gate.
//!
//! Sits in front of the query engine. The dispatch layer asks the gate
//! before running SQL or a single-table/schema operation, and passes table
//! listings through [`AuthorizationGate::filter_table_list`] before returning
//! them. Every check is a pure, synchronous computation over the
//! configuration captured at construction.

use crate::decision::AuthorizationDecision;
use crate::error::GateError;
use crate::request::ToolRequest;
use serde_json::Value;
use std::sync::Arc;
use tablegate_core::{FilterConfig, GatewayConfig};
use tablegate_policy::FilterSet;
use tablegate_sql::TableExtractor;

/// Table-scoped authorization for gateway requests.
///
/// Cheap to clone; clones share the same compiled filter.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    filter: Arc<FilterSet>,
    extractor: TableExtractor,
}

impl AuthorizationGate {
    /// Create a gate over an already compiled filter.
    pub fn new(filter: FilterSet) -> Self {
        Self {
            filter: Arc::new(filter),
            extractor: TableExtractor::new(),
        }
    }

    /// A gate that allows everything.
    pub fn allow_all() -> Self {
        Self::new(FilterSet::allow_all())
    }

    /// Compile the patterns of a loaded filter configuration.
    pub fn from_config(config: &FilterConfig) -> Result<Self, GateError> {
        Ok(Self::new(FilterSet::from_config(config)?))
    }

    /// Load the filter file named by the gateway settings and build the gate.
    ///
    /// Fails when the settings name a file that does not exist; callers must
    /// treat that as fatal.
    pub fn from_gateway_config(config: &GatewayConfig) -> Result<Self, GateError> {
        let filter = config.load_filter()?;
        Self::from_config(&filter)
    }

    /// The compiled allow-list.
    pub fn filter(&self) -> &FilterSet {
        &self.filter
    }

    /// True when no patterns are configured.
    pub fn is_filtering_enabled(&self) -> bool {
        !self.filter.is_allow_all()
    }

    /// Authorize raw SQL text. Every referenced table must be allowed; all
    /// failing names are reported, not just the first.
    pub fn authorize_query(&self, sql: &str) -> AuthorizationDecision {
        if self.filter.is_allow_all() {
            return AuthorizationDecision::allow(self.filter.pattern_list());
        }

        let tables = self.extractor.extract(sql);
        let denied: Vec<String> = tables
            .iter()
            .filter(|name| !self.filter.is_allowed(name))
            .map(str::to_string)
            .collect();

        let decision = AuthorizationDecision::from_denied(denied, self.filter.pattern_list());
        if decision.allowed {
            tracing::debug!(tables = %tables, "query allowed");
        } else {
            tracing::warn!(
                tables = %tables,
                denied = ?decision.denied_names,
                "query references unauthorized tables"
            );
        }
        decision
    }

    /// Authorize a metadata operation on one table.
    pub fn authorize_table_access(&self, table: &str) -> AuthorizationDecision {
        self.authorize_name("table", table)
    }

    /// Authorize an operation on one schema.
    pub fn authorize_schema_access(&self, schema: &str) -> AuthorizationDecision {
        self.authorize_name("schema", schema)
    }

    fn authorize_name(&self, kind: &'static str, name: &str) -> AuthorizationDecision {
        if self.filter.is_allowed(name) {
            return AuthorizationDecision::allow(self.filter.pattern_list());
        }

        tracing::warn!(kind, name, "access to unauthorized name rejected");
        AuthorizationDecision::from_denied(vec![name.to_string()], self.filter.pattern_list())
    }

    /// Keep only allowed names, in their original order.
    ///
    /// Listing is informational, so this filters silently instead of
    /// rejecting.
    pub fn filter_table_list<S: AsRef<str>>(&self, names: &[S]) -> Vec<String> {
        let kept: Vec<String> = names
            .iter()
            .map(AsRef::as_ref)
            .filter(|name| self.filter.is_allowed(name))
            .map(str::to_string)
            .collect();

        if kept.len() != names.len() {
            tracing::debug!(
                total = names.len(),
                visible = kept.len(),
                "filtered table listing"
            );
        }
        kept
    }

    /// Filter an engine listing response.
    ///
    /// Accepts either `{"tables": [...]}` or a bare array of names. Non-string
    /// entries are dropped when filtering is enabled; other shapes pass
    /// through unchanged.
    pub fn filter_listing(&self, listing: &Value) -> Value {
        if self.filter.is_allow_all() {
            return listing.clone();
        }

        match listing {
            Value::Array(items) => Value::Array(self.filter_values(items)),
            Value::Object(map) => {
                let mut map = map.clone();
                if let Some(Value::Array(items)) = map.get("tables") {
                    let kept = self.filter_values(items);
                    map.insert("tables".to_string(), Value::Array(kept));
                }
                Value::Object(map)
            }
            other => other.clone(),
        }
    }

    fn filter_values(&self, items: &[Value]) -> Vec<Value> {
        items
            .iter()
            .filter(|item| item.as_str().is_some_and(|name| self.filter.is_allowed(name)))
            .cloned()
            .collect()
    }

    /// Route a classified request to the matching check.
    ///
    /// Listings are always admitted here; filter the engine's answer with
    /// [`Self::filter_table_list`] or [`Self::filter_listing`].
    pub fn authorize(&self, request: &ToolRequest) -> Result<(), GateError> {
        match request {
            ToolRequest::Query { sql } => self.authorize_query(sql).into_result(),
            ToolRequest::Table { table } => self.authorize_table_access(table).into_result(),
            ToolRequest::Schema { schema } => self.authorize_schema_access(schema).into_result(),
            ToolRequest::Listing => Ok(()),
        }
    }

    /// Classify and authorize a tool call in one step.
    ///
    /// Returns the classified request (`None` for tools without table scope)
    /// so the caller knows whether a listing needs filtering afterwards.
    pub fn authorize_tool_call(
        &self,
        name: &str,
        arguments: &Value,
    ) -> Result<Option<ToolRequest>, GateError> {
        let request = ToolRequest::from_tool_call(name, arguments)?;
        if let Some(request) = &request {
            self.authorize(request)?;
        }
        Ok(request)
    }
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::allow_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gate(patterns: &[&str]) -> AuthorizationGate {
        AuthorizationGate::new(FilterSet::from_patterns(patterns).unwrap())
    }

    #[test]
    fn test_denial_reports_unauthorized_join_side() {
        let gate = gate(&["allowed_table", "prod_*"]);
        let decision = gate.authorize_query(
            "SELECT * FROM allowed_table JOIN other_table ON allowed_table.id = other_table.id",
        );
        assert!(!decision.allowed);
        assert_eq!(decision.denied_names, vec!["other_table"]);
        assert_eq!(decision.allowed_patterns, vec!["allowed_table", "prod_*"]);
        assert_eq!(
            decision.message().as_deref(),
            Some(
                "Query references unauthorized tables: other_table. Allowed tables: allowed_table, prod_*."
            )
        );
    }

    #[test]
    fn test_all_denied_names_collected() {
        let gate = gate(&["prod_*"]);
        let decision = gate.authorize_query(
            "SELECT * FROM prod_a, secret_b WHERE x IN (SELECT x FROM secret_c)",
        );
        assert_eq!(decision.denied_names, vec!["secret_b", "secret_c"]);
    }

    #[test]
    fn test_same_named_cte_cannot_hide_real_table() {
        let gate = gate(&["prod_*"]);
        for sql in [
            "SELECT * FROM secret WHERE id IN (WITH secret AS (SELECT 1 AS id) SELECT id FROM secret)",
            "SELECT * FROM secret WHERE id IN (WITH secret AS (SELECT 1 AS id) SELECT id FROM secret) OPTION(timeoutMs=1)",
            "WITH secret AS (SELECT * FROM secret) SELECT * FROM secret",
            "WITH secret AS (SELECT 1) SELECT * FROM secret; SELECT * FROM secret",
        ] {
            let decision = gate.authorize_query(sql);
            assert!(!decision.allowed, "{sql}");
            assert_eq!(decision.denied_names, vec!["secret"], "{sql}");
        }
    }

    #[test]
    fn test_allowed_query() {
        let gate = gate(&["prod_*"]);
        let decision = gate.authorize_query(
            "WITH recent AS (SELECT * FROM prod_orders) SELECT * FROM recent JOIN prod_users u ON 1 = 1",
        );
        assert!(decision.allowed);
        assert!(decision.denied_names.is_empty());
    }

    #[test]
    fn test_decisions_snapshot_configured_patterns() {
        let gate = gate(&["allowed_table", "prod_*"]);
        let expected = vec!["allowed_table".to_string(), "prod_*".to_string()];
        for decision in [
            gate.authorize_query("SELECT * FROM prod_orders"),
            gate.authorize_query("SELECT * FROM other_table"),
            gate.authorize_table_access("allowed_table"),
            gate.authorize_schema_access("dev_x"),
        ] {
            assert_eq!(decision.allowed_patterns, expected);
        }

        let open = AuthorizationGate::allow_all();
        assert_eq!(
            open.authorize_query("SELECT * FROM t").allowed_patterns,
            open.authorize_table_access("t").allowed_patterns
        );
    }

    #[test]
    fn test_allow_all_gate_skips_extraction() {
        let gate = AuthorizationGate::allow_all();
        assert!(!gate.is_filtering_enabled());
        assert!(gate.authorize_query("SELECT * FROM anything").allowed);
        assert!(gate.authorize_table_access("anything").allowed);
        assert!(gate.authorize_schema_access("anything").allowed);
    }

    #[test]
    fn test_table_and_schema_access() {
        let gate = gate(&["prod_*"]);
        assert!(gate.authorize_table_access("prod_orders").allowed);
        let denied = gate.authorize_table_access("test_tmp");
        assert_eq!(denied.denied_names, vec!["test_tmp"]);
        assert!(gate.authorize_schema_access("prod_orders").allowed);
        assert!(!gate.authorize_schema_access("orders").allowed);
    }

    #[test]
    fn test_listing_keeps_order() {
        let gate = gate(&["prod_*"]);
        assert_eq!(
            gate.filter_table_list(&["prod_orders", "prod_users", "test_tmp"]),
            vec!["prod_orders", "prod_users"]
        );
        assert_eq!(
            gate.filter_table_list(&["zeta_prod", "prod_z", "prod_a"]),
            vec!["prod_z", "prod_a"]
        );
    }

    #[test]
    fn test_filter_listing_response_shapes() {
        let gate = gate(&["prod_*"]);
        assert_eq!(
            gate.filter_listing(&json!({"tables": ["prod_orders", "test_tmp"], "count": 2})),
            json!({"tables": ["prod_orders"], "count": 2})
        );
        assert_eq!(
            gate.filter_listing(&json!(["test_tmp", "prod_users", 7])),
            json!(["prod_users"])
        );
        assert_eq!(gate.filter_listing(&json!("opaque")), json!("opaque"));
    }

    #[test]
    fn test_dispatch_by_request_variant() {
        let gate = gate(&["prod_*"]);
        assert!(gate
            .authorize(&ToolRequest::Query {
                sql: "SELECT * FROM prod_x".to_string()
            })
            .is_ok());
        assert!(gate
            .authorize(&ToolRequest::Table {
                table: "dev_x".to_string()
            })
            .unwrap_err()
            .is_unauthorized());
        assert!(gate
            .authorize(&ToolRequest::Schema {
                schema: "dev_x".to_string()
            })
            .is_err());
        assert!(gate.authorize(&ToolRequest::Listing).is_ok());
    }
}

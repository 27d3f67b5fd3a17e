//! # tablegate-mcp
//!
//! Table-scoped authorization for the query gateway's MCP tools.
//!
//! The gateway exposes an analytics engine to AI agents through MCP tools.
//! This crate decides, before a tool runs, whether the tables it touches are
//! on the configured allow-list:
//!
//! - **Query tools**: table names are extracted from the SQL text and every
//!   one must match a pattern
//! - **Table and schema tools**: the single named table or schema is checked
//! - **Listing tools**: always run; their output is filtered afterwards
//!
//! ## Architecture
//!
//! ```text
//! AI Agent
//!       │
//!       │ MCP call tool (name, arguments)
//!       ▼
//! ┌──────────────────────┐
//! │  AuthorizationGate   │
//! │  1. Classify call    │  ← request::GatewayTool
//! │  2. Extract tables   │  ← tablegate-sql
//! │  3. Match patterns   │  ← tablegate-policy
//! │  4. Allow or reject  │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!      Query engine
//! ```
//!
//! A rejection is returned to the agent as a tool error naming the denied
//! tables and the allowed patterns, see [`CallToolResponse::from_gate_error`].
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use tablegate_mcp::AuthorizationGate;
//! use tablegate_policy::FilterSet;
//!
//! let gate = AuthorizationGate::new(FilterSet::from_patterns(&["prod_*"]).unwrap());
//!
//! let ok = gate.authorize_tool_call("read-query", &json!({"query": "SELECT * FROM prod_orders"}));
//! assert!(ok.is_ok());
//!
//! let err = gate
//!     .authorize_tool_call("table-details", &json!({"tableName": "test_tmp"}))
//!     .unwrap_err();
//! assert!(err.is_unauthorized());
//! ```

pub mod decision;
pub mod error;
pub mod gate;
pub mod protocol;
pub mod request;

pub use decision::AuthorizationDecision;
pub use error::{unauthorized_message, GateError};
pub use gate::AuthorizationGate;
pub use protocol::{CallToolResponse, ToolContent};
pub use request::{GatewayTool, ToolRequest};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthorizationGate>();
    }
}

//! MCP tool-result types used to report gate rejections.
//!
//! A rejected call is answered with a normal tool result flagged `isError`,
//! never with a transport-level failure, so the server keeps serving.

use crate::error::GateError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Call tool response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolResponse {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

/// Tool response content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "json")]
    Json { json: Value },
}

impl CallToolResponse {
    /// Error result with a plain message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text {
                text: format!("Error: {}", message.into()),
            }],
            is_error: Some(true),
        }
    }

    /// Error result for a gate failure.
    ///
    /// Denials also carry the denied names and configured patterns as JSON
    /// so clients can act on them without parsing the message.
    pub fn from_gate_error(err: &GateError) -> Self {
        let mut response = Self::error(err.to_string());
        if let GateError::UnauthorizedTableReference {
            denied,
            allowed_patterns,
        } = err
        {
            response.content.push(ToolContent::Json {
                json: json!({
                    "deniedTables": denied,
                    "allowedTables": allowed_patterns,
                }),
            });
        }
        response
    }

    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }
}

impl From<&GateError> for CallToolResponse {
    fn from(err: &GateError) -> Self {
        Self::from_gate_error(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_denial_response_carries_details() {
        let err = GateError::UnauthorizedTableReference {
            denied: vec!["other_table".to_string()],
            allowed_patterns: vec!["prod_*".to_string()],
        };
        let response = CallToolResponse::from(&err);
        assert!(response.is_error());

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["isError"], true);
        assert_eq!(value["content"][0]["type"], "text");
        assert_eq!(
            value["content"][0]["text"],
            "Error: Query references unauthorized tables: other_table. Allowed tables: prod_*."
        );
        assert_eq!(value["content"][1]["type"], "json");
        assert_eq!(value["content"][1]["json"]["deniedTables"], json!(["other_table"]));
        assert_eq!(value["content"][1]["json"]["allowedTables"], json!(["prod_*"]));
    }

    #[test]
    fn test_other_errors_are_text_only() {
        let err = GateError::ToolNotFound {
            name: "nope".to_string(),
        };
        let response = CallToolResponse::from_gate_error(&err);
        assert_eq!(response.content.len(), 1);
        assert!(response.is_error());
    }
}

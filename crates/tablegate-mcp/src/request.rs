//! Classification of gateway tool calls into authorization requests.
//!
//! Every tool the query gateway exposes falls into one of four shapes: it
//! runs SQL text, names one table, names one schema, or lists tables. The
//! `test-connection` tool touches no table and needs no check.

use crate::error::GateError;
use serde_json::Value;

/// What a tool call needs authorized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolRequest {
    /// Raw SQL text to be executed.
    Query { sql: String },
    /// Metadata operation on a single table.
    Table { table: String },
    /// Operation on a single schema.
    Schema { schema: String },
    /// Table listing; filtered after the engine answers.
    Listing,
}

/// Tools exposed by the query gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayTool {
    TestConnection,
    ReadQuery,
    ListTables,
    TableDetails,
    SegmentList,
    IndexColumnDetails,
    SegmentMetadataDetails,
    TableConfigSchemaDetails,
    CreateSchema,
    UpdateSchema,
    GetSchema,
    CreateTableConfig,
    UpdateTableConfig,
    GetTableConfig,
}

impl GatewayTool {
    pub const ALL: [GatewayTool; 14] = [
        GatewayTool::TestConnection,
        GatewayTool::ReadQuery,
        GatewayTool::ListTables,
        GatewayTool::TableDetails,
        GatewayTool::SegmentList,
        GatewayTool::IndexColumnDetails,
        GatewayTool::SegmentMetadataDetails,
        GatewayTool::TableConfigSchemaDetails,
        GatewayTool::CreateSchema,
        GatewayTool::UpdateSchema,
        GatewayTool::GetSchema,
        GatewayTool::CreateTableConfig,
        GatewayTool::UpdateTableConfig,
        GatewayTool::GetTableConfig,
    ];

    /// Wire name of the tool.
    pub fn name(self) -> &'static str {
        match self {
            GatewayTool::TestConnection => "test-connection",
            GatewayTool::ReadQuery => "read-query",
            GatewayTool::ListTables => "list-tables",
            GatewayTool::TableDetails => "table-details",
            GatewayTool::SegmentList => "segment-list",
            GatewayTool::IndexColumnDetails => "index-column-details",
            GatewayTool::SegmentMetadataDetails => "segment-metadata-details",
            GatewayTool::TableConfigSchemaDetails => "tableconfig-schema-details",
            GatewayTool::CreateSchema => "create-schema",
            GatewayTool::UpdateSchema => "update-schema",
            GatewayTool::GetSchema => "get-schema",
            GatewayTool::CreateTableConfig => "create-table-config",
            GatewayTool::UpdateTableConfig => "update-table-config",
            GatewayTool::GetTableConfig => "get-table-config",
        }
    }

    /// Look a tool up by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.name() == name)
    }

    /// Build the authorization request for a call of this tool.
    ///
    /// Returns `Ok(None)` for tools that reference no table.
    pub fn request(self, arguments: &Value) -> Result<Option<ToolRequest>, GateError> {
        let tool = self.name();
        let request = match self {
            GatewayTool::TestConnection => return Ok(None),
            GatewayTool::ListTables => ToolRequest::Listing,
            GatewayTool::ReadQuery => ToolRequest::Query {
                sql: required_str(tool, arguments, "query")?.to_string(),
            },
            GatewayTool::TableDetails
            | GatewayTool::SegmentList
            | GatewayTool::IndexColumnDetails
            | GatewayTool::SegmentMetadataDetails
            | GatewayTool::TableConfigSchemaDetails
            | GatewayTool::UpdateTableConfig
            | GatewayTool::GetTableConfig => ToolRequest::Table {
                table: required_str(tool, arguments, "tableName")?.to_string(),
            },
            GatewayTool::CreateTableConfig => ToolRequest::Table {
                table: embedded_name(tool, arguments, "tableConfigJson", "tableName")?,
            },
            GatewayTool::GetSchema | GatewayTool::UpdateSchema => ToolRequest::Schema {
                schema: required_str(tool, arguments, "schemaName")?.to_string(),
            },
            GatewayTool::CreateSchema => ToolRequest::Schema {
                schema: embedded_name(tool, arguments, "schemaJson", "schemaName")?,
            },
        };
        Ok(Some(request))
    }
}

impl ToolRequest {
    /// Classify a tool call by name and arguments.
    ///
    /// Unknown tools and malformed arguments are errors, so a call that
    /// cannot be classified is never forwarded unchecked.
    pub fn from_tool_call(name: &str, arguments: &Value) -> Result<Option<Self>, GateError> {
        let tool = GatewayTool::from_name(name).ok_or_else(|| GateError::ToolNotFound {
            name: name.to_string(),
        })?;
        tool.request(arguments)
    }
}

fn required_str<'a>(tool: &str, arguments: &'a Value, key: &str) -> Result<&'a str, GateError> {
    match arguments.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.as_str()),
        Some(Value::String(_)) => Err(GateError::invalid_arguments(
            tool,
            format!("'{}' must not be empty", key),
        )),
        Some(_) => Err(GateError::invalid_arguments(
            tool,
            format!("'{}' must be a string", key),
        )),
        None => Err(GateError::invalid_arguments(
            tool,
            format!("missing required argument '{}'", key),
        )),
    }
}

/// Read `field` out of a JSON document passed as a string argument, e.g. the
/// `schemaName` inside `schemaJson`.
fn embedded_name(tool: &str, arguments: &Value, key: &str, field: &str) -> Result<String, GateError> {
    let raw = required_str(tool, arguments, key)?;
    let document: Value = serde_json::from_str(raw).map_err(|e| {
        GateError::invalid_arguments(tool, format!("'{}' is not valid JSON: {}", key, e))
    })?;

    match document.get(field) {
        Some(Value::String(name)) if !name.trim().is_empty() => Ok(name.clone()),
        _ => Err(GateError::invalid_arguments(
            tool,
            format!("'{}' has no '{}' string field", key, field),
        )),
    }
}

//! Error types for the gate crate.

use tablegate_core::ConfigError;
use tablegate_policy::PatternError;
use thiserror::Error;

/// Errors raised by the authorization gate.
///
/// `Config` and `Pattern` only occur while building the gate at startup and
/// are fatal. The others are per-request and are turned into tool errors.
#[derive(Debug, Error)]
pub enum GateError {
    /// The request names tables outside the allow-list.
    #[error("{}", unauthorized_message(.denied, .allowed_patterns))]
    UnauthorizedTableReference {
        denied: Vec<String>,
        allowed_patterns: Vec<String>,
    },

    /// Tool not found.
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Invalid arguments for tool.
    #[error("invalid arguments for tool {tool}: {reason}")]
    InvalidArguments { tool: String, reason: String },

    /// Filter configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A configured pattern could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

impl GateError {
    pub(crate) fn invalid_arguments(tool: &str, reason: impl Into<String>) -> Self {
        GateError::InvalidArguments {
            tool: tool.to_string(),
            reason: reason.into(),
        }
    }

    /// True for policy rejections (as opposed to malformed requests or
    /// startup failures).
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, GateError::UnauthorizedTableReference { .. })
    }

    /// True for errors that must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, GateError::Config(_) | GateError::Pattern(_))
    }
}

/// `Query references unauthorized tables: a, b. Allowed tables: p1, p2.`
pub fn unauthorized_message(denied: &[String], allowed_patterns: &[String]) -> String {
    format!(
        "Query references unauthorized tables: {}. Allowed tables: {}.",
        denied.join(", "),
        allowed_patterns.join(", ")
    )
}

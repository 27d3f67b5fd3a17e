//! Authorization decisions.

use crate::error::{unauthorized_message, GateError};
use serde::{Deserialize, Serialize};

/// Result of one authorization check.
///
/// Carries everything a caller needs to build an actionable rejection: the
/// names that failed and the configured patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationDecision {
    pub allowed: bool,
    /// Names that matched no pattern, sorted. Empty when allowed.
    pub denied_names: Vec<String>,
    /// Configured patterns in configuration order.
    pub allowed_patterns: Vec<String>,
}

impl AuthorizationDecision {
    pub fn allow(allowed_patterns: Vec<String>) -> Self {
        Self {
            allowed: true,
            denied_names: Vec::new(),
            allowed_patterns,
        }
    }

    /// Build a decision from the names that failed. No failures means allowed.
    pub fn from_denied(denied_names: Vec<String>, allowed_patterns: Vec<String>) -> Self {
        Self {
            allowed: denied_names.is_empty(),
            denied_names,
            allowed_patterns,
        }
    }

    pub fn is_allowed(&self) -> bool {
        self.allowed
    }

    /// Human-readable rejection message, `None` when allowed.
    pub fn message(&self) -> Option<String> {
        (!self.allowed).then(|| unauthorized_message(&self.denied_names, &self.allowed_patterns))
    }

    /// Convert into `Ok(())` or an `UnauthorizedTableReference` error.
    pub fn into_result(self) -> Result<(), GateError> {
        if self.allowed {
            Ok(())
        } else {
            Err(GateError::UnauthorizedTableReference {
                denied: self.denied_names,
                allowed_patterns: self.allowed_patterns,
            })
        }
    }
}

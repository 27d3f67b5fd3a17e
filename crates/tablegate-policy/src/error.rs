//! Error types for the policy crate.

use thiserror::Error;

/// Errors raised while compiling glob patterns.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The translated pattern was rejected by the regex engine.
    #[error("invalid table pattern '{pattern}': {source}")]
    Invalid {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

//! Error types for the SQL crate.

use thiserror::Error;

/// Errors that can occur while extracting table references.
///
/// None of these reach callers of [`crate::TableExtractor`]: an ambiguous
/// query is re-scanned lexically, which over-reports rather than drops names.
#[derive(Debug, Error)]
pub enum SqlError {
    /// The structured parser could not make sense of the query.
    #[error("ambiguous SQL, structured parse failed: {0}")]
    Ambiguous(String),
}

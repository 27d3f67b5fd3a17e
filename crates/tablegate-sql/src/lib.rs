//! # tablegate-sql
//!
//! Table-reference extraction for Tablegate.
//!
//! Given raw SQL text, this crate answers one question: which tables would
//! the query touch? It is not a validator and does not look at columns.
//!
//! ## How It Works
//!
//! 1. Comments are stripped so commented-out references are never seen.
//! 2. The text is parsed with `sqlparser`; every relation in the AST is
//!    collected except references to a CTE that is in scope at that point.
//! 3. If parsing fails, a lexical scan over `FROM` / `JOIN` clauses takes
//!    over. It errs towards reporting too many names rather than too few.
//!
//! | SQL | Extracted |
//! |-----|-----------|
//! | `SELECT * FROM a JOIN b ON a.id = b.id` | `a`, `b` |
//! | `SELECT * FROM (SELECT * FROM inner_t) AS x` | `inner_t` |
//! | `WITH c AS (SELECT * FROM t) SELECT * FROM c` | `t` |
//! | `SELECT * FROM "db"."events"` | `db.events` |

pub mod comments;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod references;
pub mod scanner;

pub use comments::strip_comments;
pub use error::SqlError;
pub use parser::SqlAnalyzer;
pub use references::TableReferenceSet;
pub use scanner::scan_tables;

/// How a reference set was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMethod {
    /// Full parse with `sqlparser`.
    Parsed,
    /// Lexical fallback after the parser gave up.
    Lexical,
}

impl ExtractionMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            ExtractionMethod::Parsed => "parsed",
            ExtractionMethod::Lexical => "lexical",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extracts the set of tables a SQL text references.
///
/// Stateless apart from the parser dialect; safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct TableExtractor {
    analyzer: SqlAnalyzer,
}

impl TableExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract table names from `sql`.
    pub fn extract(&self, sql: &str) -> TableReferenceSet {
        self.extract_with_method(sql).0
    }

    /// Extract table names and report which strategy produced them.
    pub fn extract_with_method(&self, sql: &str) -> (TableReferenceSet, ExtractionMethod) {
        let stripped = strip_comments(sql);

        match self.analyzer.extract_tables(&stripped) {
            Ok(tables) => (tables, ExtractionMethod::Parsed),
            Err(err) => {
                tracing::debug!(error = %err, "falling back to lexical table scan");
                (scan_tables(&stripped), ExtractionMethod::Lexical)
            }
        }
    }
}

/// Extract table names from `sql` with a default [`TableExtractor`].
pub fn extract_table_names(sql: &str) -> TableReferenceSet {
    TableExtractor::new().extract(sql)
}

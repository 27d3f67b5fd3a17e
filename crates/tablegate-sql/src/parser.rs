//! Structured table extraction with `sqlparser`.

use crate::error::SqlError;
use crate::lexer::normalize_qualified_name;
use crate::references::TableReferenceSet;
use sqlparser::ast::{Expr, ObjectName, Query, Statement, TableFactor, Visit, Visitor};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::Parser;
use std::fmt;
use std::ops::ControlFlow;

/// Analyzes SQL statements to extract the tables they read.
///
/// Uses the generic dialect, which accepts both double-quoted and backtick
/// identifiers.
pub struct SqlAnalyzer {
    dialect: GenericDialect,
}

impl Clone for SqlAnalyzer {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl Default for SqlAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SqlAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlAnalyzer").finish_non_exhaustive()
    }
}

impl SqlAnalyzer {
    /// Create a new SQL analyzer.
    pub fn new() -> Self {
        Self {
            dialect: GenericDialect {},
        }
    }

    /// Parse a SQL string into statements.
    pub fn parse(&self, sql: &str) -> Result<Vec<Statement>, SqlError> {
        Parser::parse_sql(&self.dialect, sql).map_err(|e| SqlError::Ambiguous(e.to_string()))
    }

    /// Parse `sql` and collect every relation it references. References to
    /// a CTE in scope are not relations.
    pub fn extract_tables(&self, sql: &str) -> Result<TableReferenceSet, SqlError> {
        let statements = self.parse(sql)?;
        Ok(self.extract_from_statements(&statements))
    }

    /// Collect relations from already parsed statements.
    pub fn extract_from_statements(&self, statements: &[Statement]) -> TableReferenceSet {
        let mut collector = RelationCollector::default();
        for statement in statements {
            let _ = statement.visit(&mut collector);
        }
        collector.finish()
    }
}

/// Walks the AST; every `TableFactor::Table` name (including names inside
/// subqueries, derived tables, set operations and CTE bodies) is a relation,
/// and so is the name of a table-valued function.
///
/// A single-part name is dropped only when a CTE of an enclosing query binds
/// it at that point: CTEs are visible to later CTE bodies and to the query
/// body, never to their own body unless the `WITH` is `RECURSIVE`.
#[derive(Default)]
struct RelationCollector {
    tables: TableReferenceSet,
    scopes: Vec<CteScope>,
}

/// CTEs defined by one query, in definition order.
struct CteScope {
    names: Vec<String>,
    recursive: bool,
    /// Immediate child queries already visited. `WITH` is visited before
    /// anything else, so the first `names.len()` children are the CTE bodies.
    closed: usize,
}

impl CteScope {
    fn binds(&self, name: &str) -> bool {
        let defined = self.closed.min(self.names.len());
        let visible = if self.recursive && defined < self.names.len() {
            defined + 1
        } else {
            defined
        };
        self.names[..visible].iter().any(|cte| cte == name)
    }
}

impl RelationCollector {
    fn finish(self) -> TableReferenceSet {
        self.tables
    }

    fn is_cte(&self, name: &str) -> bool {
        self.scopes.iter().any(|scope| scope.binds(name))
    }

    fn collect(&mut self, name: &ObjectName) {
        let name = normalize_qualified_name(&name.to_string());
        if !self.is_cte(&name) {
            self.tables.insert(name);
        }
    }
}

impl Visitor for RelationCollector {
    type Break = ();

    fn pre_visit_query(&mut self, query: &Query) -> ControlFlow<Self::Break> {
        let (names, recursive) = match &query.with {
            Some(with) => (
                with.cte_tables
                    .iter()
                    .map(|cte| cte.alias.name.value.clone())
                    .collect(),
                with.recursive,
            ),
            None => (Vec::new(), false),
        };
        self.scopes.push(CteScope {
            names,
            recursive,
            closed: 0,
        });
        ControlFlow::Continue(())
    }

    fn post_visit_query(&mut self, _query: &Query) -> ControlFlow<Self::Break> {
        self.scopes.pop();
        if let Some(parent) = self.scopes.last_mut() {
            parent.closed += 1;
        }
        ControlFlow::Continue(())
    }

    fn pre_visit_relation(&mut self, relation: &ObjectName) -> ControlFlow<Self::Break> {
        self.collect(relation);
        ControlFlow::Continue(())
    }

    fn pre_visit_table_factor(&mut self, table_factor: &TableFactor) -> ControlFlow<Self::Break> {
        match table_factor {
            TableFactor::Function { name, .. } => self.collect(name),
            TableFactor::TableFunction {
                expr: Expr::Function(function),
                ..
            } => self.collect(&function.name),
            TableFactor::UNNEST { .. } => {
                self.tables.insert("unnest");
            }
            _ => {}
        }
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(sql: &str) -> Vec<String> {
        SqlAnalyzer::new().extract_tables(sql).unwrap().into_vec()
    }

    #[test]
    fn test_parse_simple_select() {
        assert_eq!(extract("SELECT * FROM users"), vec!["users"]);
    }

    #[test]
    fn test_parse_join_aliases_dropped() {
        assert_eq!(
            extract("SELECT * FROM orders o JOIN users AS u ON o.user_id = u.id"),
            vec!["orders", "users"]
        );
    }

    #[test]
    fn test_cte_excluded() {
        assert_eq!(
            extract("WITH cte1 AS (SELECT * FROM real_table) SELECT * FROM cte1"),
            vec!["real_table"]
        );
    }

    #[test]
    fn test_cte_inside_subquery_does_not_hide_outer_table() {
        assert_eq!(
            extract(
                "SELECT * FROM secret WHERE id IN \
                 (WITH secret AS (SELECT 1 AS id) SELECT id FROM secret)"
            ),
            vec!["secret"]
        );
    }

    #[test]
    fn test_cte_body_reading_same_named_table() {
        assert_eq!(
            extract("WITH secret AS (SELECT * FROM secret) SELECT * FROM secret"),
            vec!["secret"]
        );
    }

    #[test]
    fn test_cte_does_not_leak_into_next_statement() {
        assert_eq!(
            extract("WITH secret AS (SELECT 1) SELECT * FROM secret; SELECT * FROM secret"),
            vec!["secret"]
        );
    }

    #[test]
    fn test_earlier_cte_visible_to_later_cte_body() {
        assert_eq!(
            extract(
                "WITH a AS (SELECT * FROM base), b AS (SELECT * FROM a) \
                 SELECT * FROM b JOIN db.a ON 1 = 1"
            ),
            vec!["base", "db.a"]
        );
    }

    #[test]
    fn test_recursive_cte_binds_inside_own_body() {
        assert!(extract(
            "WITH RECURSIVE r AS (SELECT 1 AS n UNION ALL SELECT n + 1 FROM r) SELECT * FROM r"
        )
        .is_empty());
    }

    #[test]
    fn test_table_functions_are_over_reported() {
        assert_eq!(extract("SELECT * FROM unnest(arr) AS u"), vec!["unnest"]);
        assert_eq!(
            extract("SELECT * FROM prod_a CROSS JOIN LATERAL secret_fn(prod_a.x) f"),
            vec!["prod_a", "secret_fn"]
        );
        assert_eq!(
            extract("SELECT * FROM prod_a JOIN TABLE(secret_fn(1)) t ON 1 = 1"),
            vec!["prod_a", "secret_fn"]
        );
    }

    #[test]
    fn test_subquery_in_where_and_projection() {
        let sql = "SELECT (SELECT MAX(v) FROM s) AS m FROM a WHERE a.id IN (SELECT id FROM b)";
        assert_eq!(extract(sql), vec!["a", "b", "s"]);
    }

    #[test]
    fn test_union_all() {
        assert_eq!(
            extract("SELECT id FROM t1 UNION ALL SELECT id FROM t2"),
            vec!["t1", "t2"]
        );
    }

    #[test]
    fn test_quoted_and_qualified_names() {
        assert_eq!(
            extract("SELECT * FROM \"analytics\".\"events\" e JOIN `db`.`users` u ON e.uid = u.id"),
            vec!["analytics.events", "db.users"]
        );
    }

    #[test]
    fn test_parse_error_is_ambiguous() {
        let err = SqlAnalyzer::new()
            .extract_tables("SELECT * FROM (")
            .unwrap_err();
        assert!(matches!(err, SqlError::Ambiguous(_)));
    }
}

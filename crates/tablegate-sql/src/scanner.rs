//! Lexical table-reference scan.
//!
//! Used when the structured parser rejects a query (vendor extensions such
//! as Pinot's `OPTION(...)`, malformed input). The scan tracks parenthesis
//! scopes and a handful of clause keywords:
//!
//! - `FROM`, `JOIN` and the comma list after `FROM` introduce table names
//! - `(` in table position opens a derived table or a parenthesized join
//! - `(SELECT ...` anywhere opens a subquery scanned by the same rules
//! - `WITH name AS (...)` binds `name` in the enclosing query once its body
//!   closes; references in later CTE bodies, the query body and nested
//!   subqueries are skipped, the CTE's own body and other statements are not
//! - `FROM` inside a function call (`EXTRACT(YEAR FROM ts)`) and in
//!   `IS [NOT] DISTINCT FROM` does not introduce a table
//!
//! Anything it cannot classify in table position is reported as a table.

use crate::lexer::{tokenize, Token};
use crate::references::TableReferenceSet;

/// Keywords that close a `FROM` list.
const CLAUSE_END: &[&str] = &[
    "WHERE",
    "GROUP",
    "ORDER",
    "HAVING",
    "LIMIT",
    "OFFSET",
    "UNION",
    "INTERSECT",
    "EXCEPT",
    "MINUS",
    "WINDOW",
    "QUALIFY",
    "OPTION",
    "FETCH",
    "SELECT",
    "VALUES",
    "RETURNING",
    "SET",
    "PREWHERE",
];

/// Keywords that start a join condition.
const JOIN_CONDITION: &[&str] = &["ON", "USING"];

/// Words that may precede a table name without being one.
const TABLE_MODIFIERS: &[&str] = &["LATERAL", "ONLY", "TABLE"];

/// Words allowed between a CTE name and its body.
const CTE_HEADER: &[&str] = &["AS", "MATERIALIZED", "NOT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// A statement or subquery.
    Query,
    /// Parenthesized join list in table position.
    TableGroup,
    /// Function arguments, column lists, expressions.
    Expr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum CteState {
    Idle,
    ExpectName,
    ExpectBody(String),
    InBody(String),
    AfterBody,
}

#[derive(Debug)]
struct Frame {
    scope: Scope,
    in_from: bool,
    expect_table: bool,
    cte: CteState,
    /// CTE names bound in this query so far.
    locals: Vec<String>,
    recursive: bool,
}

impl Frame {
    fn new(scope: Scope) -> Self {
        let in_table_group = scope == Scope::TableGroup;
        Self {
            scope,
            in_from: in_table_group,
            expect_table: in_table_group,
            cte: CteState::Idle,
            locals: Vec::new(),
            recursive: false,
        }
    }

    fn end_clause(&mut self) {
        self.in_from = false;
        self.expect_table = false;
    }
}

/// Collect table names from SQL text without a grammar.
///
/// Comments must be stripped first.
pub fn scan_tables(sql: &str) -> TableReferenceSet {
    Scanner::new(tokenize(sql)).run()
}

struct Scanner {
    tokens: Vec<Token>,
    pos: usize,
    stack: Vec<Frame>,
    prev_keyword: Option<String>,
    tables: TableReferenceSet,
}

impl Scanner {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            stack: vec![Frame::new(Scope::Query)],
            prev_keyword: None,
            tables: TableReferenceSet::new(),
        }
    }

    fn run(mut self) -> TableReferenceSet {
        while self.pos < self.tokens.len() {
            let token = self.tokens[self.pos].clone();
            self.pos += 1;
            if !self.cte_header(&token) {
                self.step(&token);
            }
            self.prev_keyword = token.keyword();
        }

        self.tables
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.stack.len() - 1;
        &mut self.stack[last]
    }

    /// Handle tokens inside a `WITH` header. Returns true when consumed.
    fn cte_header(&mut self, token: &Token) -> bool {
        let state = self.top().cte.clone();
        match state {
            CteState::ExpectName => match token.ident() {
                Some(_) if token.is_keyword("RECURSIVE") => {
                    self.top().recursive = true;
                    true
                }
                Some(name) => {
                    self.top().cte = CteState::ExpectBody(name.to_string());
                    true
                }
                None => {
                    self.top().cte = CteState::Idle;
                    false
                }
            },
            CteState::ExpectBody(name) => {
                if *token == Token::LParen {
                    if self.next_starts_query() {
                        let top = self.top();
                        if top.recursive {
                            top.locals.push(name.clone());
                        }
                        top.cte = CteState::InBody(name);
                        top.end_clause();
                        self.stack.push(Frame::new(Scope::Query));
                    } else {
                        // column list: `WITH c (k, v) AS (...)`
                        self.stack.push(Frame::new(Scope::Expr));
                    }
                    return true;
                }
                if CTE_HEADER.iter().any(|kw| token.is_keyword(kw)) {
                    return true;
                }
                // Not a CTE after all, e.g. `TIMESTAMP WITH TIME ZONE`.
                self.top().cte = CteState::Idle;
                false
            }
            CteState::AfterBody => {
                if *token == Token::Comma {
                    self.top().cte = CteState::ExpectName;
                    return true;
                }
                self.top().cte = CteState::Idle;
                false
            }
            CteState::Idle | CteState::InBody(_) => false,
        }
    }

    fn step(&mut self, token: &Token) {
        match token {
            Token::LParen => self.open_paren(),
            Token::RParen => self.close_paren(),
            Token::Semicolon => {
                self.stack.truncate(1);
                self.stack[0] = Frame::new(Scope::Query);
            }
            Token::Comma => {
                let top = self.top();
                if top.in_from && top.scope != Scope::Expr {
                    top.expect_table = true;
                }
            }
            Token::Word(_) | Token::Quoted(_) => self.word(token),
            Token::Literal | Token::Number | Token::Dot | Token::Other => {}
        }
    }

    fn word(&mut self, token: &Token) {
        let after_distinct = self.prev_keyword.as_deref() == Some("DISTINCT");
        let top = self.top();
        let scope = top.scope;

        if let Some(kw) = token.keyword() {
            match kw.as_str() {
                "WITH" if scope != Scope::Expr => {
                    top.cte = CteState::ExpectName;
                    top.recursive = false;
                    return;
                }
                "FROM" => {
                    if scope != Scope::Expr && !after_distinct {
                        top.in_from = true;
                        top.expect_table = true;
                    }
                    return;
                }
                "JOIN" if scope != Scope::Expr => {
                    top.in_from = true;
                    top.expect_table = true;
                    return;
                }
                "INTO" | "UPDATE" if scope != Scope::Expr => {
                    top.expect_table = true;
                    return;
                }
                k if JOIN_CONDITION.contains(&k) => {
                    top.expect_table = false;
                    return;
                }
                k if CLAUSE_END.contains(&k) => {
                    top.end_clause();
                    return;
                }
                k if top.expect_table && TABLE_MODIFIERS.contains(&k) => return,
                _ => {}
            }
        }

        if top.expect_table && scope != Scope::Expr {
            top.expect_table = false;
            let name = self.read_qualified_name(token);
            if !self.is_local(&name) {
                self.tables.insert(name);
            }
        }
    }

    fn open_paren(&mut self) {
        let starts_query = self.next_starts_query();
        let top = self.top();

        let scope = if top.expect_table && top.scope != Scope::Expr {
            top.expect_table = false;
            if starts_query {
                Scope::Query
            } else {
                Scope::TableGroup
            }
        } else if starts_query {
            Scope::Query
        } else {
            Scope::Expr
        };

        self.stack.push(Frame::new(scope));
    }

    fn close_paren(&mut self) {
        // Unbalanced `)` is ignored.
        if self.stack.len() > 1 {
            self.stack.pop();
            let top = self.top();
            if let CteState::InBody(name) = &top.cte {
                if !top.recursive {
                    top.locals.push(name.clone());
                }
                top.cte = CteState::AfterBody;
            }
        }
    }

    /// True when `name` is a CTE bound in the current query or an enclosing one.
    fn is_local(&self, name: &str) -> bool {
        self.stack
            .iter()
            .any(|frame| frame.locals.iter().any(|local| local == name))
    }

    /// True when the tokens after the current `(` open a query.
    fn next_starts_query(&self) -> bool {
        self.tokens[self.pos..]
            .iter()
            .find(|t| **t != Token::LParen)
            .is_some_and(|t| t.is_keyword("SELECT") || t.is_keyword("WITH") || t.is_keyword("VALUES"))
    }

    /// Read `first(.part)*`, advancing past the consumed parts.
    fn read_qualified_name(&mut self, first: &Token) -> String {
        let mut parts = vec![first.ident().unwrap_or_default().to_string()];

        while self.tokens.get(self.pos) == Some(&Token::Dot) {
            match self.tokens.get(self.pos + 1).and_then(Token::ident) {
                Some(part) => {
                    parts.push(part.to_string());
                    self.pos += 2;
                }
                None => break,
            }
        }

        parts.join(".")
    }
}

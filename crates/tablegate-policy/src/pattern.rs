//! Glob pattern matching for table names.
//!
//! Only two wildcards exist: `*` matches any run of characters (including
//! none) and `?` matches exactly one character. Everything else is literal,
//! and matching is case-sensitive. A pattern always has to cover the whole
//! name, so `foo` does not match `foobar`.

use crate::error::PatternError;
use regex::Regex;
use std::fmt;

/// A compiled table-name glob.
#[derive(Debug, Clone)]
pub struct GlobPattern {
    source: String,
    regex: Regex,
}

impl GlobPattern {
    /// Compile a glob pattern.
    pub fn new(pattern: &str) -> Result<Self, PatternError> {
        let regex = Regex::new(&glob_to_regex(pattern)).map_err(|source| PatternError::Invalid {
            pattern: pattern.to_string(),
            source,
        })?;

        Ok(Self {
            source: pattern.to_string(),
            regex,
        })
    }

    /// True when `name` matches the whole pattern.
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }

    /// The pattern as written in configuration.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// True when the pattern has no wildcards.
    pub fn is_literal(&self) -> bool {
        !self.source.contains(['*', '?'])
    }
}

impl fmt::Display for GlobPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Match a single name against a single glob pattern.
///
/// Compiles the pattern on every call; use [`GlobPattern`] or
/// [`crate::FilterSet`] on hot paths.
pub fn matches(name: &str, pattern: &str) -> bool {
    GlobPattern::new(pattern)
        .map(|glob| glob.is_match(name))
        .unwrap_or(false)
}

/// Translate a glob into an anchored regex. Non-wildcard characters are
/// escaped, so no regex syntax leaks through from configuration.
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 8);
    out.push_str(r"(?s)\A");

    let mut buf = [0u8; 4];
    for ch in pattern.chars() {
        match ch {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            _ => out.push_str(&regex::escape(ch.encode_utf8(&mut buf))),
        }
    }

    out.push_str(r"\z");
    out
}

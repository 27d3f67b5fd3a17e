//! The compiled allow-list.

use crate::error::PatternError;
use crate::pattern::GlobPattern;
use tablegate_core::FilterConfig;

/// Compiled table allow-list built once from [`FilterConfig`].
///
/// Immutable after construction; share it behind an `Arc` across workers.
#[derive(Debug, Clone, Default)]
pub struct FilterSet {
    patterns: Vec<GlobPattern>,
}

impl FilterSet {
    /// A filter set that allows every table.
    pub fn allow_all() -> Self {
        Self::default()
    }

    /// Compile every pattern of the configuration.
    pub fn from_config(config: &FilterConfig) -> Result<Self, PatternError> {
        Self::from_patterns(&config.included_tables)
    }

    /// Compile a list of glob patterns, keeping their order.
    pub fn from_patterns<S: AsRef<str>>(patterns: &[S]) -> Result<Self, PatternError> {
        let patterns = patterns
            .iter()
            .map(|p| GlobPattern::new(p.as_ref()))
            .collect::<Result<Vec<GlobPattern>, _>>()?;

        let literal = patterns.iter().filter(|p| p.is_literal()).count();
        tracing::debug!(
            patterns = patterns.len(),
            literal,
            "compiled table filter"
        );
        Ok(Self { patterns })
    }

    /// True when filtering is disabled.
    pub fn is_allow_all(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Check a single table or schema name.
    pub fn is_allowed(&self, name: &str) -> bool {
        self.is_allow_all() || self.matching_pattern(name).is_some()
    }

    /// The first configured pattern matching `name`, if any.
    pub fn matching_pattern(&self, name: &str) -> Option<&GlobPattern> {
        self.patterns.iter().find(|p| p.is_match(name))
    }

    /// Configured patterns in their original order.
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(GlobPattern::as_str)
    }

    /// Configured patterns as owned strings, for diagnostics.
    pub fn pattern_list(&self) -> Vec<String> {
        self.patterns().map(str::to_string).collect()
    }

    /// Number of configured patterns.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when no patterns are configured.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

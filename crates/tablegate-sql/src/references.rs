//! The per-request set of referenced table names.

use std::collections::BTreeSet;
use std::fmt;

/// Distinct table names referenced by one query.
///
/// Names are kept exactly as extracted after quote stripping, so
/// schema-qualified references stay compound (`db.events`). Iteration is in
/// sorted order, which keeps diagnostics stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableReferenceSet {
    names: BTreeSet<String>,
}

impl TableReferenceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a name. Empty names are ignored.
    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order.
    pub fn into_vec(self) -> Vec<String> {
        self.names.into_iter().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for TableReferenceSet {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut set = Self::new();
        for name in iter {
            set.insert(name);
        }
        set
    }
}

impl IntoIterator for TableReferenceSet {
    type Item = String;
    type IntoIter = std::collections::btree_set::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.into_iter()
    }
}

impl<'a> IntoIterator for &'a TableReferenceSet {
    type Item = &'a String;
    type IntoIter = std::collections::btree_set::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.names.iter()
    }
}

impl fmt::Display for TableReferenceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().collect();
        f.write_str(&names.join(", "))
    }
}

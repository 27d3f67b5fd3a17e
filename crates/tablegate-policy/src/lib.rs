//! Tablegate Policy
//!
//! Allow-list policy over table names. A name is allowed when it matches at
//! least one configured glob pattern, or when no patterns are configured at
//! all. There are no deny patterns and no precedence between patterns.
//!
//! ```
//! use tablegate_core::FilterConfig;
//! use tablegate_policy::FilterSet;
//!
//! let filter = FilterSet::from_config(&FilterConfig::new(["prod_*"])).unwrap();
//! assert!(filter.is_allowed("prod_orders"));
//! assert!(!filter.is_allowed("test_tmp"));
//! ```

pub mod error;
pub mod filter;
pub mod pattern;

pub use error::PatternError;
pub use filter::FilterSet;
pub use pattern::{matches, GlobPattern};

//! # tablegate-core
//!
//! Configuration types shared across the Tablegate crates.
//!
//! The authorization layer reads exactly one piece of configuration: the path
//! of a YAML file listing the table-name patterns that queries may touch.
//!
//! ```yaml
//! # table_filters.yaml
//! included_tables:
//!   - "prod_*"
//!   - "dim_country"
//! ```
//!
//! Configuration is loaded once, before any request is served, and is
//! immutable afterwards.

pub mod config;

pub use config::{ConfigError, FilterConfig, GatewayConfig, TABLE_FILTER_FILE_ENV};

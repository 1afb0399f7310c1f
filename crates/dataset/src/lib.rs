//! # Salesboard Dataset Crate
//!
//! Loads the sales export into memory and keeps it there. This is the only
//! place that touches the file system or parses raw strings; everything
//! downstream receives already-typed `Transaction` rows.
//!
//! ## Public API
//!
//! - `load_csv` / `read_transactions`: parse a CSV export into transactions.
//! - `Dataset`: the immutable loaded table, plus the filter options it offers.
//! - `DatasetCache`: explicit load-once memoization with `invalidate` and `reload`.
//! - `DatasetError`: the specific error types that can be returned from this crate.

pub mod cache;
pub mod dataset;
pub mod error;
pub mod loader;

pub use cache::DatasetCache;
pub use dataset::Dataset;
pub use error::DatasetError;
pub use loader::{load_csv, parse_order_date, read_transactions, LoadReport, SkippedRow};

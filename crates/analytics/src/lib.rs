//! # Salesboard Analytics Engine
//!
//! This crate turns the loaded sales table into everything the dashboard
//! displays: the filtered working set, the KPI cards, and the chart-ready
//! aggregates.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O and no knowledge of where the rows came from.
//!   It depends only on `core-types`.
//! - **Stateless Calculation:** Every function takes the filtered set and
//!   returns a fresh value. Empty input produces zeroed or empty output, never
//!   an error, and repeated calls with the same input give identical results.
//!
//! ## Public API
//!
//! - `filter` / `FilteredSet`: applies `FilterCriteria` to the table.
//! - `KpiCalculator` / `KpiReport`: revenue, profit, margin, customers, growth.
//! - `aggregation`: monthly trend, country x segment pivot, top products,
//!   quarterly active customers.
//! - `dashboard::compute`: runs all of the above for one filter change.

// Declare the modules that constitute this crate.
pub mod aggregation;
pub mod dashboard;
pub mod filter;
pub mod kpi;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use aggregation::{
    MonthlyProductRevenue, MonthlyTrend, PivotTable, ProductRevenue, QuarterlyCustomers, DEFAULT_TOP_K,
    DEFAULT_TOP_N,
};
pub use dashboard::{compute, DashboardOptions, DashboardSnapshot};
pub use filter::{filter, FilteredSet};
pub use kpi::{KpiCalculator, MonthlyGrowth};
pub use report::KpiReport;

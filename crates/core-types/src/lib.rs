pub mod criteria;
pub mod error;
pub mod period;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use criteria::{FilterCriteria, Selection};
pub use error::CoreError;
pub use period::{YearMonth, YearQuarter};
pub use structs::Transaction;

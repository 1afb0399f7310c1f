use crate::period::{YearMonth, YearQuarter};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single row of the sales table: one order line for one customer.
///
/// Rows are produced by the dataset loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub order_id: Option<String>,
    pub order_date: NaiveDate,
    pub customer_id: String,
    pub product: String,
    pub region: String,
    pub industry: String,
    pub country: String,
    pub segment: String,
    pub sales: Decimal,
    /// Zero when the source row carried no profit figure.
    pub profit: Decimal,
}

impl Transaction {
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.order_date)
    }

    pub fn quarter(&self) -> YearQuarter {
        YearQuarter::of(self.order_date)
    }
}

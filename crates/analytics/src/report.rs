use core_types::YearMonth;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The scalar KPIs shown on the dashboard's summary cards.
///
/// All percentages are on a 0-100 scale. Every field has a defined zero
/// value, so a report computed from an empty filtered set is simply
/// `KpiReport::new()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiReport {
    // I. Revenue and Profitability
    pub total_revenue: Decimal,
    pub total_profit: Decimal,
    pub profit_margin_pct: Decimal,

    // II. Customers
    pub active_customers: usize,
    pub repeat_customers: usize,
    pub repeat_rate_pct: Decimal,

    // III. Deal-Level Statistics
    pub transaction_count: usize,
    pub average_deal_size: Decimal,

    // IV. Month-over-Month
    pub latest_month: Option<YearMonth>,
    pub previous_month: Option<YearMonth>,
    pub latest_month_revenue: Decimal,
    pub previous_month_revenue: Decimal,
    pub monthly_growth_pct: Decimal,
}

impl KpiReport {
    /// Creates a new, zeroed-out KpiReport.
    pub fn new() -> Self {
        Self {
            total_revenue: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            profit_margin_pct: Decimal::ZERO,
            active_customers: 0,
            repeat_customers: 0,
            repeat_rate_pct: Decimal::ZERO,
            transaction_count: 0,
            average_deal_size: Decimal::ZERO,
            latest_month: None,
            previous_month: None,
            latest_month_revenue: Decimal::ZERO,
            previous_month_revenue: Decimal::ZERO,
            monthly_growth_pct: Decimal::ZERO,
        }
    }
}

impl Default for KpiReport {
    fn default() -> Self {
        Self::new()
    }
}

use crate::aggregation::{
    self, MonthlyTrend, PivotTable, ProductRevenue, QuarterlyCustomers, DEFAULT_TOP_K, DEFAULT_TOP_N,
};
use crate::filter::filter;
use crate::kpi::KpiCalculator;
use crate::report::KpiReport;
use core_types::{FilterCriteria, Transaction};
use serde::{Deserialize, Serialize};

/// Tunables for the ranking and trend views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardOptions {
    /// Products in the top-products ranking, and in the trend when no fixed list is given.
    pub top_n: usize,
    /// Countries kept in the country x segment pivot.
    pub top_k: usize,
    /// Fixed product list for the monthly trend.
    pub trend_products: Option<Vec<String>>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            top_k: DEFAULT_TOP_K,
            trend_products: None,
        }
    }
}

/// Everything the dashboard shows for one filter state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub criteria: FilterCriteria,
    pub kpis: KpiReport,
    pub monthly_trend: MonthlyTrend,
    pub country_segment: PivotTable,
    pub top_products: Vec<ProductRevenue>,
    pub quarterly_customers: Vec<QuarterlyCustomers>,
}

/// Recomputes the whole dashboard for a filter change.
///
/// Holds no state between calls: the same rows, criteria and options always
/// produce the same snapshot.
#[tracing::instrument(name = "dashboard_compute", skip_all, fields(rows = transactions.len()))]
pub fn compute(
    transactions: &[Transaction],
    criteria: &FilterCriteria,
    options: &DashboardOptions,
) -> DashboardSnapshot {
    let set = filter(transactions, criteria);

    let kpis = KpiCalculator::new().calculate(&set);
    let monthly_trend =
        aggregation::monthly_revenue_by_product(&set, options.trend_products.as_deref(), options.top_n);
    let country_segment = aggregation::revenue_by_country_segment(&set, options.top_k);
    let top_products = aggregation::top_products(&set, options.top_n);
    let quarterly_customers = aggregation::quarterly_active_customers(&set);

    tracing::debug!(
        filtered = set.len(),
        countries = country_segment.rows.len(),
        quarters = quarterly_customers.len(),
        "Dashboard snapshot computed"
    );

    DashboardSnapshot {
        criteria: criteria.clone(),
        kpis,
        monthly_trend,
        country_segment,
        top_products,
        quarterly_customers,
    }
}

use crate::filter::FilteredSet;
use crate::report::KpiReport;
use core_types::YearMonth;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A stateless calculator for the summary KPIs of a filtered set.
#[derive(Debug, Default)]
pub struct KpiCalculator {}

impl KpiCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating the KPI cards.
    ///
    /// # Arguments
    ///
    /// * `set` - The rows that passed the active filter.
    ///
    /// # Returns
    ///
    /// A fully populated `KpiReport`. An empty set yields the zeroed report.
    pub fn calculate(&self, set: &FilteredSet<'_>) -> KpiReport {
        let mut report = KpiReport::new();

        if set.is_empty() {
            return report;
        }

        self.calculate_profitability(set, &mut report);
        self.calculate_customers(set, &mut report);
        self.calculate_growth(set, &mut report);

        tracing::debug!(
            rows = report.transaction_count,
            revenue = %report.total_revenue,
            customers = report.active_customers,
            "KPIs calculated"
        );

        report
    }

    fn calculate_profitability(&self, set: &FilteredSet<'_>, report: &mut KpiReport) {
        report.transaction_count = set.len();
        report.total_revenue = total_revenue(set);
        report.total_profit = total_profit(set);
        report.profit_margin_pct = percentage(report.total_profit, report.total_revenue);
        report.average_deal_size = ratio(report.total_revenue, Decimal::from(report.transaction_count));
    }

    fn calculate_customers(&self, set: &FilteredSet<'_>, report: &mut KpiReport) {
        let counts = transactions_per_customer(set);
        report.active_customers = counts.len();
        report.repeat_customers = counts.values().filter(|&&n| n >= 2).count();
        report.repeat_rate_pct = percentage(
            Decimal::from(report.repeat_customers),
            Decimal::from(report.active_customers),
        );
    }

    fn calculate_growth(&self, set: &FilteredSet<'_>, report: &mut KpiReport) {
        let growth = monthly_growth(set);
        report.latest_month = growth.latest_month;
        report.previous_month = growth.previous_month;
        report.latest_month_revenue = growth.latest_revenue;
        report.previous_month_revenue = growth.previous_revenue;
        report.monthly_growth_pct = growth.growth_pct;
    }
}

/// Month-over-month comparison between the latest month in a set and the
/// calendar month before it.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyGrowth {
    pub latest_month: Option<YearMonth>,
    pub previous_month: Option<YearMonth>,
    pub latest_revenue: Decimal,
    pub previous_revenue: Decimal,
    pub growth_pct: Decimal,
}

pub fn total_revenue(set: &FilteredSet<'_>) -> Decimal {
    checked_sum(set.iter().map(|t| t.sales))
}

pub fn total_profit(set: &FilteredSet<'_>) -> Decimal {
    checked_sum(set.iter().map(|t| t.profit))
}

pub fn profit_margin_pct(set: &FilteredSet<'_>) -> Decimal {
    percentage(total_profit(set), total_revenue(set))
}

pub fn active_customers(set: &FilteredSet<'_>) -> usize {
    transactions_per_customer(set).len()
}

pub fn average_deal_size(set: &FilteredSet<'_>) -> Decimal {
    ratio(total_revenue(set), Decimal::from(set.len()))
}

pub fn repeat_rate_pct(set: &FilteredSet<'_>) -> Decimal {
    let counts = transactions_per_customer(set);
    let repeat = counts.values().filter(|&&n| n >= 2).count();
    percentage(Decimal::from(repeat), Decimal::from(counts.len()))
}

/// Growth of the latest month's sales against the preceding calendar month.
///
/// `latest` is the month of the maximum order date. The previous month is found
/// by calendar arithmetic, so January compares against December of the year
/// before even when no row falls in that December.
pub fn monthly_growth(set: &FilteredSet<'_>) -> MonthlyGrowth {
    let Some(latest) = set.iter().map(|t| t.order_date).max().map(YearMonth::of) else {
        return MonthlyGrowth {
            latest_month: None,
            previous_month: None,
            latest_revenue: Decimal::ZERO,
            previous_revenue: Decimal::ZERO,
            growth_pct: Decimal::ZERO,
        };
    };
    let previous = latest.pred();

    let latest_revenue = checked_sum(set.iter().filter(|t| t.month() == latest).map(|t| t.sales));
    let previous_revenue = checked_sum(set.iter().filter(|t| t.month() == previous).map(|t| t.sales));
    let change = latest_revenue
        .checked_sub(previous_revenue)
        .unwrap_or(Decimal::ZERO);

    MonthlyGrowth {
        latest_month: Some(latest),
        previous_month: Some(previous),
        latest_revenue,
        previous_revenue,
        growth_pct: percentage(change, previous_revenue),
    }
}

pub fn monthly_growth_pct(set: &FilteredSet<'_>) -> Decimal {
    monthly_growth(set).growth_pct
}

fn transactions_per_customer<'a>(set: &FilteredSet<'a>) -> HashMap<&'a str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for t in set.iter() {
        *counts.entry(t.customer_id.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Sum of `values`, or zero if the total leaves the `Decimal` range.
pub(crate) fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Decimal {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, Decimal::checked_add)
        .unwrap_or(Decimal::ZERO)
}

/// `numerator / denominator`, or zero when the denominator is zero.
pub(crate) fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `100 * part / whole`, or zero when `whole` is zero or the result does not fit.
pub(crate) fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    match part.checked_mul(Decimal::ONE_HUNDRED) {
        Some(scaled) => ratio(scaled, whole),
        None => ratio(part, whole)
            .checked_mul(Decimal::ONE_HUNDRED)
            .unwrap_or(Decimal::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilteredSet;
    use chrono::NaiveDate;
    use core_types::Transaction;
    use rust_decimal_macros::dec;

    fn tx(date: (i32, u32, u32), customer: &str, sales: Decimal, profit: Decimal) -> Transaction {
        Transaction {
            order_id: None,
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            customer_id: customer.into(),
            product: "Data Smasher".into(),
            region: "EMEA".into(),
            industry: "Tech".into(),
            country: "France".into(),
            segment: "SMB".into(),
            sales,
            profit,
        }
    }

    #[test]
    fn test_profitability_metrics() {
        let rows = vec![
            tx((2023, 1, 5), "A", dec!(200), dec!(50)),
            tx((2023, 1, 9), "B", dec!(300), dec!(-25)),
            tx((2023, 2, 1), "A", dec!(500), dec!(75)),
        ];
        let report = KpiCalculator::new().calculate(&FilteredSet::all(&rows));

        assert_eq!(report.total_revenue, dec!(1000));
        assert_eq!(report.total_profit, dec!(100));
        assert_eq!(report.profit_margin_pct, dec!(10));
        assert_eq!(report.transaction_count, 3);
        assert_eq!(report.average_deal_size, dec!(1000) / dec!(3));
    }

    #[test]
    fn test_repeat_rate_counts_customers_not_rows() {
        let rows = vec![
            tx((2023, 1, 5), "A", dec!(10), dec!(1)),
            tx((2023, 1, 6), "A", dec!(10), dec!(1)),
            tx((2023, 1, 7), "A", dec!(10), dec!(1)),
            tx((2023, 1, 8), "B", dec!(10), dec!(1)),
            tx((2023, 1, 9), "C", dec!(10), dec!(1)),
            tx((2023, 1, 9), "C", dec!(10), dec!(1)),
            tx((2023, 1, 9), "D", dec!(10), dec!(1)),
        ];
        let set = FilteredSet::all(&rows);
        assert_eq!(active_customers(&set), 4);
        assert_eq!(repeat_rate_pct(&set), dec!(50));
    }

    #[test]
    fn test_zero_revenue_has_zero_margin() {
        let rows = vec![tx((2023, 1, 5), "A", dec!(0), dec!(-5))];
        let set = FilteredSet::all(&rows);
        assert_eq!(profit_margin_pct(&set), Decimal::ZERO);
        assert_eq!(average_deal_size(&set), Decimal::ZERO);
    }

    #[test]
    fn test_empty_set_returns_zeroed_report() {
        let report = KpiCalculator::new().calculate(&FilteredSet::default());
        assert_eq!(report, KpiReport::new());
        assert_eq!(monthly_growth_pct(&FilteredSet::default()), Decimal::ZERO);
    }

    #[test]
    fn test_growth_crosses_year_boundary() {
        let rows = vec![
            tx((2022, 12, 10), "A", dec!(60), dec!(0)),
            tx((2022, 12, 28), "B", dec!(40), dec!(0)),
            tx((2023, 1, 15), "A", dec!(150), dec!(0)),
        ];
        let growth = monthly_growth(&FilteredSet::all(&rows));
        assert_eq!(growth.latest_month, Some(YearMonth::new(2023, 1).unwrap()));
        assert_eq!(growth.previous_month, Some(YearMonth::new(2022, 12).unwrap()));
        assert_eq!(growth.growth_pct, dec!(50));
    }

    #[test]
    fn test_growth_uses_calendar_predecessor_not_previous_row() {
        // The month before March is February, which has no sales.
        let rows = vec![
            tx((2023, 1, 15), "A", dec!(100), dec!(0)),
            tx((2023, 3, 15), "A", dec!(300), dec!(0)),
        ];
        let growth = monthly_growth(&FilteredSet::all(&rows));
        assert_eq!(growth.previous_revenue, Decimal::ZERO);
        assert_eq!(growth.growth_pct, Decimal::ZERO);
    }

    #[test]
    fn test_negative_growth() {
        let rows = vec![
            tx((2023, 4, 2), "A", dec!(200), dec!(0)),
            tx((2023, 5, 2), "A", dec!(150), dec!(0)),
        ];
        assert_eq!(monthly_growth_pct(&FilteredSet::all(&rows)), dec!(-25));
    }

    #[test]
    fn test_margin_overflow_returns_zero_instead_of_panicking() {
        let rows = vec![tx((2023, 6, 1), "A", dec!(1), Decimal::MAX / dec!(10))];
        let set = FilteredSet::all(&rows);

        assert_eq!(profit_margin_pct(&set), Decimal::ZERO);
        let report = KpiCalculator::new().calculate(&set);
        assert_eq!(report.profit_margin_pct, Decimal::ZERO);
        assert_eq!(report.total_revenue, dec!(1));
    }

    #[test]
    fn test_totals_outside_decimal_range_collapse_to_zero() {
        let rows = vec![
            tx((2023, 6, 1), "A", Decimal::MAX, dec!(0)),
            tx((2023, 6, 2), "B", Decimal::MAX, dec!(0)),
        ];
        let set = FilteredSet::all(&rows);

        assert_eq!(total_revenue(&set), Decimal::ZERO);
        assert_eq!(monthly_growth(&set).latest_revenue, Decimal::ZERO);
    }
}

use chrono::NaiveDate;
use core_types::{FilterCriteria, Transaction};

/// The rows of the loaded table that satisfy the active `FilterCriteria`.
///
/// This is a borrowed, read-only view: it never copies or mutates the
/// underlying transactions, and it keeps them in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredSet<'a> {
    rows: Vec<&'a Transaction>,
}

impl<'a> FilteredSet<'a> {
    /// A view over every row, as if no filter were active.
    pub fn all(transactions: &'a [Transaction]) -> Self {
        Self {
            rows: transactions.iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.rows.iter().copied()
    }

    pub fn rows(&self) -> &[&'a Transaction] {
        &self.rows
    }

    /// Earliest and latest order date in the set, `None` when empty.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.iter().map(|t| t.order_date).min()?;
        let last = self.iter().map(|t| t.order_date).max()?;
        Some((first, last))
    }
}

/// Applies the date-range, region and industry predicates to the full table.
pub fn filter<'a>(transactions: &'a [Transaction], criteria: &FilterCriteria) -> FilteredSet<'a> {
    if criteria.is_inverted() {
        tracing::debug!(
            start = ?criteria.start_date,
            end = ?criteria.end_date,
            "Inverted date range, no rows can match."
        );
        return FilteredSet::default();
    }

    let rows: Vec<&Transaction> = transactions
        .iter()
        .filter(|t| criteria.matches(t))
        .collect();

    tracing::debug!("Filter kept {} of {} rows", rows.len(), transactions.len());

    FilteredSet { rows }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Selection;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(date: NaiveDate, region: &str, industry: &str) -> Transaction {
        Transaction {
            order_id: None,
            order_date: date,
            customer_id: "C-1".into(),
            product: "SaaS Connector Pack".into(),
            region: region.into(),
            industry: industry.into(),
            country: "Japan".into(),
            segment: "Strategic".into(),
            sales: dec!(100),
            profit: dec!(20),
        }
    }

    fn sample() -> Vec<Transaction> {
        vec![
            row(d(2022, 12, 3), "APJ", "Finance"),
            row(d(2023, 1, 14), "EMEA", "Energy"),
            row(d(2023, 2, 20), "AMER", "Finance"),
            row(d(2023, 3, 2), "EMEA", "Finance"),
        ]
    }

    #[test]
    fn test_default_criteria_keep_every_row_in_order() {
        let rows = sample();
        let filtered = filter(&rows, &FilterCriteria::default());
        assert_eq!(filtered, FilteredSet::all(&rows));
    }

    #[test]
    fn test_region_and_industry_predicates_are_conjunctive() {
        let rows = sample();
        let criteria = FilterCriteria::unrestricted()
            .with_regions(Selection::from_values(["EMEA"]))
            .with_industries(Selection::from_values(["Finance"]));
        let filtered = filter(&rows, &criteria);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].order_date, d(2023, 3, 2));
    }

    #[test]
    fn test_inverted_range_yields_empty_set() {
        let rows = sample();
        let criteria =
            FilterCriteria::unrestricted().with_date_range(Some(d(2023, 3, 1)), Some(d(2022, 1, 1)));
        let filtered = filter(&rows, &criteria);
        assert!(filtered.is_empty());
        assert_eq!(filtered.date_bounds(), None);
    }

    #[test]
    fn test_filtering_does_not_touch_the_source() {
        let rows = sample();
        let before = rows.clone();
        let criteria = FilterCriteria::unrestricted().with_regions(Selection::from_values(["APJ"]));
        let _ = filter(&rows, &criteria);
        assert_eq!(rows, before);
    }
}

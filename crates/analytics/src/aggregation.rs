use crate::filter::FilteredSet;
use core_types::{Transaction, YearMonth, YearQuarter};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Number of products shown in the ranking and trend views unless configured otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// Number of countries kept in the country x segment breakdown unless configured otherwise.
pub const DEFAULT_TOP_K: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRevenue {
    pub product: String,
    pub revenue: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyProductRevenue {
    pub month: YearMonth,
    pub product: String,
    pub revenue: Decimal,
}

/// Monthly revenue for a fixed set of products.
///
/// `points` holds one entry per tracked product for every calendar month from
/// the first to the last month of the filtered set, in month order and then in
/// `products` order. Months without sales for a product carry zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyTrend {
    pub products: Vec<String>,
    pub points: Vec<MonthlyProductRevenue>,
}

impl MonthlyTrend {
    pub fn months(&self) -> Vec<YearMonth> {
        let mut months: Vec<YearMonth> = self.points.iter().map(|p| p.month).collect();
        months.dedup();
        months
    }

    /// The (month, revenue) line for a single product.
    pub fn series(&self, product: &str) -> Vec<(YearMonth, Decimal)> {
        self.points
            .iter()
            .filter(|p| p.product == product)
            .map(|p| (p.month, p.revenue))
            .collect()
    }
}

/// A dense two-dimensional table: one row per row label, one value per column label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotTable {
    pub rows: Vec<String>,
    pub columns: Vec<String>,
    /// `values[r][c]` is the cell for `rows[r]` x `columns[c]`.
    pub values: Vec<Vec<Decimal>>,
}

impl PivotTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, row: &str, column: &str) -> Option<Decimal> {
        let r = self.rows.iter().position(|label| label == row)?;
        let c = self.columns.iter().position(|label| label == column)?;
        Some(self.values[r][c])
    }

    pub fn row_total(&self, row: &str) -> Option<Decimal> {
        let r = self.rows.iter().position(|label| label == row)?;
        Some(self.values[r].iter().copied().sum())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyCustomers {
    pub quarter: YearQuarter,
    pub customers: usize,
}

/// Top `n` products by summed sales, highest first.
///
/// The sort is stable over first-appearance order, so products with equal
/// revenue keep the order in which they were first seen in the table.
pub fn top_products(set: &FilteredSet<'_>, n: usize) -> Vec<ProductRevenue> {
    ranked_totals(set, |t| t.product.as_str())
        .into_iter()
        .take(n)
        .map(|(product, revenue)| ProductRevenue {
            product: product.to_string(),
            revenue,
        })
        .collect()
}

/// Monthly sales per product for the trend chart.
///
/// With a non-empty `products` list, exactly those products are tracked
/// (duplicates dropped); otherwise the `top_n` products by revenue are.
pub fn monthly_revenue_by_product(
    set: &FilteredSet<'_>,
    products: Option<&[String]>,
    top_n: usize,
) -> MonthlyTrend {
    let mut seen = HashSet::new();
    let fixed: Vec<String> = products
        .unwrap_or_default()
        .iter()
        .filter(|p| seen.insert(p.as_str()))
        .cloned()
        .collect();
    // An empty fixed list means nothing was chosen, same as no list at all.
    let tracked = if fixed.is_empty() {
        top_products(set, top_n).into_iter().map(|p| p.product).collect()
    } else {
        fixed
    };

    let Some((first, last)) = set.date_bounds() else {
        return MonthlyTrend {
            products: tracked,
            points: Vec::new(),
        };
    };

    let mut sums: HashMap<(YearMonth, &str), Decimal> = HashMap::new();
    for t in set.iter() {
        *sums.entry((t.month(), t.product.as_str())).or_insert(Decimal::ZERO) += t.sales;
    }

    let months = YearMonth::span(YearMonth::of(first), YearMonth::of(last));
    let mut points = Vec::with_capacity(months.len() * tracked.len());
    for month in months {
        for product in &tracked {
            let revenue = sums
                .get(&(month, product.as_str()))
                .copied()
                .unwrap_or(Decimal::ZERO);
            points.push(MonthlyProductRevenue {
                month,
                product: product.clone(),
                revenue,
            });
        }
    }

    MonthlyTrend {
        products: tracked,
        points,
    }
}

/// Sales pivoted by country (rows) and segment (columns).
///
/// Only the `top_k` countries by total sales across all segments are kept,
/// ranked highest first with ties in first-appearance order. Segment columns
/// appear in the order they are first seen among the kept countries.
pub fn revenue_by_country_segment(set: &FilteredSet<'_>, top_k: usize) -> PivotTable {
    let countries: Vec<&str> = ranked_totals(set, |t| t.country.as_str())
        .into_iter()
        .take(top_k)
        .map(|(country, _)| country)
        .collect();

    let row_index: HashMap<&str, usize> = countries
        .iter()
        .enumerate()
        .map(|(i, country)| (*country, i))
        .collect();

    let mut columns: Vec<String> = Vec::new();
    let mut column_index: HashMap<&str, usize> = HashMap::new();
    let mut values: Vec<Vec<Decimal>> = vec![Vec::new(); countries.len()];

    for t in set.iter() {
        let Some(&r) = row_index.get(t.country.as_str()) else {
            continue;
        };
        let c = *column_index.entry(t.segment.as_str()).or_insert_with(|| {
            columns.push(t.segment.clone());
            columns.len() - 1
        });
        let row = &mut values[r];
        if row.len() <= c {
            row.resize(c + 1, Decimal::ZERO);
        }
        row[c] += t.sales;
    }

    for row in &mut values {
        row.resize(columns.len(), Decimal::ZERO);
    }

    PivotTable {
        rows: countries.into_iter().map(str::to_string).collect(),
        columns,
        values,
    }
}

/// Distinct customers per calendar quarter.
///
/// Every quarter between the first and last order date is present, including
/// quarters in which nobody bought anything.
pub fn quarterly_active_customers(set: &FilteredSet<'_>) -> Vec<QuarterlyCustomers> {
    let Some((first, last)) = set.date_bounds() else {
        return Vec::new();
    };

    let mut buckets: HashMap<YearQuarter, HashSet<&str>> = HashMap::new();
    for t in set.iter() {
        buckets
            .entry(t.quarter())
            .or_default()
            .insert(t.customer_id.as_str());
    }

    YearQuarter::span(YearQuarter::of(first), YearQuarter::of(last))
        .into_iter()
        .map(|quarter| QuarterlyCustomers {
            quarter,
            customers: buckets.get(&quarter).map_or(0, HashSet::len),
        })
        .collect()
}

/// Sums sales per key in first-appearance order, then stable-sorts descending.
fn ranked_totals<'a, K, F>(set: &FilteredSet<'a>, key: F) -> Vec<(K, Decimal)>
where
    K: Eq + Hash + Copy,
    F: Fn(&'a Transaction) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut totals: Vec<(K, Decimal)> = Vec::new();
    for t in set.iter() {
        let k = key(t);
        let i = *index.entry(k).or_insert_with(|| {
            totals.push((k, Decimal::ZERO));
            totals.len() - 1
        });
        totals[i].1 += t.sales;
    }
    // `sort_by` is stable: equal totals keep first-appearance order.
    totals.sort_by(|a, b| b.1.cmp(&a.1));
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(date: (i32, u32, u32), customer: &str, product: &str, country: &str, segment: &str, sales: Decimal) -> Transaction {
        Transaction {
            order_id: None,
            order_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            customer_id: customer.into(),
            product: product.into(),
            region: "AMER".into(),
            industry: "Retail".into(),
            country: country.into(),
            segment: segment.into(),
            sales,
            profit: Decimal::ZERO,
        }
    }

    #[test]
    fn test_top_products_ties_keep_first_appearance() {
        let rows = vec![
            tx((2023, 1, 1), "A", "Beta", "US", "SMB", dec!(50)),
            tx((2023, 1, 2), "A", "Alpha", "US", "SMB", dec!(80)),
            tx((2023, 1, 3), "B", "Gamma", "US", "SMB", dec!(120)),
            tx((2023, 1, 4), "B", "Beta", "US", "SMB", dec!(30)),
        ];
        let top = top_products(&FilteredSet::all(&rows), 3);
        let names: Vec<&str> = top.iter().map(|p| p.product.as_str()).collect();
        // Beta (80) was seen before Alpha (80).
        assert_eq!(names, vec!["Gamma", "Beta", "Alpha"]);
        assert_eq!(top[1].revenue, dec!(80));
    }

    #[test]
    fn test_top_products_caps_at_distinct_count() {
        let rows = vec![
            tx((2023, 1, 1), "A", "Beta", "US", "SMB", dec!(50)),
            tx((2023, 1, 2), "A", "Alpha", "US", "SMB", dec!(80)),
        ];
        assert_eq!(top_products(&FilteredSet::all(&rows), DEFAULT_TOP_N).len(), 2);
        assert!(top_products(&FilteredSet::all(&rows), 0).is_empty());
    }

    #[test]
    fn test_monthly_trend_fills_missing_months_with_zero() {
        let rows = vec![
            tx((2023, 1, 10), "A", "Alpha", "US", "SMB", dec!(10)),
            tx((2023, 1, 20), "B", "Alpha", "US", "SMB", dec!(5)),
            tx((2023, 3, 5), "B", "Beta", "US", "SMB", dec!(7)),
        ];
        let trend = monthly_revenue_by_product(&FilteredSet::all(&rows), None, DEFAULT_TOP_N);

        assert_eq!(trend.products, vec!["Alpha".to_string(), "Beta".to_string()]);
        assert_eq!(trend.months().len(), 3);
        let alpha = trend.series("Alpha");
        assert_eq!(alpha[0].1, dec!(15));
        assert_eq!(alpha[1].1, Decimal::ZERO);
        assert_eq!(alpha[2].1, Decimal::ZERO);
        assert_eq!(trend.series("Beta")[2].1, dec!(7));
    }

    #[test]
    fn test_monthly_trend_with_fixed_products() {
        let rows = vec![
            tx((2023, 1, 10), "A", "Alpha", "US", "SMB", dec!(10)),
            tx((2023, 1, 20), "B", "Beta", "US", "SMB", dec!(99)),
        ];
        let fixed = vec!["Alpha".to_string(), "Unknown".to_string(), "Alpha".to_string()];
        let trend = monthly_revenue_by_product(&FilteredSet::all(&rows), Some(fixed.as_slice()), DEFAULT_TOP_N);

        assert_eq!(trend.products, vec!["Alpha".to_string(), "Unknown".to_string()]);
        assert_eq!(trend.series("Unknown"), vec![(YearMonth::new(2023, 1).unwrap(), Decimal::ZERO)]);
        assert!(trend.series("Beta").is_empty());
    }

    #[test]
    fn test_monthly_trend_empty_fixed_list_falls_back_to_top_products() {
        let rows = vec![
            tx((2023, 1, 10), "A", "Alpha", "US", "SMB", dec!(10)),
            tx((2023, 1, 20), "B", "Beta", "US", "SMB", dec!(30)),
        ];
        let set = FilteredSet::all(&rows);
        let trend = monthly_revenue_by_product(&set, Some(&[][..]), DEFAULT_TOP_N);

        assert_eq!(trend, monthly_revenue_by_product(&set, None, DEFAULT_TOP_N));
        assert_eq!(trend.products, vec!["Beta".to_string(), "Alpha".to_string()]);
        assert_eq!(trend.points.len(), 2);
    }

    #[test]
    fn test_country_segment_pivot_is_dense() {
        let rows = vec![
            tx((2023, 1, 1), "A", "Alpha", "Brazil", "SMB", dec!(10)),
            tx((2023, 1, 1), "A", "Alpha", "Canada", "Enterprise", dec!(40)),
            tx((2023, 1, 1), "A", "Alpha", "Brazil", "Strategic", dec!(15)),
            tx((2023, 1, 1), "A", "Alpha", "Canada", "SMB", dec!(5)),
        ];
        let table = revenue_by_country_segment(&FilteredSet::all(&rows), DEFAULT_TOP_K);

        assert_eq!(table.rows, vec!["Canada".to_string(), "Brazil".to_string()]);
        assert_eq!(table.columns, vec!["SMB".to_string(), "Enterprise".to_string(), "Strategic".to_string()]);
        assert_eq!(table.get("Brazil", "Enterprise"), Some(Decimal::ZERO));
        assert_eq!(table.get("Canada", "SMB"), Some(dec!(5)));
        assert_eq!(table.row_total("Canada"), Some(dec!(45)));
        assert!(table.values.iter().all(|row| row.len() == 3));
    }

    #[test]
    fn test_country_segment_pivot_truncates_to_top_k() {
        let rows: Vec<Transaction> = (0..20u32)
            .map(|i| tx((2023, 1, 1), "A", "Alpha", &format!("Country {i}"), "SMB", Decimal::from(i + 1)))
            .collect();
        let table = revenue_by_country_segment(&FilteredSet::all(&rows), 15);

        assert_eq!(table.rows.len(), 15);
        assert_eq!(table.rows[0], "Country 19");
        assert!(!table.rows.contains(&"Country 0".to_string()));
    }

    #[test]
    fn test_quarterly_customers_include_empty_quarters() {
        let rows = vec![
            tx((2023, 1, 5), "A", "Alpha", "US", "SMB", dec!(1)),
            tx((2023, 2, 5), "A", "Alpha", "US", "SMB", dec!(1)),
            tx((2023, 3, 5), "B", "Alpha", "US", "SMB", dec!(1)),
            tx((2023, 8, 5), "C", "Alpha", "US", "SMB", dec!(1)),
        ];
        let series = quarterly_active_customers(&FilteredSet::all(&rows));
        let counts: Vec<(String, usize)> = series.iter().map(|q| (q.quarter.to_string(), q.customers)).collect();
        assert_eq!(
            counts,
            vec![("2023-Q1".to_string(), 2), ("2023-Q2".to_string(), 0), ("2023-Q3".to_string(), 1)]
        );
    }

    #[test]
    fn test_empty_set_gives_empty_aggregates() {
        let empty = FilteredSet::default();
        assert!(top_products(&empty, 5).is_empty());
        assert!(monthly_revenue_by_product(&empty, None, 5).points.is_empty());
        assert!(revenue_by_country_segment(&empty, 15).is_empty());
        assert!(quarterly_active_customers(&empty).is_empty());
    }
}

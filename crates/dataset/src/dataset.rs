use crate::loader::LoadReport;
use chrono::NaiveDate;
use core_types::{FilterCriteria, Transaction};
use std::collections::HashSet;
use std::sync::Arc;

/// The loaded sales table. Immutable; cheap to clone.
#[derive(Debug, Clone)]
pub struct Dataset {
    transactions: Arc<[Transaction]>,
    report: LoadReport,
}

impl Dataset {
    pub fn new(transactions: Vec<Transaction>, report: LoadReport) -> Self {
        Self {
            transactions: transactions.into(),
            report,
        }
    }

    pub fn from_transactions(transactions: Vec<Transaction>) -> Self {
        let report = LoadReport {
            rows_read: transactions.len(),
            rows_loaded: transactions.len(),
            skipped: Vec::new(),
        };
        Self::new(transactions, report)
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn load_report(&self) -> &LoadReport {
        &self.report
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.transactions.iter().map(|t| t.order_date).min()?;
        let last = self.transactions.iter().map(|t| t.order_date).max()?;
        Some((first, last))
    }

    /// Distinct regions in order of first appearance: the region filter's options.
    pub fn regions(&self) -> Vec<String> {
        self.distinct(|t| &t.region)
    }

    /// Distinct industries in order of first appearance: the industry filter's options.
    pub fn industries(&self) -> Vec<String> {
        self.distinct(|t| &t.industry)
    }

    /// Filter state before the user touches anything: whole date span, nothing excluded.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::spanning(&self.transactions)
    }

    fn distinct<F>(&self, column: F) -> Vec<String>
    where
        F: Fn(&Transaction) -> &String,
    {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        for t in self.transactions.iter() {
            let value = column(t);
            if seen.insert(value.as_str()) {
                values.push(value.clone());
            }
        }
        values
    }
}

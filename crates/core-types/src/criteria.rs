use crate::structs::Transaction;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The allowed values of one categorical column (region, industry).
///
/// An empty `Only` set is treated exactly like `All`: a multiselect with
/// nothing picked means "no restriction", never "exclude everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    #[default]
    All,
    Only(BTreeSet<String>),
}

impl Selection {
    /// Builds a selection from picked values. No values yields `Selection::All`.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Selection::All
        } else {
            Selection::Only(set)
        }
    }

    pub fn is_unrestricted(&self) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.is_empty(),
        }
    }

    pub fn admits(&self, value: &str) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(set) => set.is_empty() || set.contains(value),
        }
    }
}

/// The active filter state of the dashboard.
///
/// Date bounds are inclusive; `None` leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub regions: Selection,
    #[serde(default)]
    pub industries: Selection,
}

impl FilterCriteria {
    /// Criteria that admit every row.
    pub fn unrestricted() -> Self {
        Self::default()
    }

    /// The initial dashboard state: the full date span of `rows`, every region and industry.
    pub fn spanning(rows: &[Transaction]) -> Self {
        let start_date = rows.iter().map(|t| t.order_date).min();
        let end_date = rows.iter().map(|t| t.order_date).max();
        Self {
            start_date,
            end_date,
            ..Self::default()
        }
    }

    pub fn with_date_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    pub fn with_regions(mut self, regions: Selection) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_industries(mut self, industries: Selection) -> Self {
        self.industries = industries;
        self
    }

    /// True when the lower bound lies after the upper bound; such criteria match nothing.
    pub fn is_inverted(&self) -> bool {
        matches!((self.start_date, self.end_date), (Some(start), Some(end)) if start > end)
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date.is_none_or(|start| date >= start)
            && self.end_date.is_none_or(|end| date <= end)
    }

    /// The row inclusion rule of the filter engine.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        self.contains_date(transaction.order_date)
            && self.regions.admits(&transaction.region)
            && self.industries.admits(&transaction.industry)
    }
}

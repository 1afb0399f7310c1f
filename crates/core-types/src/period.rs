use crate::error::CoreError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month, used as the bucket key of monthly series.
///
/// Ordering is chronological: by year, then by month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, CoreError> {
        if !(1..=12).contains(&month) {
            return Err(CoreError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// The month a calendar date falls into.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The calendar month immediately before this one (January wraps to December of the previous year).
    pub fn pred(self) -> Self {
        if self.month == 1 {
            Self { year: self.year - 1, month: 12 }
        } else {
            Self { year: self.year, month: self.month - 1 }
        }
    }

    /// The calendar month immediately after this one.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn quarter(self) -> YearQuarter {
        YearQuarter {
            year: self.year,
            quarter: (self.month - 1) / 3 + 1,
        }
    }

    pub fn first_day(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    /// Every month from `first` to `last`, both inclusive. Empty if `first > last`.
    pub fn span(first: Self, last: Self) -> Vec<Self> {
        let mut months = Vec::new();
        let mut current = first;
        while current <= last {
            months.push(current);
            current = current.succ();
        }
        months
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = CoreError;

    /// Parses the `YYYY-MM` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput("year-month".to_string(), s.to_string());
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month)
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearMonth {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A calendar quarter (Q1 = Jan-Mar, ..., Q4 = Oct-Dec).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearQuarter {
    year: i32,
    quarter: u32,
}

impl YearQuarter {
    pub fn new(year: i32, quarter: u32) -> Result<Self, CoreError> {
        if !(1..=4).contains(&quarter) {
            return Err(CoreError::InvalidQuarter(quarter));
        }
        Ok(Self { year, quarter })
    }

    pub fn of(date: NaiveDate) -> Self {
        YearMonth::of(date).quarter()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn quarter(&self) -> u32 {
        self.quarter
    }

    pub fn pred(self) -> Self {
        if self.quarter == 1 {
            Self { year: self.year - 1, quarter: 4 }
        } else {
            Self { year: self.year, quarter: self.quarter - 1 }
        }
    }

    pub fn succ(self) -> Self {
        if self.quarter == 4 {
            Self { year: self.year + 1, quarter: 1 }
        } else {
            Self { year: self.year, quarter: self.quarter + 1 }
        }
    }

    /// Every quarter from `first` to `last`, both inclusive. Empty if `first > last`.
    pub fn span(first: Self, last: Self) -> Vec<Self> {
        let mut quarters = Vec::new();
        let mut current = first;
        while current <= last {
            quarters.push(current);
            current = current.succ();
        }
        quarters
    }
}

impl fmt::Display for YearQuarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for YearQuarter {
    type Err = CoreError;

    /// Parses the `YYYY-Qn` form produced by `Display`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CoreError::InvalidInput("year-quarter".to_string(), s.to_string());
        let (year, quarter) = s.trim().split_once("-Q").ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let quarter = quarter.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, quarter)
    }
}

impl From<YearQuarter> for String {
    fn from(value: YearQuarter) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearQuarter {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_january_precedes_with_december_of_previous_year() {
        let jan = YearMonth::of(date(2023, 1, 17));
        assert_eq!(jan.pred(), YearMonth::new(2022, 12).unwrap());
        assert_eq!(jan.pred().succ(), jan);
    }

    #[test]
    fn test_months_map_to_their_quarter() {
        assert_eq!(YearQuarter::of(date(2023, 3, 31)), YearQuarter::new(2023, 1).unwrap());
        assert_eq!(YearQuarter::of(date(2023, 4, 1)), YearQuarter::new(2023, 2).unwrap());
        assert_eq!(YearQuarter::of(date(2023, 12, 1)), YearQuarter::new(2023, 4).unwrap());
    }

    #[test]
    fn test_quarter_span_crosses_year_boundary() {
        let span = YearQuarter::span(
            YearQuarter::new(2022, 3).unwrap(),
            YearQuarter::new(2023, 2).unwrap(),
        );
        let labels: Vec<String> = span.iter().map(ToString::to_string).collect();
        assert_eq!(labels, vec!["2022-Q3", "2022-Q4", "2023-Q1", "2023-Q2"]);
    }

    #[test]
    fn test_inverted_span_is_empty() {
        let later = YearMonth::new(2023, 5).unwrap();
        let earlier = YearMonth::new(2023, 2).unwrap();
        assert!(YearMonth::span(later, earlier).is_empty());
    }

    #[test]
    fn test_parse_rejects_out_of_range_values() {
        assert_eq!("2023-13".parse::<YearMonth>(), Err(CoreError::InvalidMonth(13)));
        assert_eq!("2023-Q5".parse::<YearQuarter>(), Err(CoreError::InvalidQuarter(5)));
        assert!("March".parse::<YearMonth>().is_err());
        assert_eq!("2021-Q4".parse::<YearQuarter>().unwrap().to_string(), "2021-Q4");
    }
}

use chrono::NaiveDate;
use core_types::{FilterCriteria, Selection};
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in `salesboard.toml`; missing sections fall back
/// to their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dataset: DatasetSettings,
    pub analysis: AnalysisSettings,
    pub filters: FilterSettings,
    pub logging: LoggingSettings,
    pub output: OutputSettings,
}

/// Where the sales export lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub path: PathBuf,
}

/// Parameters for the ranking and trend views.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Size of the top-products ranking (and of the trend when no products are fixed).
    pub top_n: usize,
    /// Countries kept in the country x segment breakdown.
    pub top_k: usize,
    /// Fixed product list for the monthly trend chart.
    pub trend_products: Option<Vec<String>>,
}

/// The filter state applied when the command line does not override it.
///
/// Empty region/industry lists mean "no restriction".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub regions: Vec<String>,
    pub industries: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default `EnvFilter` directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
}

/// How the report command prints its results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

// --- Default Implementations ---

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: PathBuf::from("SaaS-Sales.csv"),
        }
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            top_n: 5,
            top_k: 15,
            trend_products: None,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
            file_prefix: "salesboard.log".to_string(),
        }
    }
}

impl FilterSettings {
    pub fn to_criteria(&self) -> FilterCriteria {
        FilterCriteria::unrestricted()
            .with_date_range(self.start_date, self.end_date)
            .with_regions(Selection::from_values(self.regions.iter().cloned()))
            .with_industries(Selection::from_values(self.industries.iter().cloned()))
    }
}

use crate::error::ConfigError;
use crate::settings::Config;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AnalysisSettings, DatasetSettings, FilterSettings, LoggingSettings, OutputFormat, OutputSettings,
};

/// Prefix of environment variables that override file settings,
/// e.g. `SALESBOARD__ANALYSIS__TOP_N=10`.
pub const ENV_PREFIX: &str = "SALESBOARD";

/// Loads the application configuration from `path` and the environment.
///
/// The file is optional: without it every setting takes its default. Values
/// from `SALESBOARD__*` environment variables win over the file.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("filters.regions")
                .with_list_parse_key("filters.industries")
                .with_list_parse_key("analysis.trend_products"),
        )
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(path = %path.display(), "Configuration loaded");
    Ok(config)
}

/// Parses configuration from TOML text alone, without consulting the environment.
pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let config = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?
        .try_deserialize::<Config>()?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.top_n == 0 {
            return Err(ConfigError::invalid("analysis.top_n", "must be at least 1"));
        }
        if self.analysis.top_k == 0 {
            return Err(ConfigError::invalid("analysis.top_k", "must be at least 1"));
        }
        if self.dataset.path.as_os_str().is_empty() {
            return Err(ConfigError::invalid("dataset.path", "must not be empty"));
        }
        Ok(())
    }
}

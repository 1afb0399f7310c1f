use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file or a `SALESBOARD__*` variable could not be read or deserialized.
    #[error("Failed to read configuration sources: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid setting `{key}`: {reason}")]
    InvalidSetting {
        key: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub(crate) fn invalid(key: &'static str, reason: &'static str) -> Self {
        Self::InvalidSetting { key, reason }
    }
}

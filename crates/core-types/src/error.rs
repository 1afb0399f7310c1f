use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    InvalidInput(String, String),

    #[error("Calendar month {0} is out of range (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Calendar quarter {0} is out of range (expected 1-4)")]
    InvalidQuarter(u32),
}

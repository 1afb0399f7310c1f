use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Failed to open dataset file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("Required column '{0}' is missing from the CSV header")]
    MissingColumn(&'static str),

    #[error("The dataset cache lock was poisoned by a panicking reader")]
    CachePoisoned,
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FiscalFrameError {
    #[error("Invalid fiscal year end '{0}': expected MMDD (e.g. 0930)")]
    InvalidFiscalYearEnd(String),

    #[error("Invalid input document: {0}")]
    InvalidInput(String),

    #[error("Failed to read input '{path}': {source}")]
    ReadInput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write output '{path}': {source}")]
    WriteOutput {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, FiscalFrameError>;

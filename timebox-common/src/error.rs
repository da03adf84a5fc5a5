use thiserror::Error;

/// Common error type for Timebox components.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid dataset: {0}")]
    Dataset(String),
}

/// Result type alias using Timebox's Error.
pub type Result<T> = std::result::Result<T, Error>;

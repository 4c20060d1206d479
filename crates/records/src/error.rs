use thiserror::Error;

/// Result type for record loading
pub type Result<T> = std::result::Result<T, RecordsError>;

/// Errors raised while fetching or decoding a record collection
#[derive(Error, Debug)]
pub enum RecordsError {
    /// Reading a local collection failed
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The payload is not valid JSON
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Fetching a remote collection failed
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Valid JSON, but neither a bare array nor a known wrapper object
    #[error("Malformed document: {0}")]
    MalformedDocument(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl RecordsError {
    /// Create a malformed document error
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedDocument(msg.into())
    }
}

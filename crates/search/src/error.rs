use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SearchError {
    #[error("Page size must be positive")]
    ZeroPageSize,

    #[error("Unknown page mode: {0}")]
    UnknownPageMode(String),

    #[error("Unknown ordering rule: {0}")]
    UnknownOrdering(String),
}

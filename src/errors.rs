use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AnalyticsError {
    #[error("Empty input: {0}")]
    EmptyInput(String),
    #[error("Insufficient data: need at least {needed} points, got {actual}")]
    InsufficientData { needed: usize, actual: usize },
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

impl From<String> for AnalyticsError {
    fn from(value: String) -> Self {
        AnalyticsError::Validation(value)
    }
}

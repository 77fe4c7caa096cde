use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NewswatchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Persistence error: {0}")]
    Persistence(#[from] std::io::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Keyword already exists: {0}")]
    Duplicate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl NewswatchError {
    /// Errors that only cost one keyword its results for the current scan.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            NewswatchError::Http(_)
                | NewswatchError::FeedParse(_)
                | NewswatchError::Timeout(_)
                | NewswatchError::InvalidUrl(_)
        )
    }

    pub fn is_persistence_failure(&self) -> bool {
        matches!(
            self,
            NewswatchError::Persistence(_) | NewswatchError::Encoding(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, NewswatchError>;

//! Crate-wide error type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum Error {
    #[error("Cannot build a contract from input {input:?}: {reason}")]
    Parse { input: String, reason: String },
    #[error("A position needs at least one contract")]
    EmptyPosition,
    #[error("Not a valid slope: {0}")]
    InvalidSlope(String),
    #[error("Not a valid price range: {0}")]
    InvalidPriceRange(String),
}

impl Error {
    pub(crate) fn parse(input: &str, reason: impl Into<String>) -> Self {
        Error::Parse {
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

/// Errors raised by the helper functions in this crate
#[derive(Error, Debug)]
pub enum UtilsError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
}

#[derive(Error, Debug, PartialEq)]
pub enum ParseError {
    #[error("Failed to parse: {0}")]
    InvalidFormat(String),

    #[error("Missing value: {0}")]
    MissingValue(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, UtilsError>;

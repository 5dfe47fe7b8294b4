use thiserror::Error;

/// Errors raised while turning a raw API payload into typed values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Cannot coerce field '{field}' from value '{value}'")]
    FieldCoercion { field: String, value: String },
}

impl DecodeError {
    /// Name of the offending field, if the error is tied to one
    pub fn field(&self) -> Option<&str> {
        match self {
            DecodeError::FieldCoercion { field, .. } => Some(field),
            DecodeError::MalformedPayload(_) => None,
        }
    }
}

impl From<serde_json::Error> for DecodeError {
    fn from(err: serde_json::Error) -> Self {
        DecodeError::MalformedPayload(err.to_string())
    }
}

/// Request arguments rejected before anything is sent
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required value: {0}")]
    MissingValue(String),

    #[error("Invalid value for {field}: {value} (must be positive)")]
    NotPositive { field: String, value: i64 },
}

pub type Result<T> = std::result::Result<T, DecodeError>;

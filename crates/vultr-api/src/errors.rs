use thiserror::Error;

/// API-specific errors for vultr-api
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Decode error: {0}")]
    Decode(#[from] vultr_core::DecodeError),

    #[error("Invalid input: {0}")]
    InvalidInput(#[from] vultr_core::ValidationError),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Transport failures, passed through unchanged from the HTTP layer
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Rate limited")]
    RateLimited,

    #[error("Service unavailable")]
    ServiceUnavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ApiError>;

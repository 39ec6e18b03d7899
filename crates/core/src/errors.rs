//! Core error types for the Chama client.
//!
//! Transport-specific errors (reqwest, JSON decoding) are converted to these
//! types by the client crate so views only ever see one error type.

use std::num::ParseIntError;
use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the client.
///
/// Every variant flattens to a human-readable message through `Display`,
/// which is what views put in their error banner.
#[derive(Error, Debug)]
pub enum Error {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a response (DNS, connect, timeout...).
    #[error("Network error: {0}")]
    Network(String),

    /// An operation needed a session and none exists.
    #[error("Not authenticated: {0}")]
    Unauthenticated(String),

    #[error("{0}")]
    Validation(#[from] ValidationError),

    #[error("Secret store error: {0}")]
    Secret(String),

    #[error("Invalid configuration value: {0}")]
    Config(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// HTTP status of a server-reported error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthenticated(_)) || self.status() == Some(401)
    }
}

/// Presentational validation failures raised by forms before anything is sent.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount exceeds the limit of {limit}")]
    AmountAboveLimit { limit: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<rust_decimal::Error> for ValidationError {
    fn from(err: rust_decimal::Error) -> Self {
        ValidationError::InvalidAmount(err.to_string())
    }
}

impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(err.into())
    }
}

impl From<ParseIntError> for Error {
    fn from(err: ParseIntError) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Unexpected(err.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Secret(err.to_string())
    }
}

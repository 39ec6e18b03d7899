//! Error types for the HTTP client.

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors raised while talking to the savings API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP client error (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-2xx response; `message` is what the server said, or a generic
    /// message for the operation when it said nothing usable.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Missing or malformed bearer token
    #[error("Authentication error: {0}")]
    Auth(String),
}

impl ClientError {
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }
}

impl From<ClientError> for chama_core::Error {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) => chama_core::Error::Network(e.to_string()),
            ClientError::Json(e) => chama_core::Error::Unexpected(e.to_string()),
            ClientError::Api { status, message } => chama_core::Error::Api { status, message },
            ClientError::Auth(message) => chama_core::Error::Unauthenticated(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_status_and_message() {
        let core: chama_core::Error = ClientError::api(400, "Insufficient balance").into();
        assert_eq!(core.status(), Some(400));
        assert_eq!(core.to_string(), "Insufficient balance");
    }

    #[test]
    fn auth_error_is_unauthorized() {
        let core: chama_core::Error = ClientError::auth("Invalid access token format").into();
        assert!(core.is_unauthorized());
    }
}

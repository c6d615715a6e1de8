//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status. `message` is the service's own message when the
    /// error body could be parsed, else the HTTP status line.
    #[error("Catalog request failed ({status}): {message}")]
    Fetch { status: u16, message: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<ClientError> for shared::AppError {
    fn from(err: ClientError) -> Self {
        let reason = match &err {
            ClientError::Fetch { message, .. } => message.clone(),
            other => other.to_string(),
        };
        shared::AppError::catalog_unavailable(reason)
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

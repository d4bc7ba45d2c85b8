//! Client error types

use thiserror::Error;

use shared::{BoardError, CartError, ValidationError};

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rejected by the back-end (400 / 422)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Account exists but is disabled
    #[error("Account is inactive")]
    InactiveAccount,

    /// Rejected locally before reaching the network
    #[error(transparent)]
    Input(#[from] ValidationError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Board(#[from] BoardError),

    /// Push channel failure
    #[error("Push channel error: {0}")]
    Push(String),

    /// Local session storage failure
    #[error("Session storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// The session is gone and the user must log in again
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Unauthorized)
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Unauthorized => Some(401),
            ClientError::Forbidden(_) => Some(403),
            ClientError::NotFound(_) => Some(404),
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

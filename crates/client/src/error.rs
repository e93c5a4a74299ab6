//! Client error model.
//!
//! Every failure is both recorded in the owning module's status slot (as a
//! human-readable message) and returned to the caller unchanged.

use thiserror::Error;

use stockpad_auth::{SessionError, StorageError};

/// Transport/server failures for a single HTTP call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("API error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's own `message` field, when it sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Api {
                message: Some(message),
                ..
            } => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("session storage failed: {0}")]
    Storage(#[from] StorageError),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Raised before any network call was attempted.
    pub fn is_precondition(&self) -> bool {
        matches!(self, ClientError::Session(_))
    }

    /// Message for the status slot: the server's message if present, then the
    /// precondition's own message, then the operation's fixed fallback.
    pub fn display_message(&self, fallback: &str) -> String {
        match self {
            ClientError::Session(err) => err.to_string(),
            ClientError::Api(err) => err
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            ClientError::Storage(_) => fallback.to_string(),
        }
    }
}

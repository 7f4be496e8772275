//! Error types for the synchronization engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SyncError>;

/// Fallback shown when an error carries no usable message
pub const DEFAULT_ERROR_MESSAGE: &str = "Something went wrong";

/// Errors that can occur while synchronizing with the remote API
#[derive(Debug, Error)]
pub enum SyncError {
    /// Structured error payload returned by the server
    #[error("API error {status} ({name}): {message}")]
    Api {
        status: u16,
        name: String,
        message: String,
    },

    /// Transport-level failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response without a decodable error payload
    #[error("Unexpected response: HTTP {0}")]
    UnexpectedStatus(u16),

    /// Domain error from the core model (cache drift, bad status)
    #[error(transparent)]
    Core(#[from] td_core::Error),

    /// A mutation for this task id is already in flight
    #[error("Action already in flight for task {0}")]
    ActionInFlight(i64),
}

impl SyncError {
    /// True for the integrity errors that indicate the cache has
    /// drifted from the server or received malformed status data
    pub fn is_integrity(&self) -> bool {
        matches!(
            self,
            Self::Core(td_core::Error::TaskNotFound(_) | td_core::Error::StatusNotFound(_))
        )
    }

    /// Best-effort human-readable message
    ///
    /// Prefers the structured server message, falls back to the
    /// error's own display, then to a fixed default.
    pub fn user_message(&self) -> String {
        let message = match self {
            Self::Api { message, .. } if !message.is_empty() => message.clone(),
            other => other.to_string(),
        };
        if message.is_empty() {
            DEFAULT_ERROR_MESSAGE.to_string()
        } else {
            message
        }
    }
}

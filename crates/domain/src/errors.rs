//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Fieldtrace
///
/// Every failure path in the client collapses into one of these variants so
/// the host layer can render a single user-facing message. No variant is
/// fatal to the process.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum FieldtraceError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP error, status={status}: {message}")]
    Http { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Malformed response body: {0}")]
    MalformedResponse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// A 2xx envelope with `success: false`; the payload is the
    /// server-provided, user-facing message.
    #[error("{0}")]
    Rejected(String),
}

/// Result type alias for Fieldtrace operations
pub type Result<T> = std::result::Result<T, FieldtraceError>;

//! Request pipeline error types
//!
//! Every call through the pipeline resolves to a decoded envelope or exactly
//! one of these variants; no raw transport error escapes.

use std::time::Duration;

use fieldtrace_domain::FieldtraceError;
use thiserror::Error;

/// Errors surfaced by [`crate::api::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured wall-clock bound elapsed before a response arrived.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Non-success HTTP status, message taken from the response body when
    /// parseable.
    #[error("HTTP error, status={status}: {message}")]
    Http { status: u16, message: String },

    /// DNS, connection, or TLS failure below the HTTP layer.
    #[error("Network error: {0}")]
    Network(String),

    /// Success status but a body that does not decode as the expected
    /// envelope.
    #[error("Malformed response body: {0}")]
    MalformedResponse(String),

    /// Client construction or URL resolution failure.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ApiError {
    /// True when no response was produced at all (candidate for the local
    /// demo-login fallback).
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::Network(_))
    }

    /// Classify a transport-level [`reqwest::Error`].
    pub(crate) fn from_transport(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Network(err.to_string())
        }
    }
}

impl From<ApiError> for FieldtraceError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Timeout(duration) => Self::Timeout(duration.as_millis() as u64),
            ApiError::Http { status, message } => Self::Http { status, message },
            ApiError::Network(message) => Self::Network(message),
            ApiError::MalformedResponse(message) => Self::MalformedResponse(message),
            ApiError::Config(message) => Self::Config(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failures_are_timeout_and_network() {
        assert!(ApiError::Timeout(Duration::from_secs(10)).is_transport_failure());
        assert!(ApiError::Network("refused".into()).is_transport_failure());
        assert!(!ApiError::Http { status: 500, message: "boom".into() }.is_transport_failure());
        assert!(!ApiError::MalformedResponse("eof".into()).is_transport_failure());
    }

    #[test]
    fn converts_into_domain_error() {
        let err: FieldtraceError = ApiError::Http { status: 404, message: "missing".into() }.into();
        assert!(matches!(err, FieldtraceError::Http { status: 404, .. }));

        let err: FieldtraceError = ApiError::Timeout(Duration::from_millis(10_000)).into();
        assert!(matches!(err, FieldtraceError::Timeout(10_000)));
    }
}

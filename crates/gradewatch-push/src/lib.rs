//! GradeWatch Push - Notification delivery
//!
//! Provides the [`client::PushPlusClient`] adapter that implements the
//! core's `IPushService` port by posting messages to a PushPlus-compatible
//! HTTP endpoint.
//!
//! ## Modules
//!
//! - [`client`] - HTTP client for the push endpoint

pub mod client;

pub use client::{PushPlusClient, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT};

use thiserror::Error;

/// Errors that can occur when delivering a push notification
#[derive(Debug, Error)]
pub enum PushError {
    /// The request could not be built or sent (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The endpoint answered with a non-success HTTP status
    #[error("Push endpoint returned HTTP {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, truncated
        body: String,
    },

    /// The endpoint accepted the request but refused the message
    /// (for example an invalid token)
    #[error("Push rejected with code {code}: {message}")]
    Rejected {
        /// Service-level result code
        code: i64,
        /// Service-level message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PushError::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Push endpoint returned HTTP 503: unavailable");

        let err = PushError::Rejected {
            code: 903,
            message: "invalid token".to_string(),
        };
        assert_eq!(err.to_string(), "Push rejected with code 903: invalid token");
    }
}

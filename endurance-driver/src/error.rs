//! Driver error types.

use std::time::Duration;
use thiserror::Error;

/// Errors returned by browser sessions and launchers.
#[derive(Debug, Clone, Error)]
pub enum DriverError {
    /// The locator matched nothing on the current page.
    #[error("no such element: {0}")]
    NoSuchElement(String),

    /// A bounded wait ran out of time.
    #[error("timed out after {waited:?} waiting for {what}")]
    Timeout {
        /// What was being waited for.
        what: String,
        /// How long the wait lasted.
        waited: Duration,
    },

    /// The remote end answered with a WebDriver error object.
    #[error("webdriver error `{code}`: {message}")]
    WebDriver {
        /// W3C error code (e.g. `stale element reference`).
        code: String,
        /// Human-readable message from the remote end.
        message: String,
    },

    /// The session was already closed or the hub no longer knows it.
    #[error("session closed")]
    SessionClosed,

    /// Could not reach the hub.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP transport failure.
    #[error("http error: {0}")]
    Http(String),

    /// The remote end sent something we could not interpret.
    #[error("unexpected response: {0}")]
    Protocol(String),
}

impl From<reqwest::Error> for DriverError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            DriverError::ConnectionFailed(e.to_string())
        } else {
            DriverError::Http(e.to_string())
        }
    }
}

impl DriverError {
    /// Map a W3C error code and message onto a driver error.
    pub(crate) fn from_w3c(code: &str, message: &str) -> Self {
        match code {
            "no such element" => DriverError::NoSuchElement(message.to_string()),
            "invalid session id" => DriverError::SessionClosed,
            _ => DriverError::WebDriver {
                code: code.to_string(),
                message: message.to_string(),
            },
        }
    }

    /// Returns true if retrying the lookup later could succeed.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DriverError::NoSuchElement(_))
    }
}

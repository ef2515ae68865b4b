//! Error types for appliance operations.
//!
//! Errors are categorized so callers can tell transient network failures
//! from configuration and protocol problems.

use std::fmt;

/// Result type alias for appliance operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of appliance errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Network-related errors (transient, retryable).
    Network,
    /// Authentication or session failure.
    Auth,
    /// Response the client could not interpret.
    Protocol,
    /// Client-side misconfiguration.
    Config,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Auth => "Appliance authentication failed",
            Self::Protocol => "Unexpected appliance response",
            Self::Config => "Client configuration error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the appliance.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {message}")]
    Http {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Login was rejected or the session token expired.
    #[error("appliance authentication failed: {0}")]
    Auth(String),

    /// Response body did not match the expected shape.
    #[error("invalid appliance response: {0}")]
    InvalidResponse(String),

    /// No route registered for a custom operation.
    #[error("no route for {kind} operation '{op}'")]
    UnknownOperation { kind: String, op: String },

    /// Client-side configuration problem.
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::Http {
            message: message.into(),
            status,
        }
    }

    /// Get the error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Http { .. } => ErrorCategory::Network,
            Error::Auth(_) => ErrorCategory::Auth,
            Error::InvalidResponse(_) => ErrorCategory::Protocol,
            Error::UnknownOperation { .. } => ErrorCategory::Config,
            Error::Config(_) => ErrorCategory::Config,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// HTTP status code carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::Http {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::Http {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::InvalidResponse(err.to_string())
    }
}

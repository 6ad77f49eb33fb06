//! Error types for control-plane API operations.
//!
//! Every failure the client can produce falls into one of a few categories:
//! the request never completed (transport), the server answered with a status
//! outside the documented success set, the resource does not exist, or a body
//! could not be encoded or decoded. None of them are retried by the client.

use std::fmt;

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of API errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection, DNS, TLS or timeout failure.
    Transport,
    /// Server answered with an unexpected status code.
    Status,
    /// The addressed resource does not exist.
    NotFound,
    /// A response body did not have the expected shape.
    Decode,
    /// A request body could not be serialized.
    Encode,
}

impl ErrorCategory {
    /// Whether the remote resource is known to be gone.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transport => "Could not reach the API",
            Self::Status => "Unexpected API response",
            Self::NotFound => "Resource not found",
            Self::Decode => "Malformed API response",
            Self::Encode => "Invalid request payload",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Transport => "Check the API URL and your network connection, then re-run",
            Self::Status => "Check your API key permissions and the resource configuration",
            Self::NotFound => "Run `npctl plan` to refresh state; the resource will be recreated",
            Self::Decode => "The API returned an unexpected body; check the client version",
            Self::Encode => "Check the declared values in the manifest",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur while talking to the control-plane API.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request did not complete.
    #[error("{method} {path} failed: {message}")]
    Transport {
        /// HTTP method of the failed request.
        method: String,
        /// Request path.
        path: String,
        /// Underlying transport message.
        message: String,
    },

    /// The server answered outside the success set of the operation.
    #[error("error {operation}, got status code: {status}")]
    UnexpectedStatus {
        /// Operation being performed (e.g. "creating scope").
        operation: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The server answered 404.
    #[error("error {operation}, resource not found: {path}")]
    NotFound {
        /// Operation being performed.
        operation: &'static str,
        /// Request path.
        path: String,
    },

    /// The response body did not decode into the expected record.
    #[error("error {operation}, could not decode response: {message}")]
    Decode {
        /// Operation being performed.
        operation: &'static str,
        /// Decoder message.
        message: String,
    },

    /// The request body could not be serialized.
    #[error("could not encode request body: {0}")]
    Encode(String),
}

impl Error {
    /// Create a transport error.
    pub fn transport(method: impl fmt::Display, path: &str, message: impl fmt::Display) -> Self {
        Self::Transport {
            method: method.to_string(),
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a decode error.
    pub fn decode(operation: &'static str, message: impl fmt::Display) -> Self {
        Self::Decode {
            operation,
            message: message.to_string(),
        }
    }

    /// Get the error category.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport { .. } => ErrorCategory::Transport,
            Error::UnexpectedStatus { .. } => ErrorCategory::Status,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Decode { .. } => ErrorCategory::Decode,
            Error::Encode(_) => ErrorCategory::Encode,
        }
    }

    /// Whether this error means the remote resource does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.category().is_not_found()
    }

    /// HTTP status code, when the server answered.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::UnexpectedStatus { status, .. } => Some(*status),
            Error::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_description() {
        assert!(!ErrorCategory::Transport.description().is_empty());
        assert!(!ErrorCategory::Status.description().is_empty());
        assert!(!ErrorCategory::NotFound.description().is_empty());
        assert!(!ErrorCategory::Decode.description().is_empty());
    }

    #[test]
    fn test_error_category_advice() {
        assert!(!ErrorCategory::Transport.advice().is_empty());
        assert!(!ErrorCategory::Encode.advice().is_empty());
    }

    #[test]
    fn test_error_category_display() {
        let display = format!("{}", ErrorCategory::NotFound);
        assert!(display.contains("not found"));
    }

    #[test]
    fn test_unexpected_status_display() {
        let err = Error::UnexpectedStatus {
            operation: "patching scope",
            status: 500,
        };
        assert_eq!(err.to_string(), "error patching scope, got status code: 500");
        assert_eq!(err.category(), ErrorCategory::Status);
        assert_eq!(err.status(), Some(500));
    }

    #[test]
    fn test_not_found_category() {
        let err = Error::NotFound {
            operation: "getting scope",
            path: "/scope/901".to_string(),
        };
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_transport_constructor() {
        let err = Error::transport("GET", "/scope/1", "connection refused");
        match &err {
            Error::Transport {
                method,
                path,
                message,
            } => {
                assert_eq!(method, "GET");
                assert_eq!(path, "/scope/1");
                assert_eq!(message, "connection refused");
            }
            _ => panic!("Expected Error::Transport"),
        }
        assert_eq!(err.status(), None);
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_decode_constructor() {
        let err = Error::decode("getting provider", "missing field `id`");
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert!(err.to_string().contains("missing field"));
    }
}

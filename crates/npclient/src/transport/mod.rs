//! Transport abstraction for control-plane requests.
//!
//! The [`Transport`] trait is the narrow `request(method, path, body)` seam the
//! client is built on. [`http::HttpTransport`] talks to the real API;
//! [`MockTransport`] replays scripted responses and records every request.
//!
//! # Testing
//!
//! ```
//! use npclient::transport::{Method, MockTransport, Response, Transport};
//!
//! let mock = MockTransport::new();
//! mock.push(Response::json(200, &serde_json::json!({"id": 1})));
//!
//! let response = mock.request(Method::Get, "/scope/1", None).unwrap();
//! assert_eq!(response.status, 200);
//! assert_eq!(mock.requests().len(), 1);
//! ```

pub mod http;

use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    /// Upper-case method name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw API response: status code plus body bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub body: Vec<u8>,
}

impl Response {
    /// Create a response from a status and raw body.
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Create a response with an empty body.
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, Vec::new())
    }

    /// Create a response carrying a JSON document.
    #[must_use]
    pub fn json(status: u16, value: &serde_json::Value) -> Self {
        Self::new(status, value.to_string())
    }

    /// Whether the status is one of `accepted`.
    #[must_use]
    pub fn status_in(&self, accepted: &[u16]) -> bool {
        accepted.contains(&self.status)
    }
}

/// Transport trait for issuing API requests.
///
/// Implementations must not turn non-2xx statuses into errors; status
/// handling belongs to the client. Only failures to complete the exchange
/// are reported as [`Error::Transport`].
pub trait Transport: Send + Sync {
    /// Issue a request with an optional JSON body.
    fn request(&self, method: Method, path: &str, body: Option<&[u8]>) -> Result<Response>;
}

/// A request observed by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    /// Body decoded as JSON, when one was sent.
    pub body: Option<serde_json::Value>,
}

/// Mock transport for testing without network access.
///
/// Responses are returned in the order they were pushed. Clones share the
/// same script and request log, so a test can keep a handle after giving one
/// to the client.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<std::result::Result<Response, String>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockTransport {
    /// Create a mock with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response.
    pub fn push(&self, response: Response) {
        self.script.lock().unwrap_or_else(PoisonError::into_inner).push_back(Ok(response));
    }

    /// Queue a transport failure.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.script.lock().unwrap_or_else(PoisonError::into_inner).push_back(Err(message.into()));
    }

    /// All requests issued so far.
    #[must_use]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Number of scripted responses not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Transport for MockTransport {
    fn request(&self, method: Method, path: &str, body: Option<&[u8]>) -> Result<Response> {
        let body = body.map(|b| serde_json::from_slice(b).unwrap_or(serde_json::Value::Null));
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(RecordedRequest {
            method,
            path: path.to_string(),
            body,
        });

        match self.script.lock().unwrap_or_else(PoisonError::into_inner).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(Error::transport(method, path, message)),
            None => Err(Error::transport(method, path, "no scripted response")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_display() {
        assert_eq!(Method::Patch.to_string(), "PATCH");
        assert_eq!(Method::Delete.as_str(), "DELETE");
    }

    #[test]
    fn test_response_status_in() {
        let response = Response::empty(204);
        assert!(response.status_in(&[200, 204]));
        assert!(!response.status_in(&[200]));
    }

    #[test]
    fn test_mock_replays_in_order() {
        let mock = MockTransport::new();
        mock.push(Response::empty(200));
        mock.push(Response::empty(204));

        assert_eq!(mock.request(Method::Get, "/a", None).unwrap().status, 200);
        assert_eq!(mock.request(Method::Get, "/b", None).unwrap().status, 204);
        assert_eq!(mock.remaining(), 0);
    }

    #[test]
    fn test_mock_records_json_body() {
        let mock = MockTransport::new();
        mock.push(Response::empty(200));
        let clone = mock.clone();

        mock.request(Method::Post, "/scope", Some(&br#"{"name":"x"}"#[..]))
            .unwrap();

        let requests = clone.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::Post);
        assert_eq!(requests[0].path, "/scope");
        assert_eq!(requests[0].body, Some(serde_json::json!({"name": "x"})));
    }

    #[test]
    fn test_mock_scripted_failure() {
        let mock = MockTransport::new();
        mock.push_failure("connection reset");

        let err = mock.request(Method::Get, "/scope/1", None).unwrap_err();
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_mock_exhausted_script() {
        let mock = MockTransport::new();
        assert!(mock.request(Method::Get, "/scope/1", None).is_err());
    }
}

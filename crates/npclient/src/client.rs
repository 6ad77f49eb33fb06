//! The [`NullClient`] and its request/response plumbing.
//!
//! Typed operations live next to the resource they address
//! (`scope.rs`, `dimension.rs`, `provider.rs`); this module only knows how
//! to encode a body, send it, check the status and decode the answer.

use crate::error::{Error, Result};
use crate::transport::http::HttpTransport;
use crate::transport::{Method, Response, Transport};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Client for the control-plane API.
///
/// # Example
///
/// ```
/// use npclient::{MockTransport, NullClient, Response};
///
/// let mock = MockTransport::new();
/// mock.push(Response::json(200, &serde_json::json!({
///     "id": 901,
///     "nrn": "organization=1:account=2:application=42:scope=901",
///     "name": "checkout-api",
///     "application_id": 42
/// })));
///
/// let client = NullClient::with_transport(mock);
/// let scope = client.get_scope("901").unwrap();
/// assert_eq!(scope.name, "checkout-api");
/// ```
pub struct NullClient {
    transport: Box<dyn Transport>,
}

impl NullClient {
    /// Create a client for `api_base` using the HTTP transport.
    #[must_use]
    pub fn new(api_base: &str, api_key: Option<&str>, timeout: Duration) -> Self {
        let mut transport = HttpTransport::new(api_base, timeout);
        if let Some(key) = api_key {
            transport = transport.with_api_key(key);
        }
        Self::with_transport(transport)
    }

    /// Create a client with a custom transport (useful for testing).
    #[must_use]
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Send a request, encoding `body` as JSON.
    pub(crate) fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response> {
        let encoded = match body {
            Some(b) => {
                let bytes = serde_json::to_vec(b).map_err(|e| Error::Encode(e.to_string()))?;
                log::debug!("{method} {path} body: {}", String::from_utf8_lossy(&bytes));
                Some(bytes)
            }
            None => None,
        };
        self.transport.request(method, path, encoded.as_deref())
    }

    /// Send a request without a body.
    pub(crate) fn send_empty(&self, method: Method, path: &str) -> Result<Response> {
        self.send::<()>(method, path, None)
    }
}

/// Fail unless the response status is one of `accepted`.
///
/// A 404 becomes [`Error::NotFound`] so callers can tell a missing resource
/// apart from other failures.
pub(crate) fn expect_status(
    operation: &'static str,
    path: &str,
    response: &Response,
    accepted: &[u16],
) -> Result<()> {
    if response.status_in(accepted) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(Error::NotFound {
            operation,
            path: path.to_string(),
        });
    }
    Err(Error::UnexpectedStatus {
        operation,
        status: response.status,
    })
}

/// Decode a JSON response body.
pub(crate) fn decode<T: DeserializeOwned>(operation: &'static str, response: &Response) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| Error::decode(operation, e))
}

//! Real HTTP transport backed by a blocking `ureq` agent.

use crate::error::{Error, Result};
use crate::transport::{Method, Response, Transport};
use std::time::Duration;

/// Default API base URL.
pub const DEFAULT_API_BASE: &str = "https://api.nullplatform.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport for the control-plane API.
///
/// Status codes are handed back untouched; the agent is configured so that
/// 4xx/5xx answers are responses, not errors.
pub struct HttpTransport {
    /// HTTP agent for requests.
    agent: ureq::Agent,
    /// API base URL, without trailing slash.
    api_base: String,
    /// Bearer token sent on every request.
    api_key: Option<String>,
}

impl HttpTransport {
    /// Create a transport for `api_base` with a global request timeout.
    #[must_use]
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            api_key: None,
        }
    }

    /// Authenticate every request with `api_key`.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Build the full URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    fn authorize<B>(&self, request: ureq::RequestBuilder<B>) -> ureq::RequestBuilder<B> {
        let request = request
            .header("Accept", "application/json")
            .header("User-Agent", "npctl");
        match &self.api_key {
            Some(key) => request.header("Authorization", format!("Bearer {key}")),
            None => request,
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE, DEFAULT_TIMEOUT)
    }
}

impl Transport for HttpTransport {
    fn request(&self, method: Method, path: &str, body: Option<&[u8]>) -> Result<Response> {
        let url = self.url(path);
        log::debug!("{method} {url}");

        let result = match method {
            Method::Get => self.authorize(self.agent.get(&url)).call(),
            Method::Delete => self.authorize(self.agent.delete(&url)).call(),
            Method::Post | Method::Patch => {
                let request = if method == Method::Post {
                    self.agent.post(&url)
                } else {
                    self.agent.patch(&url)
                };
                let request = self
                    .authorize(request)
                    .header("Content-Type", "application/json");
                match body {
                    Some(bytes) => request.send(bytes),
                    None => request.send_empty(),
                }
            }
        };

        let mut response = result.map_err(|e| Error::transport(method, path, e))?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_vec()
            .map_err(|e| Error::transport(method, path, e))?;

        log::debug!("{method} {url} -> {status}");
        Ok(Response::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_path() {
        let transport = HttpTransport::new("https://api.example.com/", DEFAULT_TIMEOUT);
        assert_eq!(transport.api_base(), "https://api.example.com");
        assert_eq!(
            transport.url("/scope/901"),
            "https://api.example.com/scope/901"
        );
    }

    #[test]
    fn test_default_impl() {
        let transport = HttpTransport::default();
        assert_eq!(transport.api_base(), DEFAULT_API_BASE);
        assert!(transport.api_key.is_none());
    }

    #[test]
    fn test_with_api_key() {
        let transport = HttpTransport::default().with_api_key("secret");
        assert_eq!(transport.api_key.as_deref(), Some("secret"));
    }
}

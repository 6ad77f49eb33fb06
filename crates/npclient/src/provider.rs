//! Provider and provider specification endpoints.

use crate::client::{NullClient, decode, expect_status};
use crate::error::{Error, Result};
use crate::transport::Method;
use crate::types::{ApiErrors, NpProvider, NpSpecification, ProviderPatch};

/// Collection path for providers.
pub const PROVIDER_PATH: &str = "/provider";

/// Collection path for provider specifications.
pub const SPECIFICATION_PATH: &str = "/provider_specification";

/// Path of a single provider.
#[must_use]
pub fn provider_path(id: &str) -> String {
    format!("{PROVIDER_PATH}/{id}")
}

impl NullClient {
    /// Create a provider.
    ///
    /// A 400 answer is first decoded as [`ApiErrors`]. If that decode fails
    /// the decode failure is returned; otherwise the structured body is only
    /// logged and the status error is returned.
    pub fn create_provider(&self, provider: &NpProvider) -> Result<NpProvider> {
        const OPERATION: &str = "creating provider resource";

        let response = self.send(Method::Post, PROVIDER_PATH, Some(provider))?;
        if response.status != 200 {
            if response.status == 400 {
                match serde_json::from_slice::<ApiErrors>(&response.body) {
                    Err(e) => {
                        return Err(Error::decode(OPERATION, e.to_string().to_lowercase()));
                    }
                    Ok(api_errors) => {
                        log::debug!(
                            "provider rejected: {} ({} details)",
                            api_errors.message,
                            api_errors.errors.len()
                        );
                    }
                }
            }
            return Err(Error::UnexpectedStatus {
                operation: OPERATION,
                status: response.status,
            });
        }
        decode(OPERATION, &response)
    }

    /// Fetch a provider by id.
    pub fn get_provider(&self, id: &str) -> Result<NpProvider> {
        let path = provider_path(id);
        let response = self.send_empty(Method::Get, &path)?;
        expect_status("getting provider resource", &path, &response, &[200])?;
        decode("getting provider resource", &response)
    }

    /// Apply a partial update to a provider.
    pub fn patch_provider(&self, id: &str, patch: &ProviderPatch<'_>) -> Result<()> {
        let path = provider_path(id);
        let response = self.send(Method::Patch, &path, Some(patch))?;
        expect_status("patching provider resource", &path, &response, &[200, 204])
    }

    /// Delete a provider.
    pub fn delete_provider(&self, id: &str) -> Result<()> {
        let path = provider_path(id);
        let response = self.send_empty(Method::Delete, &path)?;
        expect_status("deleting provider resource", &path, &response, &[200, 204])
    }

    /// Resolve a specification slug to its id.
    pub fn specification_id_from_slug(&self, slug: &str) -> Result<String> {
        let path = format!("{SPECIFICATION_PATH}?slug={}", urlencoding::encode(slug));
        let response = self.send_empty(Method::Get, &path)?;
        expect_status("getting specification", &path, &response, &[200])?;
        let spec: NpSpecification = decode("getting specification", &response)?;
        Ok(spec.id)
    }

    /// Resolve a specification id to its slug.
    pub fn specification_slug_from_id(&self, id: &str) -> Result<String> {
        let path = format!("{SPECIFICATION_PATH}/{id}");
        let response = self.send_empty(Method::Get, &path)?;
        expect_status("getting specification", &path, &response, &[200])?;
        let spec: NpSpecification = decode("getting specification", &response)?;
        Ok(spec.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use crate::transport::{MockTransport, Response};
    use serde_json::json;

    fn provider() -> NpProvider {
        NpProvider {
            nrn: "organization=1:account=2".to_string(),
            specification_id: "spec-9".to_string(),
            ..NpProvider::default()
        }
    }

    #[test]
    fn test_create_provider() {
        let mock = MockTransport::new();
        mock.push(Response::json(
            200,
            &json!({"id": "prov-1", "nrn": "organization=1:account=2", "specificationId": "spec-9"}),
        ));
        let client = NullClient::with_transport(mock.clone());

        let created = client.create_provider(&provider()).unwrap();
        assert_eq!(created.id, "prov-1");
        assert_eq!(mock.requests()[0].path, "/provider");
    }

    #[test]
    fn test_create_provider_rejects_created_status() {
        let mock = MockTransport::new();
        mock.push(Response::json(201, &json!({"id": "prov-1"})));
        let client = NullClient::with_transport(mock);

        let err = client.create_provider(&provider()).unwrap_err();
        assert_eq!(err.status(), Some(201));
    }

    #[test]
    fn test_bad_request_with_structured_body_reports_status() {
        let mock = MockTransport::new();
        mock.push(Response::json(
            400,
            &json!({"message": "invalid attributes", "errors": [{"field": "region"}]}),
        ));
        let client = NullClient::with_transport(mock);

        let err = client.create_provider(&provider()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Status);
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_bad_request_with_garbage_body_reports_decode_failure() {
        let mock = MockTransport::new();
        mock.push(Response::new(400, "<html>Bad Request</html>"));
        let client = NullClient::with_transport(mock);

        let err = client.create_provider(&provider()).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Decode);
        assert_eq!(err.to_string(), err.to_string().to_lowercase());
    }

    #[test]
    fn test_specification_lookups() {
        let mock = MockTransport::new();
        mock.push(Response::json(200, &json!({"id": "spec-9", "slug": "aws-config"})));
        mock.push(Response::json(200, &json!({"id": "spec-9", "slug": "aws-config"})));
        let client = NullClient::with_transport(mock.clone());

        assert_eq!(client.specification_id_from_slug("aws-config").unwrap(), "spec-9");
        assert_eq!(client.specification_slug_from_id("spec-9").unwrap(), "aws-config");

        let requests = mock.requests();
        assert_eq!(requests[0].path, "/provider_specification?slug=aws-config");
        assert_eq!(requests[1].path, "/provider_specification/spec-9");
    }

    #[test]
    fn test_specification_slug_is_query_encoded() {
        let mock = MockTransport::new();
        mock.push(Response::json(200, &json!({"id": "spec-3", "slug": "aws config&x"})));
        let client = NullClient::with_transport(mock.clone());

        assert_eq!(client.specification_id_from_slug("aws config&x").unwrap(), "spec-3");
        assert_eq!(
            mock.requests()[0].path,
            "/provider_specification?slug=aws%20config%26x"
        );
    }

    #[test]
    fn test_delete_provider_unexpected_status() {
        let mock = MockTransport::new();
        mock.push(Response::empty(409));
        let client = NullClient::with_transport(mock);

        assert_eq!(client.delete_provider("prov-1").unwrap_err().status(), Some(409));
    }
}

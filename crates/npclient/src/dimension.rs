//! Dimension value endpoints.

use crate::client::{NullClient, decode, expect_status};
use crate::error::Result;
use crate::transport::Method;
use crate::types::DimensionValue;

/// Collection path for values of `dimension_id`.
#[must_use]
pub fn dimension_values_path(dimension_id: u64) -> String {
    format!("/dimension/{dimension_id}/value")
}

/// Path of a single dimension value.
#[must_use]
pub fn dimension_value_path(dimension_id: u64, id: u64) -> String {
    format!("/dimension/{dimension_id}/value/{id}")
}

impl NullClient {
    /// Create a value within its parent dimension.
    pub fn create_dimension_value(&self, value: &DimensionValue) -> Result<DimensionValue> {
        let path = dimension_values_path(value.dimension_id);
        let response = self.send(Method::Post, &path, Some(value))?;
        expect_status("creating dimension value", &path, &response, &[200])?;
        decode("creating dimension value", &response)
    }

    /// Fetch a dimension value.
    pub fn get_dimension_value(&self, dimension_id: u64, id: u64) -> Result<DimensionValue> {
        let path = dimension_value_path(dimension_id, id);
        let response = self.send_empty(Method::Get, &path)?;
        expect_status("getting dimension value", &path, &response, &[200])?;
        decode("getting dimension value", &response)
    }

    /// Delete a dimension value.
    pub fn delete_dimension_value(&self, dimension_id: u64, id: u64) -> Result<()> {
        let path = dimension_value_path(dimension_id, id);
        let response = self.send_empty(Method::Delete, &path)?;
        expect_status("deleting dimension value", &path, &response, &[200, 204])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{MockTransport, Response};
    use serde_json::json;

    #[test]
    fn test_create_posts_to_parent_dimension() {
        let mock = MockTransport::new();
        mock.push(Response::json(
            200,
            &json!({"id": 31, "dimension_id": 4, "name": "prod", "nrn": "organization=1", "slug": "prod", "status": "active"}),
        ));
        let client = NullClient::with_transport(mock.clone());

        let created = client
            .create_dimension_value(&DimensionValue {
                dimension_id: 4,
                name: "prod".to_string(),
                nrn: "organization=1".to_string(),
                ..DimensionValue::default()
            })
            .unwrap();

        assert_eq!(created.id, Some(31));
        assert_eq!(created.slug.as_deref(), Some("prod"));
        let requests = mock.requests();
        assert_eq!(requests[0].path, "/dimension/4/value");
        assert_eq!(
            requests[0].body,
            Some(json!({"dimension_id": 4, "name": "prod", "nrn": "organization=1"}))
        );
    }

    #[test]
    fn test_create_rejects_created_status() {
        let mock = MockTransport::new();
        mock.push(Response::json(201, &json!({"id": 31, "dimension_id": 4})));
        let client = NullClient::with_transport(mock);

        let err = client
            .create_dimension_value(&DimensionValue {
                dimension_id: 4,
                name: "prod".to_string(),
                ..DimensionValue::default()
            })
            .unwrap_err();
        assert_eq!(err.status(), Some(201));
    }

    #[test]
    fn test_delete_accepts_ok_and_no_content() {
        let mock = MockTransport::new();
        mock.push(Response::empty(200));
        mock.push(Response::empty(204));
        let client = NullClient::with_transport(mock);

        assert!(client.delete_dimension_value(4, 31).is_ok());
        assert!(client.delete_dimension_value(4, 31).is_ok());
    }

    #[test]
    fn test_get_missing_value() {
        let mock = MockTransport::new();
        mock.push(Response::empty(404));
        let client = NullClient::with_transport(mock);

        assert!(client.get_dimension_value(4, 31).unwrap_err().is_not_found());
    }
}

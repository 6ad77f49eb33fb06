//! `provider` resource - attributes are the only updatable field

use super::{require_str, touch};
use crate::reconcile::{ProviderDesired, ProviderObserved, ProviderReconciler};
use anyhow::{Context, Result, bail};
use declarative::{FieldKind, FieldSchema, Lifecycle, ResourceData, Schema};
use npclient::NullClient;
use serde_json::{Map, Value as Json};
use std::sync::Arc;

pub const KIND: &str = "provider";

pub fn schema() -> Schema {
    Schema::new(
        KIND,
        vec![
            FieldSchema::required("nrn", FieldKind::String).force_new(),
            FieldSchema::required("specification_slug", FieldKind::String).force_new(),
            FieldSchema::optional("dimensions", FieldKind::Map).force_new(),
            // JSON object text
            FieldSchema::required("attributes", FieldKind::String),
            FieldSchema::computed("specification_id", FieldKind::String),
            FieldSchema::computed(super::LAST_UPDATED, FieldKind::String),
        ],
    )
}

/// Parse attribute text into a JSON object
pub fn parse_attributes(text: &str) -> Result<Map<String, Json>> {
    match serde_json::from_str(text).context("attributes are not valid JSON")? {
        Json::Object(map) => Ok(map),
        other => bail!("attributes must be a JSON object, got `{other}`"),
    }
}

impl ProviderDesired {
    pub fn from_data(data: &ResourceData) -> Result<Self> {
        Ok(Self {
            nrn: require_str(data, "nrn")?.to_string(),
            specification_slug: require_str(data, "specification_slug")?.to_string(),
            dimensions: data.get_map("dimensions").cloned().unwrap_or_default(),
            attributes: parse_attributes(require_str(data, "attributes")?)?,
        })
    }
}

/// Write observed values; attributes are only replaced when they differ in
/// content from the recorded text, so formatting alone never shows a diff
fn write_observed(data: &mut ResourceData, observed: &ProviderObserved) -> Result<()> {
    data.set("nrn", observed.nrn.as_str());
    data.set("specification_slug", observed.specification_slug.as_str());
    data.set("specification_id", observed.specification_id.as_str());
    if observed.dimensions.is_empty() {
        data.unset("dimensions");
    } else {
        data.set("dimensions", observed.dimensions.clone());
    }

    let recorded = data
        .get_recorded("attributes")
        .and_then(|v| v.as_str())
        .and_then(|text| parse_attributes(text).ok());
    if recorded.as_ref() != Some(&observed.attributes) {
        data.set("attributes", serde_json::to_string(&observed.attributes)?);
    }
    Ok(())
}

pub struct ProviderResource {
    client: Arc<NullClient>,
    schema: Schema,
}

impl ProviderResource {
    pub fn new(client: Arc<NullClient>) -> Self {
        Self {
            client,
            schema: schema(),
        }
    }
}

impl Lifecycle for ProviderResource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn create(&self, data: &mut ResourceData) -> Result<()> {
        let desired = ProviderDesired::from_data(data)?;
        let id = ProviderReconciler::new(&self.client)
            .create(&desired)
            .context("creating provider")?;
        data.set_id(id);
        touch(data);
        self.read(data)
    }

    fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().context("provider has no id")?.to_string();
        match ProviderReconciler::new(&self.client).read(&id)? {
            Some(observed) => {
                write_observed(data, &observed)?;
                touch(data);
            }
            None => data.clear_id(),
        }
        Ok(())
    }

    fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().context("provider has no id")?.to_string();
        if !data.has_change("attributes") {
            return Ok(());
        }
        let attributes = parse_attributes(require_str(data, "attributes")?)?;
        ProviderReconciler::new(&self.client)
            .update_attributes(&id, &attributes)
            .with_context(|| format!("updating provider {id}"))?;
        touch(data);
        Ok(())
    }

    fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().context("provider has no id")?.to_string();
        ProviderReconciler::new(&self.client)
            .delete(&id)
            .with_context(|| format!("deleting provider {id}"))?;
        data.clear_id();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::tests::data_for;
    use declarative::{Address, StateRecord, Value};
    use npclient::{MockTransport, Response};
    use serde_json::json;

    fn setup() -> (MockTransport, ProviderResource) {
        let mock = MockTransport::new();
        let resource = ProviderResource::new(Arc::new(NullClient::with_transport(mock.clone())));
        (mock, resource)
    }

    fn provider_body(attributes: &Json) -> Json {
        json!({"id": "prov-9", "nrn": "organization=1", "specificationId": "spec-1", "attributes": attributes})
    }

    fn created(resource: &ProviderResource, mock: &MockTransport) -> StateRecord {
        let attributes = json!({"region": "us-east-1", "bucket": "assets"});
        mock.push(Response::json(200, &json!({"id": "spec-1", "slug": "aws"})));
        mock.push(Response::json(200, &json!({"id": "prov-9"})));
        mock.push(Response::json(200, &provider_body(&attributes)));
        mock.push(Response::json(200, &json!({"id": "spec-1", "slug": "aws"})));

        let mut data = data_for(
            resource.schema(),
            &[
                ("nrn", Value::from("organization=1")),
                ("specification_slug", Value::from("aws")),
                (
                    "attributes",
                    Value::from(r#"{ "region": "us-east-1", "bucket": "assets" }"#),
                ),
            ],
        );
        resource.create(&mut data).unwrap();
        data.commit_config();
        data.to_record(&Address::new(KIND, "aws"), false).unwrap()
    }

    #[test]
    fn test_parse_attributes_requires_object() {
        assert!(parse_attributes(r#"{"a": 1}"#).is_ok());
        assert!(parse_attributes("[1, 2]").is_err());
        assert!(parse_attributes("{").is_err());
    }

    #[test]
    fn test_create_records_specification() {
        let (mock, resource) = setup();
        let record = created(&resource, &mock);

        assert_eq!(record.id, "prov-9");
        assert_eq!(
            record.attributes.get("specification_id"),
            Some(&Value::from("spec-1"))
        );
    }

    #[test]
    fn test_read_keeps_equivalent_attribute_text() {
        let (mock, resource) = setup();
        let record = created(&resource, &mock);
        mock.push(Response::json(
            200,
            &provider_body(&json!({"bucket": "assets", "region": "us-east-1"})),
        ));
        mock.push(Response::json(200, &json!({"id": "spec-1", "slug": "aws"})));

        let mut data = ResourceData::from_state(&record);
        resource.read(&mut data).unwrap();

        assert_eq!(
            data.get_str("attributes"),
            Some(r#"{ "region": "us-east-1", "bucket": "assets" }"#)
        );
    }

    #[test]
    fn test_read_adopts_remote_attribute_changes() {
        let (mock, resource) = setup();
        let record = created(&resource, &mock);
        mock.push(Response::json(200, &provider_body(&json!({"region": "eu-west-1"}))));
        mock.push(Response::json(200, &json!({"id": "spec-1", "slug": "aws"})));

        let mut data = ResourceData::from_state(&record);
        resource.read(&mut data).unwrap();

        assert_eq!(data.get_str("attributes"), Some(r#"{"region":"eu-west-1"}"#));
    }

    #[test]
    fn test_update_patches_changed_attributes() {
        let (mock, resource) = setup();
        let record = created(&resource, &mock);
        mock.push(Response::empty(200));

        let config = resource
            .schema()
            .validate(
                &[
                    ("nrn", Value::from("organization=1")),
                    ("specification_slug", Value::from("aws")),
                    ("attributes", Value::from(r#"{"region": "eu-west-1"}"#)),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            )
            .unwrap();
        let mut data = ResourceData::for_update(resource.schema(), &record, config);
        resource.update(&mut data).unwrap();

        let last = mock.requests().pop().unwrap();
        assert_eq!(last.path, "/provider/prov-9");
        assert_eq!(last.body, Some(json!({"attributes": {"region": "eu-west-1"}})));
    }

    #[test]
    fn test_update_to_empty_attributes_is_sent() {
        let (mock, resource) = setup();
        let record = created(&resource, &mock);
        mock.push(Response::empty(200));

        let config = resource
            .schema()
            .validate(
                &[
                    ("nrn", Value::from("organization=1")),
                    ("specification_slug", Value::from("aws")),
                    ("attributes", Value::from("{}")),
                ]
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
            )
            .unwrap();
        let mut data = ResourceData::for_update(resource.schema(), &record, config);
        resource.update(&mut data).unwrap();

        let last = mock.requests().pop().unwrap();
        assert_eq!(last.path, "/provider/prov-9");
        assert_eq!(last.body, Some(json!({"attributes": {}})));
    }
}

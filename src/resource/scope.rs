//! `scope` resource - a serverless scope plus its NRN record

use super::{optional_string, require_int, require_str, touch};
use crate::reconcile::{
    CapabilityValues, CreateOutcome, ScopeChanges, ScopeDesired, ScopeObserved, ScopeReconciler,
    UpdateOutcome,
};
use anyhow::{Context, Result};
use declarative::{FieldKind, FieldSchema, Lifecycle, ResourceData, Schema};
use npclient::{NrnPatch, NullClient};
use std::sync::Arc;

pub const KIND: &str = "scope";

/// NRN record fields; only sent when the scope is created
const NRN_FIELDS: &[&str] = &[
    "s3_assets_bucket",
    "scope_workflow_role",
    "log_group_name",
    "lambda_function_name",
    "lambda_current_function_version",
    "lambda_function_role",
    "lambda_function_main_alias",
    "log_reader_role",
    "lambda_function_warm_alias",
];

pub fn schema() -> Schema {
    use FieldKind::{Int, Map, String};

    Schema::new(
        KIND,
        vec![
            FieldSchema::required("scope_name", String),
            FieldSchema::required("null_application_id", Int).force_new(),
            FieldSchema::optional("scope_type", String)
                .with_default("serverless")
                .force_new(),
            FieldSchema::optional("dimensions", Map),
            FieldSchema::required("capabilities_serverless_runtime_id", String),
            FieldSchema::required("capabilities_serverless_handler_name", String),
            FieldSchema::optional("capabilities_serverless_timeout", Int).with_default(10_i64),
            FieldSchema::optional("capabilities_serverless_memory", Int).with_default(128_i64),
            FieldSchema::optional("capabilities_serverless_ephemeral_storage", Int)
                .with_default(512_i64)
                .force_new(),
            FieldSchema::optional("s3_assets_bucket", String),
            FieldSchema::optional("scope_workflow_role", String),
            FieldSchema::required("log_group_name", String),
            FieldSchema::required("lambda_function_name", String),
            FieldSchema::required("lambda_current_function_version", String),
            FieldSchema::required("lambda_function_role", String),
            FieldSchema::required("lambda_function_main_alias", String),
            FieldSchema::optional("log_reader_role", String),
            FieldSchema::optional("lambda_function_warm_alias", String).with_default(""),
            FieldSchema::computed("nrn", String),
            FieldSchema::computed("status", String),
            FieldSchema::computed(super::LAST_UPDATED, String),
        ],
    )
}

impl ScopeDesired {
    /// Gather the declared fields
    pub fn from_data(data: &ResourceData) -> Result<Self> {
        Ok(Self {
            name: require_str(data, "scope_name")?.to_string(),
            application_id: require_int(data, "null_application_id")?,
            scope_type: require_str(data, "scope_type")?.to_string(),
            capabilities: CapabilityValues {
                runtime_id: require_str(data, "capabilities_serverless_runtime_id")?.to_string(),
                handler_name: require_str(data, "capabilities_serverless_handler_name")?
                    .to_string(),
                timeout_secs: require_int(data, "capabilities_serverless_timeout")?,
                memory_mb: require_int(data, "capabilities_serverless_memory")?,
                ephemeral_storage_mb: require_int(
                    data,
                    "capabilities_serverless_ephemeral_storage",
                )?,
            },
            dimensions: data.get_map("dimensions").cloned().unwrap_or_default(),
            nrn: NrnPatch {
                s3_assets_bucket: optional_string(data, "s3_assets_bucket"),
                scope_workflow_role: optional_string(data, "scope_workflow_role"),
                log_group_name: optional_string(data, "log_group_name"),
                lambda_function_name: optional_string(data, "lambda_function_name"),
                lambda_current_function_version: optional_string(
                    data,
                    "lambda_current_function_version",
                ),
                lambda_function_role: optional_string(data, "lambda_function_role"),
                lambda_function_main_alias: optional_string(data, "lambda_function_main_alias"),
                log_reader_role: optional_string(data, "log_reader_role"),
                lambda_function_warm_alias: optional_string(data, "lambda_function_warm_alias"),
            },
        })
    }
}

impl ScopeChanges {
    pub fn from_data(data: &ResourceData) -> Self {
        Self {
            name: data.has_change("scope_name"),
            dimensions: data.has_change("dimensions"),
            runtime_id: data.has_change("capabilities_serverless_runtime_id"),
            handler_name: data.has_change("capabilities_serverless_handler_name"),
            timeout: data.has_change("capabilities_serverless_timeout"),
            memory: data.has_change("capabilities_serverless_memory"),
        }
    }
}

/// Write what the API reported into the recorded state
fn write_observed(data: &mut ResourceData, observed: &ScopeObserved) {
    data.set("scope_name", observed.name.as_str());
    data.set("null_application_id", observed.application_id);
    data.set("nrn", observed.nrn.as_str());
    data.set("status", observed.status.as_str());
    if let Some(scope_type) = &observed.scope_type {
        data.set("scope_type", scope_type.as_str());
    }
    if observed.dimensions.is_empty() {
        data.unset("dimensions");
    } else {
        data.set("dimensions", observed.dimensions.clone());
    }
}

pub struct ScopeResource {
    client: Arc<NullClient>,
    schema: Schema,
}

impl ScopeResource {
    pub fn new(client: Arc<NullClient>) -> Self {
        Self {
            client,
            schema: schema(),
        }
    }
}

impl Lifecycle for ScopeResource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn create(&self, data: &mut ResourceData) -> Result<()> {
        let desired = ScopeDesired::from_data(data)?;

        match ScopeReconciler::new(&self.client).create(&desired) {
            CreateOutcome::Complete(observed) => {
                data.set_id(&observed.id);
                write_observed(data, &observed);
                touch(data);
                self.read(data)
            }
            CreateOutcome::Degraded { observed, error } => {
                data.set_id(&observed.id);
                write_observed(data, &observed);
                touch(data);
                Err(error).with_context(|| {
                    format!(
                        "scope {} was created but its nrn record {} could not be patched",
                        observed.id, observed.nrn
                    )
                })
            }
            CreateOutcome::Failed(error) => Err(error).context("creating scope"),
        }
    }

    fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().context("scope has no id")?.to_string();
        match ScopeReconciler::new(&self.client).read(&id)? {
            Some(observed) => {
                write_observed(data, &observed);
                touch(data);
            }
            None => data.clear_id(),
        }
        Ok(())
    }

    fn update(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().context("scope has no id")?.to_string();
        let desired = ScopeDesired::from_data(data)?;
        let changes = ScopeChanges::from_data(data);

        let nrn_changed: Vec<&str> = NRN_FIELDS
            .iter()
            .copied()
            .filter(|f| data.has_change(f))
            .collect();
        if !nrn_changed.is_empty() {
            log::info!(
                "scope {id}: {} only apply when the scope is created",
                nrn_changed.join(", ")
            );
        }

        let outcome = ScopeReconciler::new(&self.client)
            .update(&id, &changes, &desired)
            .with_context(|| format!("updating scope {id}"))?;
        if outcome == UpdateOutcome::Patched {
            touch(data);
        }
        Ok(())
    }

    fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id = data.id().context("scope has no id")?.to_string();
        ScopeReconciler::new(&self.client)
            .delete(&id)
            .with_context(|| format!("deleting scope {id}"))?;
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

    const NRN: &str = "organization=1:account=2:application=42:scope=901";

    fn declared() -> Vec<(&'static str, Value)> {
        vec![
            ("scope_name", Value::from("checkout-api")),
            ("null_application_id", Value::Int(42)),
            ("capabilities_serverless_runtime_id", Value::from("nodejs18.x")),
            ("capabilities_serverless_handler_name", Value::from("index.handler")),
            ("capabilities_serverless_timeout", Value::Int(10)),
            ("capabilities_serverless_memory", Value::Int(128)),
            ("log_group_name", Value::from("/aws/lambda/checkout")),
            ("lambda_function_name", Value::from("checkout")),
            ("lambda_current_function_version", Value::from("1")),
            ("lambda_function_role", Value::from("checkout-role")),
            ("lambda_function_main_alias", Value::from("main")),
        ]
    }

    fn scope_body() -> serde_json::Value {
        json!({"id": 901, "nrn": NRN, "name": "checkout-api", "application_id": 42, "type": "serverless"})
    }

    fn setup() -> (MockTransport, ScopeResource) {
        let mock = MockTransport::new();
        let resource = ScopeResource::new(Arc::new(NullClient::with_transport(mock.clone())));
        (mock, resource)
    }

    fn created_record(resource: &ScopeResource, mock: &MockTransport) -> StateRecord {
        mock.push(Response::json(200, &scope_body()));
        mock.push(Response::empty(200));
        mock.push(Response::json(200, &scope_body()));
        let mut data = data_for(resource.schema(), &declared());
        resource.create(&mut data).unwrap();
        data.commit_config();
        data.to_record(&Address::new(KIND, "checkout"), false).unwrap()
    }

    #[test]
    fn test_create_then_read_round_trip() {
        let (mock, resource) = setup();
        let record = created_record(&resource, &mock);

        assert_eq!(record.id, "901");
        assert_eq!(record.attributes.get("nrn"), Some(&Value::from(NRN)));
        assert_eq!(
            record.attributes.get("scope_name"),
            Some(&Value::from("checkout-api"))
        );
        assert_eq!(
            record.attributes.get("null_application_id"),
            Some(&Value::Int(42))
        );
        assert!(record.attributes.contains_key(super::super::LAST_UPDATED));

        let paths: Vec<_> = mock.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, vec!["/scope".to_string(), format!("/nrn/{NRN}"), "/scope/901".to_string()]);
    }

    #[test]
    fn test_create_degraded_keeps_identity() {
        let (mock, resource) = setup();
        mock.push(Response::json(200, &scope_body()));
        mock.push(Response::empty(500));
        let mut data = data_for(resource.schema(), &declared());

        let err = resource.create(&mut data).unwrap_err();

        assert_eq!(data.id(), Some("901"));
        assert!(err.to_string().contains("could not be patched"));
    }

    #[test]
    fn test_update_memory_only_payload() {
        let (mock, resource) = setup();
        let prior = created_record(&resource, &mock);
        mock.push(Response::empty(204));

        let mut raw: std::collections::BTreeMap<String, Value> = declared()
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        raw.insert("capabilities_serverless_memory".to_string(), Value::Int(256));
        let config = resource.schema().validate(&raw).unwrap();
        let mut data = ResourceData::for_update(resource.schema(), &prior, config);
        resource.update(&mut data).unwrap();

        let last = mock.requests().pop().unwrap();
        assert_eq!(last.path, "/scope/901");
        assert_eq!(
            last.body,
            Some(json!({"capabilities": {"serverless_memory": {"memory_in_mb": 256}}}))
        );
    }

    #[test]
    fn test_update_without_changes_makes_no_request() {
        let (mock, resource) = setup();
        let prior = created_record(&resource, &mock);
        let sent = mock.requests().len();

        let config = resource
            .schema()
            .validate(
                &declared()
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
            )
            .unwrap();
        let mut data = ResourceData::for_update(resource.schema(), &prior, config);
        resource.update(&mut data).unwrap();

        assert_eq!(mock.requests().len(), sent);
        assert_eq!(
            data.get_recorded(super::super::LAST_UPDATED),
            prior.attributes.get(super::super::LAST_UPDATED)
        );
    }

    #[test]
    fn test_read_not_found_clears_identity() {
        let (mock, resource) = setup();
        let prior = created_record(&resource, &mock);
        mock.push(Response::empty(404));

        let mut data = ResourceData::from_state(&prior);
        resource.read(&mut data).unwrap();

        assert_eq!(data.id(), None);
    }

    #[test]
    fn test_delete_failure_keeps_identity() {
        let (mock, resource) = setup();
        let prior = created_record(&resource, &mock);
        mock.push(Response::empty(200));
        mock.push(Response::empty(500));

        let mut data = ResourceData::from_state(&prior);
        assert!(resource.delete(&mut data).is_err());
        assert_eq!(data.id(), Some("901"));

        mock.push(Response::empty(200));
        mock.push(Response::empty(200));
        resource.delete(&mut data).unwrap();
        assert_eq!(data.id(), None);
    }
}

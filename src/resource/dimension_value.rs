//! `dimension_value` resource - every declared field is create-only

use super::{require_id, require_int, require_str, touch};
use crate::reconcile::{DimensionValueDesired, DimensionValueObserved, DimensionValueReconciler};
use anyhow::{Context, Result};
use declarative::{FieldKind, FieldSchema, Lifecycle, ResourceData, Schema};
use npclient::NullClient;
use std::sync::Arc;

pub const KIND: &str = "dimension_value";

pub fn schema() -> Schema {
    Schema::new(
        KIND,
        vec![
            FieldSchema::required("dimension_id", FieldKind::Int).force_new(),
            FieldSchema::required("name", FieldKind::String).force_new(),
            FieldSchema::required("nrn", FieldKind::String).force_new(),
            FieldSchema::computed("slug", FieldKind::String),
            FieldSchema::computed("status", FieldKind::String),
            FieldSchema::computed(super::LAST_UPDATED, FieldKind::String),
        ],
    )
}

impl DimensionValueDesired {
    pub fn from_data(data: &ResourceData) -> Result<Self> {
        Ok(Self {
            dimension_id: require_int(data, "dimension_id")?,
            name: require_str(data, "name")?.to_string(),
            nrn: require_str(data, "nrn")?.to_string(),
        })
    }
}

fn write_observed(data: &mut ResourceData, observed: &DimensionValueObserved) {
    data.set("dimension_id", observed.dimension_id);
    data.set("name", observed.name.as_str());
    data.set("nrn", observed.nrn.as_str());
    match &observed.slug {
        Some(slug) => data.set("slug", slug.as_str()),
        None => data.unset("slug"),
    }
    match &observed.status {
        Some(status) => data.set("status", status.as_str()),
        None => data.unset("status"),
    }
}

pub struct DimensionValueResource {
    client: Arc<NullClient>,
    schema: Schema,
}

impl DimensionValueResource {
    pub fn new(client: Arc<NullClient>) -> Self {
        Self {
            client,
            schema: schema(),
        }
    }
}

impl Lifecycle for DimensionValueResource {
    fn schema(&self) -> &Schema {
        &self.schema
    }

    fn create(&self, data: &mut ResourceData) -> Result<()> {
        let desired = DimensionValueDesired::from_data(data)?;
        let observed = DimensionValueReconciler::new(&self.client)
            .create(&desired)
            .with_context(|| format!("creating dimension value {}", desired.name))?;
        data.set_id(&observed.id);
        write_observed(data, &observed);
        touch(data);
        Ok(())
    }

    fn read(&self, data: &mut ResourceData) -> Result<()> {
        let id: u64 = require_id(data)?;
        let dimension_id: u64 = require_int(data, "dimension_id")?;
        match DimensionValueReconciler::new(&self.client).read(dimension_id, id)? {
            Some(observed) => {
                write_observed(data, &observed);
                touch(data);
            }
            None => data.clear_id(),
        }
        Ok(())
    }

    fn delete(&self, data: &mut ResourceData) -> Result<()> {
        let id: u64 = require_id(data)?;
        let dimension_id: u64 = require_int(data, "dimension_id")?;
        DimensionValueReconciler::new(&self.client)
            .delete(dimension_id, id)
            .with_context(|| format!("deleting dimension value {id}"))?;
        data.clear_id();
        Ok(())
    }
}

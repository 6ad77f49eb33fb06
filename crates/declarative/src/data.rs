//! Per-operation view of a resource handed to lifecycle hooks
//!
//! [`ResourceData`] combines the validated desired values (when the operation
//! has any) with the previously recorded attributes. Hooks read through
//! [`ResourceData::get`], write observed values with [`ResourceData::set`] and
//! manage identity with [`ResourceData::set_id`] / [`ResourceData::clear_id`].

use crate::schema::{Config, Schema};
use crate::state::{Address, StateRecord};
use crate::types::Value;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone)]
pub struct ResourceData {
    id: Option<String>,
    config: Option<Config>,
    /// Fields owned by the config; computed fields always read from state
    declared: BTreeSet<String>,
    state: BTreeMap<String, Value>,
}

impl ResourceData {
    /// Data for creating a resource that has no recorded state yet
    pub fn for_create(schema: &Schema, config: Config) -> Self {
        Self {
            id: None,
            config: Some(config),
            declared: declared_names(schema),
            state: BTreeMap::new(),
        }
    }

    /// Data for updating a recorded resource towards `config`
    pub fn for_update(schema: &Schema, prior: &StateRecord, config: Config) -> Self {
        Self {
            id: Some(prior.id.clone()),
            config: Some(config),
            declared: declared_names(schema),
            state: prior.attributes.clone(),
        }
    }

    /// Data for reading or deleting a recorded resource; every field reads
    /// from the recorded state
    pub fn from_state(prior: &StateRecord) -> Self {
        Self {
            id: Some(prior.id.clone()),
            config: None,
            declared: BTreeSet::new(),
            state: prior.attributes.clone(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = Some(id.into());
    }

    /// Mark the resource as gone
    pub fn clear_id(&mut self) {
        self.id = None;
    }

    /// Current value of a field: the desired value for declared fields when
    /// the operation has a config, the recorded value otherwise
    pub fn get(&self, field: &str) -> Option<&Value> {
        match &self.config {
            Some(config) if self.declared.contains(field) => config.get(field),
            _ => self.state.get(field),
        }
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_str)
    }

    pub fn get_int(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(Value::as_int)
    }

    pub fn get_bool(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    pub fn get_map(&self, field: &str) -> Option<&BTreeMap<String, String>> {
        self.get(field).and_then(Value::as_map)
    }

    /// Recorded value of a field, ignoring the config
    pub fn get_recorded(&self, field: &str) -> Option<&Value> {
        self.state.get(field)
    }

    /// Whether the desired value differs from the recorded one
    pub fn has_change(&self, field: &str) -> bool {
        match &self.config {
            Some(config) if self.declared.contains(field) => {
                config.get(field) != self.state.get(field)
            }
            _ => false,
        }
    }

    /// Record an observed value
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.state.insert(field.to_string(), value.into());
    }

    /// Forget a recorded value
    pub fn unset(&mut self, field: &str) {
        self.state.remove(field);
    }

    /// Copy the desired values into the recorded state after a successful
    /// create or update
    pub fn commit_config(&mut self) {
        let Some(config) = &self.config else {
            return;
        };
        for name in &self.declared {
            match config.get(name) {
                Some(value) => {
                    self.state.insert(name.clone(), value.clone());
                }
                None => {
                    self.state.remove(name);
                }
            }
        }
    }

    /// Build the state record for `address`, if the resource has an identity
    pub fn to_record(&self, address: &Address, tainted: bool) -> Option<StateRecord> {
        self.id.as_ref().map(|id| StateRecord {
            kind: address.kind.clone(),
            name: address.name.clone(),
            id: id.clone(),
            tainted,
            attributes: self.state.clone(),
        })
    }
}

fn declared_names(schema: &Schema) -> BTreeSet<String> {
    schema
        .declared_fields()
        .map(|f| f.name.to_string())
        .collect()
}

//! Recorded state of managed resources

use crate::types::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Address of a resource: its kind plus the name it was declared under
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address {
    pub kind: String,
    pub name: String,
}

impl Address {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.kind, self.name)
    }
}

/// What is known about one managed resource after the last operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateRecord {
    pub kind: String,
    pub name: String,
    /// Remote identity
    pub id: String,
    /// Set when a create only partially succeeded
    #[serde(default)]
    pub tainted: bool,
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,
}

impl StateRecord {
    pub fn address(&self) -> Address {
        Address::new(&self.kind, &self.name)
    }
}

/// All recorded resources, keyed by address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateSet {
    records: BTreeMap<Address, StateRecord>,
}

impl StateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = StateRecord>) -> Self {
        Self {
            records: records.into_iter().map(|r| (r.address(), r)).collect(),
        }
    }

    pub fn get(&self, address: &Address) -> Option<&StateRecord> {
        self.records.get(address)
    }

    /// Insert or replace a record
    pub fn insert(&mut self, record: StateRecord) {
        self.records.insert(record.address(), record);
    }

    pub fn remove(&mut self, address: &Address) -> Option<StateRecord> {
        self.records.remove(address)
    }

    pub fn records(&self) -> impl Iterator<Item = &StateRecord> {
        self.records.values()
    }

    pub fn into_records(self) -> Vec<StateRecord> {
        self.records.into_values().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

//! Lifecycle adapters for the managed resource kinds
//!
//! Every kind implements [`declarative::Lifecycle`] on top of its reconciler:
//! - read declared values once into a typed `*Desired` struct
//! - call the reconciler
//! - write observed values back, set or clear the identity
//! - stamp `last_updated`

pub mod dimension_value;
pub mod provider;
pub mod scope;

use anyhow::{Context, Result};
use declarative::{Registry, ResourceData};
use npclient::NullClient;
use std::str::FromStr;
use std::sync::Arc;

pub use dimension_value::DimensionValueResource;
pub use provider::ProviderResource;
pub use scope::ScopeResource;

/// Computed field holding the time of the last successful operation
pub const LAST_UPDATED: &str = "last_updated";

/// Registry with every resource kind npctl manages
pub fn registry(client: Arc<NullClient>) -> Registry {
    let mut registry = Registry::new();
    registry.register(Box::new(ScopeResource::new(Arc::clone(&client))));
    registry.register(Box::new(DimensionValueResource::new(Arc::clone(&client))));
    registry.register(Box::new(ProviderResource::new(client)));
    registry
}

/// Current time in RFC 850 form, e.g. "Sunday, 18-Oct-26 09:30:00 UTC"
pub fn timestamp() -> String {
    chrono::Utc::now()
        .format("%A, %d-%b-%y %H:%M:%S %Z")
        .to_string()
}

pub(crate) fn touch(data: &mut ResourceData) {
    data.set(LAST_UPDATED, timestamp());
}

pub(crate) fn require_str<'a>(data: &'a ResourceData, field: &str) -> Result<&'a str> {
    data.get_str(field)
        .with_context(|| format!("missing value for `{field}`"))
}

pub(crate) fn optional_string(data: &ResourceData, field: &str) -> Option<String> {
    data.get_str(field).map(str::to_string)
}

/// Integer field converted to the width the API uses
pub(crate) fn require_int<T: TryFrom<i64>>(data: &ResourceData, field: &str) -> Result<T> {
    let value = data
        .get_int(field)
        .with_context(|| format!("missing value for `{field}`"))?;
    T::try_from(value).map_err(|_| anyhow::anyhow!("`{field}` is out of range: {value}"))
}

/// The identity parsed into the type the API addresses it by
pub(crate) fn require_id<T: FromStr>(data: &ResourceData) -> Result<T> {
    let id = data.id().context("resource has no id")?;
    id.parse()
        .map_err(|_| anyhow::anyhow!("invalid resource id `{id}`"))
}

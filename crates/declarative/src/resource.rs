//! Lifecycle trait for declarative resources
//!
//! A [`Lifecycle`] implements the four hooks the engine drives for one kind of
//! resource. Hooks receive a [`ResourceData`] and report back by writing
//! observed values and setting or clearing the identity.

use crate::data::ResourceData;
use crate::schema::{Config, Schema};
use crate::state::Address;
use anyhow::Result;
use std::collections::BTreeMap;

/// Create/read/update/delete hooks for one resource kind
///
/// # Example
///
/// ```ignore
/// use declarative::{Lifecycle, ResourceData, Schema};
///
/// struct Widget { schema: Schema }
///
/// impl Lifecycle for Widget {
///     fn schema(&self) -> &Schema { &self.schema }
///
///     fn create(&self, data: &mut ResourceData) -> anyhow::Result<()> {
///         let id = remote_create(data.get_str("name").unwrap_or_default())?;
///         data.set_id(id);
///         self.read(data)
///     }
///
///     fn read(&self, data: &mut ResourceData) -> anyhow::Result<()> {
///         match remote_get(data.id().unwrap_or_default())? {
///             Some(w) => data.set("status", w.status),
///             None => data.clear_id(),
///         }
///         Ok(())
///     }
///
///     fn delete(&self, data: &mut ResourceData) -> anyhow::Result<()> {
///         remote_delete(data.id().unwrap_or_default())?;
///         data.clear_id();
///         Ok(())
///     }
/// }
/// ```
pub trait Lifecycle {
    /// Schema of the declared and computed fields
    fn schema(&self) -> &Schema;

    /// Resource kind, as used in addresses ("scope", "provider", ...)
    fn kind(&self) -> &'static str {
        self.schema().kind()
    }

    /// Create the resource and set its identity
    ///
    /// If the hook fails after setting an identity, the engine records the
    /// resource as tainted.
    fn create(&self, data: &mut ResourceData) -> Result<()>;

    /// Refresh observed values; clear the identity if the resource is gone
    fn read(&self, data: &mut ResourceData) -> Result<()>;

    /// Converge an existing resource towards the desired values
    ///
    /// Kinds whose declared fields are all create-only never reach this hook.
    fn update(&self, _data: &mut ResourceData) -> Result<()> {
        anyhow::bail!("{} does not support in-place updates", self.kind())
    }

    /// Delete the resource and clear its identity
    fn delete(&self, data: &mut ResourceData) -> Result<()>;
}

/// A boxed lifecycle for type-erased storage
pub type BoxedLifecycle = Box<dyn Lifecycle>;

/// Lifecycles by resource kind
#[derive(Default)]
pub struct Registry {
    lifecycles: BTreeMap<&'static str, BoxedLifecycle>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a lifecycle under its kind
    pub fn register(&mut self, lifecycle: BoxedLifecycle) {
        self.lifecycles.insert(lifecycle.kind(), lifecycle);
    }

    pub fn get(&self, kind: &str) -> Option<&dyn Lifecycle> {
        self.lifecycles.get(kind).map(AsRef::as_ref)
    }

    /// Get a lifecycle or fail with the list of known kinds
    pub fn require(&self, kind: &str) -> Result<&dyn Lifecycle> {
        self.get(kind).ok_or_else(|| {
            anyhow::anyhow!(
                "unknown resource kind `{}` (known: {})",
                kind,
                self.kinds().collect::<Vec<_>>().join(", ")
            )
        })
    }

    pub fn kinds(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.lifecycles.keys().copied()
    }
}

/// A validated desired resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub address: Address,
    pub config: Config,
}

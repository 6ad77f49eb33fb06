//! Reconcilers - translate desired state into control-plane API calls
//!
//! Each reconciler borrows a [`npclient::NullClient`] and exposes the
//! lifecycle operations of one resource kind in typed form. They know nothing
//! about the declarative engine; `crate::resource` adapts them to it.

pub mod diff;
pub mod dimension_value;
pub mod provider;
pub mod scope;

pub use diff::{CapabilityValues, ScopeChanges, ScopeDesired};
pub use dimension_value::{DimensionValueDesired, DimensionValueObserved, DimensionValueReconciler};
pub use provider::{ProviderDesired, ProviderObserved, ProviderReconciler};
pub use scope::{CreateOutcome, ScopeObserved, ScopeReconciler, UpdateOutcome};

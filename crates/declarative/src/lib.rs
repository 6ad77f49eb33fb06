//! # Declarative
//!
//! A small engine for reconciling remote resources against declared state.
//!
//! ## Core Concepts
//!
//! - **Schema**: the fields a resource kind accepts, which are create-only and
//!   which are computed by the remote side
//! - **Lifecycle**: create/read/update/delete hooks for one resource kind
//! - **ResourceData**: the per-operation view a hook reads from and writes to
//! - **StateSet**: what was recorded after the last apply, keyed by address
//! - **ExecutionPlan**: refreshed state classified into create, update,
//!   replace, delete or no-op per address
//! - **Executor**: applies a plan sequentially and updates the state
//!
//! ## Example
//!
//! ```ignore
//! use declarative::{ExecuteOptions, ExecutionPlan, Registry, StateSet, execute_simple, refresh};
//!
//! let mut registry = Registry::new();
//! registry.register(Box::new(MyWidget::new()));
//!
//! let mut state = StateSet::new();
//! refresh(&registry, &mut state)?;
//! let plan = ExecutionPlan::build(&registry, &declarations, &state)?;
//! let summary = execute_simple(&registry, plan, &mut state, ExecuteOptions::default())?;
//! ```
//!
//! Progress reporting and confirmation go through [`ProgressCallback`] and
//! [`ConfirmCallback`], so the crate has no UI dependency.

pub mod context;
pub mod data;
pub mod diff;
pub mod executor;
pub mod planner;
pub mod resource;
pub mod schema;
pub mod state;
pub mod types;

// Re-export main types at crate root
pub use context::{AutoConfirm, AutoDecline, ConfirmCallback, NoProgress, ProgressCallback};
pub use data::ResourceData;
pub use diff::{Action, DiffSummary, FieldDiff, ReplaceReason};
pub use executor::{execute, execute_simple};
pub use planner::{ExecutionPlan, PlannedChange, refresh};
pub use resource::{BoxedLifecycle, Declaration, Lifecycle, Registry};
pub use schema::{Config, FieldSchema, Presence, Schema, SchemaError};
pub use state::{Address, StateRecord, StateSet};
pub use types::{ApplyResult, ExecuteOptions, ExecuteSummary, FieldKind, Value};

//! Execution planner - refreshes recorded state and builds change plans

use crate::data::ResourceData;
use crate::diff::{Action, DiffSummary, FieldDiff, changed_fields, classify};
use crate::resource::{Declaration, Registry};
use crate::schema::Config;
use crate::state::{Address, StateRecord, StateSet};
use anyhow::{Context, Result};

/// One resource's planned change
#[derive(Debug, Clone)]
pub struct PlannedChange {
    pub address: Address,
    pub action: Action,
    /// Desired values; absent for deletes
    pub config: Option<Config>,
    /// Recorded state; absent for creates
    pub prior: Option<StateRecord>,
    /// Field-level differences, for display
    pub diffs: Vec<FieldDiff>,
}

impl PlannedChange {
    pub fn is_change(&self) -> bool {
        self.action.is_change()
    }
}

/// Ordered list of planned changes
#[derive(Debug, Clone, Default)]
pub struct ExecutionPlan {
    pub changes: Vec<PlannedChange>,
}

impl ExecutionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan converging `state` towards `declarations`
    ///
    /// Declared resources keep their declaration order; recorded resources
    /// that are no longer declared are deleted afterwards, in reverse
    /// address order.
    pub fn build(
        registry: &Registry,
        declarations: &[Declaration],
        state: &StateSet,
    ) -> Result<Self> {
        let mut changes = Vec::with_capacity(declarations.len());

        for decl in declarations {
            let lifecycle = registry.require(&decl.address.kind)?;
            let prior = state.get(&decl.address);
            let action = classify(lifecycle.schema(), Some(&decl.config), prior);
            let diffs = match prior {
                Some(p) => changed_fields(lifecycle.schema(), &decl.config, p),
                None => Vec::new(),
            };
            changes.push(PlannedChange {
                address: decl.address.clone(),
                action,
                config: Some(decl.config.clone()),
                prior: prior.cloned(),
                diffs,
            });
        }

        let mut orphans: Vec<&StateRecord> = state
            .records()
            .filter(|r| !declarations.iter().any(|d| d.address == r.address()))
            .collect();
        orphans.reverse();
        changes.extend(orphans.into_iter().map(delete_change));

        Ok(Self { changes })
    }

    /// Plan deleting every recorded resource
    pub fn destroy(state: &StateSet) -> Self {
        let mut records: Vec<&StateRecord> = state.records().collect();
        records.reverse();
        Self {
            changes: records.into_iter().map(delete_change).collect(),
        }
    }

    /// Filter plan to only include resources matching a target pattern
    ///
    /// Target format: "kind" or "kind.name"
    #[must_use]
    pub fn filter_by_target(self, target: Option<&str>) -> Self {
        match target {
            None => self,
            Some(t) => {
                let (kind, name) = parse_target(t);
                Self {
                    changes: self
                        .changes
                        .into_iter()
                        .filter(|c| matches_filter(&c.address, &kind, name.as_deref()))
                        .collect(),
                }
            }
        }
    }

    /// Only the entries that change something
    pub fn pending(&self) -> impl Iterator<Item = &PlannedChange> {
        self.changes.iter().filter(|c| c.is_change())
    }

    pub fn summary(&self) -> DiffSummary {
        DiffSummary::from_actions(self.changes.iter().map(|c| &c.action))
    }

    pub fn has_changes(&self) -> bool {
        self.pending().next().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

fn delete_change(record: &StateRecord) -> PlannedChange {
    PlannedChange {
        address: record.address(),
        action: Action::Delete,
        config: None,
        prior: Some(record.clone()),
        diffs: Vec::new(),
    }
}

/// Refresh every recorded resource through its `read` hook
///
/// Records whose identity was cleared (the resource is gone remotely) are
/// dropped and their addresses returned. A failing read aborts the refresh
/// and leaves `state` untouched for that record.
pub fn refresh(registry: &Registry, state: &mut StateSet) -> Result<Vec<Address>> {
    let mut gone = Vec::new();
    let records: Vec<StateRecord> = state.records().cloned().collect();

    for prior in records {
        let address = prior.address();
        let lifecycle = registry.require(&prior.kind)?;
        let mut data = ResourceData::from_state(&prior);
        lifecycle
            .read(&mut data)
            .with_context(|| format!("refreshing {address}"))?;

        match data.to_record(&address, prior.tainted) {
            Some(record) => state.insert(record),
            None => {
                log::info!("{address} no longer exists, removing it from state");
                state.remove(&address);
                gone.push(address);
            }
        }
    }

    Ok(gone)
}

/// Parse a target string like "kind.name" into (kind, name)
fn parse_target(target: &str) -> (String, Option<String>) {
    match target.split_once('.') {
        Some((kind, name)) => (kind.to_string(), Some(name.to_string())),
        None => (target.to_string(), None),
    }
}

/// Check if an address matches the filter criteria
fn matches_filter(address: &Address, kind: &str, name: Option<&str>) -> bool {
    if address.kind != kind {
        return false;
    }
    name.is_none_or(|n| address.name == n)
}

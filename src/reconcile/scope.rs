//! Scope reconciler - create saga, read, diff-driven update, two-phase delete

use super::diff::{ScopeChanges, ScopeDesired, build_new_scope, build_scope_patch};
use npclient::{NullClient, Scope, ScopePatch, ScopeStatus};
use std::collections::BTreeMap;

/// What the API reports about a scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeObserved {
    pub id: String,
    pub nrn: String,
    pub name: String,
    pub application_id: u64,
    pub scope_type: Option<String>,
    pub status: ScopeStatus,
    pub dimensions: BTreeMap<String, String>,
}

impl From<Scope> for ScopeObserved {
    fn from(scope: Scope) -> Self {
        Self {
            id: scope.id.to_string(),
            nrn: scope.nrn,
            name: scope.name,
            application_id: scope.application_id,
            scope_type: scope.scope_type,
            status: scope.status,
            dimensions: scope.dimensions,
        }
    }
}

/// Result of the create saga: scope create, then NRN patch
#[derive(Debug)]
pub enum CreateOutcome {
    /// Both steps succeeded
    Complete(ScopeObserved),
    /// The scope exists but its NRN record was not patched
    Degraded {
        observed: ScopeObserved,
        error: npclient::Error,
    },
    /// Nothing was created
    Failed(npclient::Error),
}

/// Result of an update
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No field changed; no request was sent
    Unchanged,
    Patched,
}

/// Drives the scope lifecycle against the API
pub struct ScopeReconciler<'a> {
    client: &'a NullClient,
}

impl<'a> ScopeReconciler<'a> {
    pub fn new(client: &'a NullClient) -> Self {
        Self { client }
    }

    /// Create the scope, then patch its NRN record with the secondary
    /// attributes. A failed NRN patch does not roll the scope back.
    pub fn create(&self, desired: &ScopeDesired) -> CreateOutcome {
        let scope = match self.client.create_scope(&build_new_scope(desired)) {
            Ok(scope) => scope,
            Err(e) => return CreateOutcome::Failed(e),
        };
        let observed = ScopeObserved::from(scope);
        log::info!("created scope {} ({})", observed.id, observed.nrn);

        match self.client.patch_nrn(&observed.nrn, &desired.nrn) {
            Ok(()) => CreateOutcome::Complete(observed),
            Err(error) => CreateOutcome::Degraded { observed, error },
        }
    }

    /// Fetch the scope; `None` when the API no longer knows it
    pub fn read(&self, id: &str) -> npclient::Result<Option<ScopeObserved>> {
        match self.client.get_scope(id) {
            Ok(scope) => Ok(Some(scope.into())),
            Err(e) if e.is_not_found() => {
                log::info!("scope {id} not found");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Send one partial update carrying only the changed fields
    pub fn update(
        &self,
        id: &str,
        changes: &ScopeChanges,
        desired: &ScopeDesired,
    ) -> npclient::Result<UpdateOutcome> {
        let Some(patch) = build_scope_patch(changes, desired) else {
            log::debug!("scope {id}: nothing to update");
            return Ok(UpdateOutcome::Unchanged);
        };
        self.client.patch_scope(id, &patch)?;
        log::info!("updated scope {id}");
        Ok(UpdateOutcome::Patched)
    }

    /// Move the scope to `deleting`, then to `deleted`
    ///
    /// Both patches are safe to repeat, so a failed delete can simply be
    /// retried.
    pub fn delete(&self, id: &str) -> npclient::Result<()> {
        self.client
            .patch_scope(id, &ScopePatch::status(ScopeStatus::Deleting))?;
        self.client
            .patch_scope(id, &ScopePatch::status(ScopeStatus::Deleted))?;
        log::info!("deleted scope {id}");
        Ok(())
    }
}

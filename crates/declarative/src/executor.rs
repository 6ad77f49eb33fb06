//! Execution engine - applies planned changes sequentially
//!
//! Changes run one at a time in plan order. The recorded state is updated in
//! place after every change so the caller can persist it even when some
//! changes fail.

use crate::context::{ConfirmCallback, ProgressCallback};
use crate::data::ResourceData;
use crate::diff::Action;
use crate::planner::{ExecutionPlan, PlannedChange};
use crate::resource::{Lifecycle, Registry};
use crate::schema::Config;
use crate::state::{Address, StateRecord, StateSet};
use crate::types::{ApplyResult, ExecuteOptions, ExecuteSummary};
use anyhow::Result;

/// Execute a plan with the given options and callbacks
///
/// Returns without touching anything when the plan has no changes, when
/// `opts.dry_run` is set, or when `confirm` declines (all pending changes
/// are then counted as skipped).
pub fn execute<P, C>(
    registry: &Registry,
    plan: ExecutionPlan,
    state: &mut StateSet,
    opts: ExecuteOptions,
    progress: &mut P,
    confirm: &mut C,
) -> Result<ExecuteSummary>
where
    P: ProgressCallback,
    C: ConfirmCallback,
{
    let pending: Vec<PlannedChange> = plan.changes.into_iter().filter(|c| c.is_change()).collect();

    if pending.is_empty() || opts.dry_run {
        return Ok(ExecuteSummary::default());
    }

    let prompt = format!("Apply {} change(s)?", pending.len());
    if !confirm.confirm(&prompt)? {
        return Ok(ExecuteSummary {
            skipped: pending.len(),
            ..Default::default()
        });
    }

    let mut summary = ExecuteSummary::default();
    progress.on_start(pending.len());

    for change in pending {
        let address = change.address.to_string();
        progress.on_resource_start(&address, change.action.verb());

        let result = match registry.require(&change.address.kind) {
            Ok(lifecycle) => apply_change(lifecycle, change, state, opts.verbose),
            Err(e) => ApplyResult::Failed {
                error: e.to_string(),
            },
        };

        progress.on_resource_complete(&address, &result);
        summary.add_result(&result);
    }

    progress.on_complete();
    Ok(summary)
}

/// Simple execution without callbacks
pub fn execute_simple(
    registry: &Registry,
    plan: ExecutionPlan,
    state: &mut StateSet,
    opts: ExecuteOptions,
) -> Result<ExecuteSummary> {
    use crate::context::{AutoConfirm, NoProgress};

    execute(registry, plan, state, opts, &mut NoProgress, &mut AutoConfirm)
}

/// Apply a single change, converting errors into a failed result
fn apply_change(
    lifecycle: &dyn Lifecycle,
    change: PlannedChange,
    state: &mut StateSet,
    verbose: bool,
) -> ApplyResult {
    let PlannedChange {
        address,
        action,
        config,
        prior,
        ..
    } = change;

    if verbose {
        log::info!("{} {}", action.verb(), address);
    }

    let outcome = match (action, config, prior) {
        (Action::Create, Some(config), _) => {
            create(lifecycle, &address, config, state).map(|()| ApplyResult::Created)
        }
        (Action::Update { .. }, Some(config), Some(prior)) => {
            update(lifecycle, &address, &prior, config, state).map(|()| ApplyResult::Modified)
        }
        (Action::Replace { .. }, Some(config), Some(prior)) => delete(lifecycle, &prior, state)
            .and_then(|()| create(lifecycle, &address, config, state))
            .map(|()| ApplyResult::Replaced),
        (Action::Delete, _, Some(prior)) => {
            delete(lifecycle, &prior, state).map(|()| ApplyResult::Removed)
        }
        (Action::NoChange, _, _) => Ok(ApplyResult::NoChange),
        (action, _, _) => Err(anyhow::anyhow!(
            "inconsistent plan entry for {address}: {}",
            action.verb()
        )),
    };

    outcome.unwrap_or_else(|e| {
        log::warn!("{address}: {e:#}");
        ApplyResult::Failed {
            error: format!("{e:#}"),
        }
    })
}

fn create(
    lifecycle: &dyn Lifecycle,
    address: &Address,
    config: Config,
    state: &mut StateSet,
) -> Result<()> {
    let mut data = ResourceData::for_create(lifecycle.schema(), config);
    let result = lifecycle.create(&mut data);
    data.commit_config();

    match &result {
        Ok(()) => record(state, address, &data, false),
        Err(_) if data.id().is_some() => {
            log::warn!("{address} was created but not fully configured, marking it tainted");
            record(state, address, &data, true);
        }
        Err(_) => {}
    }
    result
}

fn update(
    lifecycle: &dyn Lifecycle,
    address: &Address,
    prior: &StateRecord,
    config: Config,
    state: &mut StateSet,
) -> Result<()> {
    let mut data = ResourceData::for_update(lifecycle.schema(), prior, config);
    lifecycle.update(&mut data)?;
    data.commit_config();
    record(state, address, &data, false);
    Ok(())
}

/// Delete a recorded resource; on failure the record keeps its identity so
/// the delete can be retried
fn delete(lifecycle: &dyn Lifecycle, prior: &StateRecord, state: &mut StateSet) -> Result<()> {
    let address = prior.address();
    let mut data = ResourceData::from_state(prior);
    let result = lifecycle.delete(&mut data);

    match &result {
        Ok(()) => {
            state.remove(&address);
        }
        Err(_) => record(state, &address, &data, prior.tainted),
    }
    result
}

/// Store the data's record, or drop the address if the identity was cleared
fn record(state: &mut StateSet, address: &Address, data: &ResourceData, tainted: bool) {
    match data.to_record(address, tainted) {
        Some(record) => state.insert(record),
        None => {
            state.remove(address);
        }
    }
}

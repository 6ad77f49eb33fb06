use super::{Session, refresh};
use crate::Context;
use crate::manifest;
use crate::ui;
use anyhow::Result;
use declarative::{ExecutionPlan, StateSet};

/// Refresh recorded state and build the plan for the manifest
pub(crate) fn prepare(
    ctx: &Context,
    session: &Session,
    target: Option<&str>,
) -> Result<(ExecutionPlan, StateSet)> {
    let declarations = manifest::load(&session.config.manifest_path(), &session.registry)?;
    let mut state = session.state.to_set();
    refresh(ctx, &session.registry, &mut state)?;

    let plan = ExecutionPlan::build(&session.registry, &declarations, &state)?
        .filter_by_target(target);
    log::debug!("Plan has {} entries", plan.changes.len());
    Ok((plan, state))
}

pub fn run(ctx: &Context, session: &Session, target: Option<&str>) -> Result<()> {
    ui::header("Plan");
    let (plan, _) = prepare(ctx, session, target)?;
    ui::display_plan(&plan);
    Ok(())
}

use super::{Session, plan, refresh};
use crate::Context;
use crate::cli::{ApplyArgs, DestroyArgs};
use crate::ui::{self, DialoguerConfirm, TerminalProgress};
use anyhow::{Result, bail};
use declarative::{AutoConfirm, ExecuteOptions, ExecuteSummary, ExecutionPlan, StateSet};

pub fn apply(ctx: &Context, session: &mut Session, args: ApplyArgs) -> Result<()> {
    ui::header("Applying Manifest");

    let (plan, state) = plan::prepare(ctx, session, args.target.as_deref())?;
    ui::display_plan(&plan);

    if args.dry_run {
        println!();
        ui::warn("Dry run - no changes will be made");
        return Ok(());
    }

    run_plan(ctx, session, plan, state, args.yes)
}

pub fn destroy(ctx: &Context, session: &mut Session, args: DestroyArgs) -> Result<()> {
    ui::header("Destroying Resources");

    let mut state = session.state.to_set();
    refresh(ctx, &session.registry, &mut state)?;
    let plan = ExecutionPlan::destroy(&state).filter_by_target(args.target.as_deref());
    ui::display_plan(&plan);

    run_plan(ctx, session, plan, state, args.yes)
}

/// Execute the plan, then save state whatever the outcome
fn run_plan(
    ctx: &Context,
    session: &mut Session,
    plan: ExecutionPlan,
    mut state: StateSet,
    yes: bool,
) -> Result<()> {
    let pending = plan.pending().count();
    let opts = ExecuteOptions {
        dry_run: false,
        verbose: ctx.verbose > 0,
    };
    let mut progress = TerminalProgress::default();

    let result = if yes {
        declarative::execute(
            &session.registry,
            plan,
            &mut state,
            opts,
            &mut progress,
            &mut AutoConfirm,
        )
    } else {
        declarative::execute(
            &session.registry,
            plan,
            &mut state,
            opts,
            &mut progress,
            &mut DialoguerConfirm,
        )
    };

    session.save_state(state)?;
    let summary = result?;
    report(pending, &summary)
}

fn report(pending: usize, summary: &ExecuteSummary) -> Result<()> {
    if pending == 0 {
        return Ok(());
    }
    if summary.total_changes() == 0 && summary.failed == 0 && summary.skipped == pending {
        println!();
        ui::warn("Cancelled - no changes were made");
        return Ok(());
    }

    ui::print_summary(summary);
    if !summary.is_success() {
        bail!("{} change(s) failed; see the errors above", summary.failed);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::tests::{DIMENSION_MANIFEST, quiet, session};
    use crate::state::StateFile;
    use declarative::Address;
    use npclient::Response;
    use serde_json::json;
    use tempfile::TempDir;

    fn apply_args() -> ApplyArgs {
        ApplyArgs {
            yes: true,
            ..ApplyArgs::default()
        }
    }

    fn push_created(mock: &npclient::MockTransport) {
        mock.push(Response::json(
            200,
            &json!({"id": 31, "dimension_id": 4, "name": "production", "nrn": "organization=1", "slug": "production", "status": "active"}),
        ));
    }

    #[test]
    fn test_apply_saves_created_resource() {
        let dir = TempDir::new().unwrap();
        let (mock, mut session) = session(&dir, DIMENSION_MANIFEST);
        push_created(&mock);

        apply(&quiet(), &mut session, apply_args()).unwrap();

        let saved = StateFile::load(&session.state_path).unwrap().to_set();
        let record = saved.get(&Address::new("dimension_value", "prod")).unwrap();
        assert_eq!(record.id, "31");
        assert!(!record.tainted);
    }

    #[test]
    fn test_dry_run_leaves_state_alone() {
        let dir = TempDir::new().unwrap();
        let (mock, mut session) = session(&dir, DIMENSION_MANIFEST);

        let args = ApplyArgs {
            dry_run: true,
            ..apply_args()
        };
        apply(&quiet(), &mut session, args).unwrap();

        assert!(mock.requests().is_empty());
        assert!(!session.state_path.exists());
    }

    #[test]
    fn test_failed_apply_still_saves_state() {
        let dir = TempDir::new().unwrap();
        let (mock, mut session) = session(&dir, DIMENSION_MANIFEST);
        mock.push(Response::json(500, &json!({"message": "boom"})));

        let err = apply(&quiet(), &mut session, apply_args()).unwrap_err();

        assert!(err.to_string().contains("1 change(s) failed"));
        assert!(session.state_path.exists());
        assert!(StateFile::load(&session.state_path).unwrap().resources.is_empty());
    }

    #[test]
    fn test_destroy_removes_records() {
        let dir = TempDir::new().unwrap();
        let (mock, mut session) = session(&dir, DIMENSION_MANIFEST);
        push_created(&mock);
        apply(&quiet(), &mut session, apply_args()).unwrap();

        // refresh, then delete
        push_created(&mock);
        mock.push(Response::empty(200));
        let args = DestroyArgs {
            yes: true,
            ..DestroyArgs::default()
        };
        destroy(&quiet(), &mut session, args).unwrap();

        assert!(StateFile::load(&session.state_path).unwrap().resources.is_empty());
        assert_eq!(mock.requests().last().unwrap().path, "/dimension/4/value/31");
    }

    #[test]
    fn test_report_cancelled() {
        let summary = ExecuteSummary {
            skipped: 2,
            ..ExecuteSummary::default()
        };
        assert!(report(2, &summary).is_ok());
    }
}

use colored::{ColoredString, Colorize};
use declarative::{
    Action, ApplyResult, ConfirmCallback, ExecuteSummary, ExecutionPlan, FieldDiff,
    PlannedChange, ProgressCallback, ReplaceReason,
};

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

// ============================================================================
// Plan display
// ============================================================================

fn symbol(action: &Action) -> ColoredString {
    match action {
        Action::Create => "+".green(),
        Action::Delete => "-".red(),
        Action::Update { .. } => "~".yellow(),
        Action::Replace { .. } => "±".magenta(),
        Action::NoChange => " ".normal(),
    }
}

/// One-line description of why a change happens
fn describe(change: &PlannedChange) -> String {
    match &change.action {
        Action::Create => "(new)".to_string(),
        Action::Delete => "(will remove)".to_string(),
        Action::Update { fields } => format!("update {}", fields.join(", ")),
        Action::Replace {
            reason: ReplaceReason::Tainted,
        } => "(tainted, will replace)".to_string(),
        Action::Replace {
            reason: ReplaceReason::ForceNew(fields),
        } => format!("{} forces replacement", fields.join(", ")),
        Action::NoChange => String::new(),
    }
}

fn field_line(diff: &FieldDiff) -> String {
    let show = |v: &Option<declarative::Value>| {
        v.as_ref()
            .map_or_else(|| "(unset)".to_string(), ToString::to_string)
    };
    let marker = if diff.force_new { " (forces new)" } else { "" };
    format!(
        "{}: {} → {}{}",
        diff.field,
        show(&diff.from),
        show(&diff.to),
        marker
    )
}

/// Display the pending changes of a plan
pub fn display_plan(plan: &ExecutionPlan) {
    if !plan.has_changes() {
        println!();
        println!("  {} No changes needed", "✓".green());
        return;
    }

    println!();
    println!(
        "┌─ {} ─────────────────────────────────────────┐",
        "Execution Plan".bold()
    );
    println!("│");

    for change in plan.pending() {
        println!(
            "│ {} {:<30} {}",
            symbol(&change.action),
            change.address.to_string(),
            describe(change).dimmed()
        );
        if matches!(change.action, Action::Update { .. } | Action::Replace { .. }) {
            for diff in &change.diffs {
                println!("│       {}", field_line(diff).dimmed());
            }
        }
    }
    println!("│");

    let summary = plan.summary();
    println!("├─────────────────────────────────────────────────────┤");
    println!(
        "│ Plan: {} to add, {} to change, {} to replace, {} to destroy",
        summary.additions.to_string().green(),
        summary.modifications.to_string().yellow(),
        summary.replacements.to_string().magenta(),
        summary.removals.to_string().red()
    );
    println!("└─────────────────────────────────────────────────────┘");
}

// ============================================================================
// Execution callbacks
// ============================================================================

/// Prints one line per resource as changes are applied
#[derive(Default)]
pub struct TerminalProgress {
    total: usize,
    current: usize,
}

impl ProgressCallback for TerminalProgress {
    fn on_start(&mut self, count: usize) {
        self.total = count;
        self.current = 0;
        println!();
    }

    fn on_resource_start(&mut self, address: &str, action: &str) {
        self.current += 1;
        log::info!("{action} {address}");
        println!(
            "{} {} {}",
            format!("[{}/{}]", self.current, self.total).blue().bold(),
            action,
            address
        );
    }

    fn on_resource_complete(&mut self, address: &str, result: &ApplyResult) {
        match result {
            ApplyResult::Failed { error } => {
                println!("    {} {}: {}", "✗".red(), address, error);
            }
            ApplyResult::Skipped { reason } => {
                println!("    {} {}", "⚠".yellow(), reason.dimmed());
            }
            ApplyResult::NoChange => {}
            _ => println!("    {} done", "✓".green()),
        }
    }

    fn on_complete(&mut self) {}
}

/// Asks on the terminal through dialoguer
pub struct DialoguerConfirm;

impl ConfirmCallback for DialoguerConfirm {
    fn confirm(&mut self, prompt: &str) -> anyhow::Result<bool> {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(true)
            .interact()?;
        Ok(confirmed)
    }
}

/// Print final summary
pub fn print_summary(summary: &ExecuteSummary) {
    println!();
    if summary.is_success() {
        println!("  {} Changes applied successfully!", "✓".green().bold());
    } else {
        println!("  {} Changes applied with errors", "⚠".yellow().bold());
    }

    if summary.created > 0 {
        println!("    • {} resources created", summary.created);
    }
    if summary.modified > 0 {
        println!("    • {} resources modified", summary.modified);
    }
    if summary.replaced > 0 {
        println!("    • {} resources replaced", summary.replaced);
    }
    if summary.removed > 0 {
        println!("    • {} resources removed", summary.removed);
    }
    if summary.skipped > 0 {
        println!("    • {} resources skipped", summary.skipped);
    }
    if summary.failed > 0 {
        println!("    • {} {} failed", summary.failed, "resources".red());
    }
}

/// Print an error chain, with advice when an API error is the cause
pub fn report_error(err: &anyhow::Error) {
    error(&format!("{err:#}"));
    if let Some(api) = err.chain().find_map(|e| e.downcast_ref::<npclient::Error>()) {
        let category = api.category();
        eprintln!("  {} {}", category.description().bold(), category.advice().dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use declarative::{Address, Value};

    fn change(action: Action) -> PlannedChange {
        PlannedChange {
            address: Address::new("scope", "checkout"),
            action,
            config: None,
            prior: None,
            diffs: Vec::new(),
        }
    }

    #[test]
    fn test_describe_actions() {
        assert_eq!(describe(&change(Action::Create)), "(new)");
        assert_eq!(
            describe(&change(Action::Update {
                fields: vec!["scope_name".to_string(), "dimensions".to_string()]
            })),
            "update scope_name, dimensions"
        );
        assert_eq!(
            describe(&change(Action::Replace {
                reason: ReplaceReason::ForceNew(vec!["null_application_id".to_string()])
            })),
            "null_application_id forces replacement"
        );
        assert_eq!(
            describe(&change(Action::Replace {
                reason: ReplaceReason::Tainted
            })),
            "(tainted, will replace)"
        );
    }

    #[test]
    fn test_field_line() {
        let diff = FieldDiff {
            field: "capabilities_serverless_memory".to_string(),
            from: Some(Value::Int(128)),
            to: Some(Value::Int(512)),
            force_new: false,
        };
        assert_eq!(field_line(&diff), "capabilities_serverless_memory: 128 → 512");

        let diff = FieldDiff {
            field: "null_application_id".to_string(),
            from: None,
            to: Some(Value::Int(7)),
            force_new: true,
        };
        assert_eq!(
            field_line(&diff),
            "null_application_id: (unset) → 7 (forces new)"
        );
    }

    #[test]
    fn test_progress_counts() {
        let mut progress = TerminalProgress::default();
        progress.on_start(2);
        progress.on_resource_start("scope.a", "create");
        progress.on_resource_start("scope.b", "delete");
        assert_eq!(progress.current, 2);
        assert_eq!(progress.total, 2);
    }
}

use super::Session;
use crate::ui;
use anyhow::Result;
use colored::Colorize;
use declarative::StateRecord;

fn matches_target(record: &StateRecord, target: Option<&str>) -> bool {
    target.is_none_or(|t| t == record.kind || t == record.address().to_string())
}

/// Print the recorded state without contacting the API
pub fn run(session: &Session, target: Option<&str>) -> Result<()> {
    ui::header("Recorded State");
    ui::kv("File", &session.state_path.display().to_string());
    ui::kv("Last updated", &session.state.last_updated.to_rfc3339());

    let records: Vec<&StateRecord> = session
        .state
        .resources
        .iter()
        .filter(|r| matches_target(r, target))
        .collect();

    if records.is_empty() {
        println!();
        ui::info("No resources recorded");
        return Ok(());
    }

    for record in records {
        println!();
        let tainted = if record.tainted {
            " (tainted)".red().to_string()
        } else {
            String::new()
        };
        println!(
            "{} {}{}",
            record.address().to_string().bold(),
            format!("id={}", record.id).dimmed(),
            tainted
        );
        for (field, value) in &record.attributes {
            ui::kv(field, &value.to_string());
        }
    }
    Ok(())
}

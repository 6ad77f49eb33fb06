//! Specification lookups (slug <-> id)

use super::Session;
use crate::cli::SpecCommand;
use crate::reconcile::ProviderReconciler;
use anyhow::{Context, Result};

pub fn run(session: &Session, cmd: SpecCommand) -> Result<()> {
    let reconciler = ProviderReconciler::new(&session.client);
    match cmd {
        SpecCommand::Slug { slug } => {
            let id = reconciler
                .specification_id(&slug)
                .with_context(|| format!("resolving specification `{slug}`"))?;
            println!("{id}");
        }
        SpecCommand::Id { id } => {
            let slug = reconciler
                .specification_slug(&id)
                .with_context(|| format!("resolving specification {id}"))?;
            println!("{slug}");
        }
    }
    Ok(())
}

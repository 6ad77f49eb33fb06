pub mod apply;
pub mod plan;
pub mod show;
pub mod spec;

use crate::config::{Config, Overrides};
use crate::resource;
use crate::state::StateFile;
use crate::ui;
use crate::{Context, cli::ApiArgs};
use anyhow::Result;
use declarative::{Registry, StateSet};
use npclient::NullClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Everything a command needs: config, API client, lifecycles and state
pub struct Session {
    pub config: Config,
    pub client: Arc<NullClient>,
    pub registry: Registry,
    pub state_path: PathBuf,
    pub state: StateFile,
}

impl Session {
    /// Load config (flags override the file) and the recorded state
    pub fn open(api: ApiArgs) -> Result<Self> {
        let config = Config::load()?.with_overrides(Overrides {
            api_url: api.api_url,
            api_key: api.api_key,
            state_file: api.state_file,
            manifest: api.manifest,
        });
        log::debug!("API base: {}", config.api_url);
        let client = NullClient::new(&config.api_url, config.api_key.as_deref(), config.timeout());
        Self::with_client(config, Arc::new(client))
    }

    pub fn with_client(config: Config, client: Arc<NullClient>) -> Result<Self> {
        let state_path = config.state_path()?;
        let state = StateFile::load(&state_path)?;
        Ok(Self {
            registry: resource::registry(Arc::clone(&client)),
            config,
            client,
            state_path,
            state,
        })
    }

    pub fn save_state(&mut self, set: StateSet) -> Result<()> {
        self.state.replace(set);
        self.state.save(&self.state_path)
    }
}

/// Read every recorded resource back from the API, dropping vanished ones
fn refresh(ctx: &Context, registry: &Registry, state: &mut StateSet) -> Result<()> {
    if state.is_empty() {
        return Ok(());
    }
    if !ctx.quiet {
        ui::info(&format!("Refreshing {} resource(s)...", state.len()));
    }
    let gone = declarative::refresh(registry, state)?;
    for address in gone {
        ui::warn(&format!("{address} no longer exists and will be recreated"));
    }
    Ok(())
}

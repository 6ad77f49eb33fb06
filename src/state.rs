//! State file - what npctl recorded about managed resources
//!
//! Stored as TOML, one `[[resources]]` table per record:
//!
//! ```toml
//! last_updated = "2026-10-18T09:30:00Z"
//!
//! [[resources]]
//! kind = "scope"
//! name = "checkout"
//! id = "901"
//!
//! [resources.attributes]
//! scope_name = "checkout-api"
//! ```

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use declarative::{StateRecord, StateSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateFile {
    /// Last time the state was saved
    pub last_updated: DateTime<Utc>,

    #[serde(default)]
    pub resources: Vec<StateRecord>,
}

impl Default for StateFile {
    fn default() -> Self {
        Self {
            last_updated: Utc::now(),
            resources: Vec::new(),
        }
    }
}

impl StateFile {
    /// Default location (~/.local/state/npctl/state.toml)
    pub fn default_path() -> Result<PathBuf> {
        Ok(crate::paths::state_dir()?.join("state.toml"))
    }

    /// Load state from disk, or return an empty state if the file doesn't exist
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("State file {} does not exist, using empty state", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read state file: {}", path.display()))?;

        let state: StateFile = toml::from_str(&content)
            .with_context(|| format!("Failed to parse state file: {}", path.display()))?;

        log::debug!(
            "Loaded {} record(s) from {}",
            state.resources.len(),
            path.display()
        );
        Ok(state)
    }

    /// Save state to disk, stamping `last_updated`
    pub fn save(&mut self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
        }

        self.last_updated = Utc::now();
        let content = toml::to_string_pretty(&self).context("Failed to serialize state to TOML")?;

        fs::write(path, &content)
            .with_context(|| format!("Failed to write state file: {}", path.display()))?;

        log::debug!("Saved state to {}", path.display());
        Ok(())
    }

    pub fn to_set(&self) -> StateSet {
        StateSet::from_records(self.resources.iter().cloned())
    }

    /// Replace the records with the contents of `set`
    pub fn replace(&mut self, set: StateSet) {
        self.resources = set.into_records();
    }
}

//! User configuration (`~/.config/npctl/config.toml`)
//!
//! ```toml
//! api_url = "https://api.nullplatform.com"
//! api_key = "..."
//! timeout_secs = 30
//! state_file = "~/.local/state/npctl/state.toml"
//! manifest = "npctl.toml"
//! ```
//!
//! Command-line flags and their environment variables take precedence over
//! the file; a missing file means defaults.

use crate::paths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://api.nullplatform.com";
pub const DEFAULT_MANIFEST: &str = "npctl.toml";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
    pub state_file: Option<String>,
    pub manifest: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            state_file: None,
            manifest: DEFAULT_MANIFEST.to_string(),
        }
    }
}

/// Values given on the command line (or through their env vars)
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub api_url: Option<String>,
    pub api_key: Option<String>,
    pub state_file: Option<String>,
    pub manifest: Option<String>,
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        Ok(paths::config_dir()?.join("config.toml"))
    }

    /// Load from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(url) = overrides.api_url {
            self.api_url = url;
        }
        if overrides.api_key.is_some() {
            self.api_key = overrides.api_key;
        }
        if overrides.state_file.is_some() {
            self.state_file = overrides.state_file;
        }
        if let Some(manifest) = overrides.manifest {
            self.manifest = manifest;
        }
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolved state file path, `~` and env vars expanded
    pub fn state_path(&self) -> Result<PathBuf> {
        match &self.state_file {
            Some(path) => Ok(paths::expand(path)),
            None => crate::state::StateFile::default_path(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        paths::expand(&self.manifest)
    }
}

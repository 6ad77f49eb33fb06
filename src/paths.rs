//! Path resolution for npctl
//!
//! For config_dir():
//! 1. `XDG_CONFIG_HOME/npctl` (if set)
//! 2. Platform default:
//!    - Windows: `%APPDATA%\npctl`
//!    - macOS/Linux: `~/.config/npctl`
//!
//! For state_dir():
//! 1. `XDG_STATE_HOME/npctl` (if set)
//! 2. Platform default:
//!    - Windows: `%LOCALAPPDATA%\npctl`
//!    - macOS/Linux: `~/.local/state/npctl`

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "npctl";

/// Get the npctl config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join(APP_DIR);
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(app_data) = dirs::config_dir() {
            return Ok(app_data.join(APP_DIR));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join(APP_DIR))
}

/// Get the npctl state directory path
pub fn state_dir() -> Result<PathBuf> {
    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        let path = PathBuf::from(xdg_state).join(APP_DIR);
        log::debug!("Using XDG_STATE_HOME: {}", path.display());
        return Ok(path);
    }

    #[cfg(windows)]
    {
        if let Some(local_app_data) = dirs::data_local_dir() {
            return Ok(local_app_data.join(APP_DIR));
        }
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".local").join("state").join(APP_DIR))
}

/// Expand ~ and environment variables in a path string.
///
/// Unknown variables leave the input unchanged.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

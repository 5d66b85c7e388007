//! XDG-style path utilities for configuration and saved chats.
//!
//! This module provides consistent path resolution across platforms,
//! preferring XDG Base Directory Specification conventions over
//! OS-specific locations.

use anyhow::{Context, Result};
use std::path::PathBuf;

const APP_DIR: &str = "gchat";

/// Returns the configuration directory for gchat.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/gchat` if `XDG_CONFIG_HOME` is set
/// 2. `~/.config/gchat` otherwise
pub fn config_dir() -> Result<PathBuf> {
    xdg_or_home("XDG_CONFIG_HOME", &[".config"])
}

/// Returns the default directory for saved chat transcripts.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/gchat/chats` if `XDG_DATA_HOME` is set
/// 2. `~/.local/share/gchat/chats` otherwise
pub fn chats_dir() -> Result<PathBuf> {
    Ok(xdg_or_home("XDG_DATA_HOME", &[".local", "share"])?.join("chats"))
}

fn xdg_or_home(var: &str, fallback: &[&str]) -> Result<PathBuf> {
    if let Ok(xdg) = std::env::var(var)
        && !xdg.is_empty()
    {
        return Ok(PathBuf::from(xdg).join(APP_DIR));
    }

    let mut dir = home_dir()?;
    dir.extend(fallback);
    Ok(dir.join(APP_DIR))
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("Failed to determine home directory")
}

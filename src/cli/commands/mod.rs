//! Subcommand implementations.

use anyhow::Result;

use crate::cli::CommonArgs;
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};

/// Single-shot prompt handler.
pub mod ask;

/// Chat mode command handler.
pub mod chat;

/// Config display handler.
pub mod config;

impl From<&CommonArgs> for ResolveOptions {
    fn from(common: &CommonArgs) -> Self {
        Self {
            model: common.model.clone(),
            stream: common.stream_override(),
            render: common.render.clone(),
            no_render: common.no_render,
        }
    }
}

/// Loads the config file and merges the CLI overrides into it.
fn load_resolved(common: &CommonArgs) -> Result<ResolvedConfig> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    resolve_config(&ResolveOptions::from(common), &file_config)
}

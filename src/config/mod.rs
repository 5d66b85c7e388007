//! Configuration file management.

mod manager;

pub use manager::{
    ApiConfig, ConfigError, ConfigFile, ConfigManager, DEFAULT_API_KEY_ENV, DEFAULT_MODEL,
    DEFAULT_TIMEOUT_SECS, GchatConfig, ResolveOptions, ResolvedConfig, resolve_config,
};

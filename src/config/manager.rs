use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::llm::{DEFAULT_ENDPOINT, TransportMode};
use crate::paths;

/// Model used when neither the CLI nor the config file names one.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Environment variable consulted for the API key unless configured otherwise.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Read timeout applied when the config file does not set one.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Configuration problems the user has to fix before anything is sent.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(
        "Missing API key\n\n\
         Set the {env_var} environment variable:\n  \
         export {env_var}=\"your-api-key\"\n\n\
         Or set api_key in ~/.config/gchat/config.toml"
    )]
    MissingApiKey { env_var: String },
}

/// Default settings in the `[gchat]` section of config.toml.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GchatConfig {
    /// Default model identifier.
    pub model: Option<String>,
    /// Stream responses (`true`) or wait for the full body (`false`).
    pub stream: Option<bool>,
    /// Command used to render final output (e.g. `glow -`).
    pub render: Option<String>,
    /// Directory for saved transcripts.
    pub chats_dir: Option<PathBuf>,
}

/// Settings for the remote endpoint in the `[api]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    /// Base URL; the model and method are appended to it.
    #[serde(default)]
    pub endpoint: Option<String>,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Read timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ApiConfig {
    /// Name of the environment variable holding the API key.
    pub fn api_key_env(&self) -> &str {
        self.api_key_env.as_deref().unwrap_or(DEFAULT_API_KEY_ENV)
    }

    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Ok(key) = std::env::var(self.api_key_env())
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone().filter(|key| !key.is_empty())
    }
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/gchat/config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub gchat: GchatConfig,
    /// Endpoint settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Resolved configuration after merging CLI arguments and config file.
///
/// Fixed for the lifetime of the process.
#[derive(Clone)]
pub struct ResolvedConfig {
    /// The model identifier.
    pub model: String,
    /// The API base URL.
    pub endpoint: String,
    /// The API key.
    pub api_key: String,
    /// Sync or streaming transport.
    pub mode: TransportMode,
    /// Optional post-processing command.
    pub render: Option<String>,
    /// Where `/save` writes transcripts.
    pub chats_dir: PathBuf,
    /// Read timeout for the HTTP client.
    pub timeout: Duration,
}

impl std::fmt::Debug for ResolvedConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedConfig")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("mode", &self.mode)
            .field("render", &self.render)
            .field("chats_dir", &self.chats_dir)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Model override.
    pub model: Option<String>,
    /// Transport mode override (`--stream` / `--no-stream`).
    pub stream: Option<bool>,
    /// Render command override.
    pub render: Option<String>,
    /// Disable rendering even if configured.
    pub no_render: bool,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take
/// precedence over built-in defaults.
///
/// # Errors
///
/// Returns an error if no API key is available or the chats directory
/// cannot be determined.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    let model = options
        .model
        .as_ref()
        .or(config_file.gchat.model.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    let stream = options
        .stream
        .or(config_file.gchat.stream)
        .unwrap_or(true);
    let mode = if stream {
        TransportMode::Stream
    } else {
        TransportMode::Sync
    };

    let render = if options.no_render {
        None
    } else {
        options
            .render
            .as_ref()
            .or(config_file.gchat.render.as_ref())
            .filter(|cmd| !cmd.trim().is_empty())
            .cloned()
    };

    let chats_dir = match &config_file.gchat.chats_dir {
        Some(dir) => dir.clone(),
        None => paths::chats_dir()?,
    };

    let endpoint = config_file
        .api
        .endpoint
        .clone()
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let timeout = Duration::from_secs(
        config_file
            .api
            .timeout_secs
            .unwrap_or(DEFAULT_TIMEOUT_SECS),
    );

    let Some(api_key) = config_file.api.get_api_key() else {
        return Err(ConfigError::MissingApiKey {
            env_var: config_file.api.api_key_env().to_string(),
        }
        .into());
    };

    Ok(ResolvedConfig {
        model,
        endpoint,
        api_key,
        mode,
        render,
        chats_dir,
        timeout,
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/gchat/config.toml`
    /// or `~/.config/gchat/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    /// Creates a config manager for an explicit file.
    pub const fn with_path(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile = toml::from_str(&contents).with_context(|| {
            format!(
                "Failed to parse config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(config_file)
    }

    /// Loads the config file, or the defaults if it does not exist.
    ///
    /// A file that exists but cannot be parsed is still an error.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if self.config_path.exists() {
            self.load()
        } else {
            Ok(ConfigFile::default())
        }
    }
}

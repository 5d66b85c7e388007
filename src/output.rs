//! Process-wide output settings.
//!
//! Model text is the only thing written to stdout, so `gchat` can sit in a
//! pipeline. Status lines, warnings, errors and the spinner go to stderr.
//! `--quiet` hides status lines and the spinner; warnings and errors are
//! always shown.

use std::sync::OnceLock;

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Suppress status lines and the spinner.
    pub quiet: bool,
    /// Print plain text without ANSI styling.
    pub no_color: bool,
}

impl OutputConfig {
    /// Settings for the given `--quiet` flag, with colour taken from the
    /// environment.
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            no_color: color_disabled_by_env(
                std::env::var("NO_COLOR").ok().as_deref(),
                std::env::var("TERM").ok().as_deref(),
            ),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(false)
    }
}

/// `NO_COLOR` counts only when non-empty (https://no-color.org/); a dumb
/// terminal never gets colour.
fn color_disabled_by_env(no_color: Option<&str>, term: Option<&str>) -> bool {
    no_color.is_some_and(|v| !v.is_empty()) || term == Some("dumb")
}

/// Installs the settings. Only the first call has an effect.
pub fn init(config: OutputConfig) {
    let _ = OUTPUT_CONFIG.set(config);
}

pub fn config() -> &'static OutputConfig {
    OUTPUT_CONFIG.get_or_init(OutputConfig::default)
}

pub fn is_quiet() -> bool {
    config().quiet
}

pub fn is_no_color() -> bool {
    config().no_color
}

/// Print a status line to stderr unless `--quiet` is set.
#[macro_export]
macro_rules! status {
    ($($arg:tt)*) => {
        if !$crate::output::is_quiet() {
            eprintln!($($arg)*);
        }
    };
}

/// Print a warning to stderr, even in quiet mode.
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {
        eprintln!($($arg)*);
    };
}

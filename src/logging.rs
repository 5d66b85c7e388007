//! Diagnostic logging to stderr via `tracing`.
//!
//! Quiet by default; `--verbose` raises the crate to `debug`, and the
//! `GCHAT_LOG` environment variable overrides both with a full filter
//! directive (for example `GCHAT_LOG=gchat_cli=trace,reqwest=debug`).

use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "GCHAT_LOG";

/// Default filter directive for the given verbosity.
pub const fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "gchat_cli=debug"
    } else {
        "gchat_cli=error"
    }
}

/// Installs the global subscriber. Later calls are no-ops.
pub fn init(verbose: bool, ansi: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(ansi)
        .with_target(false)
        .without_time()
        .try_init();
}

//! Maps failures to process exit codes.

use crate::config::ConfigError;
use crate::llm::{EngineError, TransportFailure};

/// Picks the `sysexits`-style code for an error that reached `main`.
pub fn exit_code(err: &anyhow::Error) -> exitcode::ExitCode {
    for cause in err.chain() {
        if let Some(failure) = cause.downcast_ref::<TransportFailure>() {
            return engine_code(&failure.error);
        }
        if let Some(error) = cause.downcast_ref::<EngineError>() {
            return engine_code(error);
        }
        if cause.is::<ConfigError>() || cause.is::<toml::de::Error>() {
            return exitcode::CONFIG;
        }
    }
    exitcode::SOFTWARE
}

const fn engine_code(error: &EngineError) -> exitcode::ExitCode {
    match error {
        EngineError::EmptyRequest => exitcode::USAGE,
        EngineError::Encoding(_) => exitcode::DATAERR,
        EngineError::Network(_) => exitcode::UNAVAILABLE,
        EngineError::Api { .. } => exitcode::PROTOCOL,
    }
}

//! Error taxonomy for a single exchange with the remote endpoint.

/// Failures that abort one request/response exchange.
///
/// None of these end an interactive session; the session reports them and
/// returns to the prompt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// Prompt, context and history were all empty. Rejected before any I/O.
    #[error("Nothing to send: prompt, context and history are all empty")]
    EmptyRequest,
    /// The payload could not be serialized into the wire format.
    #[error("Failed to encode request payload: {0}")]
    Encoding(String),
    /// Connection failure, timeout, or a stream that ended mid-frame.
    #[error("Network error: {0}")]
    Network(String),
    /// The service answered with a structured error.
    #[error("API error: {detail}")]
    Api { detail: String },
}

impl EngineError {
    pub fn network(err: impl std::fmt::Display) -> Self {
        Self::Network(err.to_string())
    }

    pub fn api(detail: impl Into<String>) -> Self {
        Self::Api {
            detail: detail.into(),
        }
    }
}

/// A failed dispatch together with whatever text had already arrived.
///
/// Streaming calls can fail after some fragments were shown; `partial` keeps
/// them so callers can surface the output before reporting the error.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{error}")]
pub struct TransportFailure {
    pub error: EngineError,
    pub partial: String,
}

impl TransportFailure {
    pub const fn new(error: EngineError) -> Self {
        Self {
            error,
            partial: String::new(),
        }
    }

    pub const fn with_partial(error: EngineError, partial: String) -> Self {
        Self { error, partial }
    }
}

impl From<EngineError> for TransportFailure {
    fn from(error: EngineError) -> Self {
        Self::new(error)
    }
}

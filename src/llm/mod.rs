mod client;
mod error;
mod payload;
mod response;
mod sink;
mod sse;

pub use client::{
    DEFAULT_ENDPOINT, GeminiClient, Transport, TransportMode, collect_stream, dispatch,
};
pub use error::{EngineError, TransportFailure};
pub use payload::{
    Payload, PayloadMode, Role, Turn, build_request_payload, build_single_turn, combine,
};
pub use response::GenerateResponse;
pub use sink::{FragmentSink, NullSink, TerminalSink};
pub use sse::{Frame, decode_frames};

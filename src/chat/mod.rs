//! Interactive chat mode.
//!
//! Provides a REPL-style interface with slash commands, an in-memory
//! conversation history, and on-demand transcript export.

/// Slash command parsing and autocomplete.
pub mod command;
mod display;
mod history;
mod session;
mod transcript;
mod ui;

pub use display::dispatch_and_display;
pub use history::History;
pub use session::{ChatSession, InquireLineSource, LineSource, SessionConfig};
pub use transcript::{TranscriptPersister, format_transcript, sanitize_name};

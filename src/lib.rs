//! # gchat - Terminal client for Gemini models
//!
//! `gchat` sends a prompt, optionally wrapped with context text, to a
//! Gemini-style `generateContent` endpoint and prints the answer. It can
//! wait for the complete response or stream fragments as they arrive.
//!
//! ## Quick Start
//!
//! ```bash
//! # One question
//! gchat "What is a monad?"
//!
//! # Context from a pipe
//! git diff | gchat "Review this change"
//!
//! # Multi-turn chat, context attached to the first turn
//! gchat chat -c notes.md
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/gchat/config.toml`:
//!
//! ```toml
//! [gchat]
//! model = "gemini-2.0-flash"
//! stream = true
//! render = "glow -"
//!
//! [api]
//! api_key_env = "GEMINI_API_KEY"
//! timeout_secs = 120
//! ```

/// Interactive chat sessions, history and transcripts.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management.
pub mod config;

/// File system utilities.
pub mod fs;

/// Input reading from files and stdin.
pub mod input;

/// Payload building, transport and wire formats.
pub mod llm;

/// Diagnostic logging setup (tracing subscriber, `GCHAT_LOG` filter).
pub mod logging;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration and transcripts.
pub mod paths;

/// External post-processing of final responses.
pub mod render;

/// Terminal UI components (spinner, colors).
pub mod ui;

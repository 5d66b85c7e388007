//! Optional post-processing of model output through an external command.
//!
//! The command (for example `glow -`) receives the full text on stdin and its
//! stdout replaces the text. Any failure falls back to the raw text.

use anyhow::{Context, Result, bail};
use std::io::Write;
use std::process::{Command, Stdio};

use crate::ui::Style;

/// A text-to-text display filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Renderer {
    argv: Option<Vec<String>>,
}

impl Renderer {
    pub const fn passthrough() -> Self {
        Self { argv: None }
    }

    /// Builds a renderer from a whitespace-separated command line.
    /// `None` or a blank command means passthrough.
    pub fn from_command(command: Option<&str>) -> Self {
        let argv: Vec<String> = command
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect();

        Self {
            argv: (!argv.is_empty()).then_some(argv),
        }
    }

    pub const fn is_passthrough(&self) -> bool {
        self.argv.is_none()
    }

    pub fn command(&self) -> Option<String> {
        self.argv.as_ref().map(|argv| argv.join(" "))
    }

    pub fn apply(&self, text: &str) -> String {
        let Some(argv) = &self.argv else {
            return text.to_string();
        };

        match run_filter(argv, text) {
            Ok(rendered) => rendered,
            Err(e) => {
                tracing::warn!(error = %e, "render command failed");
                crate::warn!("{} {e:#}; showing raw output", Style::warning("Warning:"));
                text.to_string()
            }
        }
    }
}

fn run_filter(argv: &[String], text: &str) -> Result<String> {
    let (program, args) = argv.split_first().context("Render command is empty")?;

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .with_context(|| format!("Failed to start render command '{program}'"))?;

    let mut stdin = child
        .stdin
        .take()
        .context("Failed to open render command stdin")?;
    let input = text.to_string();
    // The child may fill stdout before draining stdin, so write from another thread.
    let writer = std::thread::spawn(move || stdin.write_all(input.as_bytes()));

    let output = child
        .wait_with_output()
        .context("Failed to read render command output")?;

    if let Ok(Err(e)) = writer.join() {
        tracing::debug!(error = %e, "render command closed stdin early");
    }

    if !output.status.success() {
        bail!("Render command '{program}' exited with {}", output.status);
    }

    String::from_utf8(output.stdout).context("Render command output is not valid UTF-8")
}

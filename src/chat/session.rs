use anyhow::Result;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{InquireError, Text};
use std::path::PathBuf;
use tracing::debug;

use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::display::dispatch_and_display;
use super::history::History;
use super::transcript::TranscriptPersister;
use super::ui;
use crate::config::ResolvedConfig;
use crate::llm::{
    PayloadMode, Role, Transport, TransportMode, Turn, build_request_payload, build_single_turn,
};
use crate::render::Renderer;
use crate::ui::{Style, is_prompt_cancelled};

/// Configuration for a chat session. Never changes once the session starts.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The model identifier.
    pub model: String,
    /// The API endpoint URL (for display).
    pub endpoint: String,
    /// Sync or streaming transport.
    pub mode: TransportMode,
    /// Post-processing filter for final output.
    pub renderer: Renderer,
    /// Context sent with the first turn.
    pub context: Option<String>,
    /// Prompt dispatched before reading any interactive input.
    pub initial_prompt: Option<String>,
    /// Where transcripts are saved.
    pub chats_dir: PathBuf,
}

impl SessionConfig {
    pub fn from_resolved(
        resolved: &ResolvedConfig,
        context: Option<String>,
        initial_prompt: Option<String>,
    ) -> Self {
        Self {
            model: resolved.model.clone(),
            endpoint: resolved.endpoint.clone(),
            mode: resolved.mode,
            renderer: Renderer::from_command(resolved.render.as_deref()),
            context,
            initial_prompt,
            chats_dir: resolved.chats_dir.clone(),
        }
    }
}

/// A source of raw interactive input lines.
pub trait LineSource {
    /// Returns the next line, or `None` at end of input.
    fn read_line(&mut self) -> Result<Option<String>>;
}

/// Reads lines from the terminal with slash-command autocompletion.
pub struct InquireLineSource {
    render_config: RenderConfig<'static>,
}

impl InquireLineSource {
    pub fn new() -> Self {
        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        Self { render_config }
    }
}

impl Default for InquireLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for InquireLineSource {
    fn read_line(&mut self) -> Result<Option<String>> {
        let input = Text::new("")
            .with_render_config(self.render_config)
            .with_autocomplete(SlashCommandCompleter)
            .with_help_message("Type a message, /help for commands, Ctrl+C to quit")
            .prompt();

        match input {
            Ok(line) => Ok(Some(line)),
            Err(e) if is_prompt_cancelled(&e) => {
                println!(); // Clear line before goodbye message
                Ok(None)
            }
            Err(InquireError::NotTTY) => {
                crate::warn!(
                    "{} No terminal available for interactive input",
                    Style::warning("Warning:")
                );
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// An interactive, multi-turn chat session.
///
/// Owns the conversation history. Each exchange appends the user turn before
/// dispatch and the model turn after success; a failed dispatch removes the
/// user turn again, so history only ever holds completed exchanges.
pub struct ChatSession<T, I> {
    config: SessionConfig,
    transport: T,
    input: I,
    history: History,
    persister: TranscriptPersister,
    initial_prompt: Option<String>,
}

impl<T: Transport, I: LineSource> ChatSession<T, I> {
    /// Creates a new chat session with the given configuration.
    pub fn new(config: SessionConfig, transport: T, input: I) -> Self {
        let persister = TranscriptPersister::new(config.chats_dir.clone());
        let initial_prompt = config.initial_prompt.clone().filter(|p| !p.is_empty());
        Self {
            config,
            transport,
            input,
            history: History::new(),
            persister,
            initial_prompt,
        }
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    pub const fn persister(&self) -> &TranscriptPersister {
        &self.persister
    }

    /// Runs until a quit command or end of input.
    pub async fn run(&mut self) -> Result<()> {
        ui::print_header(&self.config);

        loop {
            // The initial prompt is used verbatim, never parsed as a command.
            let input = match self.initial_prompt.take() {
                Some(prompt) => Input::Text(prompt),
                None => match self.input.read_line()? {
                    Some(line) => parse_input(&line),
                    None => break,
                },
            };

            match input {
                Input::Empty => {}
                Input::Command(cmd) => {
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                Input::Text(text) => {
                    self.exchange(&text).await;
                }
            }
        }

        ui::print_goodbye();
        Ok(())
    }

    fn handle_command(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Config => ui::print_config(&self.config),
            SlashCommand::Help => ui::print_help(),
            SlashCommand::History => ui::print_history(&self.history),
            SlashCommand::Quit => return false,
            SlashCommand::Save(name) => {
                self.save_transcript(name.as_deref());
            }
            SlashCommand::Unknown(cmd) => {
                ui::print_error(&format!("Unknown command: /{cmd}"));
            }
        }
        true
    }

    /// Writes the transcript. Failures are reported and never end the session.
    pub fn save_transcript(&mut self, name: Option<&str>) -> Option<PathBuf> {
        match self
            .persister
            .save(name, self.config.context.as_deref(), self.history.turns())
        {
            Ok(path) => {
                ui::print_saved(&path);
                Some(path)
            }
            Err(e) => {
                ui::print_error(&format!("{e:#}"));
                None
            }
        }
    }

    /// Runs one prompt through build, dispatch and history update.
    ///
    /// Returns `true` when the exchange completed and history advanced.
    pub async fn exchange(&mut self, prompt: &str) -> bool {
        // Context rides on the first turn only; after a rollback of that turn
        // history is empty again and the retry carries it too.
        let context = if self.history.is_empty() {
            self.config.context.as_deref().unwrap_or_default()
        } else {
            ""
        };

        let turn = build_single_turn(context, prompt);
        let payload = match build_request_payload(self.history.turns(), &turn, PayloadMode::Chat)
        {
            Ok(payload) => payload,
            Err(e) => {
                ui::print_error(&e.to_string());
                return false;
            }
        };

        self.history.append(turn);
        debug!(turns = self.history.len(), "dispatching");

        let result = dispatch_and_display(
            &self.transport,
            self.config.mode,
            &self.config.renderer,
            &payload,
        )
        .await;

        match result {
            Ok(text) => {
                self.history.append(Turn::model(text));
                println!();
                true
            }
            Err(failure) => {
                self.history.pop_last_if_role(Role::User);
                debug!(turns = self.history.len(), "rolled back failed exchange");
                ui::print_error(&failure.to_string());
                false
            }
        }
    }
}

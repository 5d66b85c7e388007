use anyhow::Result;
use tracing::debug;

use crate::chat::dispatch_and_display;
use crate::cli::CommonArgs;
use crate::input::InputReader;
use crate::llm::{GeminiClient, PayloadMode, build_request_payload, build_single_turn};
use crate::render::Renderer;

/// Sends one prompt, prints the answer and returns.
///
/// Any engine failure is returned as-is so `main` can pick the exit code.
pub async fn run_ask(prompt: Option<String>, common: &CommonArgs) -> Result<()> {
    let config = super::load_resolved(common)?;

    let context = InputReader::read_context(common.context_file.as_deref())?;
    let prompt = InputReader::read_prompt(prompt, common.prompt_file.as_deref())?;

    let turn = build_single_turn(
        context.as_deref().unwrap_or_default(),
        prompt.as_deref().unwrap_or_default(),
    );
    let payload = build_request_payload(&[], &turn, PayloadMode::Single)?;

    debug!(?config, "single-shot request");

    let client = GeminiClient::new(
        config.endpoint.clone(),
        config.model.clone(),
        Some(config.api_key.clone()),
        config.timeout,
    )?;
    let renderer = Renderer::from_command(config.render.as_deref());

    dispatch_and_display(&client, config.mode, &renderer, &payload).await?;

    Ok(())
}

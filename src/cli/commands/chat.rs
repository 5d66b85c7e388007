use anyhow::Result;

use crate::chat::{ChatSession, InquireLineSource, SessionConfig};
use crate::cli::CommonArgs;
use crate::input::InputReader;
use crate::llm::GeminiClient;

pub async fn run_chat(prompt: Option<String>, common: &CommonArgs) -> Result<()> {
    let resolved = super::load_resolved(common)?;

    let context = InputReader::read_context(common.context_file.as_deref())?;
    let initial_prompt = InputReader::read_prompt(prompt, common.prompt_file.as_deref())?;

    let client = GeminiClient::new(
        resolved.endpoint.clone(),
        resolved.model.clone(),
        Some(resolved.api_key.clone()),
        resolved.timeout,
    )?;

    let config = SessionConfig::from_resolved(&resolved, context, initial_prompt);
    let mut session = ChatSession::new(config, client, InquireLineSource::new());
    session.run().await
}

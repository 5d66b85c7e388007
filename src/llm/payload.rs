//! Turns, prompt/context combination, and request payload construction.

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Who produced a turn. Serialized with the names the endpoint expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message. Never edited after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    role: Role,
    text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }

    pub const fn role(&self) -> Role {
        self.role
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Whether a request carries only the new turn or the whole conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadMode {
    Single,
    Chat,
}

/// Wraps context and prompt in their tagged blocks.
///
/// Empty parts are omitted; when both are present the context block comes
/// first and the two are separated by a newline.
pub fn combine(context: &str, prompt: &str) -> String {
    let mut blocks = Vec::with_capacity(2);
    if !context.is_empty() {
        blocks.push(format!("<context>{context}</context>"));
    }
    if !prompt.is_empty() {
        blocks.push(format!("<prompt>{prompt}</prompt>"));
    }
    blocks.join("\n")
}

pub fn build_single_turn(context: &str, prompt: &str) -> Turn {
    Turn::user(combine(context, prompt))
}

/// The ordered list of turns sent in one request.
///
/// Derived from history plus the new turn; there is no way to mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    turns: Vec<Turn>,
}

impl Payload {
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Serializes into the `generateContent` request body.
    pub fn encode(&self) -> Result<Vec<u8>, EngineError> {
        let body = GenerateRequest {
            contents: self
                .turns
                .iter()
                .map(|turn| WireContent {
                    role: turn.role,
                    parts: [WirePart { text: &turn.text }],
                })
                .collect(),
        };
        serde_json::to_vec(&body).map_err(|e| EngineError::Encoding(e.to_string()))
    }
}

/// Builds the payload for one dispatch.
///
/// `Single` ignores `history`; `Chat` sends `history ++ [new_turn]`.
pub fn build_request_payload(
    history: &[Turn],
    new_turn: &Turn,
    mode: PayloadMode,
) -> Result<Payload, EngineError> {
    let prior = match mode {
        PayloadMode::Single => &[][..],
        PayloadMode::Chat => history,
    };

    if new_turn.text.is_empty() && prior.is_empty() {
        return Err(EngineError::EmptyRequest);
    }

    let mut turns = Vec::with_capacity(prior.len() + 1);
    turns.extend_from_slice(prior);
    turns.push(new_turn.clone());
    Ok(Payload { turns })
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<WireContent<'a>>,
}

#[derive(Debug, Serialize)]
struct WireContent<'a> {
    role: Role,
    parts: [WirePart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct WirePart<'a> {
    text: &'a str,
}

//! Response bodies of `generateContent` and the frames of `streamGenerateContent`.

use serde::Deserialize;

/// One response object. The synchronous call returns exactly one; the
/// streaming call returns one per `data:` event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

/// The `error` object the service returns on failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl ApiErrorBody {
    pub fn detail(&self) -> String {
        let message = self.message.as_deref().unwrap_or("unknown error");
        match (&self.status, self.code) {
            (Some(status), _) => format!("{status}: {message}"),
            (None, Some(code)) => format!("{code}: {message}"),
            (None, None) => message.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

impl GenerateResponse {
    /// Text of the first candidate, or `None` when no text field is present.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let texts: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.concat())
        }
    }

    pub fn error_detail(&self) -> Option<String> {
        self.error.as_ref().map(ApiErrorBody::detail)
    }
}

/// Extracts a readable detail from a non-success HTTP body.
pub fn error_detail_from_body(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| format!("HTTP {status}: {}", body.trim()),
        |envelope| envelope.error.detail(),
    )
}

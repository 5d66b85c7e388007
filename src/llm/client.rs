use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::debug;

use super::error::{EngineError, TransportFailure};
use super::payload::Payload;
use super::response::{GenerateResponse, error_detail_from_body};
use super::sink::FragmentSink;
use super::sse::{Frame, decode_frames};
use crate::ui::Style;

/// Base URL of the public Generative Language API.
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How a payload is sent and its response received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    /// Wait for the complete response.
    Sync,
    /// Consume server-pushed events, echoing fragments as they arrive.
    Stream,
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Sync => "sync",
            Self::Stream => "stream",
        })
    }
}

/// Executes a built payload against the remote endpoint.
///
/// Both calls return the recovered plain text. On failure the returned
/// [`TransportFailure`] carries any text received before the error.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_sync(&self, payload: &Payload) -> Result<String, TransportFailure>;

    async fn send_stream(
        &self,
        payload: &Payload,
        sink: &mut dyn FragmentSink,
    ) -> Result<String, TransportFailure>;
}

/// Sends `payload` with the given mode. `sink` is only used when streaming.
pub async fn dispatch<T: Transport + ?Sized>(
    transport: &T,
    mode: TransportMode,
    payload: &Payload,
    sink: &mut dyn FragmentSink,
) -> Result<String, TransportFailure> {
    match mode {
        TransportMode::Sync => transport.send_sync(payload).await,
        TransportMode::Stream => transport.send_stream(payload, sink).await,
    }
}

/// Client for `generateContent` / `streamGenerateContent`.
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Creates a client. `timeout` bounds how long a read may block.
    pub fn new(
        endpoint: String,
        model: String,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .read_timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            endpoint,
            model,
            api_key,
        })
    }

    fn url(&self, stream: bool) -> String {
        let base = self.endpoint.trim_end_matches('/');
        if stream {
            format!("{base}/{}:streamGenerateContent?alt=sse", self.model)
        } else {
            format!("{base}/{}:generateContent", self.model)
        }
    }

    async fn post(&self, url: &str, payload: &Payload) -> Result<reqwest::Response, EngineError> {
        let body = payload.encode()?;

        debug!(url, model = %self.model, turns = payload.len(), "sending request");

        let mut http_request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);

        if let Some(api_key) = &self.api_key {
            http_request = http_request.header("x-goog-api-key", api_key);
        }

        let response = http_request
            .send()
            .await
            .map_err(|e| EngineError::network(format!("failed to reach {url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    debug!(error = %e, %status, "failed to read error body");
                    String::new()
                }
            };
            return Err(EngineError::api(error_detail_from_body(status, &body)));
        }

        Ok(response)
    }
}

#[async_trait]
impl Transport for GeminiClient {
    async fn send_sync(&self, payload: &Payload) -> Result<String, TransportFailure> {
        let url = self.url(false);
        let response = self.post(&url, payload).await?;

        let body = response
            .text()
            .await
            .map_err(|e| EngineError::network(format!("failed to read response: {e}")))?;

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| EngineError::api(format!("malformed response body: {e}")))?;

        if let Some(detail) = parsed.error_detail() {
            return Err(EngineError::api(detail).into());
        }

        Ok(parsed.text().unwrap_or_else(|| {
            warn_empty_response();
            String::new()
        }))
    }

    async fn send_stream(
        &self,
        payload: &Payload,
        sink: &mut dyn FragmentSink,
    ) -> Result<String, TransportFailure> {
        let url = self.url(true);
        let response = self.post(&url, payload).await?;

        collect_stream(decode_frames(response.bytes_stream()), sink).await
    }
}

/// Drains decoded frames, forwarding each text fragment to `sink` as soon as
/// it arrives and returning the concatenation.
///
/// The first embedded error frame or network error ends the call; the text
/// gathered so far travels with the failure.
pub async fn collect_stream<S>(
    frames: S,
    sink: &mut dyn FragmentSink,
) -> Result<String, TransportFailure>
where
    S: Stream<Item = Result<Frame, EngineError>>,
{
    let mut frames = std::pin::pin!(frames);
    let mut text = String::new();
    let mut data_frames = 0usize;

    while let Some(frame) = frames.next().await {
        match frame {
            Ok(Frame::Data(response)) => {
                data_frames += 1;
                if let Some(detail) = response.error_detail() {
                    return Err(TransportFailure::with_partial(EngineError::api(detail), text));
                }
                if let Some(fragment) = response.text() {
                    sink.emit(&fragment);
                    text.push_str(&fragment);
                }
            }
            Ok(Frame::Ignorable(line)) => debug!(frame = %line, "ignoring non-data frame"),
            Err(error) => return Err(TransportFailure::with_partial(error, text)),
        }
    }

    debug!(data_frames, bytes = text.len(), "stream complete");

    if text.is_empty() {
        warn_empty_response();
    }
    Ok(text)
}

fn warn_empty_response() {
    tracing::warn!("response contained no text");
    crate::warn!(
        "{} The model returned an empty response",
        Style::warning("Warning:")
    );
}

use std::io::{self, Write};

use crate::llm::{
    NullSink, Payload, TerminalSink, Transport, TransportFailure, TransportMode, dispatch,
};
use crate::render::Renderer;
use crate::ui::Spinner;

/// Sends `payload` and puts the answer on stdout.
///
/// With a render command set, the complete text goes through it once it is
/// in, whatever the transport mode; a streamed answer is then not echoed
/// live. Without one, streaming echoes fragments as they arrive. Partial
/// streamed output is shown raw when the call fails.
pub async fn dispatch_and_display<T: Transport + ?Sized>(
    transport: &T,
    mode: TransportMode,
    renderer: &Renderer,
    payload: &Payload,
) -> Result<String, TransportFailure> {
    display_to(transport, mode, renderer, payload, &mut io::stdout()).await
}

async fn display_to<T, W>(
    transport: &T,
    mode: TransportMode,
    renderer: &Renderer,
    payload: &Payload,
    out: &mut W,
) -> Result<String, TransportFailure>
where
    T: Transport + ?Sized,
    W: Write + Send,
{
    let spinner = Spinner::new("Thinking...");

    if mode == TransportMode::Stream && renderer.is_passthrough() {
        let mut sink = TerminalSink::with_writer(&mut *out, Some(spinner));
        let result = dispatch(transport, mode, payload, &mut sink).await;
        sink.finish();
        let echoed = sink.wrote_any();
        drop(sink);

        if echoed {
            let _ = out.write_all(b"\n").and_then(|()| out.flush());
        }
        return result;
    }

    // Nothing is shown until the whole answer is in.
    let result = dispatch(transport, mode, payload, &mut NullSink).await;
    spinner.stop();

    match &result {
        Ok(text) if !text.is_empty() => write_final(out, &renderer.apply(text)),
        Err(failure) if !failure.partial.is_empty() => write_final(out, &failure.partial),
        _ => {}
    }

    result
}

fn write_final<W: Write>(out: &mut W, text: &str) {
    let _ = out.write_all(text.as_bytes());
    if !text.ends_with('\n') {
        let _ = out.write_all(b"\n");
    }
    let _ = out.flush();
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llm::{EngineError, FragmentSink, PayloadMode, Turn, build_request_payload};
    use async_trait::async_trait;

    /// Answers "hello there" in two fragments, or fails after the first.
    struct TwoFragments {
        fail: bool,
    }

    #[async_trait]
    impl Transport for TwoFragments {
        async fn send_sync(&self, _payload: &Payload) -> Result<String, TransportFailure> {
            Ok("hello there".to_string())
        }

        async fn send_stream(
            &self,
            _payload: &Payload,
            sink: &mut dyn FragmentSink,
        ) -> Result<String, TransportFailure> {
            sink.emit("hello ");
            if self.fail {
                return Err(TransportFailure::with_partial(
                    EngineError::network("stream ended mid-frame"),
                    "hello ".to_string(),
                ));
            }
            sink.emit("there");
            Ok("hello there".to_string())
        }
    }

    fn payload() -> Payload {
        build_request_payload(&[], &Turn::user("hi"), PayloadMode::Single).unwrap()
    }

    async fn shown(mode: TransportMode, renderer: &Renderer, fail: bool) -> String {
        let mut out = Vec::new();
        let _ = display_to(&TwoFragments { fail }, mode, renderer, &payload(), &mut out).await;
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_stream_without_renderer_echoes_live() {
        let out = shown(TransportMode::Stream, &Renderer::passthrough(), false).await;
        assert_eq!(out, "hello there\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stream_with_renderer_shows_rendered_text_only() {
        let renderer = Renderer::from_command(Some("tr a-z A-Z"));
        let out = shown(TransportMode::Stream, &renderer, false).await;
        assert_eq!(out, "HELLO THERE\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_sync_with_renderer_shows_rendered_text() {
        let renderer = Renderer::from_command(Some("tr a-z A-Z"));
        let out = shown(TransportMode::Sync, &renderer, false).await;
        assert_eq!(out, "HELLO THERE\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_stream_failure_with_renderer_shows_raw_partial() {
        let renderer = Renderer::from_command(Some("tr a-z A-Z"));
        let mut out = Vec::new();

        let result = display_to(
            &TwoFragments { fail: true },
            TransportMode::Stream,
            &renderer,
            &payload(),
            &mut out,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(String::from_utf8(out).unwrap(), "hello \n");
    }
}

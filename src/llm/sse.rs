//! Server-Sent Events (SSE) decoder for `streamGenerateContent?alt=sse`.
//!
//! Turns a raw byte stream into a lazy sequence of typed frames. Framing
//! concerns (line splitting, CRLF, multi-line `data:` fields, comments) stay
//! here; callers only see decoded responses.

use bytes::Bytes;
use futures_util::Stream;
use std::fmt::Display;

use super::error::EngineError;
use super::response::GenerateResponse;

/// A decoded SSE event.
#[derive(Debug, Clone)]
pub enum Frame {
    /// A `data:` event carrying a response object.
    Data(GenerateResponse),
    /// Comments, non-data fields, and data that is not a response object.
    Ignorable(String),
}

/// Decodes an SSE byte stream into frames.
///
/// Bytes are buffered until a full line is available, so multi-byte UTF-8
/// sequences split across chunks decode correctly. A transport error ends the
/// sequence with `EngineError::Network`, as does a trailing partial line when
/// the body closes.
pub fn decode_frames<S, E>(byte_stream: S) -> impl Stream<Item = Result<Frame, EngineError>> + Send
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Display + Send + 'static,
{
    async_stream::stream! {
        use futures_util::StreamExt;

        let mut byte_stream = std::pin::pin!(byte_stream);
        let mut buffer: Vec<u8> = Vec::new();
        // Bytes before this offset are known to hold no newline.
        let mut scanned = 0;
        let mut data = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = match chunk_result {
                Ok(c) => c,
                Err(e) => {
                    yield Err(EngineError::network(format!("stream interrupted: {e}")));
                    return;
                }
            };

            buffer.extend_from_slice(&chunk);

            let mut line_start = 0;
            while let Some(offset) = buffer[scanned..].iter().position(|&b| b == b'\n') {
                let line_end = scanned + offset;
                let Ok(line) = std::str::from_utf8(&buffer[line_start..line_end]) else {
                    yield Err(EngineError::network("event stream is not valid UTF-8"));
                    return;
                };
                let frame = feed_line(line.trim_end_matches('\r'), &mut data);

                line_start = line_end + 1;
                scanned = line_start;
                if let Some(frame) = frame {
                    yield frame;
                }
            }

            buffer.drain(..line_start);
            scanned = buffer.len();
        }

        if !buffer.iter().all(u8::is_ascii_whitespace) {
            yield Err(EngineError::network("stream ended mid-frame"));
            return;
        }

        if !data.is_empty() {
            yield Ok(parse_event(&std::mem::take(&mut data)));
        }
    }
}

/// Feeds one line (without terminator) into the pending event.
///
/// Returns a frame when the line completes an event or is itself ignorable.
fn feed_line(line: &str, data: &mut String) -> Option<Result<Frame, EngineError>> {
    if line.is_empty() {
        if data.is_empty() {
            return None;
        }
        return Some(Ok(parse_event(&std::mem::take(data))));
    }

    if line.starts_with(':') {
        return Some(Ok(Frame::Ignorable(line.to_string())));
    }

    let (field, value) = line.split_once(':').unwrap_or((line, ""));
    let value = value.strip_prefix(' ').unwrap_or(value);

    if field == "data" {
        if !data.is_empty() {
            data.push('\n');
        }
        data.push_str(value);
        None
    } else {
        Some(Ok(Frame::Ignorable(line.to_string())))
    }
}

fn parse_event(data: &str) -> Frame {
    serde_json::from_str::<GenerateResponse>(data)
        .map_or_else(|_| Frame::Ignorable(data.to_string()), Frame::Data)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    fn chunks(parts: &[&str]) -> Vec<Result<Bytes, String>> {
        parts
            .iter()
            .map(|p| Ok(Bytes::copy_from_slice(p.as_bytes())))
            .collect()
    }

    async fn decode(parts: Vec<Result<Bytes, String>>) -> Vec<Result<Frame, EngineError>> {
        decode_frames(futures_util::stream::iter(parts))
            .collect()
            .await
    }

    fn texts(frames: &[Result<Frame, EngineError>]) -> Vec<String> {
        frames
            .iter()
            .filter_map(|f| match f {
                Ok(Frame::Data(response)) => response.text(),
                _ => None,
            })
            .collect()
    }

    const HEL: &str = r#"data: {"candidates":[{"content":{"parts":[{"text":"Hel"}]}}]}"#;
    const LO: &str = r#"data: {"candidates":[{"content":{"parts":[{"text":"lo"}]}}]}"#;

    #[tokio::test]
    async fn test_decodes_events_in_order() {
        let body = format!("{HEL}\r\n\r\n{LO}\r\n\r\n");
        let frames = decode(chunks(&[&body])).await;
        assert_eq!(texts(&frames), vec!["Hel", "lo"]);
    }

    #[tokio::test]
    async fn test_event_split_across_chunks() {
        let body = format!("{HEL}\n\n");
        let (a, b) = body.split_at(20);
        let frames = decode(chunks(&[a, b])).await;
        assert_eq!(texts(&frames), vec!["Hel"]);
    }

    #[tokio::test]
    async fn test_multibyte_split_across_chunks() {
        let body = "data: {\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"こんにちは\"}]}}]}\n\n";
        let bytes = body.as_bytes();
        let split = body.find('こ').unwrap() + 1;
        let parts = vec![
            Ok(Bytes::copy_from_slice(&bytes[..split])),
            Ok(Bytes::copy_from_slice(&bytes[split..])),
        ];
        let frames = decode(parts).await;
        assert_eq!(texts(&frames), vec!["こんにちは"]);
    }

    #[tokio::test]
    async fn test_comments_and_fields_are_ignorable() {
        let body = format!(": keep-alive\nevent: message\nid: 7\n{HEL}\n\n");
        let frames = decode(chunks(&[&body])).await;
        let ignorable = frames
            .iter()
            .filter(|f| matches!(f, Ok(Frame::Ignorable(_))))
            .count();
        assert_eq!(ignorable, 3);
        assert_eq!(texts(&frames), vec!["Hel"]);
    }

    #[tokio::test]
    async fn test_invalid_json_is_ignorable() {
        let frames = decode(chunks(&["data: not json\n\n"])).await;
        assert!(matches!(&frames[..], [Ok(Frame::Ignorable(d))] if d == "not json"));
    }

    #[tokio::test]
    async fn test_multiline_data_joined() {
        let body = "data: {\"candidates\":\ndata: [{\"content\":{\"parts\":[{\"text\":\"x\"}]}}]}\n\n";
        let frames = decode(chunks(&[body])).await;
        assert_eq!(texts(&frames), vec!["x"]);
    }

    #[tokio::test]
    async fn test_error_frame_is_data() {
        let body = "data: {\"error\":{\"code\":500,\"message\":\"boom\",\"status\":\"INTERNAL\"}}\n\n";
        let frames = decode(chunks(&[body])).await;
        match &frames[..] {
            [Ok(Frame::Data(response))] => {
                assert_eq!(response.error_detail(), Some("INTERNAL: boom".to_string()));
            }
            other => panic!("unexpected frames: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unterminated_event_flushed_at_eof() {
        let frames = decode(chunks(&[&format!("{HEL}\n")])).await;
        assert_eq!(texts(&frames), vec!["Hel"]);
    }

    #[tokio::test]
    async fn test_partial_line_at_eof_is_network_error() {
        let frames = decode(chunks(&[&format!("{HEL}\n\n"), "data: {\"candi"])).await;
        assert_eq!(texts(&frames), vec!["Hel"]);
        assert!(matches!(frames.last(), Some(Err(EngineError::Network(_)))));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_network_error() {
        let mut parts = chunks(&[&format!("{HEL}\n\n")]);
        parts.push(Ok(Bytes::from_static(b"data: {\"x\":\"\xff\xfe\"}\n\n")));
        parts.extend(chunks(&[&format!("{LO}\n\n")]));

        let frames = decode(parts).await;

        assert_eq!(frames.len(), 2);
        assert_eq!(texts(&frames), vec!["Hel"]);
        assert!(matches!(&frames[1], Err(EngineError::Network(m)) if m.contains("UTF-8")));
    }

    #[tokio::test]
    async fn test_many_lines_in_one_chunk() {
        let body: String = (0..200).map(|_| format!(": keepalive\n{HEL}\n\n")).collect();
        let frames = decode(chunks(&[&body])).await;
        assert_eq!(texts(&frames).len(), 200);
    }

    #[tokio::test]
    async fn test_transport_error_ends_stream() {
        let mut parts = chunks(&[&format!("{HEL}\n\n")]);
        parts.push(Err("connection reset".to_string()));
        parts.extend(chunks(&[&format!("{LO}\n\n")]));

        let frames = decode(parts).await;

        assert_eq!(frames.len(), 2);
        assert!(matches!(&frames[1], Err(EngineError::Network(m)) if m.contains("connection reset")));
    }

    #[test]
    fn test_feed_line_blank_without_data() {
        let mut data = String::new();
        assert!(feed_line("", &mut data).is_none());
    }

    #[test]
    fn test_feed_line_data_without_space() {
        let mut data = String::new();
        assert!(feed_line("data:{}", &mut data).is_none());
        assert_eq!(data, "{}");
    }
}

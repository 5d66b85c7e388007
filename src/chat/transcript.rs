//! Human-readable export of a conversation.

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::fs::atomic_write;
use crate::llm::Turn;

const EXTENSION: &str = "txt";
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Formats the optional context and every turn as tagged blocks.
pub fn format_transcript(context: Option<&str>, turns: &[Turn]) -> String {
    let mut out = String::new();

    if let Some(context) = context.filter(|c| !c.is_empty()) {
        push_block(&mut out, "context", context);
    }
    for turn in turns {
        push_block(&mut out, turn.role().as_str(), turn.text());
    }

    out
}

fn push_block(out: &mut String, tag: &str, body: &str) {
    out.push_str(&format!("<{tag}>\n{body}\n</{tag}>\n"));
}

/// Reduces a user-supplied name to a bare, filesystem-safe file stem.
///
/// Directory components and a trailing `.txt` are dropped. Returns `None`
/// when nothing usable is left.
pub fn sanitize_name(name: &str) -> Option<String> {
    let base = Path::new(name.trim()).file_name()?.to_string_lossy();
    let stem = base.strip_suffix(".txt").unwrap_or(base.as_ref());

    let cleaned: String = stem
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.');

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

/// Writes transcripts into one directory and remembers the last file used.
///
/// Saving without a name overwrites the previous file; saving with a name
/// (or saving for the first time) creates a new timestamped file.
#[derive(Debug, Clone)]
pub struct TranscriptPersister {
    dir: PathBuf,
    last_path: Option<PathBuf>,
}

impl TranscriptPersister {
    pub const fn new(dir: PathBuf) -> Self {
        Self {
            dir,
            last_path: None,
        }
    }

    pub fn last_path(&self) -> Option<&Path> {
        self.last_path.as_deref()
    }

    pub fn save(
        &mut self,
        name: Option<&str>,
        context: Option<&str>,
        turns: &[Turn],
    ) -> Result<PathBuf> {
        self.save_at(name, context, turns, Local::now())
    }

    /// Like [`TranscriptPersister::save`] with an explicit clock reading.
    pub fn save_at(
        &mut self,
        name: Option<&str>,
        context: Option<&str>,
        turns: &[Turn],
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        let path = self.resolve_path(name, now);

        atomic_write(&path, &format_transcript(context, turns))
            .with_context(|| format!("Failed to save transcript: {}", path.display()))?;

        self.last_path = Some(path.clone());
        Ok(path)
    }

    fn resolve_path(&self, name: Option<&str>, now: DateTime<Local>) -> PathBuf {
        match (name.and_then(sanitize_name), &self.last_path) {
            (None, Some(last)) => last.clone(),
            (name, _) => self.fresh_path(name.as_deref(), now),
        }
    }

    fn fresh_path(&self, name: Option<&str>, now: DateTime<Local>) -> PathBuf {
        let timestamp = now.format(TIMESTAMP_FORMAT);
        let stem = name.map_or_else(
            || timestamp.to_string(),
            |name| format!("{timestamp}_{name}"),
        );

        let mut candidate = self.dir.join(format!("{stem}.{EXTENSION}"));
        let mut n = 1;
        while candidate.exists() {
            candidate = self.dir.join(format!("{stem}-{n}.{EXTENSION}"));
            n += 1;
        }
        candidate
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::fs;
    use tempfile::TempDir;

    fn at(hour: u32, min: u32, sec: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 14, hour, min, sec)
            .single()
            .unwrap()
    }

    fn sample_turns() -> Vec<Turn> {
        vec![Turn::user("<prompt>hi</prompt>"), Turn::model("hello")]
    }

    #[test]
    fn test_format_with_context() {
        let text = format_transcript(Some("ctx"), &sample_turns());
        assert_eq!(
            text,
            "<context>\nctx\n</context>\n<user>\n<prompt>hi</prompt>\n</user>\n<model>\nhello\n</model>\n"
        );
    }

    #[test]
    fn test_format_without_context() {
        let text = format_transcript(None, &sample_turns());
        assert!(text.starts_with("<user>\n"));
        assert_eq!(format_transcript(Some(""), &[]), "");
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("notes"), Some("notes".to_string()));
        assert_eq!(sanitize_name("notes.txt"), Some("notes".to_string()));
        assert_eq!(sanitize_name("../../etc/passwd"), Some("passwd".to_string()));
        assert_eq!(sanitize_name("my chat!"), Some("my_chat_".to_string()));
        assert_eq!(sanitize_name("   "), None);
        assert_eq!(sanitize_name(".."), None);
    }

    #[test]
    fn test_first_save_without_name_uses_timestamp() {
        let temp_dir = TempDir::new().unwrap();
        let mut persister = TranscriptPersister::new(temp_dir.path().join("chats"));

        let path = persister
            .save_at(None, None, &sample_turns(), at(9, 30, 0))
            .unwrap();

        assert_eq!(path, temp_dir.path().join("chats").join("20260314_093000.txt"));
        assert!(fs::read_to_string(&path).unwrap().contains("<model>\nhello\n</model>"));
    }

    #[test]
    fn test_save_without_name_reuses_last_path() {
        let temp_dir = TempDir::new().unwrap();
        let mut persister = TranscriptPersister::new(temp_dir.path().to_path_buf());

        let first = persister
            .save_at(Some("talk"), None, &sample_turns()[..1], at(9, 0, 0))
            .unwrap();
        let second = persister
            .save_at(None, None, &sample_turns(), at(10, 0, 0))
            .unwrap();

        assert_eq!(first, second);
        assert!(fs::read_to_string(&second).unwrap().contains("<model>"));
    }

    #[test]
    fn test_save_with_name_creates_distinct_paths() {
        let temp_dir = TempDir::new().unwrap();
        let mut persister = TranscriptPersister::new(temp_dir.path().to_path_buf());

        let first = persister
            .save_at(Some("talk"), None, &sample_turns(), at(9, 0, 0))
            .unwrap();
        let same_second = persister
            .save_at(Some("talk"), None, &sample_turns(), at(9, 0, 0))
            .unwrap();
        let later = persister
            .save_at(Some("talk"), None, &sample_turns(), at(9, 0, 5))
            .unwrap();

        assert_eq!(first.file_name().unwrap(), "20260314_090000_talk.txt");
        assert_eq!(same_second.file_name().unwrap(), "20260314_090000_talk-1.txt");
        assert_eq!(later.file_name().unwrap(), "20260314_090005_talk.txt");
        assert_eq!(persister.last_path(), Some(later.as_path()));
    }

    #[test]
    fn test_failed_save_keeps_previous_path() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let mut persister = TranscriptPersister::new(blocker.join("chats"));

        let result = persister.save_at(None, None, &sample_turns(), at(9, 0, 0));

        assert!(result.is_err());
        assert!(persister.last_path().is_none());
    }
}

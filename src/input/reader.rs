use anyhow::{Context, Result, bail};
use std::fs;
use std::io::{self, IsTerminal, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

/// Loads the opaque context and prompt texts handed to the engine.
pub struct InputReader;

impl InputReader {
    /// Reads context from `file_path`, or from stdin when it is piped.
    ///
    /// Returns `None` when there is no file and stdin is a terminal, or
    /// when the text read is blank.
    pub fn read_context(file_path: Option<&str>) -> Result<Option<String>> {
        let text = match file_path {
            Some(path) => Self::read_file(path)?,
            None if io::stdin().is_terminal() => return Ok(None),
            None => Self::read_stdin()?,
        };

        Ok(non_blank(text))
    }

    /// Resolves the prompt: a template file wins over the literal argument.
    pub fn read_prompt(literal: Option<String>, file_path: Option<&str>) -> Result<Option<String>> {
        let text = match file_path {
            Some(path) => Self::read_file(path)?,
            None => literal.unwrap_or_default(),
        };

        Ok(non_blank(text))
    }

    fn read_file(path: &str) -> Result<String> {
        let metadata =
            fs::metadata(path).with_context(|| format!("Failed to access file: {path}"))?;

        let size = metadata.len() as usize;
        if size > MAX_INPUT_SIZE {
            bail!(
                "Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
                 Consider trimming the file: {path}",
                size as f64 / 1024.0 / 1024.0
            );
        }

        fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
    }

    #[allow(clippy::significant_drop_tightening)]
    fn read_stdin() -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];
        let mut stdin = io::stdin().lock();

        loop {
            let bytes_read = stdin
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_INPUT_SIZE {
                bail!(
                    "Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
                     Consider piping less context.",
                    buffer.len() as f64 / 1024.0 / 1024.0
                );
            }
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}

fn non_blank(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    fn path_of(file: &NamedTempFile) -> &str {
        file.path().to_str().unwrap()
    }

    #[test]
    fn test_read_context_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(temp_file, "diff --git a/x b/x").unwrap();

        let content = InputReader::read_context(Some(path_of(&temp_file))).unwrap();
        assert_eq!(content.as_deref(), Some("diff --git a/x b/x\n"));
    }

    #[test]
    fn test_read_context_blank_file_is_none() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "  \n\n").unwrap();

        assert!(InputReader::read_context(Some(path_of(&temp_file))).unwrap().is_none());
    }

    #[test]
    fn test_read_nonexistent_file() {
        let result = InputReader::read_context(Some("/nonexistent/path/to/file.txt"));
        assert!(result.is_err());
    }

    #[test]
    fn test_read_prompt_literal() {
        let prompt = InputReader::read_prompt(Some("fix bug".to_string()), None).unwrap();
        assert_eq!(prompt.as_deref(), Some("fix bug"));
        assert!(InputReader::read_prompt(None, None).unwrap().is_none());
        assert!(InputReader::read_prompt(Some("  ".to_string()), None).unwrap().is_none());
    }

    #[test]
    fn test_read_prompt_file_wins() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "Write a commit message.").unwrap();

        let prompt =
            InputReader::read_prompt(Some("ignored".to_string()), Some(path_of(&temp_file)))
                .unwrap();
        assert_eq!(prompt.as_deref(), Some("Write a commit message."));
    }

    #[test]
    fn test_read_file_unicode() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let content = "こんにちは世界！🌍\n日本語テスト";
        write!(temp_file, "{content}").unwrap();

        let result = InputReader::read_context(Some(path_of(&temp_file))).unwrap();
        assert_eq!(result.as_deref(), Some(content));
    }

    #[test]
    fn test_read_file_exceeds_max_size() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("large_file.txt");
        fs::write(&file_path, "x".repeat(MAX_INPUT_SIZE + 1)).unwrap();

        let result = InputReader::read_context(Some(file_path.to_str().unwrap()));
        assert!(result.unwrap_err().to_string().contains("exceeds maximum"));
    }

    #[test]
    fn test_read_file_at_max_size() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("max_file.txt");
        fs::write(&file_path, "x".repeat(MAX_INPUT_SIZE)).unwrap();

        let result = InputReader::read_context(Some(file_path.to_str().unwrap())).unwrap();
        assert_eq!(result.unwrap().len(), MAX_INPUT_SIZE);
    }
}

//! Live output targets for streamed fragments.

use std::io::Write;
use tracing::debug;

use crate::ui::Spinner;

/// Receives text fragments as they arrive, in arrival order.
pub trait FragmentSink: Send {
    fn emit(&mut self, fragment: &str);
}

/// Collects fragments in memory.
impl FragmentSink for Vec<String> {
    fn emit(&mut self, fragment: &str) {
        self.push(fragment.to_string());
    }
}

/// Discards every fragment.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl FragmentSink for NullSink {
    fn emit(&mut self, _fragment: &str) {}
}

/// Echoes fragments to a writer, usually stdout, flushing after each one.
///
/// Stops the waiting spinner on the first fragment. If the writer stops
/// accepting writes, echo is disabled for the rest of the call and the
/// stream keeps being consumed.
pub struct TerminalSink<W> {
    writer: W,
    spinner: Option<Spinner>,
    available: bool,
    wrote_any: bool,
}

impl<W: Write + Send> TerminalSink<W> {
    pub const fn with_writer(writer: W, spinner: Option<Spinner>) -> Self {
        Self {
            writer,
            spinner,
            available: true,
            wrote_any: false,
        }
    }

    /// Whether at least one fragment reached the writer.
    pub const fn wrote_any(&self) -> bool {
        self.wrote_any
    }

    /// Stops the spinner if no fragment has arrived yet.
    pub fn finish(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.stop();
        }
    }
}

impl<W: Write + Send> FragmentSink for TerminalSink<W> {
    fn emit(&mut self, fragment: &str) {
        self.finish();

        if !self.available || fragment.is_empty() {
            return;
        }

        match self
            .writer
            .write_all(fragment.as_bytes())
            .and_then(|()| self.writer.flush())
        {
            Ok(()) => self.wrote_any = true,
            Err(e) => {
                debug!(error = %e, "live output unavailable, continuing without echo");
                self.available = false;
            }
        }
    }
}

/// A writer whose every write fails, like stdout after the reader of a pipe
/// has gone away.
#[cfg(test)]
pub(crate) struct ClosedPipe {
    pub(crate) attempts: usize,
}

#[cfg(test)]
impl Write for ClosedPipe {
    fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
        self.attempts += 1;
        Err(std::io::ErrorKind::BrokenPipe.into())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

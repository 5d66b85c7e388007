use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

use crate::output;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const TICK_INTERVAL: Duration = Duration::from_millis(80);

/// Shown on stderr while a request waits for its first byte.
///
/// Hidden in quiet mode. Clears itself on drop, so an early return never
/// leaves a stale spinner line behind.
pub struct Spinner {
    bar: ProgressBar,
}

impl Spinner {
    /// Creates and starts a spinner with the given message.
    #[allow(clippy::unwrap_used)]
    pub fn new(message: &str) -> Self {
        if output::is_quiet() {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        // unwrap is safe: template string is a compile-time constant
        bar.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(TICKS)
                .template("{spinner} {msg}")
                .unwrap(),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(TICK_INTERVAL);

        Self { bar }
    }

    /// A spinner that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Stops the spinner and clears its line. Safe to call more than once.
    pub fn stop(&self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_spinner_stops_twice() {
        let spinner = Spinner::hidden();
        spinner.stop();
        spinner.stop();
    }
}

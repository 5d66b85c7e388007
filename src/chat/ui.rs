//! Chat mode UI components.

use std::path::Path;

use crate::ui::Style;

use super::history::History;
use super::session::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header(config: &SessionConfig) {
    println!(
        "{} {} - Interactive Chat ({} · {})",
        Style::header("gchat"),
        Style::version(format!("v{VERSION}")),
        Style::value(&config.model),
        Style::secondary(config.mode)
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(config: &SessionConfig) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}      {}",
        Style::label("model"),
        Style::value(&config.model)
    );
    println!("  {}       {}", Style::label("mode"), Style::value(config.mode));
    println!(
        "  {}     {}",
        Style::label("render"),
        Style::value(config.renderer.command().as_deref().unwrap_or("(none)"))
    );
    println!(
        "  {}    {}",
        Style::label("context"),
        Style::value(config.context.as_ref().map_or_else(
            || "(none)".to_string(),
            |c| format!("{} bytes", c.len())
        ))
    );
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::secondary(&config.endpoint)
    );
    println!(
        "  {}      {}",
        Style::label("chats"),
        Style::secondary(config.chats_dir.display())
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    println!(
        "  {}  {}",
        Style::command("/save [name]"),
        Style::secondary("Save the transcript (no name: overwrite the last save)")
    );
    println!(
        "  {}      {}",
        Style::command("/history"),
        Style::secondary("Show conversation length")
    );
    println!(
        "  {}       {}",
        Style::command("/config"),
        Style::secondary("Show current configuration")
    );
    println!(
        "  {}         {}",
        Style::command("/help"),
        Style::secondary("Show this help")
    );
    println!(
        "  {}         {}",
        Style::command("/quit"),
        Style::secondary("Exit chat mode")
    );
    println!();
}

pub fn print_history(history: &History) {
    println!(
        "{} {} exchange(s), {} turn(s)",
        Style::header("History:"),
        Style::value(history.exchanges()),
        Style::value(history.len())
    );
    println!();
}

pub fn print_saved(path: &Path) {
    crate::status!(
        "{} Transcript saved to {}\n",
        Style::success("✓"),
        Style::value(path.display())
    );
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}

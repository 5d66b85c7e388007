//! Shows the configuration a request would use.

use anyhow::Result;

use crate::cli::CommonArgs;
use crate::config::{ConfigManager, ResolvedConfig};
use crate::ui::Style;

/// Prints the resolved configuration and where it was loaded from.
///
/// The API key itself is never printed.
pub fn run_config(common: &CommonArgs) -> Result<()> {
    let manager = ConfigManager::new()?;
    let resolved = super::load_resolved(common)?;

    print_resolved(&resolved);

    let path = manager.config_path();
    let state = if path.exists() { "" } else { " (not found)" };
    println!(
        "{} {}{}",
        Style::label("Config file:"),
        Style::secondary(path.display()),
        Style::secondary(state)
    );

    Ok(())
}

fn print_resolved(config: &ResolvedConfig) {
    println!("{}", Style::header("Resolved configuration"));
    println!(
        "  {}      {}",
        Style::label("model"),
        Style::value(&config.model)
    );
    println!("  {}       {}", Style::label("mode"), Style::value(config.mode));
    println!(
        "  {}     {}",
        Style::label("render"),
        config
            .render
            .as_deref()
            .map_or_else(|| Style::secondary("(none)"), Style::value)
    );
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::value(&config.endpoint)
    );
    println!(
        "  {}    {}",
        Style::label("api key"),
        Style::secondary(redact(&config.api_key))
    );
    println!(
        "  {}    {}s",
        Style::label("timeout"),
        Style::value(config.timeout.as_secs())
    );
    println!(
        "  {}      {}",
        Style::label("chats"),
        Style::value(config.chats_dir.display())
    );
    println!();
}

/// Masks all but the last four characters of a secret.
fn redact(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 8 {
        return "****".to_string();
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("****{tail}")
}

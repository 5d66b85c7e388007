use inquire::autocompletion::{Autocomplete, Replacement};

// Available slash commands: (command, description)
const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/config", "Show current configuration"),
    ("/help", "Show available commands"),
    ("/history", "Show conversation length"),
    ("/quit", "Exit chat mode"),
    ("/save", "Save the transcript [name]"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Config,
    Help,
    History,
    Quit,
    /// Save the transcript, optionally under a new name.
    Save(Option<String>),
    Unknown(String),
}

/// Input types
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

/// Classifies one line of interactive input.
///
/// Only a leading `/` makes a command; everything else is prompt text.
pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input
        .strip_prefix('/')
        .map_or_else(|| Input::Text(input.to_string()), parse_slash_command)
}

fn parse_slash_command(cmd: &str) -> Input {
    let (name, rest) = cmd
        .split_once(char::is_whitespace)
        .map_or((cmd, ""), |(name, rest)| (name, rest.trim()));

    let command = match name {
        "config" => SlashCommand::Config,
        "help" => SlashCommand::Help,
        "history" => SlashCommand::History,
        "quit" | "exit" | "q" => SlashCommand::Quit,
        "save" => SlashCommand::Save((!rest.is_empty()).then(|| rest.to_string())),
        _ => SlashCommand::Unknown(cmd.split_whitespace().collect::<Vec<_>>().join(" ")),
    };

    Input::Command(command)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_input() {
        assert_eq!(parse_input(""), Input::Empty);
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[test]
    fn test_parse_text_input() {
        assert_eq!(
            parse_input("Hello, world!"),
            Input::Text("Hello, world!".to_string())
        );
    }

    #[test]
    fn test_command_token_inside_text_is_text() {
        assert_eq!(
            parse_input("please /quit later"),
            Input::Text("please /quit later".to_string())
        );
    }

    #[test]
    fn test_parse_config_and_help() {
        assert_eq!(parse_input("/config"), Input::Command(SlashCommand::Config));
        assert_eq!(parse_input("/help"), Input::Command(SlashCommand::Help));
        assert_eq!(parse_input("/history"), Input::Command(SlashCommand::History));
    }

    #[test]
    fn test_parse_quit_commands() {
        for line in ["/quit", "/exit", "/q", "  /quit  "] {
            assert_eq!(parse_input(line), Input::Command(SlashCommand::Quit));
        }
    }

    #[test]
    fn test_parse_save_without_name() {
        assert_eq!(parse_input("/save"), Input::Command(SlashCommand::Save(None)));
        assert_eq!(parse_input("/save   "), Input::Command(SlashCommand::Save(None)));
    }

    #[test]
    fn test_parse_save_with_name() {
        assert_eq!(
            parse_input("/save  release notes "),
            Input::Command(SlashCommand::Save(Some("release notes".to_string())))
        );
    }

    #[test]
    fn test_parse_unknown_command() {
        assert_eq!(
            parse_input("/unknown  arg"),
            Input::Command(SlashCommand::Unknown("unknown arg".to_string()))
        );
    }

    // SlashCommandCompleter tests

    #[test]
    fn test_completer_no_suggestions_for_regular_text() {
        let mut completer = SlashCommandCompleter;
        let suggestions = completer.get_suggestions("hello").unwrap();
        assert!(suggestions.is_empty());
    }

    #[test]
    fn test_completer_suggestions_for_slash() {
        let mut completer = SlashCommandCompleter;
        let suggestions = completer.get_suggestions("/").unwrap();
        assert_eq!(suggestions.len(), SLASH_COMMANDS.len());
    }

    #[test]
    fn test_completer_suggestions_filter_by_prefix() {
        let mut completer = SlashCommandCompleter;

        let suggestions = completer.get_suggestions("/s").unwrap();
        assert_eq!(suggestions.len(), 1);
        assert!(suggestions[0].starts_with("/save"));

        let suggestions = completer.get_suggestions("/h").unwrap();
        assert_eq!(suggestions.len(), 2);
    }

    #[test]
    fn test_completer_completion() {
        let mut completer = SlashCommandCompleter;
        let suggestion = "/save  Save the transcript [name]".to_string();
        let completion = completer.get_completion("/s", Some(suggestion)).unwrap();
        assert_eq!(completion, Some("/save".to_string()));
    }

    #[test]
    fn test_completer_completion_none() {
        let mut completer = SlashCommandCompleter;
        let completion = completer.get_completion("/x", None).unwrap();
        assert!(completion.is_none());
    }
}

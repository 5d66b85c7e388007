use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gchat")]
#[command(about = "Chat with Gemini models from the terminal")]
#[command(version)]
pub struct Args {
    /// Prompt to send (single-shot mode)
    pub prompt: Option<String>,

    #[command(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Options shared by every mode.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct CommonArgs {
    /// Model name
    #[arg(short = 'm', long, global = true)]
    pub model: Option<String>,

    /// File whose contents are sent as context (reads piped stdin if not provided)
    #[arg(short = 'c', long, global = true)]
    pub context_file: Option<String>,

    /// File whose contents are used as the prompt
    #[arg(short = 'p', long, global = true)]
    pub prompt_file: Option<String>,

    /// Stream the response as it is generated
    #[arg(long, global = true, overrides_with = "no_stream")]
    pub stream: bool,

    /// Wait for the complete response
    #[arg(long, global = true)]
    pub no_stream: bool,

    /// Command that formats the final response (e.g. "glow -")
    #[arg(long, global = true, value_name = "CMD")]
    pub render: Option<String>,

    /// Print the raw response even if a render command is configured
    #[arg(long, global = true, conflicts_with = "render")]
    pub no_render: bool,

    /// Show debug diagnostics on stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress status messages
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

impl CommonArgs {
    /// The transport override, if either flag was given.
    pub const fn stream_override(&self) -> Option<bool> {
        if self.no_stream {
            Some(false)
        } else if self.stream {
            Some(true)
        } else {
            None
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive multi-turn chat
    Chat {
        /// Initial prompt sent before reading interactive input
        prompt: Option<String>,
    },
    /// Show the resolved configuration
    Config,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_shot_args() {
        let args = Args::parse_from(["gchat", "-m", "gemini-1.5-pro", "--no-stream", "hello"]);

        assert_eq!(args.prompt.as_deref(), Some("hello"));
        assert_eq!(args.common.model.as_deref(), Some("gemini-1.5-pro"));
        assert_eq!(args.common.stream_override(), Some(false));
        assert!(args.command.is_none());
    }

    #[test]
    fn test_chat_accepts_global_options() {
        let args = Args::parse_from(["gchat", "chat", "--stream", "-c", "notes.md", "hi"]);

        match args.command {
            Some(Command::Chat { prompt }) => assert_eq!(prompt.as_deref(), Some("hi")),
            other => panic!("unexpected command: {other:?}"),
        }
        assert_eq!(args.common.context_file.as_deref(), Some("notes.md"));
        assert_eq!(args.common.stream_override(), Some(true));
    }

    #[test]
    fn test_no_stream_flags_means_config_decides() {
        let args = Args::parse_from(["gchat"]);
        assert_eq!(args.common.stream_override(), None);
    }

    #[test]
    fn test_render_conflicts_with_no_render() {
        let result = Args::try_parse_from(["gchat", "--render", "glow -", "--no-render"]);
        assert!(result.is_err());
    }
}

use clap::Parser;
use std::io::IsTerminal;

use gchat_cli::cli::commands::{ask, chat, config};
use gchat_cli::cli::{Args, Command, exit_code};
use gchat_cli::logging;
use gchat_cli::output::{self, OutputConfig};
use gchat_cli::ui::Style;

#[tokio::main]
async fn main() {
    let args = Args::parse();

    output::init(OutputConfig::new(args.common.quiet));
    logging::init(
        args.common.verbose,
        !output::is_no_color() && std::io::stderr().is_terminal(),
    );

    let result = match args.command {
        Some(Command::Chat { prompt }) => chat::run_chat(prompt, &args.common).await,
        Some(Command::Config) => config::run_config(&args.common),
        None => ask::run_ask(args.prompt, &args.common).await,
    };

    if let Err(e) = result {
        eprintln!("{} {e:#}", Style::error("Error:"));
        std::process::exit(exit_code(&e));
    }
}

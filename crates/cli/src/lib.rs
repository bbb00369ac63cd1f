pub mod commands;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "speakmark",
    about = "Speakmark operator CLI",
    long_about = "Inspect the speech markup example catalog, replay intents offline, and check configuration.",
    after_help = "Examples:\n  speakmark topics\n  speakmark show prosody\n  speakmark dispatch --intent \"Tell Example\" --topic break\n  speakmark doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "List the example topics as the agent would announce them")]
    Topics,
    #[command(about = "Print the rendered markup document for one topic")]
    Show {
        #[arg(help = "Topic name, matched case-insensitively")]
        topic: String,
    },
    #[command(about = "Run one intent through the dispatcher and print the reply")]
    Dispatch {
        #[arg(long, help = "Intent display name, e.g. \"Default Welcome Intent\"")]
        intent: String,
        #[arg(long, help = "Topic parameter value for the Tell Example intent")]
        topic: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate configuration and the example catalog")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Topics => commands::topics::run(),
        Command::Show { topic } => commands::show::run(&topic),
        Command::Dispatch { intent, topic } => commands::dispatch::run(&intent, topic.as_deref()),
        Command::Config => {
            commands::CommandResult { exit_code: 0, output: commands::config::run() }
        }
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

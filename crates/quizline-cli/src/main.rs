//! quizline CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod render;

#[derive(Parser)]
#[command(name = "quizline", version, about = "Terminal trivia quiz client")]
struct Cli {
    /// Log session and provider activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a quiz, one question at a time
    Play {
        #[command(flatten)]
        source: commands::SourceArgs,

        /// Seed for answer shuffling (random if omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Print the final summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a single question and print it as JSON
    Fetch {
        #[command(flatten)]
        source: commands::SourceArgs,
    },

    /// Create a starter quizline.toml
    Init,
}

/// Default log level. Warnings only, so the quiz prompt stays readable.
fn log_directive(verbose: bool) -> &'static str {
    if verbose {
        "quizline=info"
    } else {
        "quizline=warn"
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = log_directive(cli.verbose).parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let result = match cli.command {
        Commands::Play { source, seed, json } => commands::play::execute(source, seed, json).await,
        Commands::Fetch { source } => commands::fetch::execute(source).await,
        Commands::Init => commands::init::execute(PathBuf::from(".")),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! Storyloom CLI binary.
//!
//! Reads a story idea from the command line or stdin, generates the story,
//! and writes it to stdout with progress on stderr.

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, RunOverrides, resolve_prompt, run_story};

    // Credentials may live in a .env file
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let prompt = match resolve_prompt(cli.prompt, std::io::stdin()) {
        Ok(prompt) => prompt,
        Err(e) => {
            eprintln!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    let overrides = RunOverrides {
        model: cli.model,
        concurrency: cli.concurrency.map(usize::from),
    };

    match run_story(prompt, cli.config.as_deref(), &overrides).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

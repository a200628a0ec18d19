//! asksh - ask for a shell command in plain English.
//!
//! Sends the request to a chat-completion endpoint together with a system
//! prompt describing the local environment, and prints back either the
//! command or the model's explanation of why there is none.

use anyhow::{Context, Result};
use asksh::openai::{Client, Completion};
use asksh::{config, context, ui};
use clap::{Parser, Subcommand};
use std::process::Command as ProcessCommand;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "asksh")]
#[command(author, version, about = "Ask for a shell command in plain English")]
struct Cli {
    /// The request, e.g.: asksh list files modified today
    #[arg(value_name = "QUERY", trailing_var_arg = true)]
    query: Vec<String>,

    /// Output the bare command only (for scripting / shell integration)
    #[arg(long)]
    pipe: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the configuration file in $EDITOR
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("asksh=info".parse().unwrap())
                .add_directive("reqwest=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Config) => handle_config(),
        None => handle_query(cli.query, cli.pipe).await,
    }
}

/// Handle the config subcommand.
fn handle_config() -> Result<()> {
    let config_path = config::Config::config_path()?;

    if !config_path.exists() {
        let default_config = config::Config::default();
        default_config.save()?;
        println!("Created default config at {}", config_path.display());
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
    let status = ProcessCommand::new(&editor)
        .arg(&config_path)
        .status()
        .context("Failed to open editor")?;

    if !status.success() {
        eprintln!("Editor exited with non-zero status");
    }

    Ok(())
}

/// Handle a query: one completion exchange, then print the outcome.
async fn handle_query(query: Vec<String>, pipe_mode: bool) -> Result<()> {
    let query = query.join(" ");
    if query.trim().is_empty() {
        eprintln!("Nothing to ask. Try: asksh list files modified today");
        std::process::exit(1);
    }

    let config = config::Config::load().context("Failed to load configuration")?;
    let env_context = context::gather();

    let renderer = if pipe_mode {
        ui::Renderer::plain()
    } else {
        ui::Renderer::new()
    };

    let client = match Client::new(config.openai, env_context) {
        Ok(client) => client,
        Err(e) => {
            error!(cause = %e, "client setup failed");
            eprintln!("{}", renderer.error(e.display_message()));
            eprintln!("Set your API key with: asksh config");
            std::process::exit(1);
        }
    };

    match client.send(&query).await {
        Ok(Completion::Command(command)) => {
            println!("{}", renderer.command(&command));
            Ok(())
        }
        Ok(Completion::Declined(text)) => {
            eprintln!("{}", renderer.warning(text.trim()));
            if pipe_mode {
                std::process::exit(1);
            }
            Ok(())
        }
        Err(e) => {
            // The user sees the generic message; the chain of causes goes
            // to the diagnostic log.
            error!(cause = %format_cause_chain(&e), "completion request failed");
            eprintln!("{}", renderer.error(e.display_message()));
            std::process::exit(1);
        }
    }
}

/// Flatten an error and its sources into one log line.
fn format_cause_chain(err: &dyn std::error::Error) -> String {
    let mut line = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        line.push_str(": ");
        line.push_str(&cause.to_string());
        source = cause.source();
    }
    line
}

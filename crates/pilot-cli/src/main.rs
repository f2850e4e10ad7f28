//! shellpilot: chat with a language model that can run shell commands
//!
//! Replies containing `[cmd]...[/cmd]` are executed and the output is fed
//! back into the conversation for the next turn.

mod agent;
mod conversation;
mod repl;
mod session;
mod tools;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pilot_core::{AnthropicClient, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::agent::{AgentConfig, AgentLoop};
use crate::session::SessionStore;

#[derive(Debug, Parser)]
#[command(name = "shellpilot")]
#[command(about = "Command-line assistant that can run shell commands", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (default: ~/.config/shellpilot/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start interactive chat REPL
    Chat {
        /// Model to use (overrides config)
        #[arg(short, long)]
        model: Option<String>,

        /// System prompt (overrides the built-in one)
        #[arg(short, long)]
        system: Option<String>,

        /// Load a saved conversation
        #[arg(long)]
        load: Option<String>,
    },

    /// Write a default config file
    InitConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging; RUST_LOG wins when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Chat {
            model,
            system,
            load,
        }) => chat(cli.config, model, system, load).await,
        Some(Commands::InitConfig) => {
            let path = Config::create_default()?;
            println!("Created {}", path.display());
            Ok(())
        }
        // Default to chat REPL when no command specified
        None => chat(cli.config, None, None, None).await,
    }
}

async fn chat(
    config_path: Option<PathBuf>,
    model: Option<String>,
    system: Option<String>,
    load: Option<String>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    if let Some(model) = model {
        config.model.name = model;
    }

    // The credential must be present before the loop starts
    let client = AnthropicClient::from_config(&config.model)?;
    info!(model = %config.model.name, sessions = %config.session.dir.display(), "Starting chat");

    let system_prompt = system.or_else(|| config.repl.system_prompt.clone());
    let mut agent_config = AgentConfig::new().with_auto_save(config.session.auto_save);
    if let Some(prompt) = system_prompt {
        agent_config = agent_config.with_system_prompt(prompt);
    }

    let agent = AgentLoop::new(client, SessionStore::new(&config.session.dir), agent_config);
    repl::run(agent, load, config.repl.history_size).await
}

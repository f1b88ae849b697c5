//! aureus CLI: the terminal rewards arcade.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "aureus", version, about = "Play AI-generated trivia to earn Aureus coins")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play the Oracle's trivia challenge
    Play {
        /// Number of sessions to play before showing the wallet
        #[arg(long, default_value = "1")]
        rounds: u32,

        /// Use the built-in question set instead of an AI backend
        #[arg(long)]
        offline: bool,

        /// Provider name from the config (default: config's default_provider)
        #[arg(long)]
        provider: Option<String>,

        /// Model to generate questions with
        #[arg(long)]
        model: Option<String>,

        /// Pause after each answer, in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Generate one batch of questions and print it
    Questions {
        /// Topic to ask about
        #[arg(long)]
        topic: String,

        /// Number of questions
        #[arg(long, default_value = "3")]
        count: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Provider name from the config
        #[arg(long)]
        provider: Option<String>,

        /// Model to generate questions with
        #[arg(long)]
        model: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List available models
    ListModels {
        /// Filter to specific provider
        #[arg(long)]
        provider: Option<String>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter config
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            rounds,
            offline,
            provider,
            model,
            delay_ms,
            config,
        } => {
            commands::play::execute(commands::play::PlayOptions {
                rounds,
                offline,
                provider,
                model,
                delay_ms,
                config_path: config,
            })
            .await
        }
        Commands::Questions {
            topic,
            count,
            json,
            provider,
            model,
            config,
        } => commands::questions::execute(topic, count, json, provider, model, config).await,
        Commands::ListModels { provider, config } => {
            commands::list_models::execute(provider, config)
        }
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

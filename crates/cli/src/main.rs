//! Cogito CLI — the main entry point.
//!
//! Commands:
//! - `chat`   — Interactive chat or single-message mode
//! - `recall` — Recall archived memories for a user and date
//! - `tools`  — List the registered tools

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cogito",
    about = "Cogito — a ReAct conversational agent runtime",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the agent
    Chat {
        /// Send a single message instead of entering interactive mode
        #[arg(short, long)]
        message: Option<String>,

        /// User id the conversation and memory are scoped to
        #[arg(short, long, default_value = "cli_user")]
        user: String,
    },

    /// Recall archived memories for a specific date
    Recall {
        /// User id to recall memories for
        #[arg(short, long, default_value = "cli_user")]
        user: String,

        /// The date to recall, as YYYY-MM-DD
        date: String,
    },

    /// List the registered tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Chat { message, user } => commands::chat::run(message, &user).await?,
        Commands::Recall { user, date } => commands::recall::run(&user, &date).await?,
        Commands::Tools => commands::tools::run(),
    }

    Ok(())
}

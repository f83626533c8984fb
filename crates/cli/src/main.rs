//! Recipe Box CLI - Database migrations and sample data.
//!
//! # Usage
//!
//! ```bash
//! # Apply schema migrations
//! recipe-box migrate
//!
//! # Seed sample recipes into an empty store
//! recipe-box seed
//!
//! # Clear every table and reseed
//! recipe-box seed --reset
//! ```
//!
//! The store is chosen by `RECIPES_DATABASE_URL` (or `DATABASE_URL`), the
//! same variables the server reads.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "recipe-box")]
#[command(author, version, about = "Recipe Box CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Load the sample recipes
    Seed {
        /// Clear all tables first, even if recipes exist
        #[arg(long)]
        reset: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { reset } => commands::seed::run(reset).await?,
    }
    Ok(())
}

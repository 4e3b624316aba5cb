//! Homehaven CLI - Seeding, inspection, and erasure tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the content catalog from a JSON file
//! hh-cli seed content --file catalog.json
//!
//! # Print a collection
//! hh-cli show hh_requests
//!
//! # Run the privacy erasure cascade for a user
//! hh-cli erase --user demo-user-1 --reason "support ticket 4821"
//! ```
//!
//! All commands operate on the data directory given by `--data-dir` or the
//! `HH_DATA_DIR` environment variable (default: `./data`).
//!
//! # Commands
//!
//! - `seed content` - Validate and replace the content catalog
//! - `show` - Print a collection as JSON
//! - `erase` - Record an erasure request and cascade-remove user data

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "hh-cli")]
#[command(author, version, about = "Homehaven CLI tools")]
struct Cli {
    /// Data directory holding the JSON collections
    #[arg(long, env = "HH_DATA_DIR", default_value = "./data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed collections
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Print a collection as JSON
    Show {
        /// Collection key (e.g. `hh_content`, `hh_requests`)
        collection: String,
    },
    /// Record a privacy erasure request and remove the user's data
    Erase {
        /// Uid of the user to erase
        #[arg(short, long)]
        user: String,

        /// Reason recorded on the erasure request
        #[arg(short, long)]
        reason: String,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Replace the content catalog from a JSON file
    Content {
        /// JSON file holding an array of catalog records
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
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
        Commands::Seed { target } => match target {
            SeedTarget::Content { file } => {
                commands::seed::content(&cli.data_dir, &file).await?;
            }
        },
        Commands::Show { collection } => commands::show::collection(&cli.data_dir, &collection)?,
        Commands::Erase { user, reason } => {
            commands::erase::user(&cli.data_dir, &user, &reason)?;
        }
    }
    Ok(())
}

//! Velvet Mango CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! vm-cli migrate
//!
//! # Grant a permission to an existing user
//! vm-cli grant -e admin@example.com -p PERMISSIONUPDATE
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `grant` - Grant a permission label to an existing user

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vm-cli")]
#[command(author, version, about = "Velvet Mango CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Grant a permission label to an existing user
    Grant {
        /// User email address
        #[arg(short, long)]
        email: String,

        /// Permission label (e.g. ADMIN, ITEMDELETE, PERMISSIONUPDATE)
        #[arg(short, long)]
        permission: String,
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Grant { email, permission } => {
            commands::grant::permission(&email, &permission).await?;
        }
    }
    Ok(())
}

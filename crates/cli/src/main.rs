//! MediCart CLI - command-line front end for the MediCart gateway.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog (no login needed)
//! medicart catalog list
//! medicart catalog search --query paracetamol
//!
//! # Authenticate
//! medicart auth login -e user@example.com -p secret
//! medicart auth otp -e new@example.com --full-name "New User" --phone 9876543210 -p secret
//!
//! # Cart (server is the source of truth; every mutation refetches)
//! medicart cart show
//! medicart cart add 5
//! medicart cart decrement 5
//!
//! # Admin batch management
//! medicart batches list --search paracetamol --page 1
//!
//! # Request log
//! medicart logs show --level ERROR
//! medicart logs export -o medicart.log
//! ```
//!
//! # Environment Variables
//!
//! - `MEDICART_GATEWAY_URL` - Gateway base URL (default: `http://localhost:8080`)
//! - `MEDICART_SESSION_FILE` - Persisted session path
//! - `MEDICART_LOG_FILE` - Persisted request log path

#![cfg_attr(not(test), forbid(unsafe_code))]
// A CLI talks to its user on stdout
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;
mod context;

use commands::{addresses, auth, batches, cart, catalog, logs, prescriptions};
use context::Context;

#[derive(Parser)]
#[command(name = "medicart")]
#[command(author, version, about = "MediCart storefront and admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authentication and account management
    Auth {
        #[command(subcommand)]
        action: auth::AuthAction,
    },
    /// Browse the medicine catalog
    Catalog {
        #[command(subcommand)]
        action: catalog::CatalogAction,
    },
    /// Shopping cart
    Cart {
        #[command(subcommand)]
        action: cart::CartAction,
    },
    /// Admin stock batch management
    Batches {
        #[command(subcommand)]
        action: batches::BatchAction,
    },
    /// Prescription upload and retrieval
    Prescriptions {
        #[command(subcommand)]
        action: prescriptions::PrescriptionAction,
    },
    /// Delivery address book
    Addresses {
        #[command(subcommand)]
        action: addresses::AddressAction,
    },
    /// Inspect and export the request log
    Logs {
        #[command(subcommand)]
        action: logs::LogAction,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let ctx = match Context::from_env() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    let result = run(cli, &ctx).await;

    // The request log outlives the process
    if let Err(e) = ctx.save_log() {
        tracing::warn!("Failed to persist request log: {e}");
    }

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, ctx: &Context) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Auth { action } => auth::run(action, ctx).await?,
        Commands::Catalog { action } => catalog::run(action, ctx).await?,
        Commands::Cart { action } => cart::run(action, ctx).await?,
        Commands::Batches { action } => batches::run(action, ctx).await?,
        Commands::Prescriptions { action } => prescriptions::run(action, ctx).await?,
        Commands::Addresses { action } => addresses::run(action, ctx).await?,
        Commands::Logs { action } => logs::run(action, ctx)?,
    }
    Ok(())
}

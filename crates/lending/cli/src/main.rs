//! lendctl - inspect private lending wallet records from the terminal
//!
//! Reads a record dump as returned by the wallet's `requestRecordPlaintexts`
//! and prints what the lending front-end would show for an address:
//! - Credit profile and dashboard totals
//! - Loans, available offers, payment history
//! - Collateral positions and credit credentials
//! - Credit-gate checks and dry-run transaction requests

use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use lending_client::ClientConfig;
use lending_projection::LoanFilter;
use lending_types::{datetime_from_secs, Address};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod output;
mod records;

use commands::{dry_run, view, Context};

/// lendctl application
#[derive(Parser)]
#[command(name = "lendctl")]
#[command(about = "Inspect private lending wallet records", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "LENDCTL_CONFIG")]
    config: Option<PathBuf>,

    /// Record dump file (`-` reads stdin)
    #[arg(short, long, env = "LENDCTL_RECORDS", default_value = "-")]
    records: PathBuf,

    /// Wallet address to project records for
    #[arg(short, long, env = "LENDCTL_IDENTITY")]
    identity: Option<String>,

    /// Evaluate due dates as of this unix time instead of now
    #[arg(long)]
    at: Option<u64>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table")]
    output: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Credit profile and dashboard totals
    Summary,

    /// Loans the address lends or borrows
    Loans {
        /// all, active, pending, completed or overdue
        #[arg(short, long, default_value = "active")]
        filter: LoanFilter,
    },

    /// Offers the address can accept
    Offers {
        /// Show offers the address created as lender instead
        #[arg(long)]
        mine: bool,
    },

    /// Payment proofs, claimed payments and fee records
    Payments,

    /// Locked collateral
    Collateral,

    /// Credit credentials
    Credentials,

    /// Check whether a credit-gated offer can be accepted
    Gate {
        /// Offer record ID
        offer_id: String,
    },

    /// Print the full projected state as JSON
    State,

    /// Build a transaction request without broadcasting it
    DryRun {
        #[command(subcommand)]
        command: dry_run::DryRunCommands,
    },

    /// Show configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ClientConfig::load(cli.config.as_deref())?;

    if let Commands::Config = cli.command {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    let records = records::load(&cli.records)?;
    debug!(records = records.len(), source = %cli.records.display(), "Loaded record dump");

    let ctx = Context {
        config,
        identity: cli.identity.map(Address::new),
        records,
        now: cli.at.map(datetime_from_secs).unwrap_or_else(Utc::now),
        format: cli.output,
    };

    match cli.command {
        Commands::Summary => view::summary(&ctx),
        Commands::Loans { filter } => view::loans(&ctx, filter),
        Commands::Offers { mine } => view::offers(&ctx, mine),
        Commands::Payments => view::payments(&ctx),
        Commands::Collateral => view::collateral(&ctx),
        Commands::Credentials => view::credentials(&ctx),
        Commands::Gate { offer_id } => view::gate(&ctx, &offer_id),
        Commands::State => view::state(&ctx),
        Commands::DryRun { command } => dry_run::execute(command, &ctx).await,
        Commands::Config => Ok(()),
    }
}

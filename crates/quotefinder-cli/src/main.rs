//! Quotefinder CLI
//!
//! Find who said what, and when, across the transcript corpus.

use anyhow::Result;
use clap::Parser;
use quotefinder_core::error::exit_codes;
use quotefinder_core::{Config, Database, QuoteFinderError};

mod app;
mod commands;
mod output;

use app::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so JSON and CSV output stay clean
    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    let code = match run(cli) {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            e.downcast_ref::<QuoteFinderError>()
                .map(QuoteFinderError::exit_code)
                .unwrap_or(exit_codes::GENERAL_ERROR)
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Search(args) => {
            let config = Config::load()?;
            commands::search::run(args, &open_database()?, &config, cli.format)
        }
        Commands::Suggest(args) => {
            let config = Config::load()?;
            commands::suggest::run(args, &open_database()?, &config, cli.format)
        }
        Commands::Import(args) => commands::import::run(args, &open_database()?, cli.format),
        Commands::Export(args) => commands::export::run(args, cli.format),
        Commands::Stats => commands::stats::run(&open_database()?, cli.format),
    }
}

fn open_database() -> Result<Database> {
    // Open database (use QUOTEFINDER_DB env var if set, otherwise use default)
    let db_path = std::env::var("QUOTEFINDER_DB")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| Database::default_path());
    let db = Database::open(&db_path)?;
    db.initialize()?;
    Ok(db)
}

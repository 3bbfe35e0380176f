//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "quotefinder")]
#[command(
    author,
    version,
    about = "Search podcast transcripts for quotes, with spelling fallback"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search quotes
    Search(SearchArgs),

    /// Show spelling suggestions for a query
    Suggest(SuggestArgs),

    /// Import quotes from a CSV export or JSON transcripts
    Import(ImportArgs),

    /// Convert CSV exports or JSON transcripts into one quotes.csv
    Export(ExportArgs),

    /// Show corpus statistics
    Stats,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search query
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Number of results (defaults to search.default_top_k)
    #[arg(short = 'n')]
    pub limit: Option<usize>,

    /// Only quotes by this speaker
    #[arg(short, long)]
    pub speaker: Option<String>,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Query to correct
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Maximum edit distance (at most 2)
    #[arg(long, default_value = "2")]
    pub max_distance: usize,

    /// Number of suggestions (defaults to search.max_suggestions)
    #[arg(short = 'n')]
    pub limit: Option<usize>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// CSV file, JSON transcript, or a directory of them
    pub path: PathBuf,

    /// Remove existing quotes first
    #[arg(long)]
    pub replace: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// CSV file, JSON transcript, or a directory of them
    pub path: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
    Csv,
}

//! Quotefinder Core Library
//!
//! Core functionality for the quotefinder transcript search engine.
//!
//! # Features
//! - SQLite FTS5 full-text search with BM25 scoring
//! - Phrase-aware ranking with an exact-text shortcut for short quotes
//! - Spelling fallback from a corpus-built SymSpell dictionary
//! - CSV and JSON transcript import

pub mod config;
pub mod db;
pub mod error;
pub mod ingest;
pub mod search;

pub use config::{Config, SearchConfig};
pub use db::{Database, DatabaseStats, NewQuote, Quote};
pub use error::{Error, QuoteFinderError, Result};
pub use ingest::{export_csv, import_path, ExportReport, ImportReport};
pub use search::{
    search_quotes, HybridResolver, QuoteIndex, ResolverOptions, SearchOutcome, SearchPayload,
    SearchResult, SpellCache, SpellSuggester, SpellSuggestion,
};

/// Default cache directory name
pub const CACHE_DIR_NAME: &str = "quotefinder";

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "quotefinder";

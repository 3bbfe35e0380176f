//! Database layer for quotefinder
//!
//! Provides SQLite-based storage with:
//! - FTS5 full-text search over quote text
//! - A `qf_normalize` SQL function for exact-text lookups

mod quotes;
mod schema;
mod stats;

pub use quotes::{NewQuote, Quote};
pub use schema::Database;
pub use stats::DatabaseStats;
use std::path::PathBuf;

impl Database {
    /// Get the default database path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CACHE_DIR_NAME)
            .join("quotes.sqlite")
    }
}

//! Database statistics

use super::Database;
use crate::error::Result;

/// Corpus stats
#[derive(Debug, Clone, serde::Serialize)]
pub struct DatabaseStats {
    pub total_quotes: usize,
    pub unique_episodes: usize,
    pub episodes: Vec<String>,
    pub speakers: Vec<String>,
}

impl Database {
    /// Get database statistics
    pub fn get_stats(&self) -> Result<DatabaseStats> {
        let total_quotes: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;

        let episodes =
            self.distinct_column("SELECT DISTINCT episode_id FROM quotes ORDER BY episode_id")?;
        let speakers =
            self.distinct_column("SELECT DISTINCT speaker FROM quotes ORDER BY speaker")?;

        Ok(DatabaseStats {
            total_quotes: total_quotes as usize,
            unique_episodes: episodes.len(),
            episodes,
            speakers,
        })
    }

    fn distinct_column(&self, sql: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let values = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(values)
    }
}

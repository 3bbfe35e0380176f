//! Quote storage and full-text lookups

use super::schema::NORMALIZE_FN;
use super::Database;
use crate::error::{QuoteFinderError, Result};
use crate::search::{CandidateQuery, CandidateRow, QuoteIndex};
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use serde::Deserialize;

/// Quote record from database
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    pub id: i64,
    pub episode_id: String,
    pub timestamp_sec: u64,
    pub speaker: String,
    pub text: String,
    pub episode_name: String,
    pub external_link: Option<String>,
}

/// Quote to be inserted; field names follow the `quotes.csv` header
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewQuote {
    pub episode_id: String,
    pub timestamp_sec: u64,
    pub speaker: String,
    pub text: String,
    #[serde(default)]
    pub episode_name: String,
    #[serde(rename = "spotify_url", default)]
    pub external_link: Option<String>,
}

const QUOTE_COLUMNS: &str =
    "q.id, q.episode_id, q.timestamp_sec, q.speaker, q.text, q.episode_name, q.spotify_url";

const WORD_CANDIDATES_SQL: &str = r#"
    SELECT q.id, q.episode_id, q.timestamp_sec, q.speaker, q.text, q.episode_name, q.spotify_url,
           NULL,
           -bm25(quotes_fts) AS word_score
    FROM quotes_fts
    JOIN quotes q ON q.id = quotes_fts.rowid
    WHERE quotes_fts MATCH ?1
      AND (?2 IS NULL OR lower(q.speaker) = lower(?2))
    ORDER BY word_score DESC, q.timestamp_sec ASC
    LIMIT ?3
"#;

const PHRASE_CANDIDATES_SQL: &str = r#"
    WITH phrase AS MATERIALIZED (
        SELECT rowid AS id, -bm25(quotes_fts) AS score
        FROM quotes_fts WHERE quotes_fts MATCH ?1
    ),
    word AS MATERIALIZED (
        SELECT rowid AS id, -bm25(quotes_fts) AS score
        FROM quotes_fts WHERE quotes_fts MATCH ?2
    ),
    hits AS (
        SELECT id FROM phrase UNION SELECT id FROM word
    )
    SELECT q.id, q.episode_id, q.timestamp_sec, q.speaker, q.text, q.episode_name, q.spotify_url,
           phrase.score,
           word.score
    FROM hits
    JOIN quotes q ON q.id = hits.id
    LEFT JOIN phrase ON phrase.id = hits.id
    LEFT JOIN word ON word.id = hits.id
    WHERE ?3 IS NULL OR lower(q.speaker) = lower(?3)
    ORDER BY COALESCE(phrase.score, 0.0) DESC, COALESCE(word.score, 0.0) DESC, q.timestamp_sec ASC
    LIMIT ?4
"#;

/// FTS5 query requiring every term
fn fts5_word_query(normalized: &str) -> String {
    normalized
        .split_whitespace()
        .map(|term| format!("\"{}\"", term))
        .collect::<Vec<_>>()
        .join(" ")
}

/// FTS5 query matching the terms as a contiguous phrase
fn fts5_phrase_query(normalized: &str) -> String {
    format!("\"{}\"", normalized)
}

fn quote_from_row(row: &Row<'_>) -> rusqlite::Result<Quote> {
    let timestamp: i64 = row.get(2)?;
    Ok(Quote {
        id: row.get(0)?,
        episode_id: row.get(1)?,
        timestamp_sec: timestamp.max(0) as u64,
        speaker: row.get(3)?,
        text: row.get(4)?,
        episode_name: row.get(5)?,
        external_link: row.get::<_, Option<String>>(6)?.filter(|s| !s.is_empty()),
    })
}

fn candidate_from_row(row: &Row<'_>) -> rusqlite::Result<CandidateRow> {
    Ok(CandidateRow {
        quote: quote_from_row(row)?,
        phrase_rank: row.get(7)?,
        word_rank: row.get(8)?,
    })
}

impl Database {
    /// Insert a single quote
    pub fn insert_quote(&self, quote: &NewQuote) -> Result<i64> {
        if quote.text.trim().is_empty() {
            return Err(QuoteFinderError::InvalidInput(format!(
                "empty quote text for {} at {}s",
                quote.episode_id, quote.timestamp_sec
            )));
        }

        let timestamp = i64::try_from(quote.timestamp_sec).map_err(|_| {
            QuoteFinderError::InvalidInput(format!(
                "timestamp out of range: {}",
                quote.timestamp_sec
            ))
        })?;

        self.conn.execute(
            "INSERT INTO quotes
                (episode_id, timestamp_sec, speaker, text, episode_name, spotify_url, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                quote.episode_id,
                timestamp,
                quote.speaker,
                quote.text,
                quote.episode_name,
                quote.external_link,
                Utc::now().to_rfc3339()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Insert quotes in a single transaction
    pub fn insert_quotes(&self, quotes: &[NewQuote]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for quote in quotes {
            self.insert_quote(quote)?;
        }
        tx.commit()?;
        tracing::debug!("Inserted {} quotes", quotes.len());
        Ok(quotes.len())
    }

    /// Remove every quote
    pub fn clear_quotes(&self) -> Result<usize> {
        let rows = self.conn.execute("DELETE FROM quotes", [])?;
        Ok(rows)
    }

    /// Number of quotes in the corpus
    pub fn quote_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Get quote by row id
    pub fn get_quote(&self, id: i64) -> Result<Option<Quote>> {
        let sql = format!("SELECT {} FROM quotes q WHERE q.id = ?1", QUOTE_COLUMNS);
        let quote = self
            .conn
            .query_row(&sql, params![id], quote_from_row)
            .optional()?;
        Ok(quote)
    }
}

impl QuoteIndex for Database {
    fn search_candidates(&self, query: &CandidateQuery<'_>) -> Result<Vec<CandidateRow>> {
        if query.normalized.trim().is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
        let word_query = fts5_word_query(query.normalized);

        let rows = if query.use_phrase {
            let phrase_query = fts5_phrase_query(query.normalized);
            let mut stmt = self.conn.prepare(PHRASE_CANDIDATES_SQL)?;
            let rows = stmt
                .query_map(
                    params![phrase_query, word_query, query.speaker, limit],
                    candidate_from_row,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        } else {
            let mut stmt = self.conn.prepare(WORD_CANDIDATES_SQL)?;
            let rows = stmt
                .query_map(params![word_query, query.speaker, limit], candidate_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        };

        Ok(rows)
    }

    fn find_exact_short(
        &self,
        normalized: &str,
        max_chars: usize,
        speaker: Option<&str>,
    ) -> Result<Option<Quote>> {
        let sql = format!(
            "SELECT {} FROM quotes q
             WHERE length(q.text) < ?1
               AND {}(q.text) = ?2
               AND (?3 IS NULL OR lower(q.speaker) = lower(?3))
             ORDER BY q.timestamp_sec ASC, q.id ASC
             LIMIT 1",
            QUOTE_COLUMNS, NORMALIZE_FN
        );
        let max_chars = i64::try_from(max_chars).unwrap_or(i64::MAX);
        let quote = self
            .conn
            .query_row(&sql, params![max_chars, normalized, speaker], quote_from_row)
            .optional()?;
        Ok(quote)
    }

    fn for_each_text(&self, visit: &mut dyn FnMut(&str)) -> Result<()> {
        let mut stmt = self
            .conn
            .prepare("SELECT text FROM quotes WHERE text IS NOT NULL")?;
        let mut rows = stmt.query([])?;
        while let Some(row) = rows.next()? {
            let text: String = row.get(0)?;
            visit(&text);
        }
        Ok(())
    }
}

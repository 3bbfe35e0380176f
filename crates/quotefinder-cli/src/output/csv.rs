//! CSV output formatter
//!
//! Always emits a header row, even when there are no results.

use anyhow::Result;
use quotefinder_core::{SearchOutcome, SearchPayload, SearchResult, SpellSuggestion};

const RESULT_HEADER: [&str; 8] = [
    "episode_id",
    "episode_name",
    "timestamp_sec",
    "timestamp_hms",
    "speaker",
    "text",
    "spotify_url",
    "rank",
];

const SUGGESTION_HEADER: [&str; 4] = ["term", "distance", "frequency", "confidence"];

/// Rows of the payload; a suggestion prompt lists the suggested results
pub fn format_payload(payload: &SearchPayload) -> Result<String> {
    let rows: &[SearchResult] = match &payload.outcome {
        SearchOutcome::Suggestion {
            suggested_results, ..
        } if payload.results.is_empty() => suggested_results,
        _ => &payload.results,
    };
    write_rows(&RESULT_HEADER, rows)
}

pub fn format_suggestions(suggestions: &[SpellSuggestion]) -> Result<String> {
    write_rows(&SUGGESTION_HEADER, suggestions)
}

fn write_rows<T: serde::Serialize>(header: &[&str], rows: &[T]) -> Result<String> {
    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(String::from_utf8(bytes)?)
}

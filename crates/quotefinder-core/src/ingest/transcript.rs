//! JSON episode transcripts
//!
//! One file per episode:
//!
//! ```json
//! {"publication": "xfm", "series": 1, "episode": 12, "name": "...",
//!  "metadata": {"spotify_uri": "spotify:episode:abc"},
//!  "transcript": [{"timestamp": 1000000000, "actor": "Karl", "content": "..."}]}
//! ```

use crate::db::NewQuote;
use crate::error::{QuoteFinderError, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const NANOS_PER_SEC: u64 = 1_000_000_000;
const DEFAULT_PUBLICATION: &str = "pod";
const SPOTIFY_EPISODE_URL: &str = "https://open.spotify.com/episode";

#[derive(Debug, Deserialize)]
struct Transcript {
    #[serde(default)]
    publication: Option<String>,
    #[serde(default)]
    series: Value,
    #[serde(default)]
    episode: Value,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    metadata: Option<TranscriptMetadata>,
    #[serde(default)]
    transcript: Option<Vec<TranscriptLine>>,
}

#[derive(Debug, Default, Deserialize)]
struct TranscriptMetadata {
    #[serde(default)]
    spotify_uri: Option<String>,
    #[serde(default)]
    spotify_player_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TranscriptLine {
    #[serde(default)]
    timestamp: Value,
    #[serde(default)]
    actor: Option<String>,
    #[serde(default)]
    content: Option<String>,
}

/// Nanosecond timestamp to whole seconds; anything unreadable is 0
fn ns_to_sec(value: &Value) -> u64 {
    let nanos = match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f > 0.0).map(|f| f as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    nanos.unwrap_or(0) / NANOS_PER_SEC
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Episode id in the form `{publication}-s{series}e{episode}`, lowercased
fn episode_id(transcript: &Transcript) -> String {
    let publication = transcript
        .publication
        .as_deref()
        .unwrap_or(DEFAULT_PUBLICATION);
    format!(
        "{}-s{}e{}",
        publication,
        scalar_to_string(&transcript.series),
        scalar_to_string(&transcript.episode)
    )
    .to_lowercase()
}

/// Deep link for a line, or `None` when the episode carries no Spotify metadata
fn episode_link(metadata: &TranscriptMetadata, sec: u64) -> Option<String> {
    if let Some(uri) = metadata.spotify_uri.as_deref().filter(|u| !u.is_empty()) {
        let id = uri.rsplit(':').next().unwrap_or(uri);
        return Some(format!("{}/{}?t={}", SPOTIFY_EPISODE_URL, id, sec));
    }
    metadata
        .spotify_player_url
        .as_deref()
        .filter(|u| !u.is_empty())
        .map(String::from)
}

/// Parse one transcript document into quotes; blank lines are skipped
pub fn parse_transcript(json: &str) -> Result<Vec<NewQuote>> {
    let transcript: Transcript = serde_json::from_str(json)?;
    let episode_id = episode_id(&transcript);
    let episode_name = transcript.name.clone().unwrap_or_default();
    let metadata = transcript.metadata.unwrap_or_default();

    let quotes = transcript
        .transcript
        .unwrap_or_default()
        .into_iter()
        .filter_map(|line| {
            let text = line.content.as_deref().unwrap_or("").trim();
            if text.is_empty() {
                return None;
            }
            let timestamp_sec = ns_to_sec(&line.timestamp);
            Some(NewQuote {
                episode_id: episode_id.clone(),
                timestamp_sec,
                speaker: line.actor.as_deref().unwrap_or("").trim().to_string(),
                text: text.to_string(),
                episode_name: episode_name.clone(),
                external_link: episode_link(&metadata, timestamp_sec),
            })
        })
        .collect();

    Ok(quotes)
}

/// Read and parse a transcript file
pub fn read_transcript_file(path: &Path) -> Result<Vec<NewQuote>> {
    let content = std::fs::read_to_string(path)?;
    parse_transcript(&content).map_err(|e| {
        QuoteFinderError::Parse(format!("Failed to parse transcript {:?}: {}", path, e))
    })
}

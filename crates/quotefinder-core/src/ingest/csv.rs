//! `quotes.csv` reader and writer

use crate::db::NewQuote;
use crate::error::{QuoteFinderError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use serde::Serialize;
use std::io::{Read, Write};
use std::path::Path;

/// Column order of the quotes export
pub const CSV_HEADER: [&str; 6] = [
    "episode_id",
    "timestamp_sec",
    "speaker",
    "text",
    "episode_name",
    "spotify_url",
];

#[derive(Serialize)]
struct CsvRow<'a> {
    episode_id: &'a str,
    timestamp_sec: u64,
    speaker: &'a str,
    text: &'a str,
    episode_name: &'a str,
    spotify_url: &'a str,
}

/// Read quotes from a CSV file with a `quotes.csv` header
pub fn read_csv_file(path: &Path) -> Result<Vec<NewQuote>> {
    let file = std::fs::File::open(path).map_err(|e| {
        QuoteFinderError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read CSV file {:?}: {}", path, e),
        ))
    })?;
    read_csv(file)
}

/// Read quotes from CSV data; rows with blank text are skipped
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<NewQuote>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let mut quotes = Vec::new();
    for (row_num, result) in reader.deserialize::<NewQuote>().enumerate() {
        let mut quote = result.map_err(|e| {
            QuoteFinderError::Parse(format!("Failed to parse CSV row {}: {}", row_num + 1, e))
        })?;

        quote.text = quote.text.trim().to_string();
        if quote.text.is_empty() {
            tracing::debug!("Skipping CSV row {} with empty text", row_num + 1);
            continue;
        }
        quote.external_link = quote.external_link.filter(|link| !link.trim().is_empty());
        quotes.push(quote);
    }

    Ok(quotes)
}

/// Write quotes in the `quotes.csv` layout
pub fn write_csv<W: Write>(writer: W, quotes: &[NewQuote]) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);
    for quote in quotes {
        writer.serialize(CsvRow {
            episode_id: &quote.episode_id,
            timestamp_sec: quote.timestamp_sec,
            speaker: &quote.speaker,
            text: &quote.text,
            episode_name: &quote.episode_name,
            spotify_url: quote.external_link.as_deref().unwrap_or(""),
        })?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
episode_id,timestamp_sec,speaker,text,episode_name,spotify_url
xfm-s1e1,100,karl,Try both.,Pilot,
xfm-s1e1,130,ricky,\"Well, you should.\",Pilot,https://open.spotify.com/episode/abc?t=130
xfm-s1e2,5,steve,   ,Episode 2,
";

    #[test]
    fn test_read_csv() {
        let quotes = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(quotes.len(), 2);
        assert_eq!(quotes[0].text, "Try both.");
        assert_eq!(quotes[0].external_link, None);
        assert_eq!(quotes[1].text, "Well, you should.");
        assert_eq!(
            quotes[1].external_link.as_deref(),
            Some("https://open.spotify.com/episode/abc?t=130")
        );
    }

    #[test]
    fn test_read_csv_bad_timestamp() {
        let data = format!("{}\nx,abc,karl,hi,,\n", CSV_HEADER.join(","));
        let err = read_csv(data.as_bytes()).unwrap_err();
        assert!(matches!(err, QuoteFinderError::Parse(_)));
    }

    #[test]
    fn test_write_then_read_keeps_header() {
        let quotes = read_csv(SAMPLE.as_bytes()).unwrap();
        let mut out = Vec::new();
        write_csv(&mut out, &quotes).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with(&CSV_HEADER.join(",")));
        assert_eq!(read_csv(text.as_bytes()).unwrap(), quotes);
    }
}

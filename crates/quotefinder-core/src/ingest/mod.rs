//! Corpus import
//!
//! Loads quotes from `quotes.csv` exports and per-episode JSON transcripts,
//! either from a single file or from every matching file under a directory.

mod csv;
mod transcript;

pub use self::csv::{read_csv, read_csv_file, write_csv, CSV_HEADER};
pub use self::transcript::{parse_transcript, read_transcript_file};

use crate::db::{Database, NewQuote};
use crate::error::{QuoteFinderError, Result};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported source file kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Csv,
    Transcript,
}

impl SourceKind {
    /// Kind implied by a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Transcript),
            _ => None,
        }
    }
}

/// Outcome of an import
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub files: usize,
    pub quotes: usize,
    pub replaced: usize,
}

/// Outcome of a CSV export
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportReport {
    pub files: usize,
    pub quotes: usize,
}

/// Source files under `path`, sorted; a file path is returned as is
pub fn discover_sources(path: &Path) -> Result<Vec<(PathBuf, SourceKind)>> {
    if !path.exists() {
        return Err(QuoteFinderError::SourceNotFound(path.display().to_string()));
    }

    if path.is_file() {
        let kind = SourceKind::from_path(path).ok_or_else(|| {
            QuoteFinderError::InvalidInput(format!(
                "unsupported file type: {} (expected .csv or .json)",
                path.display()
            ))
        })?;
        return Ok(vec![(path.to_path_buf(), kind)]);
    }

    let mut sources = Vec::new();
    for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(kind) = SourceKind::from_path(entry.path()) {
            sources.push((entry.into_path(), kind));
        }
    }
    Ok(sources)
}

/// Read every quote found at `path`
pub fn collect_quotes(path: &Path) -> Result<(usize, Vec<NewQuote>)> {
    let sources = discover_sources(path)?;
    let mut quotes = Vec::new();

    for (file, kind) in &sources {
        let parsed = match kind {
            SourceKind::Csv => read_csv_file(file)?,
            SourceKind::Transcript => read_transcript_file(file)?,
        };
        tracing::debug!("Read {} quotes from {}", parsed.len(), file.display());
        quotes.extend(parsed);
    }

    Ok((sources.len(), quotes))
}

/// Import quotes from `path` into the database.
///
/// With `replace`, existing quotes are removed first. Nothing is written if
/// any source fails to parse.
pub fn import_path(db: &Database, path: &Path, replace: bool) -> Result<ImportReport> {
    let (files, quotes) = collect_quotes(path)?;

    let replaced = if replace { db.clear_quotes()? } else { 0 };
    let inserted = db.insert_quotes(&quotes)?;

    tracing::info!(
        "Imported {} quotes from {} files ({} replaced)",
        inserted,
        files,
        replaced
    );
    Ok(ImportReport {
        files,
        quotes: inserted,
        replaced,
    })
}

/// Convert every source at `path` into a single `quotes.csv` stream
pub fn export_csv<W: Write>(path: &Path, writer: W) -> Result<ExportReport> {
    let (files, quotes) = collect_quotes(path)?;
    write_csv(writer, &quotes)?;

    tracing::info!("Exported {} quotes from {} files", quotes.len(), files);
    Ok(ExportReport {
        files,
        quotes: quotes.len(),
    })
}

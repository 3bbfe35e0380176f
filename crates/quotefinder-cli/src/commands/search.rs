//! Search command

use crate::app::{OutputFormat, SearchArgs};
use crate::output::format_payload;
use anyhow::Result;
use quotefinder_core::{search_quotes, Config, Database, QuoteFinderError};

pub fn run(args: SearchArgs, db: &Database, config: &Config, format: OutputFormat) -> Result<()> {
    let query = args.query.join(" ");

    let speaker = match args.speaker.as_deref() {
        Some(speaker) => Some(config.resolve_speaker(speaker).ok_or_else(|| {
            QuoteFinderError::InvalidInput(format!(
                "Invalid speaker. Must be one of: {}",
                config.speakers.join(", ")
            ))
        })?),
        None => None,
    };

    let top_k = args.limit.unwrap_or(config.search.default_top_k);
    let payload = search_quotes(db, &query, top_k, speaker.as_deref(), config)?;

    print!("{}", format_payload(&payload, format)?);
    Ok(())
}

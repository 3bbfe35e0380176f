//! Stats command

use crate::app::OutputFormat;
use anyhow::Result;
use quotefinder_core::Database;

pub fn run(db: &Database, format: OutputFormat) -> Result<()> {
    let stats = db.get_stats()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        _ => {
            println!("Quotes:          {}", stats.total_quotes);
            println!("Episodes:        {}", stats.unique_episodes);
            println!("Speakers:        {}", stats.speakers.join(", "));
        }
    }
    Ok(())
}

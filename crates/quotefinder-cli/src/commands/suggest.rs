//! Suggest command

use crate::app::{OutputFormat, SuggestArgs};
use crate::output::format_suggestions;
use anyhow::Result;
use quotefinder_core::{Config, Database, SpellCache, SpellSuggester};

pub fn run(args: SuggestArgs, db: &Database, config: &Config, format: OutputFormat) -> Result<()> {
    let query = args.query.join(" ");
    let limit = args.limit.unwrap_or(config.search.max_suggestions);

    let dictionary = SpellCache::global().get_or_build(db)?;
    let suggestions = dictionary.suggest(&query, args.max_distance, limit)?;

    print!("{}", format_suggestions(&suggestions, format)?);
    Ok(())
}

//! Output formatters

pub mod csv;
pub mod json;
pub mod terminal;

use crate::app::OutputFormat;
use anyhow::Result;
use quotefinder_core::{SearchPayload, SpellSuggestion};

/// Format a resolved search
pub fn format_payload(payload: &SearchPayload, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format_payload(payload),
        OutputFormat::Csv => csv::format_payload(payload),
        OutputFormat::Cli => Ok(terminal::format_payload(payload)),
    }
}

/// Format spelling suggestions
pub fn format_suggestions(suggestions: &[SpellSuggestion], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format_suggestions(suggestions),
        OutputFormat::Csv => csv::format_suggestions(suggestions),
        OutputFormat::Cli => Ok(terminal::format_suggestions(suggestions)),
    }
}

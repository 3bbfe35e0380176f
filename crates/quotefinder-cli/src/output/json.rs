//! JSON output formatter

use anyhow::Result;
use quotefinder_core::{SearchPayload, SpellSuggestion};

pub fn format_payload(payload: &SearchPayload) -> Result<String> {
    Ok(serde_json::to_string_pretty(payload)? + "\n")
}

pub fn format_suggestions(suggestions: &[SpellSuggestion]) -> Result<String> {
    Ok(serde_json::to_string_pretty(suggestions)? + "\n")
}

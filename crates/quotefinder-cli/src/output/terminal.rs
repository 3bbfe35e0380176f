//! Terminal output formatter

use quotefinder_core::{SearchOutcome, SearchPayload, SpellSuggestion};

pub fn format_payload(payload: &SearchPayload) -> String {
    let mut output = String::new();

    if payload.results.is_empty() {
        if let Some(message) = payload.message() {
            output.push_str(&format!("{}\n", message));
        }
        if let SearchOutcome::Suggestion {
            suggested_query,
            suggested_results,
            ..
        } = &payload.outcome
        {
            output.push_str(&format!("Suggested query: {}\n", suggested_query));
            if !suggested_results.is_empty() {
                output.push_str("\nPreview results for suggestion:\n");
                for r in suggested_results {
                    output.push_str(&format!(
                        "- {} @ {} | {}\n",
                        r.speaker, r.timestamp_hms, r.text
                    ));
                }
            }
        }
        output.push_str("No matches found.\n");
        return output;
    }

    output.push_str(&format!("\nTop matches for: \"{}\"\n\n", payload.original_query));
    if let SearchOutcome::Fuzzy { message, .. } = &payload.outcome {
        output.push_str(&format!("Warning: {}\n\n", message));
    }

    for r in &payload.results {
        output.push_str(&format!(
            "- [Rank: {:.6}] {} @ {} | {} ({})\n",
            r.rank, r.speaker, r.timestamp_hms, r.episode_id, r.episode_name
        ));
        output.push_str(&format!("  \"{}\"\n", r.text));
        if let Some(link) = r.external_link.as_deref().filter(|l| !l.is_empty()) {
            output.push_str(&format!("  Spotify: {}\n", link));
        }
        output.push('\n');
    }

    output
}

pub fn format_suggestions(suggestions: &[SpellSuggestion]) -> String {
    if suggestions.is_empty() {
        return "No suggestions.\n".to_string();
    }

    let mut output = String::new();
    for s in suggestions {
        output.push_str(&format!(
            "{:>3}% {} (distance {}, frequency {})\n",
            (s.confidence * 100.0) as u32,
            s.term,
            s.distance,
            s.frequency
        ));
    }
    output
}

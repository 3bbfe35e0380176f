//! Search engine module
//!
//! Provides:
//! - Exact/phrase search over the FTS5 index with phrase-aware ranking
//! - Spelling suggestions from a corpus-built SymSpell dictionary
//! - Hybrid resolution: exact, then auto-corrected, then "did you mean"

mod exact;
mod hybrid;
pub mod spell;
pub mod text;

pub use exact::{run_exact_search, EXACT_MATCH_SENTINEL_RANK};
pub use hybrid::{search_quotes, should_auto_accept, HybridResolver, ResolverOptions};
pub use spell::{CorpusSuggester, SpellCache, SpellDictionary, SpellSuggester, SpellSuggestion};
pub use text::{is_phrase, normalize, phrase_boost};

use crate::db::Quote;
use crate::error::Result;
use serde::{Serialize, Serializer};

/// Candidate query issued against the full-text index
#[derive(Debug, Clone, Copy)]
pub struct CandidateQuery<'a> {
    /// Normalized query text
    pub normalized: &'a str,
    /// Also match the query as a phrase and report a phrase rank
    pub use_phrase: bool,
    /// Case-insensitive speaker equality filter
    pub speaker: Option<&'a str>,
    /// Maximum number of rows
    pub limit: usize,
}

/// A quote returned by the index together with its engine scores.
///
/// Index hits and the synthetic exact-match row share this shape.
#[derive(Debug, Clone)]
pub struct CandidateRow {
    pub quote: Quote,
    pub phrase_rank: Option<f64>,
    pub word_rank: Option<f64>,
}

impl CandidateRow {
    /// Score from the engine before boosting
    pub fn base_rank(&self, use_phrase: bool) -> f64 {
        match self.phrase_rank {
            Some(rank) if use_phrase => rank,
            _ => self.word_rank.unwrap_or(0.0),
        }
    }
}

/// Read access to the quote corpus.
///
/// Implemented by [`crate::Database`]; tests substitute scripted indexes.
pub trait QuoteIndex {
    /// Ranked full-text candidates, ordered by phrase rank desc, word rank
    /// desc, timestamp asc.
    fn search_candidates(&self, query: &CandidateQuery<'_>) -> Result<Vec<CandidateRow>>;

    /// A quote shorter than `max_chars` whose normalized text equals `normalized`
    fn find_exact_short(
        &self,
        normalized: &str,
        max_chars: usize,
        speaker: Option<&str>,
    ) -> Result<Option<Quote>>;

    /// Visit the text of every quote in the corpus
    fn for_each_text(&self, visit: &mut dyn FnMut(&str)) -> Result<()>;
}

/// Search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub episode_id: String,
    pub episode_name: String,
    pub timestamp_sec: u64,
    pub timestamp_hms: String,
    pub speaker: String,
    pub text: String,
    #[serde(rename = "spotify_url", serialize_with = "serialize_link")]
    pub external_link: Option<String>,
    pub rank: f64,
}

impl SearchResult {
    pub fn from_quote(quote: Quote, rank: f64) -> Self {
        Self {
            timestamp_hms: format_timestamp(quote.timestamp_sec),
            episode_id: quote.episode_id,
            episode_name: quote.episode_name,
            timestamp_sec: quote.timestamp_sec,
            speaker: quote.speaker,
            text: quote.text,
            external_link: quote.external_link,
            rank,
        }
    }
}

fn serialize_link<S>(link: &Option<String>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(link.as_deref().unwrap_or(""))
}

/// Format seconds as HH:MM:SS
pub fn format_timestamp(sec: u64) -> String {
    let (h, m, s) = (sec / 3600, (sec % 3600) / 60, sec % 60);
    format!("{:02}:{:02}:{:02}", h, m, s)
}

/// How a search was resolved
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "search_type", rename_all = "lowercase")]
pub enum SearchOutcome {
    /// The query matched as typed
    Exact,
    /// A spelling correction was applied automatically
    Fuzzy {
        message: String,
        suggestion_confidence: f64,
        auto_corrected: bool,
    },
    /// A correction is offered; `results` stays empty until the caller accepts it
    Suggestion {
        message: String,
        suggested_query: String,
        suggested_results: Vec<SearchResult>,
        suggestion_confidence: f64,
    },
    #[serde(rename = "none")]
    NoMatch,
}

/// Resolved search returned to callers
#[derive(Debug, Clone, Serialize)]
pub struct SearchPayload {
    pub results: Vec<SearchResult>,
    pub query_used: String,
    pub original_query: String,
    #[serde(flatten)]
    pub outcome: SearchOutcome,
}

impl SearchPayload {
    /// The `search_type` tag
    pub fn search_type(&self) -> &'static str {
        match self.outcome {
            SearchOutcome::Exact => "exact",
            SearchOutcome::Fuzzy { .. } => "fuzzy",
            SearchOutcome::Suggestion { .. } => "suggestion",
            SearchOutcome::NoMatch => "none",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match &self.outcome {
            SearchOutcome::Fuzzy { message, .. } | SearchOutcome::Suggestion { message, .. } => {
                Some(message)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quote(text: &str, link: Option<&str>) -> Quote {
        Quote {
            id: 1,
            episode_id: "xfm-s1e1".to_string(),
            timestamp_sec: 100,
            speaker: "karl".to_string(),
            text: text.to_string(),
            episode_name: "Pilot".to_string(),
            external_link: link.map(String::from),
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00:00");
        assert_eq!(format_timestamp(100), "00:01:40");
        assert_eq!(format_timestamp(3723), "01:02:03");
    }

    #[test]
    fn test_base_rank() {
        let row = CandidateRow {
            quote: quote("Try both.", None),
            phrase_rank: Some(2.0),
            word_rank: Some(1.0),
        };
        assert_eq!(row.base_rank(true), 2.0);
        assert_eq!(row.base_rank(false), 1.0);

        let word_only = CandidateRow {
            phrase_rank: None,
            ..row
        };
        assert_eq!(word_only.base_rank(true), 1.0);
    }

    #[test]
    fn test_result_serialization() {
        let result = SearchResult::from_quote(quote("Try both.", None), 1.5);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["timestamp_hms"], "00:01:40");
        assert_eq!(value["spotify_url"], "");
        assert_eq!(value["rank"], 1.5);
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_payload_serialization_shapes() {
        let exact = SearchPayload {
            results: vec![],
            query_used: "q".to_string(),
            original_query: "q".to_string(),
            outcome: SearchOutcome::Exact,
        };
        let value = serde_json::to_value(&exact).unwrap();
        assert_eq!(value["search_type"], "exact");
        assert!(value.get("message").is_none());

        let none = SearchPayload {
            outcome: SearchOutcome::NoMatch,
            ..exact.clone()
        };
        assert_eq!(serde_json::to_value(&none).unwrap()["search_type"], "none");

        let fuzzy = SearchPayload {
            outcome: SearchOutcome::Fuzzy {
                message: "m".to_string(),
                suggestion_confidence: 0.9,
                auto_corrected: true,
            },
            ..exact
        };
        let value = serde_json::to_value(&fuzzy).unwrap();
        assert_eq!(value["search_type"], "fuzzy");
        assert_eq!(value["auto_corrected"], true);
        assert_eq!(fuzzy.search_type(), "fuzzy");
        assert_eq!(fuzzy.message(), Some("m"));
    }
}

//! Exact and phrase search over the full-text index

use super::text::{is_phrase, normalize, phrase_boost, word_count};
use super::{CandidateQuery, CandidateRow, QuoteIndex, SearchResult};
use crate::error::Result;

/// Rank assigned to a quote whose whole text equals the query
pub const EXACT_MATCH_SENTINEL_RANK: f64 = 1000.0;

/// Candidates fetched per requested result
const CANDIDATE_MULTIPLIER: usize = 2;

/// Base score for an exact match, by quote length in words
fn exact_tier(text: &str) -> f64 {
    match word_count(text) {
        0..=5 => 1000.0,
        6..=15 => 500.0,
        _ => 100.0,
    }
}

/// Run one search pass for `query`, ranked best first and capped at `top_k`.
///
/// Phrase-shaped queries also consult the short exact-text lookup; a failure
/// there only costs the sentinel row and is logged.
pub fn run_exact_search(
    index: &dyn QuoteIndex,
    query: &str,
    top_k: usize,
    speaker: Option<&str>,
    exact_match_max_chars: usize,
) -> Result<Vec<SearchResult>> {
    let normalized = normalize(query);
    if normalized.is_empty() || top_k == 0 {
        return Ok(Vec::new());
    }
    let use_phrase = is_phrase(query);

    let candidate_query = CandidateQuery {
        normalized: &normalized,
        use_phrase,
        speaker,
        limit: top_k.saturating_mul(CANDIDATE_MULTIPLIER),
    };
    let mut rows = index.search_candidates(&candidate_query)?;

    if use_phrase {
        match index.find_exact_short(&normalized, exact_match_max_chars, speaker) {
            Ok(Some(quote)) if !rows.iter().any(|row| row.quote.id == quote.id) => {
                tracing::debug!("Exact text match for '{}' (quote {})", normalized, quote.id);
                rows.insert(
                    0,
                    CandidateRow {
                        quote,
                        phrase_rank: Some(EXACT_MATCH_SENTINEL_RANK),
                        word_rank: Some(EXACT_MATCH_SENTINEL_RANK),
                    },
                );
            }
            Ok(_) => {}
            Err(e) => tracing::warn!("Exact text lookup failed for '{}': {}", normalized, e),
        }
    }

    let mut results: Vec<SearchResult> = rows
        .into_iter()
        .map(|row| {
            let base = row.base_rank(use_phrase);
            let boost = phrase_boost(&row.quote.text, &normalized);
            let rank = if normalize(&row.quote.text) == normalized {
                exact_tier(&row.quote.text) + base * boost
            } else {
                base * boost
            };
            SearchResult::from_quote(row.quote, rank)
        })
        .collect();

    // Stable: equal ranks keep retrieval order
    results.sort_by(|a, b| b.rank.total_cmp(&a.rank));
    results.truncate(top_k);

    tracing::debug!(
        "Search pass '{}' (phrase: {}) returned {} results",
        normalized,
        use_phrase,
        results.len()
    );
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Quote;
    use crate::error::QuoteFinderError;
    use std::cell::RefCell;

    fn quote(id: i64, speaker: &str, text: &str) -> Quote {
        Quote {
            id,
            episode_id: "xfm-s1e1".to_string(),
            timestamp_sec: id as u64 * 10,
            speaker: speaker.to_string(),
            text: text.to_string(),
            episode_name: String::new(),
            external_link: None,
        }
    }

    /// Index returning fixed rows and recording the queries it saw
    struct FixedIndex {
        rows: Vec<CandidateRow>,
        exact: Option<Quote>,
        fail_exact: bool,
        seen: RefCell<Vec<(String, bool, usize)>>,
    }

    impl FixedIndex {
        fn new(rows: Vec<CandidateRow>) -> Self {
            Self {
                rows,
                exact: None,
                fail_exact: false,
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl QuoteIndex for FixedIndex {
        fn search_candidates(&self, query: &CandidateQuery<'_>) -> Result<Vec<CandidateRow>> {
            self.seen.borrow_mut().push((
                query.normalized.to_string(),
                query.use_phrase,
                query.limit,
            ));
            Ok(self.rows.iter().take(query.limit).cloned().collect())
        }

        fn find_exact_short(
            &self,
            _normalized: &str,
            _max_chars: usize,
            _speaker: Option<&str>,
        ) -> Result<Option<Quote>> {
            if self.fail_exact {
                return Err(QuoteFinderError::Search("lookup unavailable".into()));
            }
            Ok(self.exact.clone())
        }

        fn for_each_text(&self, _visit: &mut dyn FnMut(&str)) -> Result<()> {
            Ok(())
        }
    }

    fn row(id: i64, text: &str, phrase: Option<f64>, word: Option<f64>) -> CandidateRow {
        CandidateRow {
            quote: quote(id, "karl", text),
            phrase_rank: phrase,
            word_rank: word,
        }
    }

    #[test]
    fn test_empty_query_skips_index() {
        let index = FixedIndex::new(vec![row(1, "Try both.", None, Some(1.0))]);
        assert!(run_exact_search(&index, "?!", 5, None, 100).unwrap().is_empty());
        assert!(index.seen.borrow().is_empty());
    }

    #[test]
    fn test_fetches_twice_top_k() {
        let index = FixedIndex::new(vec![]);
        run_exact_search(&index, "try both", 3, None, 100).unwrap();
        run_exact_search(&index, "cooker", 4, None, 100).unwrap();
        let seen = index.seen.borrow();
        assert_eq!(seen[0], ("try both".to_string(), true, 6));
        assert_eq!(seen[1], ("cooker".to_string(), false, 8));
    }

    #[test]
    fn test_exact_text_outranks_partial() {
        let index = FixedIndex::new(vec![
            row(2, "You should try them both at once.", Some(0.0), Some(4.0)),
            row(1, "Try both.", Some(3.0), Some(2.0)),
        ]);
        let results = run_exact_search(&index, "try both", 5, None, 100).unwrap();
        assert_eq!(results[0].text, "Try both.");
        // tier 1000 + phrase rank 3.0 * boost 10.0
        assert_eq!(results[0].rank, 1030.0);
        assert!(results[1].rank < 100.0);
    }

    #[test]
    fn test_exact_tier_by_length() {
        assert_eq!(exact_tier("Try both."), 1000.0);
        assert_eq!(exact_tier("one two three four five six"), 500.0);
        assert_eq!(exact_tier(&"word ".repeat(16)), 100.0);
    }

    #[test]
    fn test_sentinel_prepended_when_missing() {
        let mut index = FixedIndex::new(vec![row(2, "Both of them, try again.", None, Some(1.0))]);
        index.exact = Some(quote(1, "karl", "Try both."));
        let results = run_exact_search(&index, "Try both.", 5, None, 100).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].text, "Try both.");
        assert_eq!(results[0].rank, 1000.0 + EXACT_MATCH_SENTINEL_RANK * 10.0);
    }

    #[test]
    fn test_sentinel_not_duplicated() {
        let mut index = FixedIndex::new(vec![row(1, "Try both.", Some(2.0), Some(2.0))]);
        index.exact = Some(quote(1, "karl", "Try both."));
        let results = run_exact_search(&index, "try both", 5, None, 100).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].rank, 1020.0);
    }

    #[test]
    fn test_exact_lookup_failure_is_ignored() {
        let mut index = FixedIndex::new(vec![row(1, "Try both.", Some(2.0), Some(2.0))]);
        index.fail_exact = true;
        let results = run_exact_search(&index, "try both", 5, None, 100).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_word_query_uses_word_rank() {
        let index = FixedIndex::new(vec![
            row(1, "Keep whacking the cooker.", None, Some(1.0)),
            row(2, "Whacking.", None, Some(0.5)),
        ]);
        let results = run_exact_search(&index, "whacking", 5, None, 100).unwrap();
        // single word exact text: 1000 + 0.5 * 10
        assert_eq!(results[0].text, "Whacking.");
        assert_eq!(results[0].rank, 1005.0);
        // contained in a short quote: 1.0 * 10
        assert_eq!(results[1].rank, 10.0);
    }

    #[test]
    fn test_truncates_to_top_k_keeping_order_on_ties() {
        let index = FixedIndex::new(
            (1..=6)
                .map(|i| row(i, "nothing in common", None, Some(1.0)))
                .collect(),
        );
        let results = run_exact_search(&index, "common", 3, None, 100).unwrap();
        assert_eq!(results.len(), 3);
        let stamps: Vec<u64> = results.iter().map(|r| r.timestamp_sec).collect();
        assert_eq!(stamps, vec![10, 20, 30]);
    }

    #[test]
    fn test_huge_top_k_saturates_candidate_limit() {
        let index = FixedIndex::new(vec![row(1, "Keep whacking the cooker.", None, Some(1.0))]);
        let results = run_exact_search(&index, "cooker", usize::MAX, None, 100).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(index.seen.borrow()[0].2, usize::MAX);
    }

    #[test]
    fn test_zero_top_k() {
        let index = FixedIndex::new(vec![row(1, "Try both.", None, Some(1.0))]);
        assert!(run_exact_search(&index, "try", 0, None, 100).unwrap().is_empty());
    }
}

//! Hybrid search resolution
//!
//! Resolves a query in tiers, stopping at the first that produces results:
//! 1. exact/phrase search on the query as typed
//! 2. fuzzy retry with an auto-accepted spelling correction
//! 3. "did you mean" prompt carrying the results of the best correction
//! 4. no match

use super::exact::run_exact_search;
use super::spell::{CorpusSuggester, SpellCache, SpellSuggester, SpellSuggestion};
use super::text::normalize;
use super::{QuoteIndex, SearchOutcome, SearchPayload, SearchResult};
use crate::config::{Config, SearchConfig};
use crate::db::Database;
use crate::error::{QuoteFinderError, Result};
use strsim::levenshtein;

/// Tunables for the resolver
#[derive(Debug, Clone, PartialEq)]
pub struct ResolverOptions {
    /// Quotes at least this long never take the exact-text shortcut
    pub exact_match_max_chars: usize,
    /// Suggestions requested per spelling lookup
    pub max_suggestions: usize,
    /// Minimum confidence for a distance-1 auto-correction
    pub auto_accept_confidence: f64,
    /// Minimum confidence for a distance-2 auto-correction
    pub distance_two_confidence: f64,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for ResolverOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            exact_match_max_chars: config.exact_match_max_chars,
            max_suggestions: config.max_suggestions,
            auto_accept_confidence: config.auto_accept_confidence,
            distance_two_confidence: config.distance_two_confidence,
        }
    }
}

/// Whether a correction is safe to apply without asking.
///
/// Requires a single edit both by the suggester's measure and by plain
/// Levenshtein between the normalized forms, a real change, and enough
/// confidence.
pub fn should_auto_accept(query: &str, suggestion: &SpellSuggestion, min_confidence: f64) -> bool {
    let normalized_query = normalize(query);
    let normalized_term = normalize(&suggestion.term);

    suggestion.distance <= 1
        && normalized_query != normalized_term
        && levenshtein(&normalized_query, &normalized_term) <= 1
        && suggestion.confidence >= min_confidence
}

/// Tiered resolver over an index and a spelling suggester
pub struct HybridResolver<'a> {
    index: &'a dyn QuoteIndex,
    suggester: &'a dyn SpellSuggester,
    options: ResolverOptions,
}

impl<'a> HybridResolver<'a> {
    pub fn new(
        index: &'a dyn QuoteIndex,
        suggester: &'a dyn SpellSuggester,
        options: ResolverOptions,
    ) -> Self {
        Self {
            index,
            suggester,
            options,
        }
    }

    /// Resolve `query` into a payload.
    ///
    /// Index failures are returned; spelling failures only skip the
    /// correction tiers.
    pub fn search(
        &self,
        query: &str,
        top_k: usize,
        speaker: Option<&str>,
    ) -> Result<SearchPayload> {
        if top_k == 0 {
            return Err(QuoteFinderError::InvalidInput(
                "top_k must be at least 1".to_string(),
            ));
        }

        let results = self.run(query, top_k, speaker)?;
        if !results.is_empty() {
            tracing::info!("Exact search for '{}' found {} results", query, results.len());
            return Ok(SearchPayload {
                results,
                query_used: query.to_string(),
                original_query: query.to_string(),
                outcome: SearchOutcome::Exact,
            });
        }

        tracing::debug!("No exact results for '{}', trying spelling fallback", query);
        if let Some(payload) = self.fuzzy_fallback(query, top_k, speaker)? {
            return Ok(payload);
        }

        if let Some(payload) = self.suggestion_prompt(query, top_k, speaker)? {
            return Ok(payload);
        }

        tracing::info!("No matches for '{}'", query);
        Ok(SearchPayload {
            results: Vec::new(),
            query_used: query.to_string(),
            original_query: query.to_string(),
            outcome: SearchOutcome::NoMatch,
        })
    }

    fn run(&self, query: &str, top_k: usize, speaker: Option<&str>) -> Result<Vec<SearchResult>> {
        run_exact_search(
            self.index,
            query,
            top_k,
            speaker,
            self.options.exact_match_max_chars,
        )
    }

    fn suggestions(&self, query: &str, max_distance: usize) -> Vec<SpellSuggestion> {
        match self
            .suggester
            .suggest(query, max_distance, self.options.max_suggestions)
        {
            Ok(suggestions) => suggestions,
            Err(e) => {
                tracing::warn!("Spelling suggestions failed for '{}': {}", query, e);
                Vec::new()
            }
        }
    }

    /// Try auto-accepted corrections: every distance-1 candidate first, then
    /// confident distance-2 candidates.
    fn fuzzy_fallback(
        &self,
        query: &str,
        top_k: usize,
        speaker: Option<&str>,
    ) -> Result<Option<SearchPayload>> {
        for suggestion in self.suggestions(query, 1) {
            if !should_auto_accept(query, &suggestion, self.options.auto_accept_confidence) {
                continue;
            }
            let results = self.run(&suggestion.term, top_k, speaker)?;
            if !results.is_empty() {
                return Ok(Some(fuzzy_payload(query, suggestion, results)));
            }
        }

        let normalized_query = normalize(query);
        for suggestion in self.suggestions(query, 2) {
            // A term that normalizes to the query would only repeat the exact pass
            if suggestion.distance <= 1
                || suggestion.confidence < self.options.distance_two_confidence
                || normalize(&suggestion.term) == normalized_query
            {
                continue;
            }
            let results = self.run(&suggestion.term, top_k, speaker)?;
            if !results.is_empty() {
                return Ok(Some(fuzzy_payload(query, suggestion, results)));
            }
        }

        Ok(None)
    }

    /// Offer the best differing correction without applying it
    fn suggestion_prompt(
        &self,
        query: &str,
        top_k: usize,
        speaker: Option<&str>,
    ) -> Result<Option<SearchPayload>> {
        let normalized_query = normalize(query);
        let best = self
            .suggestions(query, 2)
            .into_iter()
            .find(|s| normalize(&s.term) != normalized_query);

        let Some(best) = best else {
            return Ok(None);
        };

        let suggested_results = self.run(&best.term, top_k, speaker)?;
        if suggested_results.is_empty() {
            return Ok(None);
        }

        tracing::info!(
            "Suggesting '{}' for '{}' ({} results)",
            best.term,
            query,
            suggested_results.len()
        );
        Ok(Some(SearchPayload {
            results: Vec::new(),
            query_used: query.to_string(),
            original_query: query.to_string(),
            outcome: SearchOutcome::Suggestion {
                message: format!("Did you mean \"{}\"?", best.term),
                suggested_query: best.term,
                suggested_results,
                suggestion_confidence: best.confidence,
            },
        }))
    }
}

fn fuzzy_payload(
    query: &str,
    suggestion: SpellSuggestion,
    results: Vec<SearchResult>,
) -> SearchPayload {
    tracing::info!(
        "Auto-corrected '{}' to '{}' (distance {}, confidence {:.2})",
        query,
        suggestion.term,
        suggestion.distance,
        suggestion.confidence
    );
    SearchPayload {
        results,
        original_query: query.to_string(),
        outcome: SearchOutcome::Fuzzy {
            message: format!(
                "Showing results for \"{}\" instead of \"{}\"",
                suggestion.term, query
            ),
            suggestion_confidence: suggestion.confidence,
            auto_corrected: true,
        },
        query_used: suggestion.term,
    }
}

/// Search the database with the process-wide spelling dictionary
pub fn search_quotes(
    db: &Database,
    query: &str,
    top_k: usize,
    speaker: Option<&str>,
    config: &Config,
) -> Result<SearchPayload> {
    let suggester = CorpusSuggester::new(SpellCache::global(), db);
    let resolver = HybridResolver::new(db, &suggester, ResolverOptions::from(&config.search));
    resolver.search(query, top_k, speaker)
}

//! Spelling suggestions backed by SymSpell
//!
//! The dictionary is built from the corpus vocabulary the first time it is
//! needed and then shared read-only for the rest of the process.

use super::text::normalize;
use super::QuoteIndex;
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use symspell::{SymSpell, UnicodeStringStrategy, Verbosity};

lazy_static! {
    static ref WORD_RE: Regex = Regex::new(r"[a-z]+").unwrap();
    static ref GLOBAL_CACHE: SpellCache = SpellCache::new();
}

/// Edit distance the SymSpell engine pre-computes deletes for
pub const MAX_DICTIONARY_DISTANCE: usize = 2;

/// Shortest token kept in the vocabulary
const MIN_WORD_LEN: usize = 2;

/// A spelling correction candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpellSuggestion {
    pub term: String,
    pub distance: usize,
    pub frequency: u64,
    pub confidence: f64,
}

/// Source of spelling corrections
pub trait SpellSuggester {
    /// Ranked corrections for `query`, closest first
    fn suggest(
        &self,
        query: &str,
        max_distance: usize,
        max_suggestions: usize,
    ) -> Result<Vec<SpellSuggestion>>;
}

/// Confidence of a correction relative to the normalized query length
pub fn confidence(distance: usize, normalized_query: &str) -> f64 {
    let query_length = normalized_query.chars().count().max(1);
    (1.0 - distance as f64 / query_length as f64).max(0.0)
}

/// Count alphabetic tokens of at least two letters
pub fn add_words(text: &str, vocabulary: &mut HashMap<String, u64>) {
    let lower = text.to_lowercase();
    for word in WORD_RE.find_iter(&lower) {
        let word = word.as_str();
        if word.len() >= MIN_WORD_LEN {
            *vocabulary.entry(word.to_string()).or_insert(0) += 1;
        }
    }
}

/// Frequency dictionary with approximate lookup
pub struct SpellDictionary {
    engine: SymSpell<UnicodeStringStrategy>,
    vocabulary_size: usize,
}

impl SpellDictionary {
    /// Build from (word, count) pairs
    pub fn from_frequencies<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, u64)>,
    {
        let mut engine: SymSpell<UnicodeStringStrategy> = SymSpell::default();
        let mut vocabulary_size = 0;

        for (word, count) in entries {
            if word.is_empty() || word.contains(' ') || count == 0 {
                continue;
            }
            engine.load_dictionary_line(&format!("{} {}", word, count), 0, 1, " ");
            vocabulary_size += 1;
        }

        Self {
            engine,
            vocabulary_size,
        }
    }

    /// Scan every quote in the corpus and build the dictionary
    pub fn build(index: &dyn QuoteIndex) -> Result<Self> {
        let mut vocabulary = HashMap::new();
        let mut quotes = 0usize;
        index.for_each_text(&mut |text: &str| {
            quotes += 1;
            add_words(text, &mut vocabulary);
        })?;

        let dictionary = Self::from_frequencies(vocabulary);
        tracing::info!(
            "Built spelling dictionary: {} words from {} quotes",
            dictionary.vocabulary_size,
            quotes
        );
        Ok(dictionary)
    }

    /// Number of distinct words
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary_size
    }
}

impl SpellSuggester for SpellDictionary {
    fn suggest(
        &self,
        query: &str,
        max_distance: usize,
        max_suggestions: usize,
    ) -> Result<Vec<SpellSuggestion>> {
        let normalized_query = normalize(query);
        if normalized_query.is_empty() || self.vocabulary_size == 0 || max_suggestions == 0 {
            return Ok(Vec::new());
        }

        let max_distance = max_distance.min(MAX_DICTIONARY_DISTANCE);
        let edit_distance = max_distance as i64;

        let mut candidates = self.engine.lookup_compound(&normalized_query, edit_distance);
        if candidates.is_empty() {
            candidates = self
                .engine
                .lookup(&normalized_query, Verbosity::Closest, edit_distance);
        }

        let mut ranked: Vec<SpellSuggestion> = candidates
            .into_iter()
            .filter_map(|candidate| {
                let term = candidate.term.trim();
                let distance = candidate.distance.max(0) as usize;
                if term.is_empty() {
                    return None;
                }
                Some(SpellSuggestion {
                    term: term.to_string(),
                    distance,
                    frequency: candidate.count.max(0) as u64,
                    confidence: confidence(distance, &normalized_query),
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            a.distance
                .cmp(&b.distance)
                .then_with(|| b.frequency.cmp(&a.frequency))
                .then_with(|| b.confidence.total_cmp(&a.confidence))
        });
        ranked.truncate(max_suggestions);

        Ok(ranked)
    }
}

/// Process-wide holder of the spelling dictionary.
///
/// The first caller builds the dictionary while holding the build lock;
/// concurrent callers wait on the lock and then reuse the result. Once built,
/// reads go through the `OnceLock` without locking.
pub struct SpellCache {
    dictionary: OnceLock<SpellDictionary>,
    build_lock: Mutex<()>,
}

impl Default for SpellCache {
    fn default() -> Self {
        Self::new()
    }
}

impl SpellCache {
    pub fn new() -> Self {
        Self {
            dictionary: OnceLock::new(),
            build_lock: Mutex::new(()),
        }
    }

    /// The cache shared by the whole process
    pub fn global() -> &'static SpellCache {
        &GLOBAL_CACHE
    }

    pub fn is_built(&self) -> bool {
        self.dictionary.get().is_some()
    }

    /// Return the dictionary, building it from `index` on first use
    pub fn get_or_build(&self, index: &dyn QuoteIndex) -> Result<&SpellDictionary> {
        if let Some(dictionary) = self.dictionary.get() {
            return Ok(dictionary);
        }

        // A panic during a previous build leaves nothing behind, so the guard is still usable
        let _guard = self
            .build_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(dictionary) = self.dictionary.get() {
            return Ok(dictionary);
        }

        let dictionary = SpellDictionary::build(index)?;
        Ok(self.dictionary.get_or_init(|| dictionary))
    }
}

/// Suggester that lazily builds its dictionary from a corpus
pub struct CorpusSuggester<'a> {
    cache: &'a SpellCache,
    index: &'a dyn QuoteIndex,
}

impl<'a> CorpusSuggester<'a> {
    pub fn new(cache: &'a SpellCache, index: &'a dyn QuoteIndex) -> Self {
        Self { cache, index }
    }
}

impl SpellSuggester for CorpusSuggester<'_> {
    fn suggest(
        &self,
        query: &str,
        max_distance: usize,
        max_suggestions: usize,
    ) -> Result<Vec<SpellSuggestion>> {
        self.cache
            .get_or_build(self.index)?
            .suggest(query, max_distance, max_suggestions)
    }
}

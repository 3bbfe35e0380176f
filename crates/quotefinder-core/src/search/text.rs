//! Query normalization and phrase heuristics

/// Boost for a query found verbatim inside a quote of at most 5 words
const SUBSTRING_BOOST_SHORT: f64 = 10.0;
/// Boost for a query found verbatim inside a quote of at most 10 words
const SUBSTRING_BOOST_MEDIUM: f64 = 5.0;
/// Boost for a query found verbatim inside a longer quote
const SUBSTRING_BOOST_LONG: f64 = 2.0;
/// Query words appear in order, each adjacent to the next
const ADJACENT_BOOST: f64 = 3.0;
/// Query words appear in order with at most two words between any pair
const NEAR_BOOST: f64 = 1.5;
/// Largest gap between consecutive query words that still counts as near
const NEAR_MAX_GAP: usize = 3;
const NO_BOOST: f64 = 1.0;

/// Normalize text for matching.
///
/// Lowercases, turns every character that is neither alphanumeric nor
/// whitespace into a space, collapses whitespace runs and trims.
pub fn normalize(text: &str) -> String {
    let spaced: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    spaced.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Number of whitespace-separated words
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Detect if a query should use phrase matching (2-4 normalized words)
pub fn is_phrase(query: &str) -> bool {
    let count = word_count(&normalize(query));
    (2..=4).contains(&count)
}

/// Boost factor for a candidate text given the query phrase.
///
/// Never below 1.0: a text that does not contain the phrase is left as is.
pub fn phrase_boost(text: &str, phrase: &str) -> f64 {
    let text_normalized = normalize(text);
    let phrase_normalized = normalize(phrase);

    if phrase_normalized.is_empty() {
        return NO_BOOST;
    }

    if text_normalized.contains(&phrase_normalized) {
        let quote_length = word_count(text);
        return if quote_length <= 5 {
            SUBSTRING_BOOST_SHORT
        } else if quote_length <= 10 {
            SUBSTRING_BOOST_MEDIUM
        } else {
            SUBSTRING_BOOST_LONG
        };
    }

    let words: Vec<&str> = phrase_normalized.split(' ').collect();
    if words.len() < 2 {
        return NO_BOOST;
    }

    let text_words: Vec<&str> = text_normalized.split_whitespace().collect();
    let mut positions = Vec::with_capacity(words.len());
    for word in &words {
        match text_words.iter().position(|w| w == word) {
            Some(pos) => positions.push(pos),
            None => return NO_BOOST,
        }
    }

    let in_order = positions.windows(2).all(|pair| pair[0] < pair[1]);
    if !in_order {
        return NO_BOOST;
    }

    let max_gap = positions
        .windows(2)
        .map(|pair| pair[1] - pair[0])
        .max()
        .unwrap_or(0);

    if max_gap == 1 {
        ADJACENT_BOOST
    } else if max_gap <= NEAR_MAX_GAP {
        NEAR_BOOST
    } else {
        NO_BOOST
    }
}

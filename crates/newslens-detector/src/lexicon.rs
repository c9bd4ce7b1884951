//! Loaded-word and emotion lexicons, plus literal text highlighting.
//!
//! Three fixed lexicons of politically loaded words drive both the
//! hand-crafted classifier features and the `**…**` highlighting shown to
//! clients. Four small emotion keyword lists feed the emotion features.

use regex::Regex;

/// Words associated with left-leaning framing.
pub const LEFT_LEANING: &[&str] = &["progressive", "liberal", "socialist", "welfare", "equity"];

/// Words associated with right-leaning framing.
pub const RIGHT_LEANING: &[&str] = &["conservative", "tradition", "freedom", "patriot", "fiscal"];

/// Loaded adjectives that signal bias regardless of direction.
pub const BIASED_ADJECTIVES: &[&str] = &[
    "corrupt",
    "radical",
    "extremist",
    "dictatorial",
    "anti-national",
    "revolutionary",
    "historic",
    "transformative",
    "disastrous",
];

/// Loaded-word categories in feature order.
pub const LOADED_CATEGORIES: &[(&str, &[&str])] = &[
    ("left_leaning", LEFT_LEANING),
    ("right_leaning", RIGHT_LEANING),
    ("biased_adjectives", BIASED_ADJECTIVES),
];

/// Emotion keyword lists in feature order.
pub const EMOTION_KEYWORDS: &[(&str, &[&str])] = &[
    ("anger", &["angry", "furious", "outrage", "rage"]),
    ("fear", &["afraid", "scared", "terrified", "fearful"]),
    ("joy", &["happy", "excited", "celebration", "triumph"]),
    ("sadness", &["sad", "depressed", "grief", "sorrow"]),
];

/// Count whitespace tokens of `text` that appear in `lexicon`.
pub fn count_matches(text: &str, lexicon: &[&str]) -> usize {
    text.split_whitespace()
        .filter(|token| lexicon.contains(token))
        .count()
}

/// Count loaded words from all three lexicons in already-processed text.
pub fn count_all_loaded(text: &str) -> usize {
    LOADED_CATEGORIES
        .iter()
        .map(|(_, words)| count_matches(text, words))
        .sum()
}

/// Scan RAW article text for loaded words and wrap each match in `**…**`.
///
/// Matching is case-insensitive and whole-word: each whitespace token is
/// cleaned of surrounding punctuation before lookup, and highlighting uses a
/// word-boundary regex so that substrings of longer words are left alone.
///
/// Returns the highlighted text and the matched surface forms in order of
/// appearance.
pub fn highlight_biased_words(text: &str) -> (String, Vec<String>) {
    let all_loaded: Vec<&str> = LOADED_CATEGORIES
        .iter()
        .flat_map(|(_, words)| words.iter().copied())
        .collect();

    let mut flagged: Vec<String> = Vec::new();
    let mut seen: Vec<String> = Vec::new();
    for word in text.split_whitespace() {
        // Strip surrounding punctuation but keep the original casing, so the
        // flagged list reports words as they appeared. Deduplicate
        // case-insensitively; the highlight regex is case-insensitive anyway.
        let surface: String = word
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '_')
            .collect();
        let cleaned = surface.to_lowercase();
        if all_loaded.contains(&cleaned.as_str()) && !seen.contains(&cleaned) {
            seen.push(cleaned);
            flagged.push(surface);
        }
    }

    let mut highlighted = text.to_string();
    for word in &flagged {
        let pattern = format!(r"(?i)\b{}\b", regex::escape(word));
        if let Ok(re) = Regex::new(&pattern) {
            highlighted = re
                .replace_all(&highlighted, |caps: &regex::Captures<'_>| {
                    format!("**{}**", &caps[0])
                })
                .into_owned();
        }
    }

    (highlighted, flagged)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

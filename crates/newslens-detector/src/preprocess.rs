//! Text preprocessing for bias analysis.
//!
//! Applies a fixed pipeline to raw article text:
//!
//! 1. Lowercasing
//! 2. Stripping everything except letters, underscores, and whitespace
//!    (punctuation and digits drop here)
//! 3. Word tokenization (with a naive whitespace-split fallback when the
//!    tokenizer regex is unavailable — the one deliberate recovery path)
//! 4. Stopword removal
//! 5. Rule-based lemmatization
//! 6. Rejoining with single spaces
//!
//! The pipeline is total: it never fails, and degenerate input (empty text,
//! symbols only, digits only) degrades to the empty string rather than an
//! error. It is also idempotent on its own output, since stopwords and lemmas
//! are already resolved after one pass.

use regex::Regex;

/// English stopwords removed during preprocessing.
///
/// Trimmed to the high-frequency function words that matter for short news
/// copy; matching is exact against lowercased tokens.
const STOPWORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "can", "could", "did", "do", "does", "doing", "down", "during", "each", "few", "for",
    "from", "further", "had", "has", "have", "having", "he", "her", "here", "hers", "herself",
    "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it", "its", "itself", "just",
    "me", "more", "most", "my", "myself", "no", "nor", "not", "now", "of", "off", "on", "once",
    "only", "or", "other", "our", "ours", "ourselves", "out", "over", "own", "s", "same", "she",
    "should", "so", "some", "such", "t", "than", "that", "the", "their", "theirs", "them",
    "themselves", "then", "there", "these", "they", "this", "those", "through", "to", "too",
    "under", "until", "up", "very", "was", "we", "were", "what", "when", "where", "which",
    "while", "who", "whom", "why", "will", "with", "you", "your", "yours", "yourself",
    "yourselves",
];

/// Irregular noun forms that suffix rules would mangle.
const IRREGULAR_LEMMAS: &[(&str, &str)] = &[
    ("children", "child"),
    ("feet", "foot"),
    ("geese", "goose"),
    ("men", "man"),
    ("mice", "mouse"),
    ("people", "person"),
    ("teeth", "tooth"),
    ("women", "woman"),
];

/// Text preprocessor with a compiled word tokenizer.
///
/// Construction never fails: if the tokenizer regex cannot be compiled the
/// preprocessor falls back to naive whitespace splitting, mirroring the
/// tokenizer-resource fallback of the original pipeline.
pub struct Preprocessor {
    word_re: Option<Regex>,
}

impl Preprocessor {
    /// Create a preprocessor with the default word tokenizer.
    pub fn new() -> Self {
        Self {
            word_re: Regex::new(r"[\p{L}_]+").ok(),
        }
    }

    /// Run the full preprocessing pipeline on `text`.
    ///
    /// # Examples
    ///
    /// ```
    /// use newslens_detector::preprocess::Preprocessor;
    ///
    /// let pre = Preprocessor::new();
    /// assert_eq!(pre.preprocess("The governments passed 3 laws!"), "government passed law");
    /// assert_eq!(pre.preprocess("1234 !!!"), "");
    /// ```
    pub fn preprocess(&self, text: &str) -> String {
        let lowered = text.to_lowercase();

        // Letters from any script survive; the tokenizer regex below accepts
        // the same set, so both tokenizer paths agree on what is a word.
        let stripped: String = lowered
            .chars()
            .filter(|c| c.is_alphabetic() || *c == '_' || c.is_whitespace())
            .collect();

        self.tokenize(&stripped)
            .into_iter()
            .filter(|token| !STOPWORDS.contains(&token.as_str()))
            .map(|token| lemmatize(&token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Split stripped text into word tokens.
    ///
    /// Uses the compiled word regex when available; otherwise splits on
    /// whitespace. Both paths produce lowercase word tokens because the input
    /// has already been lowercased and stripped.
    fn tokenize(&self, text: &str) -> Vec<String> {
        match &self.word_re {
            Some(re) => re.find_iter(text).map(|m| m.as_str().to_string()).collect(),
            None => text.split_whitespace().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a token to its noun lemma.
///
/// Rule-based: an irregular-form table followed by plural suffix rules. Words
/// the rules do not cover pass through unchanged, which keeps the function
/// total and idempotent.
pub fn lemmatize(token: &str) -> String {
    if let Some((_, lemma)) = IRREGULAR_LEMMAS.iter().find(|(form, _)| *form == token) {
        return (*lemma).to_string();
    }

    if let Some(stem) = token.strip_suffix("ies") {
        if stem.len() > 1 {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = token.strip_suffix("sses") {
        return format!("{stem}ss");
    }
    if let Some(stem) = token.strip_suffix('s') {
        // Keep -ss, -us, -is endings intact (glass, virus, crisis).
        if stem.len() > 2 && !stem.ends_with('s') && !stem.ends_with('u') && !stem.ends_with('i') {
            return stem.to_string();
        }
    }

    token.to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_yields_empty_string() {
        let pre = Preprocessor::new();
        assert_eq!(pre.preprocess(""), "");
        assert_eq!(pre.preprocess("   "), "");
    }

    #[test]
    fn test_degenerate_input_yields_empty_string() {
        let pre = Preprocessor::new();
        assert_eq!(pre.preprocess("12345 67890"), "");
        assert_eq!(pre.preprocess("!!! ??? ... ---"), "");
        assert_eq!(pre.preprocess("\u{0}\u{1}\u{2}"), "");
    }

    #[test]
    fn test_lowercases_and_strips_punctuation() {
        let pre = Preprocessor::new();
        assert_eq!(
            pre.preprocess("Corrupt, RADICAL politicians!"),
            "corrupt radical politician"
        );
    }

    #[test]
    fn test_removes_stopwords() {
        let pre = Preprocessor::new();
        assert_eq!(pre.preprocess("the law of the land"), "law land");
    }

    #[test]
    fn test_lemmatizes_plurals() {
        assert_eq!(lemmatize("laws"), "law");
        assert_eq!(lemmatize("policies"), "policy");
        assert_eq!(lemmatize("classes"), "class");
        assert_eq!(lemmatize("women"), "woman");
        // -ss / -us / -is endings survive.
        assert_eq!(lemmatize("glass"), "glass");
        assert_eq!(lemmatize("virus"), "virus");
        assert_eq!(lemmatize("crisis"), "crisis");
    }

    #[test]
    fn test_idempotent_on_own_output() {
        let pre = Preprocessor::new();
        let samples = [
            "The corrupt socialist government introduced another anti-business law.",
            "Recent polls show mixed public reaction to the policy changes.",
            "Patriots must stand against the dictatorial regime's anti-freedom policies.",
        ];
        for sample in samples {
            let once = pre.preprocess(sample);
            let twice = pre.preprocess(&once);
            assert_eq!(once, twice, "re-preprocessing changed: {sample}");
        }
    }

    #[test]
    fn test_whitespace_fallback_matches_regex_path() {
        let fallback = Preprocessor { word_re: None };
        let regular = Preprocessor::new();
        for text in [
            "The government passed new laws today",
            "Café débuts drew naïve crowds in Zürich",
        ] {
            assert_eq!(fallback.preprocess(text), regular.preprocess(text));
        }
    }

    #[test]
    fn test_accented_words_are_kept_whole() {
        let pre = Preprocessor::new();
        assert_eq!(pre.preprocess("Café débuts"), "café début");
    }

    #[test]
    fn test_deterministic() {
        let pre = Preprocessor::new();
        let text = "Progressive champions battle against regressive forces of bigotry.";
        assert_eq!(pre.preprocess(text), pre.preprocess(text));
    }
}

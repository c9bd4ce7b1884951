//! Hand-crafted feature extraction for bias detection.
//!
//! Builds a fixed-size numeric feature vector from preprocessed text. The
//! vector is concatenated after the TF-IDF columns to form the classifier
//! input, so the layout here is part of the model contract: inference must
//! produce exactly the same names in exactly the same order as training.
//!
//! # Feature Vector Layout (11 dimensions)
//!
//! | Index | Feature                        | Type    |
//! |-------|--------------------------------|---------|
//! | 0     | sentiment_compound             | Numeric |
//! | 1     | sentiment_positive             | Numeric |
//! | 2     | sentiment_negative             | Numeric |
//! | 3     | sentiment_neutral              | Numeric |
//! | 4     | emotion_anger                  | Count   |
//! | 5     | emotion_fear                   | Count   |
//! | 6     | emotion_joy                    | Count   |
//! | 7     | emotion_sadness                | Count   |
//! | 8     | loaded_words_left_leaning      | Count   |
//! | 9     | loaded_words_right_leaning     | Count   |
//! | 10    | loaded_words_biased_adjectives | Count   |
//!
//! Counts are raw, with no normalization. Extraction is a total function:
//! empty input yields the all-zero vector.

use crate::lexicon::{count_matches, EMOTION_KEYWORDS, LOADED_CATEGORIES};
use crate::sentiment::SentimentAnalyzer;

/// Number of hand-crafted features.
pub const HANDCRAFTED_FEATURE_DIM: usize = 11;

/// Feature names, in vector order.
pub const HANDCRAFTED_FEATURE_NAMES: [&str; HANDCRAFTED_FEATURE_DIM] = [
    "sentiment_compound",
    "sentiment_positive",
    "sentiment_negative",
    "sentiment_neutral",
    "emotion_anger",
    "emotion_fear",
    "emotion_joy",
    "emotion_sadness",
    "loaded_words_left_leaning",
    "loaded_words_right_leaning",
    "loaded_words_biased_adjectives",
];

/// Extractor for the hand-crafted feature block.
pub struct FeatureExtractor {
    sentiment: SentimentAnalyzer,
}

impl FeatureExtractor {
    pub fn new() -> Self {
        Self {
            sentiment: SentimentAnalyzer::new(),
        }
    }

    /// Extract the 11-dimensional feature vector from preprocessed text.
    pub fn extract(&self, processed_text: &str) -> Vec<f64> {
        let mut features = Vec::with_capacity(HANDCRAFTED_FEATURE_DIM);

        let scores = self.sentiment.polarity_scores(processed_text);
        features.push(scores.compound);
        features.push(scores.positive);
        features.push(scores.negative);
        features.push(scores.neutral);

        for (_, keywords) in EMOTION_KEYWORDS {
            features.push(count_matches(processed_text, keywords) as f64);
        }

        for (_, words) in LOADED_CATEGORIES {
            features.push(count_matches(processed_text, words) as f64);
        }

        features
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_dim_matches_names() {
        assert_eq!(HANDCRAFTED_FEATURE_NAMES.len(), HANDCRAFTED_FEATURE_DIM);
        let extractor = FeatureExtractor::new();
        assert_eq!(extractor.extract("some text").len(), HANDCRAFTED_FEATURE_DIM);
    }

    #[test]
    fn test_empty_input_is_all_zero() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("");
        assert_eq!(features.len(), HANDCRAFTED_FEATURE_DIM);
        assert!(features.iter().all(|&f| f == 0.0));
    }

    #[test]
    fn test_emotion_counts() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("furious outrage met happy celebration");
        assert_eq!(features[4], 2.0); // anger: furious, outrage
        assert_eq!(features[5], 0.0); // fear
        assert_eq!(features[6], 2.0); // joy: happy, celebration
        assert_eq!(features[7], 0.0); // sadness
    }

    #[test]
    fn test_loaded_word_counts() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("corrupt socialist patriot tradition");
        assert_eq!(features[8], 1.0); // left: socialist
        assert_eq!(features[9], 2.0); // right: patriot, tradition
        assert_eq!(features[10], 1.0); // biased adjectives: corrupt
    }

    #[test]
    fn test_counts_are_raw_not_normalized() {
        let extractor = FeatureExtractor::new();
        let features = extractor.extract("corrupt corrupt corrupt");
        assert_eq!(features[10], 3.0);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = FeatureExtractor::new();
        let text = "progressive champion battle regressive force bigotry";
        assert_eq!(extractor.extract(text), extractor.extract(text));
    }
}

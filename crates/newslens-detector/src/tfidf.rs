//! TF-IDF vectorization over the training corpus vocabulary.
//!
//! The vocabulary is fixed at fit time: the top `max_features` terms by
//! document frequency, with alphabetical tie-breaking so that fitting the
//! same corpus always produces the same column order. At inference,
//! `transform` only ever consults the frozen vocabulary — unseen terms get
//! zero weight and never error, which is what keeps the classifier's input
//! dimension stable between training and inference.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// TF-IDF vectorizer with a frozen, capped vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TfidfVectorizer {
    /// Term → column index mapping, fixed at fit time.
    vocabulary: HashMap<String, usize>,
    /// Smoothed inverse document frequency per column.
    idf: Vec<f64>,
    /// Vocabulary size cap.
    max_features: usize,
}

impl TfidfVectorizer {
    /// Create an unfitted vectorizer with the given vocabulary cap.
    pub fn new(max_features: usize) -> Self {
        Self {
            vocabulary: HashMap::new(),
            idf: Vec::new(),
            max_features,
        }
    }

    /// Number of columns produced by [`transform`](Self::transform).
    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    /// Fit the vocabulary and IDF weights on a corpus of processed texts.
    ///
    /// Terms are ranked by document frequency (descending), ties broken
    /// alphabetically, and the top `max_features` kept. IDF is smoothed:
    /// `ln((1 + n) / (1 + df)) + 1`.
    pub fn fit(&mut self, documents: &[String]) {
        let mut doc_freq: HashMap<&str, usize> = HashMap::new();

        for doc in documents {
            let mut seen: Vec<&str> = doc.split_whitespace().filter(|w| w.len() > 1).collect();
            seen.sort_unstable();
            seen.dedup();
            for word in seen {
                *doc_freq.entry(word).or_insert(0) += 1;
            }
        }

        let mut ranked: Vec<(&str, usize)> = doc_freq.into_iter().collect();
        ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

        self.vocabulary = ranked
            .iter()
            .take(self.max_features)
            .enumerate()
            .map(|(idx, (word, _))| ((*word).to_string(), idx))
            .collect();

        let n_docs = documents.len() as f64;
        self.idf = vec![0.0; self.vocabulary.len()];
        for (word, df) in ranked.iter().take(self.max_features) {
            let idx = self.vocabulary[*word];
            self.idf[idx] = ((1.0 + n_docs) / (1.0 + *df as f64)).ln() + 1.0;
        }
    }

    /// Transform a processed text into a TF-IDF vector over the frozen
    /// vocabulary. Unseen terms contribute nothing. The result is
    /// L2-normalized unless it is all-zero.
    pub fn transform(&self, document: &str) -> Vec<f64> {
        let mut tf = vec![0.0; self.vocabulary.len()];

        for word in document.split_whitespace().filter(|w| w.len() > 1) {
            if let Some(&idx) = self.vocabulary.get(word) {
                tf[idx] += 1.0;
            }
        }

        let mut tfidf: Vec<f64> = tf
            .iter()
            .zip(self.idf.iter())
            .map(|(&t, &i)| t * i)
            .collect();

        let norm = tfidf.iter().map(|&x| x * x).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in &mut tfidf {
                *value /= norm;
            }
        }

        tfidf
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<String> {
        vec![
            "government passed new law".to_string(),
            "government rejected new bill".to_string(),
            "court reviewed law".to_string(),
        ]
    }

    #[test]
    fn test_fit_builds_capped_vocabulary() {
        let mut vec = TfidfVectorizer::new(3);
        vec.fit(&corpus());
        assert_eq!(vec.vocabulary_size(), 3);
        // government(2), law(2), new(2) lead on document frequency; the
        // alphabetical tie-break makes the selection deterministic.
        assert!(vec.vocabulary.contains_key("government"));
        assert!(vec.vocabulary.contains_key("law"));
        assert!(vec.vocabulary.contains_key("new"));
    }

    #[test]
    fn test_transform_dimension_is_stable() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&corpus());
        let dim = vec.vocabulary_size();
        for doc in ["government law", "completely unseen words", ""] {
            assert_eq!(vec.transform(doc).len(), dim);
        }
    }

    #[test]
    fn test_unseen_terms_are_ignored() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&corpus());
        let out = vec.transform("zebra quantum blockchain");
        assert!(out.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&corpus());
        let out = vec.transform("government passed new law");
        let norm: f64 = out.iter().map(|&x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let mut a = TfidfVectorizer::new(50);
        let mut b = TfidfVectorizer::new(50);
        a.fit(&corpus());
        b.fit(&corpus());
        assert_eq!(a.transform("government passed new law"), b.transform("government passed new law"));
        assert_eq!(a.vocabulary, b.vocabulary);
    }

    #[test]
    fn test_empty_corpus() {
        let mut vec = TfidfVectorizer::new(10);
        vec.fit(&[]);
        assert_eq!(vec.vocabulary_size(), 0);
        assert!(vec.transform("anything").is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let mut vec = TfidfVectorizer::new(100);
        vec.fit(&corpus());
        let json = serde_json::to_string(&vec).unwrap();
        let restored: TfidfVectorizer = serde_json::from_str(&json).unwrap();
        let doc = "government passed new law";
        assert_eq!(vec.transform(doc), restored.transform(doc));
    }
}

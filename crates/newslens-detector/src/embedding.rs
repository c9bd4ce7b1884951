//! Word embeddings for political-leaning detection.
//!
//! A small skip-gram model with negative sampling, trained on the processed
//! training corpus. All randomness (vector init, negative sampling) comes
//! from a seeded RNG, so training the same corpus with the same seed always
//! yields the same vectors.
//!
//! The embeddings power one heuristic: summing each article token's cosine
//! similarity against the left-leaning and right-leaning lexicons, and
//! labeling the article by whichever side dominates by more than the
//! `LEANING_THRESHOLD` margin.

use crate::lexicon::{LEFT_LEANING, RIGHT_LEANING};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum score gap before an article is called left- or right-leaning.
pub const LEANING_THRESHOLD: f64 = 0.1;

const LEARNING_RATE: f64 = 0.025;
const NEGATIVE_SAMPLES: usize = 5;

/// Embedding hyperparameters.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub dim: usize,
    pub window: usize,
    pub epochs: usize,
    pub seed: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            dim: 100,
            window: 5,
            epochs: 10,
            seed: 42,
        }
    }
}

/// Trained word vectors with a frozen vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordEmbeddings {
    dim: usize,
    vocab: HashMap<String, usize>,
    /// Input vectors, `vocab.len() * dim`, row-major.
    vectors: Vec<f64>,
}

impl WordEmbeddings {
    /// Train skip-gram embeddings on processed documents (each a
    /// space-separated token string). Every token seen at least once enters
    /// the vocabulary.
    pub fn train(documents: &[String], config: &EmbeddingConfig) -> Self {
        let sentences: Vec<Vec<&str>> = documents
            .iter()
            .map(|d| d.split_whitespace().collect())
            .collect();

        let mut vocab: HashMap<String, usize> = HashMap::new();
        let mut words: Vec<&str> = sentences.iter().flatten().copied().collect();
        words.sort_unstable();
        words.dedup();
        for word in words {
            let idx = vocab.len();
            vocab.insert(word.to_string(), idx);
        }

        let n = vocab.len();
        let dim = config.dim;
        let mut rng = StdRng::seed_from_u64(config.seed);

        // word2vec-style init: small uniform input vectors, zero outputs.
        let scale = 0.5 / dim as f64;
        let mut input: Vec<f64> = (0..n * dim).map(|_| rng.gen_range(-scale..scale)).collect();
        let mut output: Vec<f64> = vec![0.0; n * dim];

        if n == 0 {
            return Self {
                dim,
                vocab,
                vectors: input,
            };
        }

        for _ in 0..config.epochs {
            for sentence in &sentences {
                for (pos, center_word) in sentence.iter().enumerate() {
                    let center = vocab[*center_word];
                    let lo = pos.saturating_sub(config.window);
                    let hi = (pos + config.window + 1).min(sentence.len());
                    for ctx_pos in lo..hi {
                        if ctx_pos == pos {
                            continue;
                        }
                        let context = vocab[sentence[ctx_pos]];
                        sgd_pair(&mut input, &mut output, dim, center, context, 1.0);
                        for _ in 0..NEGATIVE_SAMPLES {
                            let negative = rng.gen_range(0..n);
                            if negative != context {
                                sgd_pair(&mut input, &mut output, dim, center, negative, 0.0);
                            }
                        }
                    }
                }
            }
        }

        Self {
            dim,
            vocab,
            vectors: input,
        }
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocab.len()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.vocab.contains_key(word)
    }

    fn vector(&self, word: &str) -> Option<&[f64]> {
        self.vocab
            .get(word)
            .map(|&idx| &self.vectors[idx * self.dim..(idx + 1) * self.dim])
    }

    /// Cosine similarity between two in-vocabulary words.
    pub fn similarity(&self, a: &str, b: &str) -> Option<f64> {
        let va = self.vector(a)?;
        let vb = self.vector(b)?;
        Some(cosine(va, vb))
    }

    /// Label the political leaning of processed text.
    ///
    /// Sums the similarity of each article token against the two leaning
    /// lexicons, counting only word pairs present in the vocabulary. A score
    /// gap below [`LEANING_THRESHOLD`] reads as neutral.
    pub fn political_leaning(&self, processed_text: &str) -> &'static str {
        let mut left_score = 0.0;
        let mut right_score = 0.0;

        for word in processed_text.split_whitespace() {
            if !self.contains(word) {
                continue;
            }
            for left_word in LEFT_LEANING {
                if let Some(sim) = self.similarity(word, left_word) {
                    left_score += sim;
                }
            }
            for right_word in RIGHT_LEANING {
                if let Some(sim) = self.similarity(word, right_word) {
                    right_score += sim;
                }
            }
        }

        if (left_score - right_score).abs() < LEANING_THRESHOLD {
            "neutral"
        } else if left_score > right_score {
            "left-leaning"
        } else {
            "right-leaning"
        }
    }
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let nb: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

/// One negative-sampling SGD update for a (center, target) pair.
/// `label` is 1.0 for a true context word, 0.0 for a negative sample.
fn sgd_pair(input: &mut [f64], output: &mut [f64], dim: usize, center: usize, target: usize, label: f64) {
    let ci = center * dim;
    let ti = target * dim;

    let mut score = 0.0;
    for d in 0..dim {
        score += input[ci + d] * output[ti + d];
    }
    let grad = LEARNING_RATE * (label - 1.0 / (1.0 + (-score).exp()));

    for d in 0..dim {
        let in_val = input[ci + d];
        input[ci + d] += grad * output[ti + d];
        output[ti + d] += grad * in_val;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

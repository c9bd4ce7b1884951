//! Linear classifiers for bias prediction.
//!
//! Two candidate model families compete during training: an L2-regularized
//! logistic regression and a linear SVM with Platt-scaled probabilities. Both
//! train with deterministic full-batch gradient descent from zero-initialized
//! weights, so fitting the same data with the same hyperparameters always
//! produces the same model. Class imbalance is handled with balanced sample
//! weights (`n / (2 * n_class)`).

use serde::{Deserialize, Serialize};

const LEARNING_RATE: f64 = 0.1;
const EPOCHS: usize = 500;
const PLATT_EPOCHS: usize = 200;

/// A trained classifier, either family.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Classifier {
    Logistic(LogisticRegression),
    Svm(LinearSvm),
}

impl Classifier {
    /// Probability that the input belongs to the biased class.
    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        match self {
            Classifier::Logistic(m) => m.predict_proba(features),
            Classifier::Svm(m) => m.predict_proba(features),
        }
    }

    /// Hard label at the 0.5 probability threshold.
    pub fn predict(&self, features: &[f64]) -> u8 {
        if self.predict_proba(features) > 0.5 {
            1
        } else {
            0
        }
    }

    /// Model family name, for logging and bundle metadata.
    pub fn kind(&self) -> &'static str {
        match self {
            Classifier::Logistic(_) => "logistic_regression",
            Classifier::Svm(_) => "linear_svm",
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

fn dot(weights: &[f64], features: &[f64]) -> f64 {
    weights
        .iter()
        .zip(features.iter())
        .map(|(w, x)| w * x)
        .sum()
}

/// Per-sample weights balancing the two classes.
fn balanced_weights(labels: &[u8]) -> Vec<f64> {
    let n = labels.len() as f64;
    let n_pos = labels.iter().filter(|&&l| l == 1).count() as f64;
    let n_neg = n - n_pos;
    labels
        .iter()
        .map(|&l| {
            if l == 1 {
                if n_pos > 0.0 { n / (2.0 * n_pos) } else { 0.0 }
            } else if n_neg > 0.0 {
                n / (2.0 * n_neg)
            } else {
                0.0
            }
        })
        .collect()
}

/// L2-regularized logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegression {
    weights: Vec<f64>,
    bias: f64,
}

impl LogisticRegression {
    /// Fit with inverse regularization strength `c` (larger = weaker
    /// regularization, matching the usual convention).
    pub fn fit(samples: &[Vec<f64>], labels: &[u8], c: f64) -> Self {
        let dim = samples.first().map_or(0, |s| s.len());
        let mut weights = vec![0.0; dim];
        let mut bias = 0.0;
        let n = samples.len().max(1) as f64;
        let sample_weights = balanced_weights(labels);

        for _ in 0..EPOCHS {
            let mut grad_w = vec![0.0; dim];
            let mut grad_b = 0.0;

            for ((x, &y), &sw) in samples.iter().zip(labels).zip(&sample_weights) {
                let p = sigmoid(dot(&weights, x) + bias);
                let err = sw * (p - y as f64);
                for (g, &xi) in grad_w.iter_mut().zip(x) {
                    *g += err * xi;
                }
                grad_b += err;
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= LEARNING_RATE * (g / n + *w / (c * n));
            }
            bias -= LEARNING_RATE * grad_b / n;
        }

        Self { weights, bias }
    }

    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(dot(&self.weights, features) + self.bias)
    }
}

/// Linear SVM trained on the hinge loss, with Platt scaling fitted afterwards
/// so that it exposes the same probability interface as logistic regression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSvm {
    weights: Vec<f64>,
    bias: f64,
    /// Platt sigmoid slope.
    platt_a: f64,
    /// Platt sigmoid intercept.
    platt_b: f64,
}

impl LinearSvm {
    pub fn fit(samples: &[Vec<f64>], labels: &[u8], c: f64) -> Self {
        let dim = samples.first().map_or(0, |s| s.len());
        let mut weights = vec![0.0; dim];
        let mut bias = 0.0;
        let n = samples.len().max(1) as f64;
        let sample_weights = balanced_weights(labels);

        // Labels in {-1, +1} for the hinge loss.
        let signed: Vec<f64> = labels
            .iter()
            .map(|&l| if l == 1 { 1.0 } else { -1.0 })
            .collect();

        for _ in 0..EPOCHS {
            let mut grad_w: Vec<f64> = weights.iter().map(|w| *w / (c * n)).collect();
            let mut grad_b = 0.0;

            for ((x, &y), &sw) in samples.iter().zip(&signed).zip(&sample_weights) {
                let margin = y * (dot(&weights, x) + bias);
                if margin < 1.0 {
                    for (g, &xi) in grad_w.iter_mut().zip(x) {
                        *g -= sw * y * xi / n;
                    }
                    grad_b -= sw * y / n;
                }
            }

            for (w, g) in weights.iter_mut().zip(&grad_w) {
                *w -= LEARNING_RATE * g;
            }
            bias -= LEARNING_RATE * grad_b;
        }

        let (platt_a, platt_b) = fit_platt(&weights, bias, samples, labels);

        Self {
            weights,
            bias,
            platt_a,
            platt_b,
        }
    }

    /// Raw decision margin (distance from the separating hyperplane).
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        dot(&self.weights, features) + self.bias
    }

    pub fn predict_proba(&self, features: &[f64]) -> f64 {
        sigmoid(self.platt_a * self.decision_function(features) + self.platt_b)
    }
}

/// Fit a Platt sigmoid `P(y=1 | m) = sigmoid(a*m + b)` over the training
/// margins. A one-dimensional logistic fit, deterministic like the rest.
fn fit_platt(weights: &[f64], bias: f64, samples: &[Vec<f64>], labels: &[u8]) -> (f64, f64) {
    let margins: Vec<f64> = samples.iter().map(|x| dot(weights, x) + bias).collect();
    let n = margins.len().max(1) as f64;
    let mut a = 1.0;
    let mut b = 0.0;

    for _ in 0..PLATT_EPOCHS {
        let mut grad_a = 0.0;
        let mut grad_b = 0.0;
        for (&m, &y) in margins.iter().zip(labels) {
            let err = sigmoid(a * m + b) - y as f64;
            grad_a += err * m;
            grad_b += err;
        }
        a -= LEARNING_RATE * grad_a / n;
        b -= LEARNING_RATE * grad_b / n;
    }

    (a, b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

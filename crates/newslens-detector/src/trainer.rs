//! Model selection and training for the bias classifier.
//!
//! Runs a cross-validated grid search over two model families (logistic
//! regression and linear SVM) to pick each family's regularization value,
//! refits each family's grid winner on the full training split, and selects
//! between the two by F1 on the held-out test split. All randomness comes
//! from the configured seed, so the whole procedure is reproducible.

use crate::classifier::{Classifier, LinearSvm, LogisticRegression};
use crate::metrics::{compute_metrics, EvaluationMetrics};
use newslens_core::{NewsLensError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::info;

/// Training configuration.
#[derive(Debug, Clone)]
pub struct TrainerConfig {
    /// Fraction of samples held out for the final test evaluation.
    pub test_ratio: f64,
    /// Seed for the stratified split and fold assignment.
    pub seed: u64,
    /// Inverse regularization grid for logistic regression.
    pub logistic_c_grid: Vec<f64>,
    /// Inverse regularization grid for the linear SVM.
    pub svm_c_grid: Vec<f64>,
    /// Upper bound on cross-validation folds; the effective fold count is
    /// capped by the smaller class size.
    pub max_folds: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            test_ratio: 0.2,
            seed: 42,
            logistic_c_grid: vec![0.001, 0.01, 0.1, 1.0, 10.0],
            svm_c_grid: vec![0.1, 1.0, 10.0],
            max_folds: 5,
        }
    }
}

/// Outcome of a training run, for logging and bundle metadata.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// Selected model family name.
    pub selected_model: String,
    /// Winning regularization value.
    pub best_c: f64,
    /// Mean cross-validation F1 from the winning family's grid search.
    pub cv_f1: f64,
    /// Metrics on the held-out test split; selection compares families on
    /// this F1, not the cross-validation one.
    pub test_metrics: EvaluationMetrics,
    pub train_size: usize,
    pub test_size: usize,
}

/// Train a bias classifier on labeled feature vectors.
///
/// `labels` uses 1 for biased and 0 for neutral. Fails if either class is
/// missing, since neither family can fit a single-class problem.
pub fn train_classifier(
    samples: &[Vec<f64>],
    labels: &[u8],
    config: &TrainerConfig,
) -> Result<(Classifier, TrainingReport)> {
    if samples.len() != labels.len() {
        return Err(NewsLensError::Training(format!(
            "sample/label length mismatch: {} vs {}",
            samples.len(),
            labels.len()
        )));
    }
    let n_pos = labels.iter().filter(|&&l| l == 1).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(NewsLensError::Training(format!(
            "training data must contain both classes (biased={n_pos}, neutral={n_neg})"
        )));
    }

    let (train_idx, test_idx) = stratified_split(labels, config.test_ratio, config.seed);
    let train_x: Vec<Vec<f64>> = train_idx.iter().map(|&i| samples[i].clone()).collect();
    let train_y: Vec<u8> = train_idx.iter().map(|&i| labels[i]).collect();
    let test_x: Vec<Vec<f64>> = test_idx.iter().map(|&i| samples[i].clone()).collect();
    let test_y: Vec<u8> = test_idx.iter().map(|&i| labels[i]).collect();

    let min_class = train_y
        .iter()
        .filter(|&&l| l == 1)
        .count()
        .min(train_y.iter().filter(|&&l| l == 0).count());
    let folds = config.max_folds.min(min_class).max(2);

    info!(
        train = train_x.len(),
        test = test_x.len(),
        folds,
        "starting grid search"
    );

    let (lr_c, lr_cv_f1) = grid_search(&train_x, &train_y, &config.logistic_c_grid, folds, config.seed, |x, y, c| {
        Classifier::Logistic(LogisticRegression::fit(x, y, c))
    });
    let lr = Candidate::evaluate(
        Classifier::Logistic(LogisticRegression::fit(&train_x, &train_y, lr_c)),
        lr_c,
        lr_cv_f1,
        &test_x,
        &test_y,
    );
    info!(
        model = "logistic_regression",
        c = lr_c,
        cv_f1 = lr_cv_f1,
        held_out_f1 = lr.test_metrics.f1,
        "candidate evaluated"
    );

    let (svm_c, svm_cv_f1) = grid_search(&train_x, &train_y, &config.svm_c_grid, folds, config.seed, |x, y, c| {
        Classifier::Svm(LinearSvm::fit(x, y, c))
    });
    let svm = Candidate::evaluate(
        Classifier::Svm(LinearSvm::fit(&train_x, &train_y, svm_c)),
        svm_c,
        svm_cv_f1,
        &test_x,
        &test_y,
    );
    info!(
        model = "linear_svm",
        c = svm_c,
        cv_f1 = svm_cv_f1,
        held_out_f1 = svm.test_metrics.f1,
        "candidate evaluated"
    );

    // Each family's grid winner is judged on the held-out split; the SVM
    // must strictly beat logistic regression to be selected.
    let winner = select_candidate(lr, svm);
    info!(
        model = winner.classifier.kind(),
        c = winner.c,
        test_metrics = %winner.test_metrics,
        "training complete"
    );

    let report = TrainingReport {
        selected_model: winner.classifier.kind().to_string(),
        best_c: winner.c,
        cv_f1: winner.cv_f1,
        test_metrics: winner.test_metrics,
        train_size: train_x.len(),
        test_size: test_x.len(),
    };

    Ok((winner.classifier, report))
}

/// One model family's grid winner, refit on the full training split and
/// scored on the held-out test split.
struct Candidate {
    classifier: Classifier,
    c: f64,
    cv_f1: f64,
    test_metrics: EvaluationMetrics,
}

impl Candidate {
    fn evaluate(
        classifier: Classifier,
        c: f64,
        cv_f1: f64,
        test_x: &[Vec<f64>],
        test_y: &[u8],
    ) -> Self {
        let predictions: Vec<u8> = test_x.iter().map(|x| classifier.predict(x)).collect();
        let test_metrics = compute_metrics(&predictions, test_y);
        Self {
            classifier,
            c,
            cv_f1,
            test_metrics,
        }
    }
}

/// Pick the candidate with the strictly higher held-out F1; on a tie the
/// first one wins.
fn select_candidate(first: Candidate, second: Candidate) -> Candidate {
    if second.test_metrics.f1 > first.test_metrics.f1 {
        second
    } else {
        first
    }
}

/// Split indices into train/test, preserving the class ratio. Each class is
/// shuffled with the seed, then the tail goes to the test set (at least one
/// sample per class when the class has more than one member).
pub fn stratified_split(labels: &[u8], test_ratio: f64, seed: u64) -> (Vec<usize>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut train = Vec::new();
    let mut test = Vec::new();

    for class in [0u8, 1u8] {
        let mut idx: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        idx.shuffle(&mut rng);

        let n_test = if idx.len() > 1 {
            (((idx.len() as f64) * test_ratio).round() as usize).clamp(1, idx.len() - 1)
        } else {
            0
        };
        let split_at = idx.len() - n_test;
        train.extend_from_slice(&idx[..split_at]);
        test.extend_from_slice(&idx[split_at..]);
    }

    train.sort_unstable();
    test.sort_unstable();
    (train, test)
}

/// Grid search one model family, returning the best C and its mean CV F1.
fn grid_search<F>(
    samples: &[Vec<f64>],
    labels: &[u8],
    c_grid: &[f64],
    folds: usize,
    seed: u64,
    fit: F,
) -> (f64, f64)
where
    F: Fn(&[Vec<f64>], &[u8], f64) -> Classifier,
{
    let fold_of = assign_folds(labels, folds, seed);
    let mut best_c = c_grid.first().copied().unwrap_or(1.0);
    let mut best_f1 = -1.0;

    for &c in c_grid {
        let mut f1_sum = 0.0;
        for fold in 0..folds {
            let mut fit_x = Vec::new();
            let mut fit_y = Vec::new();
            let mut val_x = Vec::new();
            let mut val_y = Vec::new();
            for (i, sample) in samples.iter().enumerate() {
                if fold_of[i] == fold {
                    val_x.push(sample.clone());
                    val_y.push(labels[i]);
                } else {
                    fit_x.push(sample.clone());
                    fit_y.push(labels[i]);
                }
            }
            if val_x.is_empty() || fit_y.iter().all(|&l| l == fit_y[0]) {
                continue;
            }
            let model = fit(&fit_x, &fit_y, c);
            let preds: Vec<u8> = val_x.iter().map(|x| model.predict(x)).collect();
            f1_sum += compute_metrics(&preds, &val_y).f1;
        }
        let mean_f1 = f1_sum / folds as f64;
        if mean_f1 > best_f1 {
            best_f1 = mean_f1;
            best_c = c;
        }
    }

    (best_c, best_f1)
}

/// Assign each sample to a fold, stratified: within each class the shuffled
/// members are dealt round-robin, so every fold sees both classes whenever
/// the class sizes allow it.
fn assign_folds(labels: &[u8], folds: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut fold_of = vec![0usize; labels.len()];

    for class in [0u8, 1u8] {
        let mut idx: Vec<usize> = labels
            .iter()
            .enumerate()
            .filter(|(_, &l)| l == class)
            .map(|(i, _)| i)
            .collect();
        idx.shuffle(&mut rng);
        for (pos, &i) in idx.iter().enumerate() {
            fold_of[i] = pos % folds;
        }
    }

    fold_of
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

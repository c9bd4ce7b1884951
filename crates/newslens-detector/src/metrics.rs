//! Evaluation metrics for bias classifier training.
//!
//! Computes confusion-matrix-derived metrics from predicted and ground-truth
//! labels. Class 0 = neutral, class 1 = biased; F1 is reported for the biased
//! class, which is what model selection optimizes.

/// Evaluation metrics computed from a confusion matrix.
#[derive(Debug, Clone)]
pub struct EvaluationMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub tp: usize,
    pub fp: usize,
    pub tn: usize,
    pub fn_count: usize,
}

/// Compute evaluation metrics from predicted and ground-truth labels.
pub fn compute_metrics(predictions: &[u8], labels: &[u8]) -> EvaluationMetrics {
    assert_eq!(
        predictions.len(),
        labels.len(),
        "predictions and labels must have same length"
    );

    let mut tp: usize = 0;
    let mut fp: usize = 0;
    let mut tn: usize = 0;
    let mut fn_count: usize = 0;

    for (&pred, &label) in predictions.iter().zip(labels.iter()) {
        match (pred, label) {
            (1, 1) => tp += 1,
            (1, 0) => fp += 1,
            (0, 0) => tn += 1,
            (0, 1) => fn_count += 1,
            _ => {}
        }
    }

    let total = (tp + fp + tn + fn_count) as f64;
    let accuracy = if total > 0.0 {
        (tp + tn) as f64 / total
    } else {
        0.0
    };

    let precision = if tp + fp > 0 {
        tp as f64 / (tp + fp) as f64
    } else {
        0.0
    };

    let recall = if tp + fn_count > 0 {
        tp as f64 / (tp + fn_count) as f64
    } else {
        0.0
    };

    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    EvaluationMetrics {
        accuracy,
        precision,
        recall,
        f1,
        tp,
        fp,
        tn,
        fn_count,
    }
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "f1={:.3} precision={:.3} recall={:.3} accuracy={:.3} [tp={} fp={} tn={} fn={}]",
            self.f1,
            self.precision,
            self.recall,
            self.accuracy,
            self.tp,
            self.fp,
            self.tn,
            self.fn_count,
        )
    }
}

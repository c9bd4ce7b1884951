//! Lexicon-based sentiment scoring.
//!
//! A VADER-style scorer over an embedded valence lexicon. Each token carries
//! a valence in roughly [-4, 4]; a negator within the three preceding tokens
//! flips and dampens the valence. The compound score normalizes the valence
//! sum into [-1, 1]; positive/negative/neutral are proportion shares.
//!
//! The scorer is a total function: it always returns scores, and empty input
//! yields the all-zero default.

/// Four-part sentiment score for a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentimentScores {
    /// Normalized overall valence in [-1, 1].
    pub compound: f64,
    /// Share of positive token weight.
    pub positive: f64,
    /// Share of negative token weight.
    pub negative: f64,
    /// Share of neutral tokens.
    pub neutral: f64,
}

impl SentimentScores {
    /// All-zero default returned for empty input.
    pub fn zero() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            negative: 0.0,
            neutral: 0.0,
        }
    }
}

/// Valence lexicon. Values follow the VADER convention of roughly [-4, 4].
const VALENCE: &[(&str, f64)] = &[
    // Positive
    ("achieve", 1.7),
    ("amazing", 2.8),
    ("balanced", 1.3),
    ("benefit", 1.9),
    ("best", 3.2),
    ("celebrate", 2.4),
    ("celebration", 2.4),
    ("champion", 2.1),
    ("excellent", 2.7),
    ("excited", 2.0),
    ("fair", 1.6),
    ("freedom", 2.3),
    ("good", 1.9),
    ("great", 3.1),
    ("happy", 2.7),
    ("hope", 1.9),
    ("improve", 1.7),
    ("love", 3.2),
    ("positive", 2.3),
    ("progress", 1.8),
    ("prosperity", 2.2),
    ("protect", 1.4),
    ("succeed", 2.1),
    ("success", 2.7),
    ("support", 1.7),
    ("triumph", 2.6),
    ("win", 2.8),
    ("wonderful", 2.7),
    // Negative
    ("afraid", -2.2),
    ("angry", -2.3),
    ("attack", -2.1),
    ("awful", -2.0),
    ("bad", -2.5),
    ("battle", -1.6),
    ("bigotry", -2.8),
    ("corrupt", -2.9),
    ("crisis", -2.3),
    ("damage", -1.9),
    ("depressed", -2.4),
    ("destroy", -2.8),
    ("destructive", -2.4),
    ("dictatorial", -2.6),
    ("disastrous", -2.9),
    ("draconian", -2.3),
    ("evil", -3.4),
    ("extremist", -2.7),
    ("fail", -2.3),
    ("fear", -2.2),
    ("fearful", -2.2),
    ("furious", -2.7),
    ("grief", -2.6),
    ("hate", -3.2),
    ("hatred", -3.2),
    ("horrible", -2.5),
    ("oppressive", -2.5),
    ("outrage", -2.5),
    ("rage", -2.8),
    ("regressive", -1.8),
    ("sad", -2.1),
    ("scared", -2.2),
    ("sorrow", -2.4),
    ("terrible", -2.4),
    ("terrified", -2.7),
    ("threat", -2.1),
    ("war", -2.9),
    ("worst", -3.1),
    ("wrong", -2.1),
];

/// Negation markers that flip valence of nearby tokens.
const NEGATORS: &[&str] = &[
    "not", "no", "never", "neither", "nobody", "none", "nothing", "nowhere", "hardly", "barely",
    "scarcely", "without", "cant", "cannot", "dont", "wont", "isnt", "wasnt", "arent", "werent",
];

/// Dampening factor applied when a valence is negated (VADER's constant).
const NEGATION_SCALAR: f64 = -0.74;

/// Compound normalization constant (VADER's alpha).
const NORMALIZATION_ALPHA: f64 = 15.0;

/// Lexicon-based sentiment analyzer.
///
/// # Examples
///
/// ```
/// use newslens_detector::sentiment::SentimentAnalyzer;
///
/// let sia = SentimentAnalyzer::new();
/// assert!(sia.polarity_scores("a great and wonderful success").compound > 0.05);
/// assert!(sia.polarity_scores("a corrupt and disastrous failure").compound < -0.05);
/// assert_eq!(sia.polarity_scores("").compound, 0.0);
/// ```
pub struct SentimentAnalyzer;

impl SentimentAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// Score `text`, returning compound/positive/negative/neutral.
    pub fn polarity_scores(&self, text: &str) -> SentimentScores {
        let tokens: Vec<String> = text
            .split_whitespace()
            .map(|w| {
                w.to_lowercase()
                    .chars()
                    .filter(|c| c.is_alphanumeric())
                    .collect()
            })
            .filter(|w: &String| !w.is_empty())
            .collect();

        if tokens.is_empty() {
            return SentimentScores::zero();
        }

        let mut valence_sum = 0.0;
        let mut pos_sum = 0.0;
        let mut neg_sum = 0.0;
        let mut neutral_count = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&(_, mut valence)) = VALENCE.iter().find(|(w, _)| w == token) else {
                neutral_count += 1;
                continue;
            };

            let window_start = i.saturating_sub(3);
            if tokens[window_start..i]
                .iter()
                .any(|t| NEGATORS.contains(&t.as_str()))
            {
                valence *= NEGATION_SCALAR;
            }

            valence_sum += valence;
            if valence > 0.0 {
                pos_sum += valence;
            } else {
                neg_sum += valence.abs();
            }
        }

        let compound = valence_sum / (valence_sum * valence_sum + NORMALIZATION_ALPHA).sqrt();

        let total = pos_sum + neg_sum + neutral_count as f64;
        if total == 0.0 {
            return SentimentScores::zero();
        }

        SentimentScores {
            compound,
            positive: pos_sum / total,
            negative: neg_sum / total,
            neutral: neutral_count as f64 / total,
        }
    }
}

impl Default for SentimentAnalyzer {
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
    fn test_empty_text_is_all_zero() {
        let sia = SentimentAnalyzer::new();
        assert_eq!(sia.polarity_scores(""), SentimentScores::zero());
        assert_eq!(sia.polarity_scores("   "), SentimentScores::zero());
    }

    #[test]
    fn test_positive_text() {
        let sia = SentimentAnalyzer::new();
        let scores = sia.polarity_scores("a great success and a wonderful triumph");
        assert!(scores.compound > 0.05);
        assert!(scores.positive > scores.negative);
    }

    #[test]
    fn test_negative_text() {
        let sia = SentimentAnalyzer::new();
        let scores = sia.polarity_scores("the corrupt regime caused a disastrous crisis");
        assert!(scores.compound < -0.05);
        assert!(scores.negative > scores.positive);
    }

    #[test]
    fn test_neutral_text() {
        let sia = SentimentAnalyzer::new();
        let scores = sia.polarity_scores("the committee met on tuesday to review the schedule");
        assert!(scores.compound.abs() <= 0.05);
        assert!(scores.neutral > 0.9);
    }

    #[test]
    fn test_negation_flips_valence() {
        let sia = SentimentAnalyzer::new();
        let plain = sia.polarity_scores("the plan was good");
        let negated = sia.polarity_scores("the plan was not good");
        assert!(plain.compound > 0.0);
        assert!(negated.compound < plain.compound);
        assert!(negated.compound < 0.0);
    }

    #[test]
    fn test_compound_bounded() {
        let sia = SentimentAnalyzer::new();
        let many = "great ".repeat(100);
        let scores = sia.polarity_scores(&many);
        assert!(scores.compound > 0.9 && scores.compound <= 1.0);
    }

    #[test]
    fn test_shares_sum_to_one() {
        let sia = SentimentAnalyzer::new();
        let scores = sia.polarity_scores("a great law with disastrous side effects maybe");
        let sum = scores.positive + scores.negative + scores.neutral;
        assert!((sum - 1.0).abs() < 1e-9);
    }
}

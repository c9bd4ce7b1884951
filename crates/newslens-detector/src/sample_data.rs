//! Bundled training dataset.
//!
//! A small labeled corpus used when no external dataset is configured: six
//! biased articles (three framed from each political direction) and nine
//! neutral ones. Intentionally tiny, enough to bootstrap a working model on
//! first start.

/// A labeled training article.
#[derive(Debug, Clone, Copy)]
pub struct LabeledArticle {
    pub content: &'static str,
    /// 1 for biased, 0 for neutral.
    pub bias: u8,
}

/// The bundled training corpus.
pub const SAMPLE_ARTICLES: &[LabeledArticle] = &[
    // Biased, framed from the right
    LabeledArticle {
        content: "The corrupt socialist government introduced another anti-business law that will destroy our economy.",
        bias: 1,
    },
    LabeledArticle {
        content: "Radical leftist politicians continue pushing their extremist agenda against hard-working citizens.",
        bias: 1,
    },
    LabeledArticle {
        content: "Patriots must stand against the dictatorial regime's anti-freedom policies.",
        bias: 1,
    },
    // Biased, framed from the left
    LabeledArticle {
        content: "The oppressive conservative regime imposed draconian measures against vulnerable communities.",
        bias: 1,
    },
    LabeledArticle {
        content: "Corporate-backed politicians ram through another destructive anti-environment bill.",
        bias: 1,
    },
    LabeledArticle {
        content: "Progressive champions battle against regressive forces of bigotry and hatred.",
        bias: 1,
    },
    // Neutral
    LabeledArticle {
        content: "The new legislation contains provisions for both tax increases and spending cuts.",
        bias: 0,
    },
    LabeledArticle {
        content: "Economic experts disagree on the potential impact of the proposed regulations.",
        bias: 0,
    },
    LabeledArticle {
        content: "Recent polls show mixed public reaction to the policy changes.",
        bias: 0,
    },
    LabeledArticle {
        content: "The bill passed with support from members of both major parties.",
        bias: 0,
    },
    LabeledArticle {
        content: "Analysis suggests the law may have both positive and negative effects.",
        bias: 0,
    },
    LabeledArticle {
        content: "Independent observers note varying outcomes in different regions.",
        bias: 0,
    },
    LabeledArticle {
        content: "Research indicates complex relationship between policy and economic growth.",
        bias: 0,
    },
    LabeledArticle {
        content: "Studies show multiple factors influence the program's effectiveness.",
        bias: 0,
    },
    LabeledArticle {
        content: "Experts recommend careful evaluation of the policy's long-term impacts.",
        bias: 0,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_has_both_classes() {
        let biased = SAMPLE_ARTICLES.iter().filter(|a| a.bias == 1).count();
        let neutral = SAMPLE_ARTICLES.iter().filter(|a| a.bias == 0).count();
        assert_eq!(biased, 6);
        assert_eq!(neutral, 9);
    }

    #[test]
    fn test_no_empty_articles() {
        assert!(SAMPLE_ARTICLES.iter().all(|a| !a.content.trim().is_empty()));
    }
}

//! The end-to-end bias detection pipeline.
//!
//! [`BiasDetector`] owns every trained artifact (classifier, TF-IDF
//! vectorizer, word embeddings) plus the stateless text machinery, and
//! exposes the two operations the HTTP layer serves: full article analysis
//! and quick-scan story fetching.
//!
//! External collaborators (news search, neutral rewriting) enter as optional
//! trait objects. Their failures degrade the affected field rather than the
//! whole response: a dead rewrite provider yields `neutral_alternative: null`
//! and a dead news provider yields empty comparison lists, with the error
//! logged.

use crate::classifier::Classifier;
use crate::embedding::{EmbeddingConfig, WordEmbeddings};
use crate::features::FeatureExtractor;
use crate::lexicon::{count_all_loaded, highlight_biased_words};
use crate::persistence::{load_bundle, save_bundle, ModelBundle, BUNDLE_SCHEMA_VERSION};
use crate::preprocess::Preprocessor;
use crate::sample_data::SAMPLE_ARTICLES;
use crate::sentiment::SentimentAnalyzer;
use crate::tfidf::TfidfVectorizer;
use crate::trainer::{train_classifier, TrainerConfig, TrainingReport};
use newslens_core::{
    AnalysisBreakdown, AnalysisResult, ComparisonArticle, FetchedArticle, ModelConfig,
    NewsLensError, NewsProvider, NewsQuery, Result, RewriteProvider, StoryMetrics, StorySummary,
};
use std::path::Path;
use tracing::{error, info, warn};

/// Comparison articles requested per analysis.
const SIMILAR_ARTICLE_COUNT: usize = 5;

/// Sentiment spread above which comparison coverage reads as one-sided.
const ONE_SIDED_STD_THRESHOLD: f64 = 0.5;

/// Trained bias detector.
pub struct BiasDetector {
    preprocessor: Preprocessor,
    features: FeatureExtractor,
    sentiment: SentimentAnalyzer,
    classifier: Classifier,
    vectorizer: TfidfVectorizer,
    embeddings: WordEmbeddings,
}

impl BiasDetector {
    /// Train a detector on labeled articles (`labels`: 1 biased, 0 neutral).
    pub fn train(
        texts: &[String],
        labels: &[u8],
        config: &ModelConfig,
    ) -> Result<(Self, TrainingReport)> {
        let preprocessor = Preprocessor::new();
        let features = FeatureExtractor::new();

        let processed: Vec<String> = texts.iter().map(|t| preprocessor.preprocess(t)).collect();

        let mut vectorizer = TfidfVectorizer::new(config.max_tfidf_features);
        vectorizer.fit(&processed);

        let embeddings = WordEmbeddings::train(
            &processed,
            &EmbeddingConfig {
                dim: config.embedding_dim,
                window: config.embedding_window,
                epochs: config.embedding_epochs,
                seed: config.seed,
            },
        );

        // Classifier input: TF-IDF columns first, then the hand-crafted
        // block. Inference must assemble vectors in the same order.
        let samples: Vec<Vec<f64>> = processed
            .iter()
            .map(|p| {
                let mut x = vectorizer.transform(p);
                x.extend(features.extract(p));
                x
            })
            .collect();

        let trainer_config = TrainerConfig {
            test_ratio: config.test_ratio,
            seed: config.seed,
            ..TrainerConfig::default()
        };
        let (classifier, report) = train_classifier(&samples, labels, &trainer_config)?;

        info!(
            model = %report.selected_model,
            vocabulary = vectorizer.vocabulary_size(),
            embeddings = embeddings.vocabulary_size(),
            "detector trained"
        );

        Ok((
            Self {
                preprocessor,
                features,
                sentiment: SentimentAnalyzer::new(),
                classifier,
                vectorizer,
                embeddings,
            },
            report,
        ))
    }

    /// Train on the bundled sample corpus.
    pub fn train_on_samples(config: &ModelConfig) -> Result<(Self, TrainingReport)> {
        let texts: Vec<String> = SAMPLE_ARTICLES
            .iter()
            .map(|a| a.content.to_string())
            .collect();
        let labels: Vec<u8> = SAMPLE_ARTICLES.iter().map(|a| a.bias).collect();
        Self::train(&texts, &labels, config)
    }

    /// Load the detector from a saved bundle, or train a fresh one on the
    /// sample corpus and save it. An unreadable bundle is logged and falls
    /// back to retraining; a failed save is logged but leaves the in-memory
    /// detector usable.
    pub fn train_or_load(config: &ModelConfig) -> Result<Self> {
        let path = Path::new(&config.bundle_path);

        if path.exists() {
            match load_bundle(path) {
                Ok(bundle) => {
                    info!(path = %path.display(), model = %bundle.model_kind, "loaded model bundle");
                    return Ok(Self::from_bundle(bundle));
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "bundle load failed, retraining");
                }
            }
        }

        let (detector, _report) = Self::train_on_samples(config)?;
        if let Err(e) = save_bundle(path, &detector.to_bundle()) {
            warn!(path = %path.display(), error = %e, "failed to save model bundle");
        }
        Ok(detector)
    }

    /// Rebuild a detector from its persisted artifacts.
    pub fn from_bundle(bundle: ModelBundle) -> Self {
        Self {
            preprocessor: Preprocessor::new(),
            features: FeatureExtractor::new(),
            sentiment: SentimentAnalyzer::new(),
            classifier: bundle.classifier,
            vectorizer: bundle.vectorizer,
            embeddings: bundle.embeddings,
        }
    }

    /// Snapshot the trained artifacts for persistence.
    pub fn to_bundle(&self) -> ModelBundle {
        ModelBundle {
            schema_version: BUNDLE_SCHEMA_VERSION,
            model_kind: self.classifier.kind().to_string(),
            classifier: self.classifier.clone(),
            vectorizer: self.vectorizer.clone(),
            embeddings: self.embeddings.clone(),
        }
    }

    /// Probability that `article_text` is biased.
    pub fn score(&self, article_text: &str) -> f64 {
        let processed = self.preprocessor.preprocess(article_text);
        self.classifier.predict_proba(&self.feature_vector(&processed))
    }

    fn feature_vector(&self, processed: &str) -> Vec<f64> {
        let mut x = self.vectorizer.transform(processed);
        x.extend(self.features.extract(processed));
        x
    }

    /// Run the full analysis over one article.
    ///
    /// Provider failures never fail the analysis; the affected fields
    /// degrade (empty comparison list, balanced source verdict, missing
    /// neutral rewrite) and the error is logged.
    pub async fn analyze(
        &self,
        article_text: &str,
        news: Option<&dyn NewsProvider>,
        rewrite: Option<&dyn RewriteProvider>,
    ) -> AnalysisResult {
        let processed = self.preprocessor.preprocess(article_text);
        let handcrafted = self.features.extract(&processed);

        let mut x = self.vectorizer.transform(&processed);
        x.extend(handcrafted.iter().copied());

        let bias_prob = self.classifier.predict_proba(&x);
        let is_biased = bias_prob > 0.5;

        let (highlighted_text, biased_words) = highlight_biased_words(article_text);
        let sentiment = self.sentiment.polarity_scores(article_text);
        let political_affiliation = self.embeddings.political_leaning(&processed);

        let similar_articles = match news {
            Some(provider) => self.find_similar_articles(&processed, provider).await,
            None => Vec::new(),
        };

        let source_comparison = if source_sentiment_spread(&similar_articles, &self.sentiment)
            > ONE_SIDED_STD_THRESHOLD
        {
            "One-sided"
        } else {
            "Balanced"
        };

        let neutral_alternative = match rewrite {
            Some(provider) => match provider.neutral_rewrite(article_text).await {
                Ok(text) => Some(text),
                Err(e) => {
                    log_degraded("neutral rewrite", provider.name(), &e);
                    None
                }
            },
            None => None,
        };

        // Indices 4..8 of the hand-crafted block are the emotion counts.
        let emotion_total: f64 = handcrafted[4..8].iter().sum();

        AnalysisResult {
            is_biased,
            bias_confidence: format!("{:.1}%", bias_prob * 100.0),
            highlighted_text,
            biased_words: biased_words.clone(),
            neutral_alternative,
            breakdown: AnalysisBreakdown {
                sentiment: sentiment_label(sentiment.compound).to_string(),
                emotion: if emotion_total > 2.0 { "Strong" } else { "Neutral" }.to_string(),
                keyword_bias: if biased_words.is_empty() { "Neutral" } else { "Biased" }.to_string(),
                source_comparison: source_comparison.to_string(),
                political_affiliation: political_affiliation.to_string(),
            },
            similar_articles,
        }
    }

    async fn find_similar_articles(
        &self,
        processed: &str,
        provider: &dyn NewsProvider,
    ) -> Vec<ComparisonArticle> {
        let keywords = comparison_keywords(processed);
        if keywords.is_empty() {
            return Vec::new();
        }

        match provider.similar_articles(&keywords, SIMILAR_ARTICLE_COUNT).await {
            Ok(articles) => articles.into_iter().map(comparison_article).collect(),
            Err(e) => {
                log_degraded("similar-article search", provider.name(), &e);
                Vec::new()
            }
        }
    }

    /// Fetch and quick-scan news stories.
    ///
    /// A missing or failing provider degrades to an empty list, matching the
    /// analysis-side policy of never failing on collaborator errors.
    pub async fn fetch_stories(
        &self,
        query: &NewsQuery,
        news: Option<&dyn NewsProvider>,
    ) -> Vec<StorySummary> {
        let Some(provider) = news else {
            warn!("no news provider configured, returning no stories");
            return Vec::new();
        };

        let articles = match provider.top_headlines(query).await {
            Ok(articles) => articles,
            Err(e) => {
                log_degraded("story fetch", provider.name(), &e);
                return Vec::new();
            }
        };

        articles
            .into_iter()
            .filter(|a| !a.content.is_empty())
            .enumerate()
            .map(|(idx, article)| self.summarize_story(idx, article))
            .collect()
    }

    fn summarize_story(&self, idx: usize, article: FetchedArticle) -> StorySummary {
        let processed = self
            .preprocessor
            .preprocess(&format!("{} {}", article.description, article.title));

        // Loaded-word density, scaled to 0-100.
        let bias = (count_all_loaded(&processed) as u32 * 10).min(100);
        // Reputation proxy: start from 60 and discount by bias.
        let accuracy = 60 + (40 - (bias / 2).min(40));
        // The article itself plus quoted material, capped.
        let sources = 1 + count_quotes(&article.content).min(20) as u32;

        StorySummary {
            id: (idx + 1).to_string(),
            title: article.title,
            description: article.description,
            url: article.url,
            url_to_image: article.url_to_image,
            published_at: article
                .published_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            source: article.source,
            story_type: if accuracy > 80 { "important" } else { "viral" }.to_string(),
            metrics: StoryMetrics {
                accuracy,
                bias,
                sources,
            },
        }
    }
}

/// First five processed tokens longer than four characters, joined with
/// `" OR "` for the news provider's query syntax.
fn comparison_keywords(processed: &str) -> String {
    processed
        .split_whitespace()
        .filter(|t| t.len() > 4)
        .take(5)
        .collect::<Vec<_>>()
        .join(" OR ")
}

fn comparison_article(article: FetchedArticle) -> ComparisonArticle {
    ComparisonArticle {
        source: article.source,
        title: article.title,
        content: article.content,
        url: article.url,
    }
}

/// Population standard deviation of the comparison articles' compound
/// sentiments. Zero when there are no articles.
fn source_sentiment_spread(articles: &[ComparisonArticle], sentiment: &SentimentAnalyzer) -> f64 {
    if articles.is_empty() {
        return 0.0;
    }
    let compounds: Vec<f64> = articles
        .iter()
        .map(|a| sentiment.polarity_scores(&a.content).compound)
        .collect();
    let mean = compounds.iter().sum::<f64>() / compounds.len() as f64;
    let variance =
        compounds.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / compounds.len() as f64;
    variance.sqrt()
}

/// Count complete `"…"` quote pairs.
fn count_quotes(text: &str) -> usize {
    text.matches('"').count() / 2
}

/// The affected field degrades either way; expected provider outages log at
/// `warn`, anything else at `error`.
fn log_degraded(operation: &str, provider: &str, err: &NewsLensError) {
    if err.is_recoverable() {
        warn!(provider, error = %err, "{operation} failed, degrading");
    } else {
        error!(provider, error = %err, "{operation} returned a non-provider error, degrading");
    }
}

fn sentiment_label(compound: f64) -> &'static str {
    if compound < -0.05 {
        "Negative"
    } else if compound > 0.05 {
        "Positive"
    } else {
        "Neutral"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Core types, traits, and errors for NewsLens
//!
//! This crate contains the foundational types shared across all NewsLens
//! components: the analysis result wire types, the error model, configuration
//! structures, and the provider traits behind which the external news and
//! language-model collaborators live.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Stable error codes exposed on the wire.
///
/// Clients may branch on these; the free-form detail of the underlying error
/// is only ever written to the logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request body was malformed or missing required fields.
    InvalidRequest,
    /// The classifier bundle has not been trained or loaded yet.
    ModelNotReady,
    /// The neutral-rewrite provider could not be reached.
    RewriteUnavailable,
    /// The news provider could not be reached.
    NewsUnavailable,
    /// Any other internal failure.
    Internal,
}

impl ErrorCode {
    /// Stable, client-safe description for this code.
    pub fn detail(self) -> &'static str {
        match self {
            Self::InvalidRequest => "request body is invalid",
            Self::ModelNotReady => "bias model is not trained or loaded",
            Self::RewriteUnavailable => "neutral rewrite provider unavailable",
            Self::NewsUnavailable => "news provider unavailable",
            Self::Internal => "internal error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRequest => write!(f, "invalid_request"),
            Self::ModelNotReady => write!(f, "model_not_ready"),
            Self::RewriteUnavailable => write!(f, "rewrite_unavailable"),
            Self::NewsUnavailable => write!(f, "news_unavailable"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

/// Core error types.
#[derive(thiserror::Error, Debug)]
pub enum NewsLensError {
    /// `analyze` was called before a model bundle existed.
    #[error("model not ready: train or load a bundle first")]
    ModelNotReady,

    /// Training aborted (e.g. degenerate data, no candidate fit).
    #[error("training error: {0}")]
    Training(String),

    /// Bundle save/load failure.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// News provider failure (recoverable: callers degrade to empty results).
    #[error("news provider error: {0}")]
    NewsProvider(String),

    /// Rewrite provider failure (recoverable: callers degrade to no rewrite).
    #[error("rewrite provider error: {0}")]
    RewriteProvider(String),

    /// Serialization / deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl NewsLensError {
    /// Map this error to its stable wire-level code.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::ModelNotReady => ErrorCode::ModelNotReady,
            Self::RewriteProvider(_) => ErrorCode::RewriteUnavailable,
            Self::NewsProvider(_) => ErrorCode::NewsUnavailable,
            Self::Training(_) | Self::Persistence(_) | Self::Serialization(_) | Self::Config(_) => {
                ErrorCode::Internal
            }
        }
    }

    /// Whether callers should degrade gracefully instead of failing the
    /// request. Provider outages are recoverable; everything else is not.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NewsProvider(_) | Self::RewriteProvider(_))
    }
}

/// Convenience alias for `std::result::Result<T, NewsLensError>`.
pub type Result<T> = std::result::Result<T, NewsLensError>;

// ---------------------------------------------------------------------------
// Analysis wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /analyze`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Raw article text to analyze.
    pub text: String,
}

/// Categorical judgments included with every analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisBreakdown {
    /// "Negative", "Positive", or "Neutral" (compound sentiment at ±0.05).
    pub sentiment: String,
    /// "Strong" if summed emotion-keyword counts exceed 2, else "Neutral".
    pub emotion: String,
    /// "Biased" if any loaded word was flagged, else "Neutral".
    pub keyword_bias: String,
    /// "One-sided" or "Balanced" from the comparison-article sentiment spread.
    pub source_comparison: String,
    /// "left-leaning", "right-leaning", or "neutral".
    pub political_affiliation: String,
}

/// A comparison article fetched from the news provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonArticle {
    /// Publishing source name.
    pub source: String,
    /// Article title.
    pub title: String,
    /// Article body or content snippet.
    pub content: String,
    /// Link to the article.
    pub url: String,
}

/// Full result of analyzing one article. Transient, returned per request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Binary classification: `true` when `P(biased) > 0.5`.
    pub is_biased: bool,
    /// `P(biased)` formatted as a percentage string, e.g. `"87.3%"`.
    pub bias_confidence: String,
    /// Raw text with loaded words wrapped in `**…**` markers.
    pub highlighted_text: String,
    /// Surface forms of the flagged loaded words, in order of appearance.
    pub biased_words: Vec<String>,
    /// Neutral rewrite from the language-model provider. `None` when the
    /// provider was unreachable; the rest of the analysis is still valid.
    pub neutral_alternative: Option<String>,
    /// Categorical judgments.
    pub breakdown: AnalysisBreakdown,
    /// Articles on the same topic from other sources.
    pub similar_articles: Vec<ComparisonArticle>,
}

// ---------------------------------------------------------------------------
// Story wire types
// ---------------------------------------------------------------------------

/// Request body for `POST /stories`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoriesRequest {
    /// News category (business, health, science, sports, technology, …).
    #[serde(default)]
    pub category: Option<String>,
    /// Free-text search query.
    #[serde(default)]
    pub query: Option<String>,
    /// Number of stories to fetch.
    #[serde(default = "default_story_count")]
    pub count: usize,
}

fn default_story_count() -> usize {
    10
}

/// Quick-scan metrics attached to each story summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoryMetrics {
    /// Estimated accuracy, 0–100.
    pub accuracy: u32,
    /// Loaded-word bias score, 0–100.
    pub bias: u32,
    /// Estimated number of sources (article itself plus quoted material).
    pub sources: u32,
}

/// A summarized, lightly-analyzed news story.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorySummary {
    /// Position-based identifier within the response.
    pub id: String,
    /// Story title.
    pub title: String,
    /// Story description.
    pub description: String,
    /// Link to the story.
    pub url: String,
    /// Link to the story image, if any.
    #[serde(rename = "urlToImage")]
    pub url_to_image: String,
    /// Publication timestamp (RFC 3339), empty when unknown.
    #[serde(rename = "publishedAt")]
    pub published_at: String,
    /// Publishing source name.
    pub source: String,
    /// `"important"` when estimated accuracy exceeds 80, else `"viral"`.
    #[serde(rename = "type")]
    pub story_type: String,
    /// Quick-scan metrics.
    pub metrics: StoryMetrics,
}

// ---------------------------------------------------------------------------
// Provider traits
// ---------------------------------------------------------------------------

/// Query passed to [`NewsProvider::top_headlines`].
#[derive(Debug, Clone, Default)]
pub struct NewsQuery {
    /// Optional category filter.
    pub category: Option<String>,
    /// Optional free-text query.
    pub query: Option<String>,
    /// Maximum number of articles to return.
    pub count: usize,
}

/// Raw article metadata as returned by a news provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchedArticle {
    /// Publishing source name.
    pub source: String,
    /// Article title.
    pub title: String,
    /// Article description.
    pub description: String,
    /// Article body or content snippet.
    pub content: String,
    /// Link to the article.
    pub url: String,
    /// Link to the article image, if any.
    pub url_to_image: String,
    /// Publication time, if the provider reported one.
    pub published_at: Option<DateTime<Utc>>,
}

/// Capability interface for the external news-search collaborator.
///
/// The inference pipeline depends on this trait rather than on a concrete
/// HTTP client so that tests can substitute in-memory fakes and so that
/// timeout/retry policy lives at the implementation, not in the pipeline.
#[async_trait::async_trait]
pub trait NewsProvider: Send + Sync {
    /// Fetch top headlines or search results for a stories request.
    async fn top_headlines(&self, query: &NewsQuery) -> Result<Vec<FetchedArticle>>;

    /// Fetch articles matching a keyword expression, for source comparison.
    async fn similar_articles(&self, keywords: &str, count: usize) -> Result<Vec<FetchedArticle>>;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}

/// Capability interface for the external language-model collaborator that
/// produces neutral rewrites.
#[async_trait::async_trait]
pub trait RewriteProvider: Send + Sync {
    /// Request a neutral rewrite of `article_text`, with an explanation of
    /// which phrases were biased.
    async fn neutral_rewrite(&self, article_text: &str) -> Result<String>;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Model and training configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Maximum TF-IDF vocabulary size.
    #[serde(default = "default_max_tfidf_features")]
    pub max_tfidf_features: usize,
    /// Word-embedding vector dimension.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,
    /// Skip-gram context window size.
    #[serde(default = "default_embedding_window")]
    pub embedding_window: usize,
    /// Skip-gram training epochs.
    #[serde(default = "default_embedding_epochs")]
    pub embedding_epochs: usize,
    /// Held-out test fraction for training.
    #[serde(default = "default_test_ratio")]
    pub test_ratio: f64,
    /// Seed for all stochastic steps (splits, embedding init).
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Path of the serialized model bundle.
    #[serde(default = "default_bundle_path")]
    pub bundle_path: String,
}

fn default_max_tfidf_features() -> usize {
    5000
}

fn default_embedding_dim() -> usize {
    100
}

fn default_embedding_window() -> usize {
    5
}

fn default_embedding_epochs() -> usize {
    10
}

fn default_test_ratio() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    42
}

fn default_bundle_path() -> String {
    "news_bias_detector.json".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            max_tfidf_features: default_max_tfidf_features(),
            embedding_dim: default_embedding_dim(),
            embedding_window: default_embedding_window(),
            embedding_epochs: default_embedding_epochs(),
            test_ratio: default_test_ratio(),
            seed: default_seed(),
            bundle_path: default_bundle_path(),
        }
    }
}

/// External provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the NewsAPI-compatible news provider.
    #[serde(default = "default_news_api_url")]
    pub news_api_url: String,
    /// News provider API key. `None` disables the provider; stories and
    /// comparison articles then degrade to empty lists.
    #[serde(default)]
    pub news_api_key: Option<String>,
    /// Base URL of the OpenAI-compatible rewrite provider.
    #[serde(default = "default_rewrite_api_url")]
    pub rewrite_api_url: String,
    /// Rewrite provider API key. `None` disables the provider; the rewrite
    /// field then degrades to `null`.
    #[serde(default)]
    pub rewrite_api_key: Option<String>,
    /// Model identifier passed to the rewrite provider.
    #[serde(default = "default_rewrite_model")]
    pub rewrite_model: String,
    /// Per-request timeout for provider calls, in milliseconds.
    #[serde(default = "default_provider_timeout_ms")]
    pub timeout_ms: u64,
    /// Connection timeout for provider calls, in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Bounded retries after a failed provider call.
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
}

fn default_news_api_url() -> String {
    "https://newsapi.org/v2".to_string()
}

fn default_rewrite_api_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_rewrite_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_provider_timeout_ms() -> u64 {
    30_000
}

fn default_connect_timeout_ms() -> u64 {
    5_000
}

fn default_retry_attempts() -> u32 {
    1
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            news_api_url: default_news_api_url(),
            news_api_key: None,
            rewrite_api_url: default_rewrite_api_url(),
            rewrite_api_key: None,
            rewrite_model: default_rewrite_model(),
            timeout_ms: default_provider_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
            retry_attempts: default_retry_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
    /// Allowed CORS origin for the frontend.
    #[serde(default = "default_cors_origin")]
    pub cors_origin: String,
    /// Model and training settings.
    #[serde(default)]
    pub model: ModelConfig,
    /// External provider settings.
    #[serde(default)]
    pub providers: ProviderConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_listen_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_cors_origin() -> String {
    "http://localhost:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            cors_origin: default_cors_origin(),
            model: ModelConfig::default(),
            providers: ProviderConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Political-bias detection for news articles.
//!
//! Everything between raw article text and an analysis verdict lives here:
//! preprocessing, sentiment and lexicon features, TF-IDF vectorization, word
//! embeddings, classifier training with model selection, and flat-file
//! persistence of the trained bundle. [`BiasDetector`] ties the pieces
//! together and is what the HTTP layer talks to.
//!
//! Training is deterministic end to end: all stochastic steps (splits, fold
//! assignment, embedding initialization and negative sampling) derive from
//! the configured seed, and the classifiers themselves train with full-batch
//! gradient descent.

pub mod classifier;
pub mod embedding;
pub mod features;
pub mod lexicon;
pub mod metrics;
pub mod persistence;
pub mod pipeline;
pub mod preprocess;
pub mod sample_data;
pub mod sentiment;
pub mod tfidf;
pub mod trainer;

pub use classifier::Classifier;
pub use embedding::WordEmbeddings;
pub use features::FeatureExtractor;
pub use persistence::{load_bundle, save_bundle, ModelBundle, BUNDLE_SCHEMA_VERSION};
pub use pipeline::BiasDetector;
pub use preprocess::Preprocessor;
pub use sentiment::SentimentAnalyzer;
pub use tfidf::TfidfVectorizer;
pub use trainer::{train_classifier, TrainerConfig, TrainingReport};

//! Flat-file persistence for the trained model bundle.
//!
//! The bundle is one JSON file holding everything inference needs: the
//! selected classifier, the fitted TF-IDF vectorizer, and the word
//! embeddings. Saves are atomic (write to a sibling temp file, then rename)
//! so a crash mid-save never leaves a truncated bundle behind.

use crate::classifier::Classifier;
use crate::embedding::WordEmbeddings;
use crate::tfidf::TfidfVectorizer;
use newslens_core::{NewsLensError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Current bundle schema version.
pub const BUNDLE_SCHEMA_VERSION: u32 = 1;

/// Everything a trained detector needs to answer analyze requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub schema_version: u32,
    /// Model family name, recorded for diagnostics.
    pub model_kind: String,
    pub classifier: Classifier,
    pub vectorizer: TfidfVectorizer,
    pub embeddings: WordEmbeddings,
}

/// Save a bundle to `path`, creating parent directories as needed.
pub fn save_bundle(path: &Path, bundle: &ModelBundle) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| NewsLensError::Persistence(format!("mkdir {}: {e}", parent.display())))?;
        }
    }

    let json = serde_json::to_string(bundle)?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .map_err(|e| NewsLensError::Persistence(format!("write {}: {e}", tmp.display())))?;
    fs::rename(&tmp, path)
        .map_err(|e| NewsLensError::Persistence(format!("rename to {}: {e}", path.display())))?;

    Ok(())
}

/// Load a bundle from `path`.
///
/// A schema version mismatch is logged but not fatal: the load is attempted
/// anyway, and only a parse failure surfaces as an error (at which point the
/// caller falls back to retraining).
pub fn load_bundle(path: &Path) -> Result<ModelBundle> {
    let json = fs::read_to_string(path)
        .map_err(|e| NewsLensError::Persistence(format!("read {}: {e}", path.display())))?;

    let bundle: ModelBundle = serde_json::from_str(&json)?;

    if bundle.schema_version != BUNDLE_SCHEMA_VERSION {
        warn!(
            found = bundle.schema_version,
            expected = BUNDLE_SCHEMA_VERSION,
            path = %path.display(),
            "model bundle schema version mismatch, proceeding anyway"
        );
    }

    Ok(bundle)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LogisticRegression;
    use crate::embedding::EmbeddingConfig;

    fn sample_bundle() -> ModelBundle {
        let samples = vec![vec![1.0, 0.0], vec![-1.0, 0.0]];
        let labels = vec![1u8, 0u8];
        let classifier = Classifier::Logistic(LogisticRegression::fit(&samples, &labels, 1.0));

        let docs = vec![
            "government passed law".to_string(),
            "committee met tuesday".to_string(),
        ];
        let mut vectorizer = TfidfVectorizer::new(100);
        vectorizer.fit(&docs);

        let embeddings = WordEmbeddings::train(
            &docs,
            &EmbeddingConfig {
                dim: 8,
                window: 2,
                epochs: 2,
                seed: 42,
            },
        );

        ModelBundle {
            schema_version: BUNDLE_SCHEMA_VERSION,
            model_kind: classifier.kind().to_string(),
            classifier,
            vectorizer,
            embeddings,
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let bundle = sample_bundle();
        save_bundle(&path, &bundle).unwrap();

        let loaded = load_bundle(&path).unwrap();
        assert_eq!(loaded.schema_version, BUNDLE_SCHEMA_VERSION);
        assert_eq!(loaded.model_kind, "logistic_regression");
        // f64 values survive the JSON round trip exactly, so predictions do.
        let x = vec![0.7, 0.0];
        assert_eq!(
            bundle.classifier.predict_proba(&x),
            loaded.classifier.predict_proba(&x)
        );
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("models").join("nested").join("bundle.json");
        save_bundle(&path, &sample_bundle()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_load_missing_file_is_persistence_error() {
        let err = load_bundle(Path::new("/nonexistent/bundle.json")).unwrap_err();
        assert!(matches!(err, NewsLensError::Persistence(_)));
    }

    #[test]
    fn test_load_corrupt_file_is_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        fs::write(&path, "{ not valid json").unwrap();
        let err = load_bundle(&path).unwrap_err();
        assert!(matches!(err, NewsLensError::Serialization(_)));
    }

    #[test]
    fn test_version_mismatch_still_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        let mut bundle = sample_bundle();
        bundle.schema_version = 99;
        save_bundle(&path, &bundle).unwrap();
        let loaded = load_bundle(&path).unwrap();
        assert_eq!(loaded.schema_version, 99);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bundle.json");
        save_bundle(&path, &sample_bundle()).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
    }
}

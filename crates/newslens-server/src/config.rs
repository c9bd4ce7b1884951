//! YAML configuration loading for the server.
//!
//! Loads [`ServerConfig`] from a YAML file on disk, falling back to defaults
//! when no file is specified.

use newslens_core::ServerConfig;
use std::path::Path;

/// Load a [`ServerConfig`] from a YAML file at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the YAML is invalid.
pub fn load_config(path: &Path) -> anyhow::Result<ServerConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config file {}: {}", path.display(), e))?;
    let config: ServerConfig = serde_yaml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config YAML: {}", e))?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to write YAML to a temp file and return the path.
    fn write_yaml(yaml: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(yaml.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_load_config_minimal() {
        let yaml = r#"
listen_addr: "0.0.0.0:9000"
cors_origin: "http://localhost:5173"
model:
  max_tfidf_features: 2000
  seed: 7
providers:
  news_api_key: "test-key"
  timeout_ms: 10000
logging:
  level: "debug"
"#;
        let f = write_yaml(yaml);
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.listen_addr, "0.0.0.0:9000");
        assert_eq!(config.cors_origin, "http://localhost:5173");
        assert_eq!(config.model.max_tfidf_features, 2000);
        assert_eq!(config.model.seed, 7);
        // Omitted fields fall back to defaults.
        assert_eq!(config.model.embedding_dim, 100);
        assert_eq!(config.providers.news_api_key.as_deref(), Some("test-key"));
        assert_eq!(config.providers.timeout_ms, 10000);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_config_empty_sections_use_defaults() {
        let f = write_yaml("listen_addr: \"127.0.0.1:8001\"\n");
        let config = load_config(f.path()).unwrap();
        assert_eq!(config.listen_addr, "127.0.0.1:8001");
        assert_eq!(config.model.max_tfidf_features, 5000);
        assert!(config.providers.news_api_key.is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config(Path::new("/nonexistent/config.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_invalid_yaml() {
        let f = write_yaml("not: [valid: yaml: {{{}}}");
        let result = load_config(f.path());
        assert!(result.is_err());
    }
}

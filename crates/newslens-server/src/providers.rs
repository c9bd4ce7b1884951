//! HTTP implementations of the external provider traits.
//!
//! [`HttpNewsProvider`] speaks the NewsAPI wire format (`/top-headlines`,
//! `/everything`); [`HttpRewriteProvider`] speaks the OpenAI-compatible chat
//! completions format. Both are constructed from [`ProviderConfig`] and come
//! back as `None` when the corresponding API key is absent, which disables
//! the capability without disabling the server.
//!
//! Failed calls are retried a bounded number of times; errors surface as the
//! recoverable provider variants of [`NewsLensError`], which the pipeline
//! degrades on rather than propagating.

use chrono::{DateTime, Utc};
use newslens_core::{
    FetchedArticle, NewsLensError, NewsProvider, NewsQuery, ProviderConfig, Result,
    RewriteProvider,
};
use serde::Deserialize;
use tracing::warn;

// ---------------------------------------------------------------------------
// News provider
// ---------------------------------------------------------------------------

/// NewsAPI-compatible news provider.
pub struct HttpNewsProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    retry_attempts: u32,
}

impl HttpNewsProvider {
    /// Build from configuration. Returns `None` when no API key is set.
    pub fn from_config(client: reqwest::Client, config: &ProviderConfig) -> Option<Self> {
        config.news_api_key.as_ref().map(|key| Self {
            client,
            base_url: config.news_api_url.trim_end_matches('/').to_string(),
            api_key: key.clone(),
            retry_attempts: config.retry_attempts,
        })
    }

    async fn get_articles(&self, path: &str, params: &[(&str, String)]) -> Result<Vec<FetchedArticle>> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_err = NewsLensError::NewsProvider("no attempts made".to_string());

        for attempt in 0..=self.retry_attempts {
            match self.try_get(&url, params).await {
                Ok(articles) => return Ok(articles),
                Err(e) => {
                    warn!(attempt, url = %url, error = %e, "news provider call failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    async fn try_get(&self, url: &str, params: &[(&str, String)]) -> Result<Vec<FetchedArticle>> {
        let response = self
            .client
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .query(params)
            .send()
            .await
            .map_err(|e| NewsLensError::NewsProvider(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| NewsLensError::NewsProvider(format!("error status: {e}")))?;

        let body: NewsApiResponse = response
            .json()
            .await
            .map_err(|e| NewsLensError::NewsProvider(format!("invalid response body: {e}")))?;

        Ok(parse_articles(body))
    }
}

#[async_trait::async_trait]
impl NewsProvider for HttpNewsProvider {
    async fn top_headlines(&self, query: &NewsQuery) -> Result<Vec<FetchedArticle>> {
        let mut params = vec![
            ("language", "en".to_string()),
            ("pageSize", query.count.to_string()),
        ];

        // A free-text query routes to search; otherwise top headlines,
        // optionally filtered by category.
        if let Some(q) = &query.query {
            params.push(("q", q.clone()));
            params.push(("sortBy", "relevancy".to_string()));
            return self.get_articles("/everything", &params).await;
        }

        if let Some(category) = &query.category {
            params.push(("category", category.clone()));
        }
        self.get_articles("/top-headlines", &params).await
    }

    async fn similar_articles(&self, keywords: &str, count: usize) -> Result<Vec<FetchedArticle>> {
        let params = vec![
            ("q", keywords.to_string()),
            ("language", "en".to_string()),
            ("pageSize", count.to_string()),
            ("sortBy", "relevancy".to_string()),
        ];
        self.get_articles("/everything", &params).await
    }

    fn name(&self) -> &str {
        "newsapi"
    }
}

/// NewsAPI response envelope.
#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    #[serde(default)]
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    #[serde(default)]
    source: NewsApiSource,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize)]
struct NewsApiSource {
    #[serde(default)]
    name: Option<String>,
}

fn parse_articles(body: NewsApiResponse) -> Vec<FetchedArticle> {
    body.articles
        .into_iter()
        .map(|a| FetchedArticle {
            source: a.source.name.unwrap_or_else(|| "Unknown Source".to_string()),
            title: a.title.unwrap_or_else(|| "Untitled Story".to_string()),
            description: a
                .description
                .unwrap_or_else(|| "No description available".to_string()),
            content: a.content.unwrap_or_default(),
            url: a.url.unwrap_or_default(),
            url_to_image: a.url_to_image.unwrap_or_default(),
            published_at: a.published_at,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Rewrite provider
// ---------------------------------------------------------------------------

/// OpenAI-compatible chat completions provider for neutral rewrites.
pub struct HttpRewriteProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    retry_attempts: u32,
}

impl HttpRewriteProvider {
    /// Build from configuration. Returns `None` when no API key is set.
    pub fn from_config(client: reqwest::Client, config: &ProviderConfig) -> Option<Self> {
        config.rewrite_api_key.as_ref().map(|key| Self {
            client,
            base_url: config.rewrite_api_url.trim_end_matches('/').to_string(),
            api_key: key.clone(),
            model: config.rewrite_model.clone(),
            retry_attempts: config.retry_attempts,
        })
    }

    async fn try_rewrite(&self, prompt: &str) -> Result<String> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| NewsLensError::RewriteProvider(format!("request failed: {e}")))?
            .error_for_status()
            .map_err(|e| NewsLensError::RewriteProvider(format!("error status: {e}")))?;

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| NewsLensError::RewriteProvider(format!("invalid response body: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| NewsLensError::RewriteProvider("response contained no choices".to_string()))
    }
}

#[async_trait::async_trait]
impl RewriteProvider for HttpRewriteProvider {
    async fn neutral_rewrite(&self, article_text: &str) -> Result<String> {
        let prompt = format!(
            "I am providing you a news article. Provide its neutral version and \
             also explain which words or sentences make it biased, point-wise: {article_text}"
        );

        let mut last_err = NewsLensError::RewriteProvider("no attempts made".to_string());
        for attempt in 0..=self.retry_attempts {
            match self.try_rewrite(&prompt).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    warn!(attempt, error = %e, "rewrite provider call failed");
                    last_err = e;
                }
            }
        }

        Err(last_err)
    }

    fn name(&self) -> &str {
        "rewrite"
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_disable_providers() {
        let config = ProviderConfig::default();
        let client = reqwest::Client::new();
        assert!(HttpNewsProvider::from_config(client.clone(), &config).is_none());
        assert!(HttpRewriteProvider::from_config(client, &config).is_none());
    }

    #[test]
    fn test_configured_keys_enable_providers() {
        let config = ProviderConfig {
            news_api_key: Some("news-key".to_string()),
            rewrite_api_key: Some("rewrite-key".to_string()),
            ..ProviderConfig::default()
        };
        let client = reqwest::Client::new();
        let news = HttpNewsProvider::from_config(client.clone(), &config).unwrap();
        let rewrite = HttpRewriteProvider::from_config(client, &config).unwrap();
        assert_eq!(news.name(), "newsapi");
        assert_eq!(rewrite.name(), "rewrite");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let config = ProviderConfig {
            news_api_key: Some("k".to_string()),
            news_api_url: "https://newsapi.org/v2/".to_string(),
            ..ProviderConfig::default()
        };
        let provider = HttpNewsProvider::from_config(reqwest::Client::new(), &config).unwrap();
        assert_eq!(provider.base_url, "https://newsapi.org/v2");
    }

    #[test]
    fn test_parse_articles_fills_defaults() {
        let body: NewsApiResponse = serde_json::from_value(serde_json::json!({
            "status": "ok",
            "articles": [
                {
                    "source": { "id": null, "name": "Reuters" },
                    "title": "Vote concludes",
                    "description": "The vote concluded on Friday.",
                    "content": "Officials said the vote was close.",
                    "url": "https://example.com/vote",
                    "urlToImage": "https://example.com/vote.jpg",
                    "publishedAt": "2025-06-01T12:00:00Z"
                },
                { "source": {} }
            ]
        }))
        .unwrap();

        let articles = parse_articles(body);
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].source, "Reuters");
        assert_eq!(articles[0].title, "Vote concludes");
        assert!(articles[0].published_at.is_some());

        assert_eq!(articles[1].source, "Unknown Source");
        assert_eq!(articles[1].title, "Untitled Story");
        assert_eq!(articles[1].description, "No description available");
        assert_eq!(articles[1].content, "");
        assert!(articles[1].published_at.is_none());
    }

    #[test]
    fn test_parse_chat_completion() {
        let body: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "id": "cmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Neutral text." } }
            ]
        }))
        .unwrap();
        assert_eq!(body.choices[0].message.content, "Neutral text.");
    }

    #[test]
    fn test_parse_empty_articles() {
        let body: NewsApiResponse =
            serde_json::from_value(serde_json::json!({ "status": "ok" })).unwrap();
        assert!(parse_articles(body).is_empty());
    }
}

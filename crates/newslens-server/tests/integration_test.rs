//! End-to-end router tests with in-memory provider fakes.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use newslens_core::{
    FetchedArticle, ModelConfig, NewsLensError, NewsProvider, NewsQuery, Result, RewriteProvider,
    ServerConfig,
};
use newslens_detector::BiasDetector;
use newslens_server::api::{build_router, AppState};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceExt;

struct FakeNews {
    articles: Vec<FetchedArticle>,
}

#[async_trait::async_trait]
impl NewsProvider for FakeNews {
    async fn top_headlines(&self, query: &NewsQuery) -> Result<Vec<FetchedArticle>> {
        Ok(self.articles.iter().take(query.count).cloned().collect())
    }

    async fn similar_articles(&self, _keywords: &str, count: usize) -> Result<Vec<FetchedArticle>> {
        Ok(self.articles.iter().take(count).cloned().collect())
    }

    fn name(&self) -> &str {
        "fake-news"
    }
}

struct FailingRewrite;

#[async_trait::async_trait]
impl RewriteProvider for FailingRewrite {
    async fn neutral_rewrite(&self, _article_text: &str) -> Result<String> {
        Err(NewsLensError::RewriteProvider("service down".to_string()))
    }

    fn name(&self) -> &str {
        "failing-rewrite"
    }
}

struct EchoRewrite;

#[async_trait::async_trait]
impl RewriteProvider for EchoRewrite {
    async fn neutral_rewrite(&self, _article_text: &str) -> Result<String> {
        Ok("The government passed a new law.".to_string())
    }

    fn name(&self) -> &str {
        "echo-rewrite"
    }
}

fn fetched_article(source: &str, content: &str) -> FetchedArticle {
    FetchedArticle {
        source: source.to_string(),
        title: format!("{source} story"),
        description: "Lawmakers discussed pending legislation on Tuesday".to_string(),
        content: content.to_string(),
        url: format!("https://example.com/{source}"),
        url_to_image: String::new(),
        published_at: None,
    }
}

async fn app_with(
    news: Option<Arc<dyn NewsProvider>>,
    rewrite: Option<Arc<dyn RewriteProvider>>,
) -> Router {
    let model_config = ModelConfig {
        embedding_dim: 16,
        embedding_epochs: 3,
        bundle_path: "/nonexistent/never-saved.json".to_string(),
        ..ModelConfig::default()
    };
    let (detector, _) = BiasDetector::train_on_samples(&model_config).unwrap();

    let state = Arc::new(AppState {
        config: ServerConfig::default(),
        detector: RwLock::new(Some(Arc::new(detector))),
        news,
        rewrite,
    });
    build_router(state)
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn analyze_returns_comparisons_and_rewrite() {
    let news = FakeNews {
        articles: vec![
            fetched_article("reuters", "The committee reviewed the proposal carefully."),
            fetched_article("apnews", "Officials summarized the schedule for the vote."),
        ],
    };
    let app = app_with(Some(Arc::new(news)), Some(Arc::new(EchoRewrite))).await;

    let req = post_json(
        "/analyze",
        serde_json::json!({
            "text": "The corrupt socialist government introduced another disastrous anti-business law."
        }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["is_biased"], true);
    assert_eq!(json["similar_articles"].as_array().unwrap().len(), 2);
    assert_eq!(json["similar_articles"][0]["source"], "reuters");
    assert_eq!(
        json["neutral_alternative"],
        "The government passed a new law."
    );
    assert_eq!(json["breakdown"]["source_comparison"], "Balanced");
    assert!(json["biased_words"]
        .as_array()
        .unwrap()
        .iter()
        .any(|w| w == "corrupt"));
}

#[tokio::test]
async fn analyze_with_failing_rewrite_degrades_gracefully() {
    let app = app_with(None, Some(Arc::new(FailingRewrite))).await;

    let req = post_json(
        "/analyze",
        serde_json::json!({ "text": "Radical extremist politicians push a corrupt agenda." }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["neutral_alternative"].is_null());
    assert_eq!(json["is_biased"], true);
}

#[tokio::test]
async fn stories_returns_summaries_with_metrics() {
    let news = FakeNews {
        articles: vec![
            fetched_article(
                "reuters",
                "Officials said \"the vote was close\" and \"turnout was high\".",
            ),
            fetched_article("no-content", ""),
        ],
    };
    let app = app_with(Some(Arc::new(news)), None).await;

    let req = post_json("/stories", serde_json::json!({ "count": 10 }));
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let stories = json.as_array().unwrap();
    // The content-less article is dropped.
    assert_eq!(stories.len(), 1);

    let story = &stories[0];
    assert_eq!(story["id"], "1");
    assert_eq!(story["source"], "reuters");
    assert_eq!(story["metrics"]["sources"], 3); // article + two quotes
    assert!(story["metrics"]["accuracy"].as_u64().unwrap() <= 100);
    assert!(story["type"] == "important" || story["type"] == "viral");
    assert!(story.get("urlToImage").is_some());
    assert!(story.get("publishedAt").is_some());
}

#[tokio::test]
async fn stories_respects_count_limit() {
    let news = FakeNews {
        articles: (0..5)
            .map(|i| fetched_article(&format!("source-{i}"), "Some article content here."))
            .collect(),
    };
    let app = app_with(Some(Arc::new(news)), None).await;

    let req = post_json("/stories", serde_json::json!({ "count": 2 }));
    let response = app.oneshot(req).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn stories_passes_category_and_query_through() {
    struct AssertingNews;

    #[async_trait::async_trait]
    impl NewsProvider for AssertingNews {
        async fn top_headlines(&self, query: &NewsQuery) -> Result<Vec<FetchedArticle>> {
            assert_eq!(query.category.as_deref(), Some("technology"));
            assert_eq!(query.query.as_deref(), Some("elections"));
            assert_eq!(query.count, 3);
            Ok(vec![])
        }

        async fn similar_articles(
            &self,
            _keywords: &str,
            _count: usize,
        ) -> Result<Vec<FetchedArticle>> {
            Ok(vec![])
        }

        fn name(&self) -> &str {
            "asserting-news"
        }
    }

    let app = app_with(Some(Arc::new(AssertingNews)), None).await;
    let req = post_json(
        "/stories",
        serde_json::json!({ "category": "technology", "query": "elections", "count": 3 }),
    );
    let response = app.oneshot(req).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

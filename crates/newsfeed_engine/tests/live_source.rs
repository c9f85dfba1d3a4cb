use std::time::Duration;

use newsfeed_core::{FeedRequest, PLACEHOLDER_IMAGE, UNKNOWN_SOURCE};
use newsfeed_engine::{FeedSource, LiveSource, SourceSettings};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer) -> LiveSource {
    let settings = SourceSettings {
        base_url: server.uri(),
        ..SourceSettings::default()
    };
    LiveSource::new("test-key", settings)
}

#[tokio::test]
async fn search_hits_everything_endpoint_and_maps_articles() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/everything"))
        .and(query_param("q", "mars rover"))
        .and(query_param("pageSize", "20"))
        .and(query_param("page", "1"))
        .and(query_param("apiKey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ok",
            "totalResults": 41,
            "articles": [
                {
                    "source": { "id": null, "name": "Space Daily" },
                    "author": "R. Vance",
                    "title": "Rover wakes up",
                    "description": "It is morning on Mars.",
                    "url": "https://example.com/rover",
                    "urlToImage": "https://example.com/rover.jpg",
                    "publishedAt": "2024-03-01T10:00:00Z",
                    "content": "Long story."
                },
                {
                    "source": { "id": null, "name": null },
                    "title": "Bare item",
                    "url": "https://example.com/bare"
                }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let result = source_for(&server)
        .fetch(&FeedRequest::search("mars rover"))
        .await;

    assert_eq!(result.error, None);
    assert_eq!(result.total_results, 41);
    assert_eq!(result.articles.len(), 2);

    let full = &result.articles[0];
    assert_eq!(full.source_name, "Space Daily");
    assert_eq!(full.author.as_deref(), Some("R. Vance"));
    assert_eq!(full.image_url.as_deref(), Some("https://example.com/rover.jpg"));
    assert_eq!(full.published_at.to_rfc3339(), "2024-03-01T10:00:00+00:00");

    let bare = &result.articles[1];
    assert_eq!(bare.source_name, UNKNOWN_SOURCE);
    assert_eq!(bare.image_url.as_deref(), Some(PLACEHOLDER_IMAGE));
    assert_eq!(bare.description, None);
}

#[tokio::test]
async fn category_hits_top_headlines_with_category() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("country", "us"))
        .and(query_param("category", "sports"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "totalResults": 0,
            "articles": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = FeedRequest::category("sports").with_page(2);
    let result = source_for(&server).fetch(&request).await;

    assert_eq!(result.error, None);
    assert!(result.articles.is_empty());
}

#[tokio::test]
async fn missing_fields_in_page_default_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let result = source_for(&server).fetch(&FeedRequest::default()).await;

    assert_eq!(result.error, None);
    assert_eq!(result.total_results, 0);
    assert!(result.articles.is_empty());
}

#[tokio::test]
async fn rate_limit_body_becomes_error_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let result = source_for(&server).fetch(&FeedRequest::default()).await;

    assert_eq!(result.error.as_deref(), Some("rate limited"));
    assert!(result.articles.is_empty());
    assert_eq!(result.total_results, 0);
}

#[tokio::test]
async fn json_error_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "status": "error",
            "code": "apiKeyInvalid",
            "message": "Your API key is invalid or incorrect."
        })))
        .mount(&server)
        .await;

    let result = source_for(&server).fetch(&FeedRequest::search("x")).await;

    assert_eq!(
        result.error.as_deref(),
        Some("Your API key is invalid or incorrect.")
    );
}

#[tokio::test]
async fn empty_error_body_falls_back_to_status_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let result = source_for(&server).fetch(&FeedRequest::default()).await;

    assert_eq!(result.error.as_deref(), Some("503 Service Unavailable"));
}

#[tokio::test]
async fn undecodable_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let result = source_for(&server).fetch(&FeedRequest::default()).await;

    let error = result.error.expect("decode failure surfaces as error");
    assert!(error.starts_with("invalid response body"), "{error}");
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(64)))
        .mount(&server)
        .await;

    let settings = SourceSettings {
        base_url: server.uri(),
        max_body_bytes: 16,
        ..SourceSettings::default()
    };
    let result = LiveSource::new("k", settings)
        .fetch(&FeedRequest::default())
        .await;

    assert_eq!(result.error.as_deref(), Some("response too large"));
}

#[tokio::test]
async fn unreachable_provider_is_captured_not_raised() {
    let settings = SourceSettings {
        // Nothing listens on the discard port.
        base_url: "http://127.0.0.1:9".to_string(),
        ..SourceSettings::default()
    };
    let result = LiveSource::new("secret-key", settings)
        .fetch(&FeedRequest::default())
        .await;

    let error = result.error.expect("transport failure surfaces as error");
    assert!(error.starts_with("error sending request"), "{error}");
    // The underlying connect failure follows the top-level message.
    assert!(error.contains(": "), "cause missing from {error}");
    assert!(!error.contains("secret-key"));
    assert!(result.articles.is_empty());
}

#[tokio::test]
async fn caller_supplied_timeout_bounds_slow_provider() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(500))
                .set_body_json(json!({ "articles": [], "totalResults": 0 })),
        )
        .mount(&server)
        .await;

    let settings = SourceSettings {
        base_url: server.uri(),
        request_timeout: Some(Duration::from_millis(50)),
        ..SourceSettings::default()
    };
    let result = LiveSource::new("k", settings)
        .fetch(&FeedRequest::default())
        .await;

    assert!(result.error.is_some());
}

use chrono::{DateTime, Utc};
use newsfeed_core::{Article, FeedRequest, FeedResult};
use newsfeed_logging::feed_debug;

use crate::source::FeedSource;

/// Demo articles served when no provider credential is configured.
pub fn demo_articles(published_at: DateTime<Utc>) -> Vec<Article> {
    vec![
        Article {
            source_name: "Demo News".to_string(),
            author: Some("Author Demo".to_string()),
            title: "Welcome to News Feed - Demo Mode".to_string(),
            description: Some(format!(
                "This demo article appears when no API key is provided. \
                 Set {} for live data.",
                crate::source::API_KEY_ENV
            )),
            url: "https://example.com/demo".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1507525428034-b723cf961d3e?w=1200&q=80"
                    .to_string(),
            ),
            published_at,
            content: Some(
                "Demo content. Replace with live articles when an API key is added.".to_string(),
            ),
        },
        Article {
            source_name: "DemoTech".to_string(),
            author: Some("Tech Demo".to_string()),
            title: "Mock: Tech trends in classrooms".to_string(),
            description: Some("Example mock description for tech category.".to_string()),
            url: "https://example.com/tech-demo".to_string(),
            image_url: Some(
                "https://images.unsplash.com/photo-1518770660439-4636190af475?w=1200&q=80"
                    .to_string(),
            ),
            published_at,
            content: Some("Demo tech content.".to_string()),
        },
    ]
}

/// Serves the same fixed dataset for every request. The dataset is stamped
/// once at construction so repeated fetches are identical.
#[derive(Debug, Clone)]
pub struct FallbackSource {
    articles: Vec<Article>,
}

impl FallbackSource {
    pub fn new() -> Self {
        Self::captured_at(Utc::now())
    }

    pub fn captured_at(published_at: DateTime<Utc>) -> Self {
        Self {
            articles: demo_articles(published_at),
        }
    }
}

impl Default for FallbackSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl FeedSource for FallbackSource {
    async fn fetch(&self, request: &FeedRequest) -> FeedResult {
        feed_debug!(
            "Serving {} demo articles for {:?} page {}",
            self.articles.len(),
            request.mode(),
            request.page
        );
        FeedResult::loaded(self.articles.clone(), self.articles.len() as u64)
    }

    fn label(&self) -> &'static str {
        "fallback"
    }
}

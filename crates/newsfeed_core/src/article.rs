use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image shown for articles the provider delivered without one.
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/800x450?text=No+Image";
/// Attribution used when the provider does not name a source.
pub const UNKNOWN_SOURCE: &str = "Unknown";

/// A single news item. `url` is the identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub source_name: String,
    #[serde(default)]
    pub author: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    pub published_at: DateTime<Utc>,
    #[serde(default)]
    pub content: Option<String>,
}

impl Article {
    /// Minimal article with every optional field absent and the source unknown.
    pub fn new(url: impl Into<String>, title: impl Into<String>, published_at: DateTime<Utc>) -> Self {
        Self {
            source_name: UNKNOWN_SOURCE.to_string(),
            author: None,
            title: title.into(),
            description: None,
            url: url.into(),
            image_url: None,
            published_at,
            content: None,
        }
    }

    /// Two articles are the same article iff their urls are byte-equal.
    pub fn is_same_as(&self, other: &Article) -> bool {
        self.url == other.url
    }

    pub fn image_or_placeholder(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// Free-function form of [`Article::is_same_as`].
pub fn same_article(a: &Article, b: &Article) -> bool {
    a.is_same_as(b)
}

/// An article as a provider may deliver it, with any field missing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PartialArticle {
    pub source_name: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub content: Option<String>,
}

impl PartialArticle {
    /// Applies the canonical defaulting rule. `captured_at` is the time the
    /// record was retrieved and stands in for a missing publish time.
    pub fn into_article(self, captured_at: DateTime<Utc>) -> Article {
        let source_name = self
            .source_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_SOURCE.to_string());
        Article {
            source_name,
            author: self.author,
            title: self.title.unwrap_or_default(),
            description: self.description,
            url: self.url.unwrap_or_default(),
            image_url: Some(
                self.image_url
                    .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            ),
            published_at: self.published_at.unwrap_or(captured_at),
            content: self.content,
        }
    }
}

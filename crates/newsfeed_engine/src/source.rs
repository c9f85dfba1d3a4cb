use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::StreamExt;
use newsfeed_core::{FeedMode, FeedRequest, FeedResult, PartialArticle, PAGE_SIZE};
use newsfeed_logging::{feed_debug, feed_info, feed_warn};
use serde::Deserialize;
use url::Url;

use crate::fallback::FallbackSource;
use crate::{FailureKind, SourceError};

pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
pub const DEFAULT_COUNTRY: &str = "us";
pub const API_KEY_ENV: &str = "NEWS_API_KEY";
pub const BASE_URL_ENV: &str = "NEWS_API_BASE_URL";
pub const COUNTRY_ENV: &str = "NEWS_API_COUNTRY";

#[derive(Debug, Clone)]
pub struct SourceSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub country: String,
    /// `None` leaves the call unbounded.
    pub connect_timeout: Option<Duration>,
    /// `None` leaves the call unbounded.
    pub request_timeout: Option<Duration>,
    pub max_body_bytes: u64,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            connect_timeout: None,
            request_timeout: None,
            max_body_bytes: 5 * 1024 * 1024,
        }
    }
}

impl SourceSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds settings from an environment-style lookup. Blank values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();
        Self {
            api_key: read(API_KEY_ENV),
            base_url: read(BASE_URL_ENV).unwrap_or(defaults.base_url),
            country: read(COUNTRY_ENV).unwrap_or(defaults.country),
            ..defaults
        }
    }

    /// The credential, if one is configured and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

/// Resolves feed requests. Implementations never fail: errors are reported
/// through `FeedResult::error`.
#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch(&self, request: &FeedRequest) -> FeedResult;

    /// Short label for logs.
    fn label(&self) -> &'static str;
}

/// Picks the live provider when a credential is configured, the demo
/// dataset otherwise. Decided once; the returned source never switches.
pub fn select_source(settings: SourceSettings) -> Arc<dyn FeedSource> {
    let api_key = settings.credential().map(str::to_owned);
    match api_key {
        Some(api_key) => {
            feed_info!("Using live provider at {}", settings.base_url);
            Arc::new(LiveSource::new(api_key, settings))
        }
        None => {
            feed_info!("No provider credential configured; serving the demo dataset");
            Arc::new(FallbackSource::new())
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiveSource {
    api_key: String,
    settings: SourceSettings,
}

impl LiveSource {
    pub fn new(api_key: impl Into<String>, settings: SourceSettings) -> Self {
        Self {
            api_key: api_key.into(),
            settings,
        }
    }

    /// Full provider URL for `request`, credential included.
    pub fn endpoint(&self, request: &FeedRequest) -> Result<Url, SourceError> {
        let base = self.settings.base_url.trim_end_matches('/');
        let path = match request.mode() {
            FeedMode::Search { .. } => "everything",
            FeedMode::Category { .. } | FeedMode::TopHeadlines => "top-headlines",
        };
        let mut url = Url::parse(&format!("{base}/{path}"))
            .map_err(|err| SourceError::new(FailureKind::InvalidUrl, err.to_string()))?;
        {
            let mut pairs = url.query_pairs_mut();
            match request.mode() {
                FeedMode::Search { query } => {
                    pairs.append_pair("q", query);
                }
                FeedMode::Category { category } => {
                    pairs.append_pair("country", &self.settings.country);
                    pairs.append_pair("category", category);
                }
                FeedMode::TopHeadlines => {
                    pairs.append_pair("country", &self.settings.country);
                }
            }
            pairs.append_pair("pageSize", &PAGE_SIZE.to_string());
            pairs.append_pair("page", &request.page.to_string());
            pairs.append_pair("apiKey", &self.api_key);
        }
        Ok(url)
    }

    fn build_client(&self) -> Result<reqwest::Client, SourceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.settings.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|err| SourceError::new(FailureKind::Unavailable, err.to_string()))
    }

    async fn request_page(&self, request: &FeedRequest) -> Result<ProviderPage, SourceError> {
        let url = self.endpoint(request)?;
        let client = self.build_client()?;

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            // A body we cannot read still leaves the status text to report.
            let body = read_body(response, self.settings.max_body_bytes)
                .await
                .unwrap_or_default();
            return Err(SourceError::new(
                FailureKind::Rejected(status.as_u16()),
                rejection_message(status, &body),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_body_bytes {
                return Err(SourceError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_body_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let body = read_body(response, self.settings.max_body_bytes).await?;
        serde_json::from_slice(&body).map_err(|err| {
            SourceError::new(
                FailureKind::InvalidBody,
                format!("invalid response body: {err}"),
            )
        })
    }
}

#[async_trait::async_trait]
impl FeedSource for LiveSource {
    async fn fetch(&self, request: &FeedRequest) -> FeedResult {
        let captured_at = Utc::now();
        match self.request_page(request).await {
            Ok(page) => {
                let result = page.into_result(captured_at);
                feed_debug!(
                    "Provider returned {} articles (total {}) for {:?} page {}",
                    result.articles.len(),
                    result.total_results,
                    request.mode(),
                    request.page
                );
                result
            }
            Err(err) => {
                let outcome = if err.kind.is_rejection() {
                    "rejected"
                } else {
                    "unreachable"
                };
                feed_warn!(
                    "Provider {} fetch for {:?} page {}: {}",
                    outcome,
                    request.mode(),
                    request.page,
                    err
                );
                FeedResult::failed(err.message)
            }
        }
    }

    fn label(&self) -> &'static str {
        "live"
    }
}

async fn read_body(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, SourceError> {
    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(SourceError::new(
                FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                },
                "response too large",
            ));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

/// Provider's JSON `message`, else the raw body text, else the status line.
fn rejection_message(status: reqwest::StatusCode, body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if let Ok(ProviderErrorBody {
        message: Some(message),
    }) = serde_json::from_str::<ProviderErrorBody>(text)
    {
        if !message.trim().is_empty() {
            return message;
        }
    }
    if !text.is_empty() {
        return text.to_string();
    }
    status.to_string()
}

fn map_reqwest_error(err: reqwest::Error) -> SourceError {
    // The request url carries the credential.
    let err = err.without_url();
    let kind = if err.is_timeout() {
        FailureKind::Timeout
    } else {
        FailureKind::Unavailable
    };
    SourceError::new(kind, error_chain(&err))
}

/// `err` followed by each underlying cause, joined with `: `. Causes whose
/// text is already part of the message are skipped.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut cause = err.source();
    while let Some(inner) = cause {
        let text = inner.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        cause = inner.source();
    }
    message
}

#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderPage {
    articles: Option<Vec<ProviderArticle>>,
    total_results: Option<u64>,
}

impl ProviderPage {
    fn into_result(self, captured_at: DateTime<Utc>) -> FeedResult {
        let articles = self
            .articles
            .unwrap_or_default()
            .into_iter()
            .map(|article| article.into_partial().into_article(captured_at))
            .collect();
        FeedResult::loaded(articles, self.total_results.unwrap_or(0))
    }
}

#[derive(Debug, Deserialize)]
struct ProviderSourceRef {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProviderArticle {
    source: Option<ProviderSourceRef>,
    author: Option<String>,
    title: Option<String>,
    description: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    published_at: Option<String>,
    content: Option<String>,
}

impl ProviderArticle {
    fn into_partial(self) -> PartialArticle {
        PartialArticle {
            source_name: self.source.and_then(|source| source.name),
            author: self.author,
            title: self.title,
            description: self.description,
            url: self.url,
            image_url: self.url_to_image,
            // Unparsable timestamps are treated like missing ones.
            published_at: self
                .published_at
                .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
                .map(|published| published.with_timezone(&Utc)),
            content: self.content,
        }
    }
}

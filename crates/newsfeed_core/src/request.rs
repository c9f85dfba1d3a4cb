use crate::Article;

/// Category browsed when nothing else is selected.
pub const DEFAULT_CATEGORY: &str = "general";
/// Categories the provider is known to support, in display order.
pub const CATEGORIES: &[&str] = &[
    "general",
    "technology",
    "sports",
    "business",
    "health",
    "entertainment",
    "science",
];
/// Fixed number of articles requested per page.
pub const PAGE_SIZE: u32 = 20;

/// What the presentation asked for. Search and category browsing are
/// mutually exclusive; the constructors below keep it that way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedRequest {
    pub query: String,
    pub category: String,
    pub page: u32,
}

impl Default for FeedRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: DEFAULT_CATEGORY.to_string(),
            page: 1,
        }
    }
}

/// Which provider endpoint a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMode<'a> {
    Search { query: &'a str },
    Category { category: &'a str },
    TopHeadlines,
}

impl FeedRequest {
    pub fn search(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    /// Same query and category on another page; pages below 1 clamp to 1.
    pub fn with_page(&self, page: i64) -> Self {
        Self {
            page: clamp_page(page),
            ..self.clone()
        }
    }

    /// Endpoint precedence: non-blank query, then a non-default category,
    /// then the default headlines.
    pub fn mode(&self) -> FeedMode<'_> {
        let query = self.query.trim();
        if !query.is_empty() {
            FeedMode::Search { query: &self.query }
        } else if !self.category.is_empty() && self.category != DEFAULT_CATEGORY {
            FeedMode::Category {
                category: &self.category,
            }
        } else {
            FeedMode::TopHeadlines
        }
    }
}

fn clamp_page(page: i64) -> u32 {
    page.clamp(1, i64::from(u32::MAX)) as u32
}

/// Outcome of one fetch. Failures are carried in `error`, never raised.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedResult {
    pub articles: Vec<Article>,
    pub total_results: u64,
    pub error: Option<String>,
}

impl FeedResult {
    pub fn loaded(articles: Vec<Article>, total_results: u64) -> Self {
        Self {
            articles,
            total_results,
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            articles: Vec::new(),
            total_results: 0,
            error: Some(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

use crate::{Article, FeedRequest, FeedStatus};

/// Everything the presentation needs to draw the feed.
///
/// `articles` and `total_results` are only populated in `Loaded`; `error`
/// only in `Errored`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedViewModel {
    pub status: FeedStatus,
    pub request: FeedRequest,
    pub articles: Vec<Article>,
    pub total_results: u64,
    pub error: Option<String>,
    pub has_previous_page: bool,
    pub dirty: bool,
}

impl FeedViewModel {
    pub fn is_loading(&self) -> bool {
        self.status == FeedStatus::Loading
    }

    /// Loaded but nothing to show ("No news found").
    pub fn is_empty(&self) -> bool {
        self.status == FeedStatus::Loaded && self.articles.is_empty()
    }
}

use crate::view_model::FeedViewModel;
use crate::{Article, Effect, FeedRequest, FeedResult};

/// Monotonic tag of an issued fetch. The first request gets id 1.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedState {
    request: FeedRequest,
    status: FeedStatus,
    // Kept while Loading so the previous result survives a superseded fetch.
    articles: Vec<Article>,
    total_results: u64,
    error: Option<String>,
    latest_request: Option<RequestId>,
    stale_discarded: u64,
    dirty: bool,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> FeedViewModel {
        let loaded = self.status == FeedStatus::Loaded;
        FeedViewModel {
            status: self.status,
            request: self.request.clone(),
            articles: if loaded {
                self.articles.clone()
            } else {
                Vec::new()
            },
            total_results: if loaded { self.total_results } else { 0 },
            error: self.error.clone(),
            has_previous_page: self.request.page > 1,
            dirty: self.dirty,
        }
    }

    pub fn request(&self) -> &FeedRequest {
        &self.request
    }

    pub fn status(&self) -> FeedStatus {
        self.status
    }

    pub fn latest_request_id(&self) -> Option<RequestId> {
        self.latest_request
    }

    /// Number of completions dropped because a newer request was in flight.
    pub fn stale_discarded(&self) -> u64 {
        self.stale_discarded
    }

    /// Returns whether the state changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Makes `request` current, moves to Loading and returns the fetch to run.
    pub(crate) fn issue(&mut self, request: FeedRequest) -> Effect {
        let request_id = self.latest_request.map_or(1, |id| id + 1);
        self.latest_request = Some(request_id);
        self.request = request.clone();
        self.status = FeedStatus::Loading;
        self.error = None;
        self.dirty = true;
        Effect::Fetch {
            request_id,
            request,
        }
    }

    /// Applies a completion if it belongs to the latest request.
    /// Returns `false` when the completion was stale and ignored.
    pub(crate) fn apply_result(&mut self, request_id: RequestId, result: FeedResult) -> bool {
        if self.latest_request != Some(request_id) || self.status != FeedStatus::Loading {
            self.stale_discarded += 1;
            return false;
        }
        match result.error {
            Some(message) => {
                self.status = FeedStatus::Errored;
                self.articles.clear();
                self.total_results = 0;
                self.error = Some(message);
            }
            None => {
                self.status = FeedStatus::Loaded;
                self.articles = result.articles;
                self.total_results = result.total_results;
                self.error = None;
            }
        }
        self.dirty = true;
        true
    }
}

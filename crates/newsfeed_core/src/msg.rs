use crate::{FeedResult, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Presentation mounted; loads the default request once.
    Mounted,
    /// User submitted a full-text search.
    SearchSubmitted(String),
    /// User picked a category.
    CategorySelected(String),
    /// User jumped to a page. Values below 1 clamp to 1.
    PageChanged(i64),
    /// User clicked Next.
    NextPage,
    /// User clicked Prev.
    PreviousPage,
    /// Re-issue the current request unchanged.
    Refresh,
    /// A fetch completed. Applied only if `request_id` is the latest issued.
    FeedLoaded {
        request_id: RequestId,
        result: FeedResult,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}

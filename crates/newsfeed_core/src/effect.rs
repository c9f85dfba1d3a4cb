use crate::{FeedRequest, RequestId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Run the request against the feed source and report back with
    /// `Msg::FeedLoaded` carrying the same id.
    Fetch {
        request_id: RequestId,
        request: FeedRequest,
    },
}

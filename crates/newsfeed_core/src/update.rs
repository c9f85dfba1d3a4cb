use crate::{Effect, FeedRequest, FeedState, FeedStatus, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let effects = match msg {
        Msg::Mounted => {
            // Remounting must not refetch over whatever is on screen.
            if state.latest_request_id().is_some() {
                return (state, Vec::new());
            }
            vec![state.issue(FeedRequest::default())]
        }
        Msg::SearchSubmitted(query) => vec![state.issue(FeedRequest::search(query))],
        Msg::CategorySelected(category) => vec![state.issue(FeedRequest::category(category))],
        Msg::PageChanged(page) => {
            let next = state.request().with_page(page);
            vec![state.issue(next)]
        }
        Msg::NextPage => {
            let next = state.request().with_page(i64::from(state.request().page) + 1);
            vec![state.issue(next)]
        }
        Msg::PreviousPage => {
            if state.request().page <= 1 {
                return (state, Vec::new());
            }
            let next = state.request().with_page(i64::from(state.request().page) - 1);
            vec![state.issue(next)]
        }
        Msg::Refresh => {
            if state.status() == FeedStatus::Idle {
                return (state, Vec::new());
            }
            let current = state.request().clone();
            vec![state.issue(current)]
        }
        Msg::FeedLoaded { request_id, result } => {
            state.apply_result(request_id, result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

use std::sync::Once;

use chrono::{TimeZone, Utc};
use newsfeed_core::{
    update, Article, Effect, FeedRequest, FeedResult, FeedState, FeedStatus, Msg, RequestId,
    DEFAULT_CATEGORY,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(newsfeed_logging::initialize_for_tests);
}

fn article(url: &str) -> Article {
    Article::new(url, "title", Utc.timestamp_opt(1_700_000_000, 0).single().unwrap())
}

fn fetch_id(effects: &[Effect]) -> RequestId {
    match effects {
        [Effect::Fetch { request_id, .. }] => *request_id,
        other => panic!("expected a single fetch, got {other:?}"),
    }
}

fn mounted() -> (FeedState, RequestId) {
    let (state, effects) = update(FeedState::new(), Msg::Mounted);
    let id = fetch_id(&effects);
    (state, id)
}

#[test]
fn mount_fetches_default_request() {
    init_logging();
    let (state, effects) = update(FeedState::new(), Msg::Mounted);

    assert_eq!(
        effects,
        vec![Effect::Fetch {
            request_id: 1,
            request: FeedRequest {
                query: String::new(),
                category: "general".to_string(),
                page: 1,
            },
        }]
    );
    assert_eq!(state.status(), FeedStatus::Loading);
    assert!(state.view().is_loading());
}

#[test]
fn second_mount_does_not_refetch() {
    init_logging();
    let (state, _) = mounted();
    let (next, effects) = update(state, Msg::Mounted);

    assert!(effects.is_empty());
    assert_eq!(next.latest_request_id(), Some(1));
}

#[test]
fn successful_fetch_moves_to_loaded() {
    init_logging();
    let (state, id) = mounted();
    let (mut state, effects) = update(
        state,
        Msg::FeedLoaded {
            request_id: id,
            result: FeedResult::loaded(vec![article("https://a"), article("https://b")], 57),
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert_eq!(view.status, FeedStatus::Loaded);
    assert_eq!(view.articles.len(), 2);
    assert_eq!(view.total_results, 57);
    assert_eq!(view.error, None);
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn empty_page_is_loaded_not_errored() {
    init_logging();
    let (state, _) = mounted();
    let (state, effects) = update(state, Msg::PageChanged(500));
    let id = fetch_id(&effects);
    let (state, _) = update(
        state,
        Msg::FeedLoaded {
            request_id: id,
            result: FeedResult::loaded(Vec::new(), 57),
        },
    );

    let view = state.view();
    assert_eq!(view.status, FeedStatus::Loaded);
    assert_eq!(view.request.page, 500);
    assert!(view.is_empty());
}

#[test]
fn error_result_moves_to_errored_with_verbatim_message() {
    init_logging();
    let (state, id) = mounted();
    let (state, _) = update(
        state,
        Msg::FeedLoaded {
            request_id: id,
            result: FeedResult::failed("rate limited"),
        },
    );

    let view = state.view();
    assert_eq!(view.status, FeedStatus::Errored);
    assert_eq!(view.error.as_deref(), Some("rate limited"));
    assert!(view.articles.is_empty());
}

#[test]
fn new_request_clears_previous_error() {
    init_logging();
    let (state, id) = mounted();
    let (state, _) = update(
        state,
        Msg::FeedLoaded {
            request_id: id,
            result: FeedResult::failed("boom"),
        },
    );
    let (state, _) = update(state, Msg::Refresh);

    assert_eq!(state.status(), FeedStatus::Loading);
    assert_eq!(state.view().error, None);
}

#[test]
fn search_resets_category_and_page() {
    init_logging();
    let (state, _) = mounted();
    let (state, _) = update(state, Msg::CategorySelected("sports".into()));
    let (state, _) = update(state, Msg::PageChanged(4));
    let (state, effects) = update(state, Msg::SearchSubmitted("x".into()));

    let request = state.request();
    assert_eq!(request.query, "x");
    assert_eq!(request.category, DEFAULT_CATEGORY);
    assert_eq!(request.page, 1);
    assert!(matches!(
        effects.as_slice(),
        [Effect::Fetch { request, .. }] if request.query == "x"
    ));
}

#[test]
fn category_resets_query_and_page() {
    init_logging();
    let (state, _) = mounted();
    let (state, _) = update(state, Msg::SearchSubmitted("mars".into()));
    let (state, _) = update(state, Msg::NextPage);
    assert_eq!(state.request().page, 2);

    let (state, _) = update(state, Msg::CategorySelected("sports".into()));

    let request = state.request();
    assert_eq!(request.query, "");
    assert_eq!(request.category, "sports");
    assert_eq!(request.page, 1);
}

#[test]
fn page_change_keeps_query_and_category() {
    init_logging();
    let (state, _) = mounted();
    let (state, _) = update(state, Msg::SearchSubmitted("mars".into()));
    let (state, _) = update(state, Msg::PageChanged(3));

    assert_eq!(state.request().query, "mars");
    assert_eq!(state.request().page, 3);
    assert!(state.view().has_previous_page);
}

#[test]
fn page_change_clamps_to_one() {
    init_logging();
    let (state, _) = mounted();
    let (state, effects) = update(state, Msg::PageChanged(-3));

    assert_eq!(state.request().page, 1);
    assert_eq!(effects.len(), 1);
}

#[test]
fn previous_page_on_first_page_is_ignored() {
    init_logging();
    let (state, _) = mounted();
    let (state, effects) = update(state, Msg::PreviousPage);

    assert!(effects.is_empty());
    assert_eq!(state.request().page, 1);

    let (state, _) = update(state, Msg::NextPage);
    let (state, effects) = update(state, Msg::PreviousPage);
    assert_eq!(state.request().page, 1);
    assert_eq!(fetch_id(&effects), 3);
}

#[test]
fn every_intent_gets_a_fresh_request_id() {
    init_logging();
    let (state, first) = mounted();
    let (state, e2) = update(state, Msg::SearchSubmitted("a".into()));
    let (state, e3) = update(state, Msg::CategorySelected("health".into()));
    let (state, e4) = update(state, Msg::Refresh);

    assert_eq!(first, 1);
    assert_eq!(fetch_id(&e2), 2);
    assert_eq!(fetch_id(&e3), 3);
    assert_eq!(fetch_id(&e4), 4);
    assert_eq!(state.latest_request_id(), Some(4));
}

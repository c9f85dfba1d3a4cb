use newsfeed_core::{update, FeedState, Msg};

#[test]
fn update_is_noop() {
    let state = FeedState::new();
    let (next, effects) = update(state.clone(), Msg::NoOp);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

#[test]
fn refresh_before_mount_is_noop() {
    let state = FeedState::new();
    let (next, effects) = update(state.clone(), Msg::Refresh);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}

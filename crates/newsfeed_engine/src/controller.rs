use std::sync::Arc;
use std::time::{Duration, Instant};

use newsfeed_core::{update, Effect, FeedState, FeedStatus, FeedViewModel, Msg};
use newsfeed_logging::{feed_debug, feed_info};

use crate::engine::EngineHandle;
use crate::source::{select_source, FeedSource, SourceSettings};
use crate::EngineEvent;

/// Owns the feed state machine and the engine that runs its fetches.
///
/// Intents return immediately with the state in `Loading`. Completions are
/// applied by [`pump`](Self::pump) or [`wait`](Self::wait); only the one
/// belonging to the most recent intent takes effect.
pub struct FeedController {
    state: FeedState,
    engine: EngineHandle,
    source_label: &'static str,
}

impl FeedController {
    pub fn new(source: Arc<dyn FeedSource>) -> Self {
        let source_label = source.label();
        Self {
            state: FeedState::new(),
            engine: EngineHandle::new(source),
            source_label,
        }
    }

    pub fn from_settings(settings: SourceSettings) -> Self {
        Self::new(select_source(settings))
    }

    pub fn source_label(&self) -> &'static str {
        self.source_label
    }

    pub fn mount(&mut self) {
        self.dispatch(Msg::Mounted);
    }

    pub fn search(&mut self, query: impl Into<String>) {
        self.dispatch(Msg::SearchSubmitted(query.into()));
    }

    pub fn select_category(&mut self, category: impl Into<String>) {
        self.dispatch(Msg::CategorySelected(category.into()));
    }

    pub fn set_page(&mut self, page: i64) {
        self.dispatch(Msg::PageChanged(page));
    }

    pub fn next_page(&mut self) {
        self.dispatch(Msg::NextPage);
    }

    pub fn previous_page(&mut self) {
        self.dispatch(Msg::PreviousPage);
    }

    pub fn refresh(&mut self) {
        self.dispatch(Msg::Refresh);
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let stale_before = self.state.stale_discarded();
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        if self.state.stale_discarded() > stale_before {
            feed_debug!("Discarded stale feed response");
        }
        for effect in effects {
            self.run(effect);
        }
    }

    /// Applies every completion that has already arrived. Returns how many
    /// were received, stale ones included.
    pub fn pump(&mut self) -> usize {
        let mut received = 0;
        while let Some(event) = self.engine.try_recv() {
            self.apply(event);
            received += 1;
        }
        received
    }

    /// Blocks until the latest request resolves or `timeout` passes.
    /// Returns whether the controller left `Loading`.
    pub fn wait(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.state.status() == FeedStatus::Loading {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }
            match self.engine.recv_timeout(remaining) {
                Some(event) => self.apply(event),
                None => return false,
            }
        }
        true
    }

    pub fn view(&self) -> FeedViewModel {
        self.state.view()
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    /// Returns whether anything changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    fn run(&self, effect: Effect) {
        match effect {
            Effect::Fetch {
                request_id,
                request,
            } => {
                feed_info!(
                    "Fetch #{} via {} source: {:?} page {}",
                    request_id,
                    self.source_label,
                    request.mode(),
                    request.page
                );
                self.engine.fetch(request_id, request);
            }
        }
    }

    fn apply(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::FeedLoaded { request_id, result } => {
                self.dispatch(Msg::FeedLoaded { request_id, result });
            }
        }
    }
}

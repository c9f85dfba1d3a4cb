//! Newsfeed engine: feed sources, fetch execution and bookmark persistence.
mod bookmarks;
mod controller;
mod engine;
mod fallback;
mod persist;
mod source;
mod types;

pub use bookmarks::{
    load_bookmarks, save_bookmarks, BookmarkSink, BookmarkStore, ChannelBookmarkSink,
};
pub use controller::FeedController;
pub use engine::EngineHandle;
pub use fallback::{demo_articles, FallbackSource};
pub use persist::{
    ensure_data_dir, AtomicFileWriter, BookmarkStorage, FileStorage, MemoryStorage, PersistError,
    BOOKMARKS_KEY,
};
pub use source::{
    select_source, FeedSource, LiveSource, SourceSettings, API_KEY_ENV, BASE_URL_ENV, COUNTRY_ENV,
    DEFAULT_BASE_URL, DEFAULT_COUNTRY,
};
pub use types::{BookmarkEvent, EngineEvent, FailureKind, SourceError};

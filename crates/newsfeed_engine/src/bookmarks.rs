use std::collections::HashSet;
use std::sync::mpsc;

use newsfeed_core::Article;
use newsfeed_logging::{feed_debug, feed_error, feed_info, feed_warn};

use crate::persist::BookmarkStorage;
use crate::BookmarkEvent;

/// Receives bookmark changes after they have been persisted.
pub trait BookmarkSink: Send {
    fn emit(&self, event: BookmarkEvent);
}

pub struct ChannelBookmarkSink {
    tx: mpsc::Sender<BookmarkEvent>,
}

impl ChannelBookmarkSink {
    pub fn new(tx: mpsc::Sender<BookmarkEvent>) -> Self {
        Self { tx }
    }
}

impl BookmarkSink for ChannelBookmarkSink {
    fn emit(&self, event: BookmarkEvent) {
        let _ = self.tx.send(event);
    }
}

/// Reads the persisted bookmark set. Missing or unreadable data yields an
/// empty set; duplicate urls keep their first (newest) entry.
pub fn load_bookmarks(storage: &dyn BookmarkStorage) -> Vec<Article> {
    let content = match storage.read() {
        Ok(Some(text)) => text,
        Ok(None) => return Vec::new(),
        Err(err) => {
            feed_warn!("Failed to read bookmarks: {}", err);
            return Vec::new();
        }
    };

    let stored: Vec<Article> = match serde_json::from_str(&content) {
        Ok(stored) => stored,
        Err(err) => {
            feed_warn!("Discarding corrupt bookmark data: {}", err);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let stored_len = stored.len();
    let bookmarks: Vec<Article> = stored
        .into_iter()
        .filter(|article| seen.insert(article.url.clone()))
        .collect();
    if bookmarks.len() != stored_len {
        feed_warn!(
            "Dropped {} duplicate bookmarks while loading",
            stored_len - bookmarks.len()
        );
    }

    feed_info!("Loaded {} bookmarks", bookmarks.len());
    bookmarks
}

/// Overwrites the slot with `bookmarks` as a JSON array. Failures are
/// logged; returns whether the write landed.
pub fn save_bookmarks(storage: &mut dyn BookmarkStorage, bookmarks: &[Article]) -> bool {
    let content = match serde_json::to_string(bookmarks) {
        Ok(text) => text,
        Err(err) => {
            feed_error!("Failed to serialize bookmarks: {}", err);
            return false;
        }
    };

    match storage.write(&content) {
        Ok(()) => true,
        Err(err) => {
            feed_error!("Failed to write bookmarks: {}", err);
            false
        }
    }
}

/// Saved articles, newest first, unique by url. Every mutation is flushed
/// to storage before it returns.
pub struct BookmarkStore<S: BookmarkStorage> {
    storage: S,
    bookmarks: Vec<Article>,
    sinks: Vec<Box<dyn BookmarkSink>>,
}

impl<S: BookmarkStorage> BookmarkStore<S> {
    pub fn load(storage: S) -> Self {
        let bookmarks = load_bookmarks(&storage);
        Self {
            storage,
            bookmarks,
            sinks: Vec::new(),
        }
    }

    pub fn bookmarks(&self) -> &[Article] {
        &self.bookmarks
    }

    pub fn len(&self) -> usize {
        self.bookmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookmarks.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.bookmarks.iter().any(|saved| saved.url == url)
    }

    pub fn subscribe(&mut self, sink: Box<dyn BookmarkSink>) {
        self.sinks.push(sink);
    }

    /// Prepends `article` unless one with the same url is saved.
    /// Returns whether the set changed.
    pub fn add(&mut self, article: Article) -> bool {
        if self.contains(&article.url) {
            feed_debug!("Bookmark already saved: {}", article.url);
            return false;
        }
        self.bookmarks.insert(0, article.clone());
        self.save();
        self.notify(BookmarkEvent::Added(article));
        true
    }

    /// Removes the entry sharing `article`'s url. Returns whether the set changed.
    pub fn remove(&mut self, article: &Article) -> bool {
        let Some(index) = self
            .bookmarks
            .iter()
            .position(|saved| saved.is_same_as(article))
        else {
            return false;
        };
        let removed = self.bookmarks.remove(index);
        self.save();
        self.notify(BookmarkEvent::Removed(removed));
        true
    }

    /// Adds when absent, removes when present. Returns whether the article
    /// is bookmarked afterwards.
    pub fn toggle(&mut self, article: Article) -> bool {
        if self.contains(&article.url) {
            self.remove(&article);
            false
        } else {
            self.add(article);
            true
        }
    }

    /// Writes the full set to storage. On failure the in-memory set stays
    /// authoritative for the rest of the session.
    pub fn save(&mut self) {
        save_bookmarks(&mut self.storage, &self.bookmarks);
    }

    fn notify(&self, event: BookmarkEvent) {
        for sink in &self.sinks {
            sink.emit(event.clone());
        }
    }
}

use std::fmt::Write as _;
use std::path::Path;
use std::time::Duration;

use anyhow::{bail, Context};
use newsfeed_core::{Article, FeedStatus, FeedViewModel};
use newsfeed_engine::{ensure_data_dir, BookmarkStorage, BookmarkStore, FeedController, FileStorage};
use newsfeed_logging::{feed_info, feed_warn};

use crate::cli::FeedArgs;

/// What the user asked the feed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedIntent {
    Headlines,
    Search(String),
    Category(String),
}

/// Opens the bookmark file under `data_dir`. An unusable directory leaves
/// the session with an in-memory set; the feed commands keep working.
pub fn open_bookmarks(data_dir: &Path) -> BookmarkStore<FileStorage> {
    match ensure_data_dir(data_dir) {
        Ok(()) => feed_info!("Bookmarks live in {}", data_dir.display()),
        Err(err) => feed_warn!(
            "Cannot use data directory {}: {}; bookmarks will not be saved",
            data_dir.display(),
            err
        ),
    }
    BookmarkStore::load(FileStorage::new(data_dir))
}

pub fn show_feed<S: BookmarkStorage>(
    controller: &mut FeedController,
    bookmarks: &mut BookmarkStore<S>,
    intent: FeedIntent,
    args: FeedArgs,
    wait: Duration,
) -> anyhow::Result<()> {
    match intent {
        FeedIntent::Headlines => controller.mount(),
        FeedIntent::Search(query) => controller.search(query),
        FeedIntent::Category(name) => controller.select_category(name),
    }
    // Paging supersedes the first request; its response is discarded on arrival.
    if args.page != 1 {
        controller.set_page(args.page);
    }

    if !controller.wait(wait) {
        bail!("no answer from the {} source within {:?}", controller.source_label(), wait);
    }

    let view = controller.view();
    print!("{}", render_feed(&view, |url| bookmarks.contains(url)));

    if let Some(index) = args.bookmark {
        let article = pick(&view, index)?;
        if bookmarks.add(article.clone()) {
            println!("Saved: {}", article.title);
        } else {
            println!("Already saved: {}", article.title);
        }
    }
    Ok(())
}

pub fn list_bookmarks<S: BookmarkStorage>(bookmarks: &BookmarkStore<S>) {
    if bookmarks.is_empty() {
        println!("No bookmarks yet.");
        return;
    }
    let mut out = String::new();
    for (position, article) in bookmarks.bookmarks().iter().enumerate() {
        render_article(&mut out, position + 1, article, false);
    }
    print!("{out}");
}

pub fn unbookmark<S: BookmarkStorage>(bookmarks: &mut BookmarkStore<S>, url: &str) {
    let saved = bookmarks
        .bookmarks()
        .iter()
        .find(|article| article.url == url)
        .cloned();
    match saved {
        Some(article) => {
            bookmarks.remove(&article);
            feed_info!("Removed bookmark {}", url);
            println!("Removed: {}", article.title);
        }
        None => println!("Not bookmarked: {url}"),
    }
}

fn pick(view: &FeedViewModel, index: usize) -> anyhow::Result<&Article> {
    index
        .checked_sub(1)
        .and_then(|i| view.articles.get(i))
        .with_context(|| {
            format!(
                "cannot bookmark article {index}: the page has {} articles",
                view.articles.len()
            )
        })
}

fn render_feed(view: &FeedViewModel, is_bookmarked: impl Fn(&str) -> bool) -> String {
    let mut out = String::new();
    match view.status {
        FeedStatus::Errored => {
            let _ = writeln!(out, "Error: {}", view.error.as_deref().unwrap_or("unknown error"));
            return out;
        }
        FeedStatus::Idle | FeedStatus::Loading => {
            let _ = writeln!(out, "Loading news...");
            return out;
        }
        FeedStatus::Loaded => {}
    }

    if view.articles.is_empty() {
        let _ = writeln!(out, "No news found.");
    }
    for (position, article) in view.articles.iter().enumerate() {
        render_article(&mut out, position + 1, article, is_bookmarked(&article.url));
    }
    let _ = writeln!(
        out,
        "Page {} - {} results",
        view.request.page, view.total_results
    );
    out
}

fn render_article(out: &mut String, position: usize, article: &Article, saved: bool) {
    let marker = if saved { "*" } else { " " };
    let _ = writeln!(out, "{marker}[{position}] {}", article.title);
    let _ = writeln!(
        out,
        "     {} | {} | {}",
        article.source_name,
        article.published_at.format("%Y-%m-%d"),
        article.url
    );
    if let Some(description) = article.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "     {description}");
    }
    let _ = writeln!(out, "     image: {}", article.image_or_placeholder());
}

use std::fs;

use chrono::{TimeZone, Utc};
use newsfeed_core::Article;
use newsfeed_engine::{
    ensure_data_dir, AtomicFileWriter, BookmarkStorage, BookmarkStore, FileStorage,
};
use tempfile::TempDir;

#[test]
fn creates_missing_data_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("data");
    assert!(!new_dir.exists());
    ensure_data_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
}

#[test]
fn atomic_write_replaces_existing() {
    let temp = TempDir::new().unwrap();
    let writer = AtomicFileWriter::new(temp.path().to_path_buf());

    let first = writer.write("slot.json", "[]").unwrap();
    assert_eq!(first.file_name().unwrap(), "slot.json");
    assert_eq!(fs::read_to_string(&first).unwrap(), "[]");

    let second = writer.write("slot.json", "[1]").unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read_to_string(&second).unwrap(), "[1]");
}

#[test]
fn no_partial_file_on_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();

    let writer = AtomicFileWriter::new(file_path.clone());
    let result = writer.write("slot.json", "data");
    assert!(result.is_err());
    assert!(!file_path.with_file_name("slot.json").exists());
}

#[test]
fn file_storage_reads_none_before_first_write() {
    let temp = TempDir::new().unwrap();
    let storage = FileStorage::new(temp.path().join("fresh"));
    assert!(storage.read().unwrap().is_none());
}

#[test]
fn bookmarks_survive_a_restart() {
    let temp = TempDir::new().unwrap();
    let published = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).single().unwrap();

    {
        let mut store = BookmarkStore::load(FileStorage::new(temp.path()));
        store.add(Article::new("https://a", "A", published));
        store.add(Article::new("https://b", "B", published));
    }

    let storage = FileStorage::new(temp.path());
    assert!(storage.path().ends_with("news_bookmarks_v1.json"));
    let raw = fs::read_to_string(storage.path()).unwrap();
    assert!(raw.starts_with('['));

    let reloaded = BookmarkStore::load(storage);
    let urls: Vec<_> = reloaded.bookmarks().iter().map(|a| a.url.as_str()).collect();
    assert_eq!(urls, vec!["https://b", "https://a"]);
    assert_eq!(reloaded.bookmarks()[0].published_at, published);
}

#[test]
fn unwritable_location_does_not_break_store() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();

    let mut store = BookmarkStore::load(FileStorage::new(&blocker));
    let published = Utc.with_ymd_and_hms(2024, 2, 3, 4, 5, 6).single().unwrap();
    assert!(store.add(Article::new("https://a", "A", published)));
    assert!(store.contains("https://a"));
}

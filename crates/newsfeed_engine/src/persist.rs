use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Fixed key of the slot holding the serialized bookmark set.
pub const BOOKMARKS_KEY: &str = "news_bookmarks_v1";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("data directory missing or not writable: {0}")]
    DataDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Ensure data directory exists; create if missing.
pub fn ensure_data_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::DataDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::DataDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_data_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Port to the single durable slot the bookmark set lives in.
pub trait BookmarkStorage: Send {
    /// `Ok(None)` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>, PersistError>;
    /// Replaces the slot's content.
    fn write(&mut self, payload: &str) -> Result<(), PersistError>;
}

/// Stores the slot as `{dir}/news_bookmarks_v1.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(Self::filename())
    }

    fn filename() -> String {
        format!("{BOOKMARKS_KEY}.json")
    }
}

impl BookmarkStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path()) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&mut self, payload: &str) -> Result<(), PersistError> {
        AtomicFileWriter::new(self.dir.clone()).write(&Self::filename(), payload)?;
        Ok(())
    }
}

/// In-process slot. Clones share the same slot, so a test can keep a handle
/// and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(payload: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(payload.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl BookmarkStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, PersistError> {
        Ok(self.contents())
    }

    fn write(&mut self, payload: &str) -> Result<(), PersistError> {
        *self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(payload.to_string());
        Ok(())
    }
}

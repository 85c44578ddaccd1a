//! Journal persistence: key-value store port, local save/load and JSON
//! export/import.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use thiserror::Error;

use super::journal::Journal;

/// Key the current journal is stored under
pub const STORAGE_KEY: &str = "travelJournal_v1";
/// Suggested file name for exports
pub const EXPORT_FILE_NAME: &str = "travel-journal.json";

/// A journal document that could not be accepted
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("invalid journal JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("journal document is missing `{0}`")]
    MissingField(&'static str),
    #[error("journal document has no pages")]
    NoPages,
    #[error("failed to read journal file: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable string storage addressed by key
pub trait KeyValueStore {
    /// Read a value, `None` when the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Store keeping one `<key>.json` file per key inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted in the platform data directory
    pub fn default_location() -> Option<Self> {
        ProjectDirs::from("com", "travel-journal", "TravelJournal")
            .map(|dirs| Self::new(dirs.data_dir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let value = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read store entry: {}", path.display()))?;
        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create store directory: {}", self.dir.display()))?;
        let path = self.path_for(key);
        fs::write(&path, value)
            .with_context(|| format!("Failed to write store entry: {}", path.display()))?;
        Ok(())
    }
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Outcome of a save request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing was written because the journal has no pages
    SkippedEmpty,
}

/// Saves and restores the current journal through a key-value store
#[derive(Debug)]
pub struct JournalStore<S> {
    store: S,
}

impl<S: KeyValueStore> JournalStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    /// Persist the journal. Empty journals are never written so that a
    /// fresh start cannot clobber a previous save.
    pub fn save(&mut self, journal: &Journal) -> Result<SaveOutcome> {
        if journal.is_empty() {
            return Ok(SaveOutcome::SkippedEmpty);
        }
        let content = serde_json::to_string(journal).context("Failed to serialize journal")?;
        self.store.set(STORAGE_KEY, &content)?;
        tracing::debug!("Saved journal ({} pages)", journal.pages.len());
        Ok(SaveOutcome::Saved)
    }

    /// Restore the saved journal, if there is a usable one
    pub fn load(&self) -> Option<Journal> {
        let content = match self.store.get(STORAGE_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => return None,
            Err(e) => {
                tracing::error!("Failed to read stored journal: {:#}", e);
                return None;
            }
        };

        match parse_document(&content) {
            Ok(journal) => {
                tracing::info!("Restored journal \"{}\"", journal.config.title);
                Some(journal)
            }
            Err(e) => {
                tracing::warn!("Ignoring stored journal: {}", e);
                None
            }
        }
    }
}

/// Parse a journal document, checking that both top-level parts exist
pub fn parse_document(content: &str) -> Result<Journal, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    for field in ["pages", "journalConfig"] {
        if value.get(field).map_or(true, serde_json::Value::is_null) {
            return Err(DocumentError::MissingField(field));
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Pretty-printed JSON for export
pub fn export_document(journal: &Journal) -> Result<String> {
    serde_json::to_string_pretty(journal).context("Failed to serialize journal")
}

/// Write an export file
pub fn export_to_file(journal: &Journal, path: &Path) -> Result<()> {
    let content = export_document(journal)?;
    fs::write(path, content)
        .with_context(|| format!("Failed to write export: {}", path.display()))?;
    tracing::info!("Exported journal to: {}", path.display());
    Ok(())
}

/// Parse an imported document. Unlike a stored journal, an import must
/// carry at least one page.
pub fn import_document(content: &str) -> Result<Journal, DocumentError> {
    let journal = parse_document(content)?;
    if journal.is_empty() {
        return Err(DocumentError::NoPages);
    }
    Ok(journal)
}

/// Read and parse an import file
pub fn import_from_file(path: &Path) -> Result<Journal, DocumentError> {
    let content = fs::read_to_string(path)?;
    let journal = import_document(&content)?;
    tracing::info!("Imported journal from: {}", path.display());
    Ok(journal)
}

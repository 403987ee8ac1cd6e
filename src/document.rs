use std::cell::{Cell, RefCell};
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A stored academic document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub title: String,
    /// Serialized markup
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub word_count: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Storage for the ordered document collection
pub trait DocumentRepository {
    /// Load every record in stored order
    fn load_all(&self) -> Result<Vec<Document>>;

    /// Replace the stored collection
    fn save_all(&self, documents: &[Document]) -> Result<()>;
}

/// The collection as a flat JSON array in a single file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentRepository for JsonFileStore {
    /// A missing or unreadable collection loads as no documents
    fn load_all(&self) -> Result<Vec<Document>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        match serde_json::from_str(&raw) {
            Ok(documents) => Ok(documents),
            Err(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "could not parse document collection, starting empty"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Creates parent directories if they don't exist
    fn save_all(&self, documents: &[Document]) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(documents)?;
        fs::write(&self.path, json)?;
        tracing::debug!(path = %self.path.display(), count = documents.len(), "saved documents");
        Ok(())
    }
}

/// In-process storage, mostly for tests and dry runs
#[derive(Default)]
pub struct MemoryStore {
    documents: RefCell<Vec<Document>>,
    saves: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        MemoryStore {
            documents: RefCell::new(documents),
            saves: Cell::new(0),
        }
    }

    /// How many times the collection was written
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }
}

impl DocumentRepository for MemoryStore {
    fn load_all(&self) -> Result<Vec<Document>> {
        Ok(self.documents.borrow().clone())
    }

    fn save_all(&self, documents: &[Document]) -> Result<()> {
        *self.documents.borrow_mut() = documents.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn sample() -> Document {
        Document {
            id: "doc-1".to_string(),
            title: "Tez".to_string(),
            content: "<h1>Tez</h1>".to_string(),
            last_modified: Utc.timestamp_millis_opt(1_700_000_000_123).unwrap(),
            word_count: 1,
            preview: Some("Tez".to_string()),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["lastModified"], 1_700_000_000_123i64);
        assert_eq!(json["wordCount"], 1);
        assert_eq!(json["preview"], "Tez");
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let doc: Document = serde_json::from_str(
            r#"{"id":"a","title":"T","content":"","lastModified":0}"#,
        )
        .unwrap();
        assert_eq!(doc.word_count, 0);
        assert_eq!(doc.preview, None);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("none.json"));
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_load_corrupt_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("docs.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(path);
        assert!(store.load_all().unwrap().is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested/dir/docs.json"));

        store.save_all(&[sample()]).unwrap();

        assert!(store.path().exists());
        assert_eq!(store.load_all().unwrap(), vec![sample()]);
    }

    #[test]
    fn test_memory_store_counts_saves() {
        let store = MemoryStore::new();
        store.save_all(&[sample()]).unwrap();
        store.save_all(&[]).unwrap();
        assert_eq!(store.save_count(), 2);
        assert!(store.load_all().unwrap().is_empty());
    }
}

//! JSON file document store.
//!
//! The whole collection is one pretty-printed JSON array. Every write goes
//! through [`write_atomic`], so a crash leaves either the previous document
//! or the new one, never a mix.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, warn};

use super::traits::DocumentStore;
use super::types::NoteDocument;
use crate::error::{LockNoteError, Result};
use crate::fs::{temp_sibling, write_atomic};

/// Note document backed by a single JSON file.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating parent directories and an empty
    /// document if needed.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LockNoteError::Storage(format!(
                    "Failed to create notes directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let store = Self {
            path,
            lock: Mutex::new(()),
        };
        {
            let _guard = store.lock_file()?;
            store.ensure_exists()?;
        }
        Ok(store)
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_file(&self) -> Result<MutexGuard<'_, ()>> {
        self.lock
            .lock()
            .map_err(|_| LockNoteError::Storage("Note document lock poisoned".to_string()))
    }

    fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        self.persist(&NoteDocument::new())?;
        info!(path = %self.path.display(), "created empty notes document");
        Ok(true)
    }

    /// Read the document. Caller must hold `self.lock`.
    fn read(&self) -> Result<NoteDocument> {
        if self.ensure_exists()? {
            return Ok(NoteDocument::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| {
            LockNoteError::Storage(format!(
                "Failed to read notes document {}: {}",
                self.path.display(),
                e
            ))
        })?;

        match serde_json::from_slice::<NoteDocument>(&bytes) {
            Ok(document) => {
                debug!(notes = document.len(), "loaded notes document");
                Ok(document)
            }
            Err(err) => {
                let quarantine = self.quarantine()?;
                self.persist(&NoteDocument::new())?;
                warn!(
                    error = %err,
                    moved_to = %quarantine.display(),
                    "notes document is unreadable; starting from an empty collection"
                );
                Ok(NoteDocument::new())
            }
        }
    }

    /// Move an unreadable document aside so the next write cannot clobber it.
    fn quarantine(&self) -> Result<PathBuf> {
        let target = temp_sibling(&self.path, "corrupt")?;
        fs::rename(&self.path, &target).map_err(|e| {
            LockNoteError::Storage(format!(
                "Failed to move unreadable document to {}: {}",
                target.display(),
                e
            ))
        })?;
        Ok(target)
    }

    /// Write the document. Caller must hold `self.lock`.
    fn persist(&self, document: &NoteDocument) -> Result<()> {
        let mut bytes = serde_json::to_vec_pretty(document)?;
        bytes.push(b'\n');
        write_atomic(&self.path, &bytes)?;
        debug!(notes = document.len(), "persisted notes document");
        Ok(())
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<NoteDocument> {
        let _guard = self.lock_file()?;
        self.read()
    }

    fn transaction<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut NoteDocument) -> Result<T>,
    {
        let _guard = self.lock_file()?;
        let mut document = self.read()?;
        let output = apply(&mut document)?;
        self.persist(&document)?;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{make_preview, NoteRecord};
    use tempfile::tempdir;

    fn record(id: i64, content: &str) -> NoteRecord {
        NoteRecord {
            id,
            content: content.to_string(),
            preview: make_preview(content),
            locked: false,
            iv: None,
            encrypted_data: None,
            password_hash: None,
            created_at: id,
            updated_at: id,
            deleted_at: None,
            pinned: false,
            tags: vec!["t".to_string()],
        }
    }

    #[test]
    fn test_open_creates_empty_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("notes.json");

        let store = JsonFileStore::open(&path).unwrap();

        assert!(path.exists());
        let on_disk: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk, serde_json::json!([]));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_load_recreates_deleted_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let store = JsonFileStore::open(&path).unwrap();

        fs::remove_file(&path).unwrap();

        assert!(store.load().unwrap().is_empty());
        assert!(path.exists());
    }

    #[test]
    fn test_transaction_persists_full_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let store = JsonFileStore::open(&path).unwrap();

        store
            .transaction(|doc| {
                doc.upsert(record(1, "first"));
                doc.upsert(record(2, "second"));
                Ok(())
            })
            .unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        let doc = reopened.load().unwrap();
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.get(2).unwrap().content, "second");
    }

    #[test]
    fn test_failed_transaction_leaves_file_untouched() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let store = JsonFileStore::open(&path).unwrap();
        store
            .transaction(|doc| {
                doc.upsert(record(1, "keep"));
                Ok(())
            })
            .unwrap();
        let before = fs::read(&path).unwrap();

        let result: Result<()> = store.transaction(|doc| {
            doc.remove(1);
            Err(LockNoteError::NotFound(99))
        });

        assert!(result.is_err());
        assert_eq!(fs::read(&path).unwrap(), before);
    }

    #[test]
    fn test_corrupt_document_served_empty_and_preserved() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        fs::write(&path, "{ this is not json").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        let doc = store.load().unwrap();
        assert!(doc.is_empty());

        let preserved: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".corrupt"))
            .collect();
        assert_eq!(preserved.len(), 1);
        assert_eq!(
            fs::read_to_string(preserved[0].path()).unwrap(),
            "{ this is not json"
        );
        assert!(path.exists());
    }

    #[test]
    fn test_written_json_uses_camel_case() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("notes.json");
        let store = JsonFileStore::open(&path).unwrap();
        store
            .transaction(|doc| {
                doc.upsert(record(5, "hello"));
                Ok(())
            })
            .unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"createdAt\": 5"));
        assert!(text.contains("\"updatedAt\": 5"));
        assert!(text.ends_with("]\n"));
    }
}

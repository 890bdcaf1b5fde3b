//! In-memory document store.

use std::sync::{Mutex, MutexGuard};

use super::traits::DocumentStore;
use super::types::NoteDocument;
use crate::error::{LockNoteError, Result};

/// A document held in memory behind a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    document: Mutex<NoteDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: NoteDocument) -> Self {
        Self {
            document: Mutex::new(document),
        }
    }

    fn lock_document(&self) -> Result<MutexGuard<'_, NoteDocument>> {
        self.document
            .lock()
            .map_err(|_| LockNoteError::Storage("Note document lock poisoned".to_string()))
    }
}

impl DocumentStore for MemoryStore {
    fn load(&self) -> Result<NoteDocument> {
        Ok(self.lock_document()?.clone())
    }

    fn transaction<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut NoteDocument) -> Result<T>,
    {
        let mut guard = self.lock_document()?;
        let mut working = guard.clone();
        let output = apply(&mut working)?;
        *guard = working;
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::types::{make_preview, NoteRecord};

    fn record(id: i64) -> NoteRecord {
        NoteRecord {
            id,
            content: "body".to_string(),
            preview: make_preview("body"),
            locked: false,
            iv: None,
            encrypted_data: None,
            password_hash: None,
            created_at: 0,
            updated_at: 0,
            deleted_at: None,
            pinned: false,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_transaction_commits() {
        let store = MemoryStore::new();
        store
            .transaction(|doc| {
                doc.upsert(record(1));
                Ok(())
            })
            .unwrap();
        assert!(store.load().unwrap().contains(1));
    }

    #[test]
    fn test_failed_transaction_persists_nothing() {
        let store = MemoryStore::with_document(NoteDocument::from(vec![record(1)]));
        let result: Result<()> = store.transaction(|doc| {
            doc.remove(1);
            doc.upsert(record(2));
            Err(LockNoteError::Validation("abort".to_string()))
        });
        assert!(result.is_err());

        let doc = store.load().unwrap();
        assert!(doc.contains(1));
        assert!(!doc.contains(2));
    }
}

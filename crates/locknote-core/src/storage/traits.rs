//! Document store trait definition.
//!
//! A `DocumentStore` owns the persisted note collection. Callers never hold
//! the document across calls; they read a snapshot with `load` or mutate
//! it inside `transaction`.

use super::types::NoteDocument;
use crate::error::Result;

/// Storage interface for the note document.
///
/// All implementations must ensure:
/// - Every visible write is a complete, valid document
/// - Transactions are serialized: no two load-modify-persist cycles interleave
/// - A transaction that fails persists nothing
pub trait DocumentStore: Send + Sync {
    /// Read the current document.
    ///
    /// A missing backing document is created empty. An unparseable one is
    /// served as empty rather than returned as an error.
    fn load(&self) -> Result<NoteDocument>;

    /// Load the document, apply `apply`, and persist the result.
    ///
    /// If `apply` returns an error the document is left untouched and the
    /// error is returned.
    ///
    /// # Errors
    ///
    /// Returns `LockNoteError::Storage` if the document cannot be written.
    fn transaction<T, F>(&self, apply: F) -> Result<T>
    where
        F: FnOnce(&mut NoteDocument) -> Result<T>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_definition_compiles() {
        fn _accepts_document_store<T: DocumentStore>(_store: T) {}
    }
}

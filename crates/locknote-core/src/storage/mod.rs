//! Storage layer for LockNote.
//!
//! All notes, active and trashed, live in one JSON document. A
//! `DocumentStore` is the sole reader and writer of that document and runs
//! every mutation as a serialized load-modify-persist transaction.
//!
//! - `JsonFileStore`: the on-disk document, replaced atomically on each write
//! - `MemoryStore`: an in-memory document for tests and embedding

pub mod json_file;
pub mod memory;
pub mod tags;
pub mod traits;
pub mod types;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use tags::normalize_tags;
pub use traits::DocumentStore;
pub use types::{
    make_preview, Lifecycle, Note, NoteDocument, NoteRecord, NoteState, Sealed,
    LOCKED_PLACEHOLDER, PREVIEW_CHARS,
};

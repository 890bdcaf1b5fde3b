//! # LockNote Core
//!
//! Core library for LockNote - a local note manager where any note can be
//! locked behind a password and encrypted at rest.
//!
//! This crate owns the secure note store: encryption, password hashing and
//! the crash-consistent persistence of every note to a single JSON document.
//! It is independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **crypto**: master key, AES-256-CBC cipher engine, Argon2 password hasher
//! - **storage**: note records, tag normalization, document stores
//! - **service**: the note state machine (save, edit, unlock, trash, pin)
//! - **fs**: atomic file replacement

pub mod crypto;
pub mod error;
pub mod fs;
pub mod service;
pub mod storage;

pub use error::{ErrorKind, LockNoteError, Result};
pub use service::{NoteService, NoteView, Outcome, SaveNote};
pub use storage::{DocumentStore, JsonFileStore, MemoryStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Sanitized output crossing the service boundary.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{ErrorKind, LockNoteError, Result};
use crate::storage::{make_preview, Note, NoteRecord, LOCKED_PLACEHOLDER};

/// A note as returned to callers.
///
/// Never carries `iv`, `encryptedData` or `passwordHash`. Locked notes show
/// the placeholder unless this view was produced by a successful unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteView {
    pub id: i64,
    pub content: String,
    pub preview: String,
    pub locked: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,
    pub pinned: bool,
    pub tags: Vec<String>,
}

impl NoteView {
    /// View of a stored record with locked content and preview masked.
    pub fn masked(record: &NoteRecord) -> Self {
        let (content, preview) = if record.locked {
            (LOCKED_PLACEHOLDER.to_string(), LOCKED_PLACEHOLDER.to_string())
        } else {
            (record.content.clone(), record.preview.clone())
        };
        Self {
            id: record.id,
            content,
            preview,
            locked: record.locked,
            created_at: record.created_at,
            updated_at: record.updated_at,
            deleted_at: record.deleted_at,
            pinned: record.pinned,
            tags: record.tags.clone(),
        }
    }

    /// View of a note whose content was just decrypted by this call.
    pub(crate) fn revealed(note: Note, plaintext: String) -> Self {
        let mut view = Self::masked(&NoteRecord::from(note));
        view.preview = make_preview(&plaintext);
        view.content = plaintext;
        view
    }
}

impl From<&NoteRecord> for NoteView {
    fn from(record: &NoteRecord) -> Self {
        Self::masked(record)
    }
}

impl From<Note> for NoteView {
    fn from(note: Note) -> Self {
        Self::masked(&NoteRecord::from(note))
    }
}

/// Tagged result handed to the presentation layer.
///
/// Serializes as `{"success": true, "note": ...}` or
/// `{"success": false, "kind": "...", "error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Success(T),
    Failure { kind: ErrorKind, error: String },
}

impl<T> Outcome<T> {
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure { kind, .. } => Some(*kind),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(value) => Outcome::Success(value),
            Err(err) => Outcome::from(err),
        }
    }
}

impl<T> From<LockNoteError> for Outcome<T> {
    fn from(err: LockNoteError) -> Self {
        Outcome::Failure {
            kind: err.kind(),
            error: err.to_string(),
        }
    }
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Outcome::Success(value) => {
                let mut state = serializer.serialize_struct("Outcome", 2)?;
                state.serialize_field("success", &true)?;
                state.serialize_field("note", value)?;
                state.end()
            }
            Outcome::Failure { kind, error } => {
                let mut state = serializer.serialize_struct("Outcome", 3)?;
                state.serialize_field("success", &false)?;
                state.serialize_field("kind", kind)?;
                state.serialize_field("error", error)?;
                state.end()
            }
        }
    }
}

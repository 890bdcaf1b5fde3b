//! Note data model.
//!
//! `NoteRecord` is the flat shape persisted in the JSON document. `Note` is
//! the same note with its lock and trash status lifted into explicit
//! variants; the service works on `Note` and converts back before writing.

use serde::{Deserialize, Serialize};

use crate::error::{LockNoteError, Result};

/// Stand-in content stored and returned for locked notes.
pub const LOCKED_PLACEHOLDER: &str = "Locked Note";

/// Maximum characters in a note preview.
pub const PREVIEW_CHARS: usize = 10;

/// Collapse whitespace runs and keep the first [`PREVIEW_CHARS`] characters.
pub fn make_preview(content: &str) -> String {
    content
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(PREVIEW_CHARS)
        .collect()
}

/// One note as persisted on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteRecord {
    /// Unique identifier (millisecond timestamp at creation)
    #[serde(alias = "noteId")]
    pub id: i64,

    /// Plaintext, or [`LOCKED_PLACEHOLDER`] when locked
    pub content: String,

    /// Whitespace-collapsed prefix of the content
    #[serde(default)]
    pub preview: String,

    /// True iff the real content is encrypted at rest
    #[serde(default)]
    pub locked: bool,

    /// Hex-encoded CBC IV (locked only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,

    /// Hex-encoded ciphertext (locked only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted_data: Option<String>,

    /// PHC password hash (locked only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,

    #[serde(default)]
    pub created_at: i64,

    #[serde(default)]
    pub updated_at: i64,

    /// Set while the note is in the trash
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<i64>,

    #[serde(default)]
    pub pinned: bool,

    #[serde(default)]
    pub tags: Vec<String>,
}

impl NoteRecord {
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Encryption fields of a locked note. Always present together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub iv: String,
    pub encrypted_data: String,
    pub password_hash: String,
}

/// Whether a note's content is readable at rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteState {
    Unlocked { content: String },
    Locked(Sealed),
}

impl NoteState {
    pub fn is_locked(&self) -> bool {
        matches!(self, NoteState::Locked(_))
    }

    pub fn sealed(&self) -> Option<&Sealed> {
        match self {
            NoteState::Locked(sealed) => Some(sealed),
            NoteState::Unlocked { .. } => None,
        }
    }

    /// Password hash of a locked note.
    pub fn password_hash(&self) -> Option<&str> {
        self.sealed().map(|sealed| sealed.password_hash.as_str())
    }
}

/// Whether a note is live or in the trash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Active,
    Trashed { deleted_at: i64 },
}

/// A note with its state made explicit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub state: NoteState,
    pub preview: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub lifecycle: Lifecycle,
    pub pinned: bool,
    pub tags: Vec<String>,
}

impl Note {
    /// Fail with `Trashed` unless the note is active.
    pub fn ensure_active(&self) -> Result<()> {
        match self.lifecycle {
            Lifecycle::Active => Ok(()),
            Lifecycle::Trashed { .. } => Err(LockNoteError::Trashed(self.id)),
        }
    }

    pub fn is_trashed(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Trashed { .. })
    }

    /// Replace the content state, refreshing preview and timestamp.
    ///
    /// `content` is the plaintext the new state represents. It only feeds the
    /// preview of an unlocked note; a locked note previews the placeholder.
    pub fn set_state(&mut self, state: NoteState, content: &str, now: i64) {
        self.preview = if state.is_locked() {
            LOCKED_PLACEHOLDER.to_string()
        } else {
            make_preview(content)
        };
        self.state = state;
        self.updated_at = now;
    }

    /// Move the note to the trash. Crypto state is untouched.
    pub fn soft_delete(&mut self, now: i64) -> Result<()> {
        self.ensure_active()?;
        self.lifecycle = Lifecycle::Trashed { deleted_at: now };
        self.updated_at = now;
        Ok(())
    }

    /// Bring a trashed note back. Returns false if it was already active.
    pub fn restore(&mut self, now: i64) -> bool {
        if !self.is_trashed() {
            return false;
        }
        self.lifecycle = Lifecycle::Active;
        self.updated_at = now;
        true
    }

    pub fn set_pinned(&mut self, pinned: bool, now: i64) -> Result<()> {
        self.ensure_active()?;
        self.pinned = pinned;
        self.updated_at = now;
        Ok(())
    }
}

impl TryFrom<NoteRecord> for Note {
    type Error = LockNoteError;

    fn try_from(record: NoteRecord) -> Result<Self> {
        let state = match (
            record.locked,
            record.iv,
            record.encrypted_data,
            record.password_hash,
        ) {
            (true, Some(iv), Some(encrypted_data), Some(password_hash)) => {
                NoteState::Locked(Sealed {
                    iv,
                    encrypted_data,
                    password_hash,
                })
            }
            (false, None, None, None) => NoteState::Unlocked {
                content: record.content,
            },
            _ => {
                return Err(LockNoteError::Storage(format!(
                    "Note {} has inconsistent encryption fields",
                    record.id
                )))
            }
        };

        let lifecycle = match record.deleted_at {
            Some(deleted_at) => Lifecycle::Trashed { deleted_at },
            None => Lifecycle::Active,
        };

        Ok(Note {
            id: record.id,
            state,
            preview: record.preview,
            created_at: record.created_at,
            updated_at: record.updated_at,
            lifecycle,
            pinned: record.pinned,
            tags: record.tags,
        })
    }
}

impl From<Note> for NoteRecord {
    fn from(note: Note) -> Self {
        let (locked, content, preview, iv, encrypted_data, password_hash) = match note.state {
            NoteState::Unlocked { content } => (false, content, note.preview, None, None, None),
            NoteState::Locked(sealed) => (
                true,
                LOCKED_PLACEHOLDER.to_string(),
                LOCKED_PLACEHOLDER.to_string(),
                Some(sealed.iv),
                Some(sealed.encrypted_data),
                Some(sealed.password_hash),
            ),
        };
        let deleted_at = match note.lifecycle {
            Lifecycle::Active => None,
            Lifecycle::Trashed { deleted_at } => Some(deleted_at),
        };

        NoteRecord {
            id: note.id,
            content,
            preview,
            locked,
            iv,
            encrypted_data,
            password_hash,
            created_at: note.created_at,
            updated_at: note.updated_at,
            deleted_at,
            pinned: note.pinned,
            tags: note.tags,
        }
    }
}

/// The full persisted collection. Order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteDocument {
    notes: Vec<NoteRecord>,
}

impl NoteDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NoteRecord> {
        self.notes.iter()
    }

    pub fn get(&self, id: i64) -> Option<&NoteRecord> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn contains(&self, id: i64) -> bool {
        self.get(id).is_some()
    }

    /// Replace the record with the same id, or append it.
    pub fn upsert(&mut self, record: NoteRecord) {
        match self.notes.iter_mut().find(|note| note.id == record.id) {
            Some(existing) => *existing = record,
            None => self.notes.push(record),
        }
    }

    pub fn remove(&mut self, id: i64) -> Option<NoteRecord> {
        let index = self.notes.iter().position(|note| note.id == id)?;
        Some(self.notes.remove(index))
    }

    /// Remove every record matching `predicate`, returning the removed records.
    pub fn remove_where(&mut self, predicate: impl Fn(&NoteRecord) -> bool) -> Vec<NoteRecord> {
        let (removed, kept): (Vec<NoteRecord>, Vec<NoteRecord>) = std::mem::take(&mut self.notes)
            .into_iter()
            .partition(|note| predicate(note));
        self.notes = kept;
        removed
    }

    /// First id at or after `candidate` that no record uses.
    pub fn unused_id(&self, candidate: i64) -> Result<i64> {
        let mut id = candidate;
        while self.contains(id) {
            id = id
                .checked_add(1)
                .ok_or_else(|| LockNoteError::Storage("Note id space exhausted".to_string()))?;
        }
        Ok(id)
    }
}

impl From<Vec<NoteRecord>> for NoteDocument {
    fn from(notes: Vec<NoteRecord>) -> Self {
        Self { notes }
    }
}

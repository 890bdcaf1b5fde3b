//! The note service: the lock/unlock/edit/trash state machine.
//!
//! Every mutating operation runs as one `DocumentStore` transaction and
//! returns a sanitized [`NoteView`]. Encryption and hashing happen before
//! the transaction opens so the document lock is held only for the
//! read-modify-write itself.

mod request;
mod view;

use chrono::Utc;
use tracing::{info, warn};

use crate::crypto::{normalize_password, CipherEngine, PasswordHasher};
use crate::error::{LockNoteError, Result};
use crate::storage::{
    normalize_tags, DocumentStore, Lifecycle, Note, NoteDocument, NoteRecord,
    NoteState, Sealed,
};

pub use request::SaveNote;
pub use view::{NoteView, Outcome};

const PASSWORD_REQUIRED: &str = "Password is required to lock this note";

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Orchestrates cipher, hasher and document store.
pub struct NoteService<S: DocumentStore> {
    store: S,
    cipher: CipherEngine,
    hasher: PasswordHasher,
}

impl<S: DocumentStore> NoteService<S> {
    pub fn new(store: S, cipher: CipherEngine, hasher: PasswordHasher) -> Self {
        Self {
            store,
            cipher,
            hasher,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Create a note, or overwrite the note with `request.id` in place.
    ///
    /// Overwriting keeps `createdAt` and `pinned`. Saving without `lock`
    /// drops any previous encryption fields.
    ///
    /// # Errors
    ///
    /// - `Validation` if content is empty, or `lock` is set without a password
    /// - `Trashed` if `request.id` names a trashed note
    pub fn save(&self, request: &SaveNote) -> Result<NoteView> {
        validate_content(&request.content)?;
        let tags = normalize_tags(&request.tags)?;
        let password = normalize_password(request.password.as_deref());

        let state = if request.lock {
            let password =
                password.ok_or_else(|| LockNoteError::Validation(PASSWORD_REQUIRED.to_string()))?;
            NoteState::Locked(self.seal(&request.content, self.hasher.hash(password)?)?)
        } else {
            NoteState::Unlocked {
                content: request.content.clone(),
            }
        };

        let note = self.store.transaction(|doc| {
            let now = now_ms();
            let existing = match request.id {
                Some(id) => doc.get(id).cloned().map(Note::try_from).transpose()?,
                None => None,
            };

            let mut note = match existing {
                Some(previous) => {
                    previous.ensure_active()?;
                    Note {
                        tags: tags.clone(),
                        ..previous
                    }
                }
                None => Note {
                    id: match request.id {
                        Some(id) => id,
                        None => doc.unused_id(now)?,
                    },
                    state: NoteState::Unlocked {
                        content: String::new(),
                    },
                    preview: String::new(),
                    created_at: now,
                    updated_at: now,
                    lifecycle: Lifecycle::Active,
                    pinned: false,
                    tags: tags.clone(),
                },
            };
            note.set_state(state, &request.content, now);

            doc.upsert(NoteRecord::from(note.clone()));
            Ok(note)
        })?;

        info!(note_id = note.id, locked = note.state.is_locked(), "saved note");
        Ok(NoteView::from(note))
    }

    /// Replace the content of an existing note and set its lock state.
    ///
    /// Locking an already-locked note without a new password keeps the old
    /// password hash; the content is re-encrypted under a fresh IV either
    /// way. Unlocking stores the plaintext and drops every encryption field.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Trashed` for unknown or trashed notes
    /// - `Validation` if content is empty, or locking a note that has no
    ///   password hash yet without supplying one
    pub fn edit(&self, id: i64, request: &SaveNote) -> Result<NoteView> {
        validate_content(&request.content)?;
        let tags = normalize_tags(&request.tags)?;
        let password = normalize_password(request.password.as_deref());

        let sealed_content = if request.lock {
            Some(self.cipher.seal_text(&request.content)?)
        } else {
            None
        };
        let new_hash = match (request.lock, password) {
            (true, Some(password)) => Some(self.hasher.hash(password)?),
            _ => None,
        };

        let note = self.update(id, |note, now| {
            note.ensure_active()?;

            let state = match sealed_content {
                Some((iv, encrypted_data)) => {
                    let password_hash = new_hash
                        .or_else(|| note.state.password_hash().map(str::to_string))
                        .ok_or_else(|| LockNoteError::Validation(PASSWORD_REQUIRED.to_string()))?;
                    NoteState::Locked(Sealed {
                        iv,
                        encrypted_data,
                        password_hash,
                    })
                }
                None => NoteState::Unlocked {
                    content: request.content.clone(),
                },
            };

            note.set_state(state, &request.content, now);
            note.tags = tags;
            Ok(note.clone())
        })?;

        info!(note_id = id, locked = note.state.is_locked(), "edited note");
        Ok(NoteView::from(note))
    }

    /// Return a note with its real content.
    ///
    /// An unlocked note is returned as-is. This never writes.
    ///
    /// # Errors
    ///
    /// - `NotFound` / `Trashed` for unknown or trashed notes
    /// - `Authentication` if `password` does not match
    /// - `Decryption` if the stored ciphertext cannot be decrypted
    pub fn unlock(&self, id: i64, password: &str) -> Result<NoteView> {
        let document = self.store.load()?;
        let note = find_note(&document, id)?;
        note.ensure_active()?;

        let sealed = match note.state.sealed().cloned() {
            Some(sealed) => sealed,
            None => return Ok(NoteView::from(note)),
        };

        if !self.hasher.verify(password, &sealed.password_hash) {
            warn!(note_id = id, "incorrect password for locked note");
            return Err(LockNoteError::Authentication);
        }

        let plaintext = self.cipher.open_text(&sealed.iv, &sealed.encrypted_data)?;
        info!(note_id = id, "unlocked note");
        Ok(NoteView::revealed(note, plaintext))
    }

    /// Move a note to the trash. Its encryption state is kept.
    pub fn delete(&self, id: i64) -> Result<NoteView> {
        let note = self.update(id, |note, now| {
            note.soft_delete(now)?;
            Ok(note.clone())
        })?;
        info!(note_id = id, "moved note to trash");
        Ok(NoteView::from(note))
    }

    /// Take a note out of the trash. Restoring an active note is a no-op.
    pub fn restore(&self, id: i64) -> Result<NoteView> {
        let (note, restored) = self.update(id, |note, now| {
            let restored = note.restore(now);
            Ok((note.clone(), restored))
        })?;
        if restored {
            info!(note_id = id, "restored note from trash");
        }
        Ok(NoteView::from(note))
    }

    /// Permanently remove a trashed note.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no note has `id`
    /// - `Validation` if the note is not in the trash
    pub fn purge(&self, id: i64) -> Result<NoteView> {
        let record = self.store.transaction(|doc| {
            let record = doc.get(id).ok_or(LockNoteError::NotFound(id))?;
            if !record.is_trashed() {
                return Err(LockNoteError::Validation(format!(
                    "Note {} must be moved to the trash before it can be deleted forever",
                    id
                )));
            }
            doc.remove(id).ok_or(LockNoteError::NotFound(id))
        })?;
        info!(note_id = id, "purged note");
        Ok(NoteView::masked(&record))
    }

    /// Permanently remove every trashed note. Returns how many were removed.
    pub fn empty_trash(&self) -> Result<usize> {
        let removed = self
            .store
            .transaction(|doc| Ok(doc.remove_where(NoteRecord::is_trashed).len()))?;
        info!(count = removed, "emptied trash");
        Ok(removed)
    }

    /// Pin or unpin an active note.
    pub fn set_pinned(&self, id: i64, pinned: bool) -> Result<NoteView> {
        let note = self.update(id, |note, now| {
            note.set_pinned(pinned, now)?;
            Ok(note.clone())
        })?;
        Ok(NoteView::from(note))
    }

    /// Active notes, pinned first, then most recently updated.
    pub fn list_active(&self) -> Result<Vec<NoteView>> {
        let document = self.store.load()?;
        let mut notes: Vec<NoteView> = document
            .iter()
            .filter(|record| !record.is_trashed())
            .map(NoteView::masked)
            .collect();
        notes.sort_by(|a, b| {
            b.pinned
                .cmp(&a.pinned)
                .then_with(|| b.updated_at.cmp(&a.updated_at))
        });
        Ok(notes)
    }

    /// Trashed notes, most recently deleted first.
    pub fn list_trash(&self) -> Result<Vec<NoteView>> {
        let document = self.store.load()?;
        let mut notes: Vec<NoteView> = document
            .iter()
            .filter(|record| record.is_trashed())
            .map(NoteView::masked)
            .collect();
        notes.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at));
        Ok(notes)
    }

    /// Encrypt `content` into a sealed bundle carrying `password_hash`.
    fn seal(&self, content: &str, password_hash: String) -> Result<Sealed> {
        let (iv, encrypted_data) = self.cipher.seal_text(content)?;
        Ok(Sealed {
            iv,
            encrypted_data,
            password_hash,
        })
    }

    /// Run `apply` on note `id` inside a transaction and write it back.
    fn update<T, F>(&self, id: i64, apply: F) -> Result<T>
    where
        F: FnOnce(&mut Note, i64) -> Result<T>,
    {
        self.store.transaction(|doc| {
            let mut note = find_note(doc, id)?;
            let output = apply(&mut note, now_ms())?;
            doc.upsert(NoteRecord::from(note));
            Ok(output)
        })
    }
}

fn validate_content(content: &str) -> Result<()> {
    if content.trim().is_empty() {
        return Err(LockNoteError::Validation(
            "Note content is required".to_string(),
        ));
    }
    Ok(())
}

fn find_note(document: &NoteDocument, id: i64) -> Result<Note> {
    let record = document.get(id).ok_or(LockNoteError::NotFound(id))?;
    Note::try_from(record.clone())
}

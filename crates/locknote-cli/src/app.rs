//! Application context: resolves paths and opens the note service.

use std::path::PathBuf;

use locknote_core::crypto::{CipherEngine, MasterKey, PasswordHasher, SECRET_KEY_ENV};
use locknote_core::storage::NoteRecord;
use locknote_core::{DocumentStore, JsonFileStore, NoteService};
use tracing::debug;

use crate::cli::Cli;
use crate::config::{resolve_notes_path, LockNoteConfig};
use crate::instance::InstanceLock;
use crate::output::Output;

/// CLI arguments plus the loaded config.
pub struct AppContext<'a> {
    cli: &'a Cli,
    config: Option<LockNoteConfig>,
    output: Output,
}

/// An open note service. The instance lock is released on drop.
pub struct Session {
    pub service: NoteService<JsonFileStore>,
    _lock: InstanceLock,
}

impl Session {
    /// Current stored record for `id`, if any.
    pub fn record(&self, id: i64) -> anyhow::Result<Option<NoteRecord>> {
        Ok(self.service.store().load()?.get(id).cloned())
    }
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli, config: Option<LockNoteConfig>) -> Self {
        Self {
            cli,
            config,
            output: Output::from_env(cli.json, cli.quiet),
        }
    }

    pub fn output(&self) -> Output {
        self.output
    }

    pub fn notes_path(&self) -> anyhow::Result<PathBuf> {
        resolve_notes_path(self.cli.notes.as_deref(), self.config.as_ref())
    }

    /// Load the master key, take the instance lock and open the store.
    ///
    /// The key is checked first so a misconfigured install never touches
    /// the notes document.
    pub fn open(&self) -> anyhow::Result<Session> {
        let key = MasterKey::from_env(SECRET_KEY_ENV)?;
        let path = self.notes_path()?;
        let lock = InstanceLock::acquire(&path)?;
        let store = JsonFileStore::open(&path)?;
        debug!(path = %path.display(), "opened notes document");

        let service = NoteService::new(store, CipherEngine::new(key), PasswordHasher::new()?);
        Ok(Session {
            service,
            _lock: lock,
        })
    }
}

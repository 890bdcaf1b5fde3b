//! Single-instance guard for a notes document.
//!
//! Holding an [`InstanceLock`] keeps a second `locknote` process from
//! writing the same document. The lock is a sibling `<notes>.lock` file
//! containing the owner's pid; it is removed when the guard drops.
//!
//! The pid is written to a private temp file first and hard-linked into
//! place, so a lock file is never observed half-written.

use std::fs::OpenOptions;
use std::io::{ErrorKind as IoErrorKind, Write};
use std::path::{Path, PathBuf};
use std::thread::sleep;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use locknote_core::LockNoteError;
use tracing::{debug, warn};

/// Unreadable lock files younger than this are treated as held.
const FRESH_LOCK_GRACE: Duration = Duration::from_secs(5);

const ACQUIRE_ATTEMPTS: u32 = 5;
const RETRY_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
}

/// What an existing lock file says about its owner.
#[derive(Debug, PartialEq, Eq)]
enum Holder {
    Alive(u32),
    Stale(Option<u32>),
    /// Unreadable but recently created: another process may be mid-write.
    Settling,
}

impl InstanceLock {
    /// Lock file path for a notes document.
    pub fn path_for(notes_path: &Path) -> PathBuf {
        let mut name = notes_path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_else(|| "notes.json".into());
        name.push(".lock");
        notes_path.with_file_name(name)
    }

    /// Acquire the lock, clearing it first if its owner is no longer alive.
    pub fn acquire(notes_path: &Path) -> Result<Self, LockNoteError> {
        let path = Self::path_for(notes_path);
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let pid = std::process::id();
        for attempt in 0..ACQUIRE_ATTEMPTS {
            match publish(&path, pid) {
                Ok(()) => {
                    if read_owner(&path) == Some(pid) {
                        debug!(lock = %path.display(), "Acquired instance lock");
                        return Ok(Self { path });
                    }
                    // Our file was reclaimed out from under us; go round again.
                    continue;
                }
                Err(err) if err.kind() == IoErrorKind::AlreadyExists => {}
                Err(err) => {
                    return Err(LockNoteError::Storage(format!(
                        "Failed to acquire lock {}: {}",
                        path.display(),
                        err
                    )))
                }
            }

            match inspect(&path) {
                Holder::Alive(owner) => {
                    return Err(LockNoteError::Storage(format!(
                        "Another locknote instance is using {} (pid {})",
                        notes_path.display(),
                        owner
                    )));
                }
                Holder::Settling => {
                    if attempt + 1 < ACQUIRE_ATTEMPTS {
                        sleep(RETRY_DELAY);
                    }
                }
                Holder::Stale(owner) => {
                    warn!(lock = %path.display(), "Removing stale instance lock");
                    reclaim(&path, owner)?;
                }
            }
        }

        Err(LockNoteError::Storage(format!(
            "Another locknote instance is using {}",
            notes_path.display()
        )))
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        if read_owner(&self.path) == Some(std::process::id()) {
            let _ = std::fs::remove_file(&self.path);
        }
    }
}

/// Atomically create `path` holding `pid`. Fails with `AlreadyExists` if taken.
fn publish(path: &Path, pid: u32) -> std::io::Result<()> {
    let temp = sibling(path, "tmp")?;
    let result = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp)
        .and_then(|mut file| {
            writeln!(file, "{}", pid)?;
            file.sync_all()
        })
        .and_then(|()| std::fs::hard_link(&temp, path));
    let _ = std::fs::remove_file(&temp);
    result
}

/// Move a stale lock aside, putting it back if it turned out to be fresh.
fn reclaim(path: &Path, expected: Option<u32>) -> Result<(), LockNoteError> {
    let grave = sibling(path, "stale")?;
    match std::fs::rename(path, &grave) {
        Ok(()) => {}
        Err(err) if err.kind() == IoErrorKind::NotFound => return Ok(()),
        Err(err) => return Err(err.into()),
    }
    if read_owner(&grave) != expected {
        // Another process replaced the lock between our read and the rename.
        let _ = std::fs::hard_link(&grave, path);
    }
    let _ = std::fs::remove_file(&grave);
    Ok(())
}

fn inspect(path: &Path) -> Holder {
    match read_owner(path) {
        Some(pid) if process_alive(pid) => Holder::Alive(pid),
        Some(pid) => Holder::Stale(Some(pid)),
        None if is_fresh(path) => Holder::Settling,
        None => Holder::Stale(None),
    }
}

fn is_fresh(path: &Path) -> bool {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|modified| SystemTime::now().duration_since(modified).ok())
        .map_or(true, |age| age < FRESH_LOCK_GRACE)
}

fn sibling(path: &Path, suffix: &str) -> std::io::Result<PathBuf> {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(std::io::Error::other)?
        .as_nanos();
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}.{}.{}", std::process::id(), nanos, suffix));
    Ok(path.with_file_name(name))
}

fn read_owner(path: &Path) -> Option<u32> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|contents| contents.trim().parse().ok())
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    if pid == 0 || pid > i32::MAX as u32 {
        return false;
    }
    // Signal 0 only checks for existence. EPERM still means the pid is taken.
    let result = unsafe { libc::kill(pid as libc::pid_t, 0) };
    result == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
}

#[cfg(not(unix))]
fn process_alive(_pid: u32) -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn age(path: &Path, by: Duration) {
        let file = File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[test]
    fn test_lock_path_is_sibling() {
        let path = InstanceLock::path_for(Path::new("/data/notes.json"));
        assert_eq!(path, PathBuf::from("/data/notes.json.lock"));
    }

    #[test]
    fn test_second_acquire_fails_while_held() {
        let dir = tempdir().unwrap();
        let notes = dir.path().join("notes.json");
        let lock = InstanceLock::acquire(&notes).unwrap();

        let err = InstanceLock::acquire(&notes).unwrap_err();
        assert!(matches!(err, LockNoteError::Storage(_)));
        assert!(err.to_string().contains("Another locknote instance"));

        drop(lock);
        assert!(!InstanceLock::path_for(&notes).exists());
        InstanceLock::acquire(&notes).unwrap();
    }

    #[test]
    fn test_fresh_empty_lock_is_not_reclaimed() {
        let dir = tempdir().unwrap();
        let notes = dir.path().join("notes.json");
        let lock = InstanceLock::path_for(&notes);
        std::fs::write(&lock, "").unwrap();

        let err = InstanceLock::acquire(&notes).unwrap_err();
        assert!(matches!(err, LockNoteError::Storage(_)));
        assert_eq!(std::fs::read_to_string(&lock).unwrap(), "");
    }

    #[test]
    fn test_old_unparseable_lock_is_reclaimed() {
        let dir = tempdir().unwrap();
        let notes = dir.path().join("notes.json");
        let lock = InstanceLock::path_for(&notes);
        std::fs::write(&lock, "garbage").unwrap();
        age(&lock, Duration::from_secs(60));

        let _guard = InstanceLock::acquire(&notes).unwrap();
        assert_eq!(read_owner(&lock), Some(std::process::id()));
    }

    #[test]
    fn test_reclaim_restores_replaced_lock() {
        let dir = tempdir().unwrap();
        let lock = dir.path().join("notes.json.lock");
        std::fs::write(&lock, "4242\n").unwrap();

        // The caller saw a different, dead owner; the current file is not theirs to remove.
        reclaim(&lock, Some(1)).unwrap();
        assert_eq!(read_owner(&lock), Some(4242));

        reclaim(&lock, Some(4242)).unwrap();
        assert!(!lock.exists());
    }

    #[test]
    fn test_publish_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let lock = dir.path().join("notes.json.lock");
        publish(&lock, 7).unwrap();
        assert_eq!(read_owner(&lock), Some(7));

        let err = publish(&lock, 8).unwrap_err();
        assert_eq!(err.kind(), IoErrorKind::AlreadyExists);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_current_process_is_alive() {
        assert!(process_alive(std::process::id()));
    }
}

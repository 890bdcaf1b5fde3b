//! Filesystem utilities for atomic document replacement.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{LockNoteError, Result};

/// Rename `temp_path` over `destination`, retrying once after removing the
/// destination on platforms where rename refuses to replace an existing file.
///
/// The temp file is removed if the rename ultimately fails.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        // Windows refuses to rename onto an existing file.
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Write `data` to `path` so that readers only ever see the old or the new
/// contents in full.
///
/// The bytes go to a uniquely named sibling temp file, are fsynced, and the
/// temp file is then renamed over `path`.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let temp_path = temp_sibling(path, "tmp")?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| LockNoteError::Storage(format!("Temp file create failed: {}", e)))?;
    let written = file
        .write_all(data)
        .and_then(|_| file.sync_all())
        .map_err(|e| LockNoteError::Storage(format!("Temp file write failed: {}", e)));
    drop(file);
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    set_owner_only(&temp_path)?;

    rename_with_fallback(&temp_path, path)
        .map_err(|e| LockNoteError::Storage(format!("Atomic rename failed: {}", e)))?;

    Ok(())
}

/// Build `<dir>/<filename>.<nanos>.<suffix>` next to `path`.
pub(crate) fn temp_sibling(path: &Path, suffix: &str) -> Result<PathBuf> {
    let parent = path
        .parent()
        .ok_or_else(|| LockNoteError::Storage("Invalid notes path".to_string()))?;
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LockNoteError::Storage("Invalid notes filename".to_string()))?;
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| LockNoteError::Storage(format!("System time error: {}", e)))?
        .as_nanos();
    Ok(parent.join(format!("{}.{}.{}", filename, nanos, suffix)))
}

/// Restrict a file to its owner (0600) on Unix. No-op elsewhere.
pub fn set_owner_only(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(0o600);
        fs::set_permissions(path, perms)?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_rename_overwrites_existing() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.json");
        let dest = dir.path().join("notes.json");

        File::create(&dest).unwrap().write_all(b"[]").unwrap();
        File::create(&temp).unwrap().write_all(b"[{}]").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "[{}]");
    }

    #[test]
    fn test_write_atomic_replaces_and_leaves_no_temp() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("notes.json");
        fs::write(&dest, "old").unwrap();

        write_atomic(&dest, b"new").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_atomic_sets_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let dest = dir.path().join("notes.json");

        write_atomic(&dest, b"[]").unwrap();

        let mode = fs::metadata(&dest).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_write_atomic_missing_parent_fails() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("missing").join("notes.json");
        assert!(matches!(
            write_atomic(&dest, b"[]"),
            Err(LockNoteError::Storage(_))
        ));
    }
}

//! Atomic file replacement and exclusive file locks.
//!
//! Shared by the TOML config file and the JSON state document:
//! - **Atomicity**: per-write tmp file + rename, readers never see a partial file
//! - **Durability**: fsync before rename
//! - **Isolation**: `fs2` exclusive lock around read-modify-write cycles

use postbox_core::{PostboxError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::path::Path;

/// Replaces the contents of `path` with `bytes` atomically.
///
/// Each call writes its own uniquely named temp file in the target
/// directory, so overlapping writers never rename each other's files.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path)?;

    let file_name = path
        .file_name()
        .ok_or_else(|| PostboxError::io(format!("Path has no file name: {}", path.display())))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp_file = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name.to_string_lossy()))
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp_file.write_all(bytes)?;
    tmp_file.as_file().sync_all()?;

    tmp_file.persist(path).map_err(|e| PostboxError::from(e.error))?;
    Ok(())
}

/// Reads `path`, treating a missing or blank file as `None`.
pub(crate) fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) if content.trim().is_empty() => Ok(None),
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// A file lock guard that releases the lock when dropped.
///
/// The `.lock` file itself is never removed.
pub(crate) struct FileLock {
    #[allow(dead_code)]
    file: File,
}

impl FileLock {
    /// Acquires an exclusive lock next to `path` (`<name>.lock`).
    pub(crate) fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");
        ensure_parent(&lock_path)?;

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        use fs2::FileExt;
        file.lock_exclusive()
            .map_err(|e| PostboxError::storage(format!("Failed to acquire lock: {}", e)))?;

        // Unlocked when the handle is dropped
        Ok(FileLock { file })
    }
}

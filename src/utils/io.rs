//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Read file contents, tagging failures with the operation and path.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("{}: {}", operation, path.display())),
        )
    })
}

/// Sibling path used as the staging file for an atomic write.
pub fn staging_path(path: &Path) -> Result<PathBuf> {
    let filename = path.file_name().ok_or_else(|| {
        Error::internal_io(
            format!("Invalid path: {}", path.display()),
            Some("resolve staging path".to_string()),
        )
    })?;

    let staged = format!(".{}.renumber.tmp", filename.to_string_lossy());
    Ok(match path.parent() {
        Some(parent) => parent.join(staged),
        None => PathBuf::from(staged),
    })
}

/// Write content to file atomically (write to a staging sibling, then rename).
///
/// Readers see either the old content or the new content, never a partial
/// write. An existing target keeps its permissions. The staging file is
/// removed if the rename fails.
pub fn write_file_atomic(path: &Path, content: &str, operation: &str) -> Result<()> {
    let tmp_path = staging_path(path)?;
    let permissions = fs::metadata(path).ok().map(|meta| meta.permissions());

    fs::write(&tmp_path, content).map_err(|e| {
        Error::internal_io(
            e.to_string(),
            Some(format!("{} (write temp): {}", operation, tmp_path.display())),
        )
    })?;

    if let Some(permissions) = permissions {
        if let Err(e) = fs::set_permissions(&tmp_path, permissions) {
            let _ = fs::remove_file(&tmp_path);
            return Err(Error::internal_io(
                e.to_string(),
                Some(format!("{} (copy permissions): {}", operation, tmp_path.display())),
            ));
        }
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(Error::internal_io(
            e.to_string(),
            Some(format!("{} (rename): {}", operation, path.display())),
        ));
    }

    Ok(())
}

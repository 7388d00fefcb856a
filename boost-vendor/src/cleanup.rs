//! Removal of the temporary download and extraction artefacts.
//!
//! Both removals treat an already-absent path as success, so cleanup can be
//! repeated or run after a partial earlier attempt.

use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Errors arising while removing temporary artefacts.
#[derive(Debug, thiserror::Error)]
#[error("failed to remove {path}: {source}")]
pub struct CleanupError {
    /// The path that could not be removed.
    pub path: Utf8PathBuf,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

/// Delete the downloaded archive and the extracted source directory.
///
/// Both removals are attempted even if the first fails; the first failure
/// is returned.
///
/// # Errors
///
/// Returns [`CleanupError`] if either path exists but cannot be removed.
pub fn remove_artefacts(archive: &Utf8Path, source_dir: &Utf8Path) -> Result<(), CleanupError> {
    let archive_result = remove_file_if_present(archive);
    let dir_result = remove_dir_if_present(source_dir);
    archive_result.and(dir_result)
}

/// Remove a file, treating a missing file as already removed.
///
/// # Errors
///
/// Returns [`CleanupError`] for any failure other than "not found".
pub fn remove_file_if_present(path: &Utf8Path) -> Result<(), CleanupError> {
    ignore_not_found(path, fs::remove_file(path))
}

/// Recursively remove a directory, treating a missing directory as already
/// removed.
///
/// # Errors
///
/// Returns [`CleanupError`] for any failure other than "not found".
pub fn remove_dir_if_present(path: &Utf8Path) -> Result<(), CleanupError> {
    ignore_not_found(path, fs::remove_dir_all(path))
}

fn ignore_not_found(path: &Utf8Path, result: io::Result<()>) -> Result<(), CleanupError> {
    match result {
        Ok(()) => {
            log::debug!("removed {path}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(CleanupError {
            path: path.to_owned(),
            source,
        }),
    }
}

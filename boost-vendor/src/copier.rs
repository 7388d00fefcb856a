//! Selective copying from the extracted upstream tree into the target tree.
//!
//! Copies merge into whatever already exists at the destination: files that
//! collide are overwritten, everything else in the target tree is left
//! alone. Nothing is ever removed from the target.

use crate::selection::{EntryKind, SelectionEntry, is_umbrella_exempt, umbrella_header_name};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::io;

/// Errors arising while copying selected content.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// A selected module directory or header does not exist upstream.
    #[error("selected source {path} does not exist in the extracted tree")]
    MissingSource {
        /// The path that was expected to exist.
        path: Utf8PathBuf,
    },

    /// A selected module contains a symbolic link.
    ///
    /// Vendored trees hold regular files only; links are never followed or
    /// recreated.
    #[error("refusing to copy symbolic link {path}")]
    Symlink {
        /// The link found inside the module directory.
        path: Utf8PathBuf,
    },

    /// Reading or writing a file or directory failed.
    #[error("failed to copy {path}: {source}")]
    Io {
        /// The path being read or written when the failure happened.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl CopyError {
    fn io(path: &Utf8Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.to_owned(),
            source,
        }
    }
}

/// Copies modules and headers from one module root into a target root.
///
/// # Examples
///
/// ```no_run
/// use boost_vendor::copier::Copier;
///
/// let copier = Copier::new(
///     "boost_1_86_0/boost".into(),
///     "include/observable_property/detail/boost".into(),
/// );
/// let copied = copier.copy_module("signals2").unwrap();
/// assert!(copied > 0);
/// ```
#[derive(Debug, Clone)]
pub struct Copier {
    source_root: Utf8PathBuf,
    target_root: Utf8PathBuf,
}

impl Copier {
    /// Create a copier reading from `source_root` and writing to
    /// `target_root`.
    #[must_use]
    pub const fn new(source_root: Utf8PathBuf, target_root: Utf8PathBuf) -> Self {
        Self {
            source_root,
            target_root,
        }
    }

    /// The upstream module root being read.
    #[must_use]
    pub fn source_root(&self) -> &Utf8Path {
        &self.source_root
    }

    /// The target tree being written.
    #[must_use]
    pub fn target_root(&self) -> &Utf8Path {
        &self.target_root
    }

    /// Copy the module directory `name` recursively, then its umbrella
    /// header unless the module is exempt.
    ///
    /// Returns the number of files written.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::MissingSource`] if the module directory or its
    /// umbrella header is absent, or [`CopyError::Io`] on I/O failure.
    pub fn copy_module(&self, name: &str) -> Result<usize, CopyError> {
        let source = self.source_root.join(name);
        if !source.is_dir() {
            return Err(CopyError::MissingSource { path: source });
        }
        let mut copied = copy_dir_merge(&source, &self.target_root.join(name))?;

        if !is_umbrella_exempt(name) {
            copied += self.copy_header(&umbrella_header_name(name))?;
        }

        log::debug!("copied module {name} ({copied} files)");
        Ok(copied)
    }

    /// Copy the single header `name` from the module root into the target
    /// root, creating the target root if needed.
    ///
    /// Returns the number of files written, always 1 on success.
    ///
    /// # Errors
    ///
    /// Returns [`CopyError::MissingSource`] if the header is absent, or
    /// [`CopyError::Io`] on I/O failure.
    pub fn copy_header(&self, name: &str) -> Result<usize, CopyError> {
        let source = self.source_root.join(name);
        if !source.is_file() {
            return Err(CopyError::MissingSource { path: source });
        }
        fs::create_dir_all(&self.target_root).map_err(CopyError::io(&self.target_root))?;

        let dest = self.target_root.join(name);
        fs::copy(&source, &dest).map_err(CopyError::io(&dest))?;
        log::debug!("copied header {name}");
        Ok(1)
    }

    /// Apply one selection record.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Copier::copy_module`] or
    /// [`Copier::copy_header`].
    pub fn apply(&self, entry: &SelectionEntry) -> Result<usize, CopyError> {
        match entry.kind() {
            EntryKind::Module => self.copy_module(entry.name()),
            EntryKind::Header => self.copy_header(entry.name()),
        }
    }

    /// Apply every record in `entries`, stopping at the first failure.
    ///
    /// Returns the total number of files written.
    ///
    /// # Errors
    ///
    /// Returns the first [`CopyError`] encountered.
    pub fn apply_all(&self, entries: &[SelectionEntry]) -> Result<usize, CopyError> {
        entries
            .iter()
            .try_fold(0, |total, entry| Ok(total + self.apply(entry)?))
    }
}

/// Recursively copy `source` into `dest`, merging with existing content.
///
/// Symbolic links are rejected before anything under them is read, so a
/// link back up the tree cannot make the walk loop.
///
/// Returns the number of files written.
fn copy_dir_merge(source: &Utf8Path, dest: &Utf8Path) -> Result<usize, CopyError> {
    fs::create_dir_all(dest).map_err(CopyError::io(dest))?;

    let mut copied = 0;
    for entry in source.read_dir_utf8().map_err(CopyError::io(source))? {
        let entry = entry.map_err(CopyError::io(source))?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());

        // `file_type` does not follow links.
        let file_type = entry.file_type().map_err(CopyError::io(src_path))?;
        if file_type.is_symlink() {
            return Err(CopyError::Symlink {
                path: src_path.to_owned(),
            });
        }
        if file_type.is_dir() {
            copied += copy_dir_merge(src_path, &dest_path)?;
        } else {
            fs::copy(src_path, &dest_path).map_err(CopyError::io(&dest_path))?;
            copied += 1;
        }
    }
    Ok(copied)
}

#[cfg(test)]
#[path = "copier_tests.rs"]
mod tests;

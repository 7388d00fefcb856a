//! Archive extraction for the upstream release tarball.
//!
//! Unpacks `.tar.gz` archives into a destination directory. Every entry
//! path, and every link target, is checked before anything is written so
//! that an entry resolving outside the destination aborts the extraction
//! instead of being silently skipped or normalised.

use camino::Utf8Path;
use flate2::read::GzDecoder;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Trait for extracting archives, enabling test mocking.
///
/// # Examples
///
/// ```
/// use boost_vendor::artefact::extraction::GzipTarExtractor;
///
/// let extractor = GzipTarExtractor;
/// // Use extractor.extract(archive_path, dest_dir) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Extract the archive at `archive_path` into `dest_dir`.
    ///
    /// Existing files in `dest_dir` are overwritten, so extracting the same
    /// archive twice is safe.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::PathTraversal`] if any entry
    /// attempts to escape the destination directory.
    /// Returns [`ExtractionError::EmptyArchive`] if no entries are found.
    /// Returns [`ExtractionError::Io`] on I/O or decoding failures.
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<ExtractedTree, ExtractionError>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O or decompression error during extraction.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no entries.
    #[error("archive contains no entries")]
    EmptyArchive,

    /// The archive did not contain the expected top-level directory.
    #[error("archive has no top-level directory {expected}; found: {found}")]
    MissingSourceDir {
        /// The directory the archive should have produced.
        expected: String,
        /// Comma-separated top-level names that were present.
        found: String,
    },
}

/// Summary of a completed extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedTree {
    top_level: BTreeSet<String>,
    entries: usize,
}

impl ExtractedTree {
    /// Sorted names of the top-level entries the archive produced.
    pub fn top_level(&self) -> impl Iterator<Item = &str> {
        self.top_level.iter().map(String::as_str)
    }

    /// Number of entries unpacked.
    #[must_use]
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Check that `name` is among the top-level entries.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MissingSourceDir`] listing what was found
    /// instead.
    pub fn require_top_level(&self, name: &str) -> Result<(), ExtractionError> {
        if self.top_level.contains(name) {
            return Ok(());
        }
        Err(ExtractionError::MissingSourceDir {
            expected: name.to_owned(),
            found: self.top_level().collect::<Vec<_>>().join(", "),
        })
    }

    fn record(&mut self, entry_path: &Path) {
        let first = entry_path.components().find_map(|component| match component {
            Component::Normal(name) => Some(name),
            _ => None,
        });
        if let Some(name) = first {
            self.top_level.insert(name.to_string_lossy().into_owned());
        }
        self.entries += 1;
    }
}

/// Default extractor using `flate2` and `tar`.
///
/// Validates each entry before unpacking to guard against path traversal
/// (zip-slip) through entry names or link targets.
pub struct GzipTarExtractor;

impl ArchiveExtractor for GzipTarExtractor {
    fn extract(
        &self,
        archive_path: &Utf8Path,
        dest_dir: &Utf8Path,
    ) -> Result<ExtractedTree, ExtractionError> {
        let file = fs::File::open(archive_path)?;
        let mut archive = tar::Archive::new(GzDecoder::new(file));
        archive.set_overwrite(true);
        archive.set_preserve_mtime(true);
        fs::create_dir_all(dest_dir)?;

        let mut tree = ExtractedTree::default();
        let mut links = LinkGuard::default();
        for entry_result in archive.entries()? {
            let mut entry = entry_result?;
            let entry_type = entry.header().entry_type();
            if entry_type.is_pax_global_extensions() || entry_type.is_pax_local_extensions() {
                continue;
            }

            let entry_path = entry.path()?.into_owned();
            validate_entry_path(&entry_path)?;
            let resolved_entry = links.check_entry(&entry_path)?;
            if let Some(link_target) = entry.link_name()? {
                links.check_link(&entry_path, &link_target, entry_type.is_hard_link())?;
            }

            // `unpack_in` runs its own containment check and reports a skip
            // as `false`; treat that as a traversal rather than ignoring it.
            if !entry.unpack_in(dest_dir)? {
                return Err(traversal(&entry_path));
            }
            if entry_type.is_symlink() {
                links.record_symlink(resolved_entry);
            }
            tree.record(&entry_path);
        }

        if tree.entries == 0 {
            return Err(ExtractionError::EmptyArchive);
        }

        log::debug!(
            "extracted {} entries from {archive_path} into {dest_dir}",
            tree.entries
        );
        Ok(tree)
    }
}

/// Validate that a tar entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    let escapes = path.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    });
    if escapes || path.is_absolute() {
        return Err(traversal(path));
    }
    Ok(())
}

/// Symlinks unpacked so far, as normalised paths relative to the
/// destination.
///
/// Nothing may be written or resolved through one of them: a link that
/// points back up the tree would otherwise let a later entry or link target
/// reach outside the destination while looking lexically contained.
#[derive(Debug, Default)]
struct LinkGuard {
    symlinks: BTreeSet<PathBuf>,
}

impl LinkGuard {
    /// Normalise an entry path, rejecting it if it passes through a
    /// previously unpacked symlink.
    fn check_entry(&self, entry_path: &Path) -> Result<PathBuf, ExtractionError> {
        self.resolve(entry_path)
            .ok_or_else(|| traversal(entry_path))
    }

    /// Validate a link target.
    ///
    /// Symlink targets resolve relative to the directory holding the link;
    /// hard link targets resolve relative to the archive root. Either way the
    /// resolved path must stay inside the destination and must not pass
    /// through another symlink.
    fn check_link(
        &self,
        entry_path: &Path,
        target: &Path,
        is_hard_link: bool,
    ) -> Result<(), ExtractionError> {
        let joined = if is_hard_link {
            target.to_path_buf()
        } else {
            entry_path
                .parent()
                .map_or_else(|| target.to_path_buf(), |parent| parent.join(target))
        };
        if target.is_absolute() || self.resolve(&joined).is_none() {
            return Err(traversal(entry_path));
        }
        Ok(())
    }

    fn record_symlink(&mut self, resolved: PathBuf) {
        self.symlinks.insert(resolved);
    }

    /// Lexically walk `path` from the destination root.
    ///
    /// Returns `None` if the walk climbs above the root or continues past a
    /// recorded symlink.
    fn resolve(&self, path: &Path) -> Option<PathBuf> {
        let mut resolved = PathBuf::new();
        for component in path.components() {
            if self.symlinks.contains(&resolved) {
                return None;
            }
            match component {
                Component::Normal(name) => resolved.push(name),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !resolved.pop() {
                        return None;
                    }
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

fn traversal(path: &Path) -> ExtractionError {
    ExtractionError::PathTraversal {
        path: path.display().to_string(),
    }
}

//! Fixed vendoring configuration.
//!
//! The release URL, checksum, and paths are pinned constants. The binary
//! never reads flags, environment variables, or configuration files to
//! change them; a rerun always produces the same vendored tree.
//! [`VendorConfig`] exists so tests can point the pipeline at fixtures.

use crate::selection::{SIGNALS2_CLOSURE, SelectionEntry};
use camino::{Utf8Path, Utf8PathBuf};
use std::io;

/// Download URL of the pinned Boost release.
pub const BOOST_URL: &str = "https://archives.boost.io/release/1.86.0/source/boost_1_86_0.tar.gz";

/// SHA-256 of the pinned Boost release archive.
pub const BOOST_SHA256: &str = "2575e74ffc3ef1cd0babac2c1ee8bdb5782a0ee672b1912da40e5b4b591ca01f";

/// File name the archive is saved under in the working directory.
pub const BOOST_ARCHIVE: &str = "boost_1_86_0.tar.gz";

/// Top-level directory the archive unpacks to.
pub const BOOST_SOURCE_DIR: &str = "boost_1_86_0";

/// Directory inside the extracted tree that holds modules and headers.
pub const BOOST_MODULE_ROOT: &str = "boost";

/// Target tree, relative to the host project root.
pub const TARGET_DIR: &str = "include/observable_property/detail/boost";

/// Everything the pipeline needs to know about one vendoring job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VendorConfig {
    /// Archive download URL.
    pub url: String,
    /// Expected lowercase hex SHA-256 of the archive.
    pub expected_sha256: String,
    /// File name for the downloaded archive.
    pub archive_name: String,
    /// Top-level directory produced by extraction.
    pub source_dir: String,
    /// Module root inside `source_dir`.
    pub module_root: String,
    /// Target tree relative to the project root.
    pub target_dir: Utf8PathBuf,
    /// Records to copy, in order.
    pub selection: &'static [SelectionEntry],
}

impl VendorConfig {
    /// The pinned Boost 1.86.0 configuration used by the binary.
    #[must_use]
    pub fn boost() -> Self {
        Self {
            url: BOOST_URL.to_owned(),
            expected_sha256: BOOST_SHA256.to_owned(),
            archive_name: BOOST_ARCHIVE.to_owned(),
            source_dir: BOOST_SOURCE_DIR.to_owned(),
            module_root: BOOST_MODULE_ROOT.to_owned(),
            target_dir: Utf8PathBuf::from(TARGET_DIR),
            selection: SIGNALS2_CLOSURE,
        }
    }

    /// Where the archive is written.
    #[must_use]
    pub fn archive_path(&self, workspace: &Workspace) -> Utf8PathBuf {
        workspace.work_dir.join(&self.archive_name)
    }

    /// Where the archive unpacks to.
    #[must_use]
    pub fn source_path(&self, workspace: &Workspace) -> Utf8PathBuf {
        workspace.work_dir.join(&self.source_dir)
    }

    /// The module root inside the extracted tree.
    #[must_use]
    pub fn module_root_path(&self, workspace: &Workspace) -> Utf8PathBuf {
        self.source_path(workspace).join(&self.module_root)
    }

    /// The absolute target tree.
    #[must_use]
    pub fn target_path(&self, workspace: &Workspace) -> Utf8PathBuf {
        workspace.project_root.join(&self.target_dir)
    }
}

/// Directories a run operates in.
///
/// Temporary artefacts live in `work_dir`; the target tree is resolved
/// against `project_root`. The binary uses the current directory for both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// Directory receiving the archive and the extracted tree.
    pub work_dir: Utf8PathBuf,
    /// Root of the host project.
    pub project_root: Utf8PathBuf,
}

impl Workspace {
    /// Use `root` as both working directory and project root.
    #[must_use]
    pub fn at(root: &Utf8Path) -> Self {
        Self {
            work_dir: root.to_owned(),
            project_root: root.to_owned(),
        }
    }

    /// Use the process current directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be read or is not
    /// valid UTF-8.
    pub fn current() -> io::Result<Self> {
        let cwd = std::env::current_dir()?;
        let cwd_utf8 = Utf8PathBuf::try_from(cwd).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("current directory is not valid UTF-8: {e}"),
            )
        })?;
        Ok(Self::at(&cwd_utf8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::sha256_digest::Sha256Digest;

    #[test]
    fn pinned_digest_is_well_formed() {
        let config = VendorConfig::boost();
        assert!(Sha256Digest::try_from(config.expected_sha256.as_str()).is_ok());
    }

    #[test]
    fn pinned_url_names_the_archive() {
        let config = VendorConfig::boost();
        assert!(config.url.starts_with("https://"));
        assert!(config.url.ends_with(&config.archive_name));
        assert!(config.archive_name.starts_with(&config.source_dir));
    }

    #[test]
    fn paths_resolve_against_workspace() {
        let config = VendorConfig::boost();
        let workspace = Workspace {
            work_dir: Utf8PathBuf::from("/work"),
            project_root: Utf8PathBuf::from("/project"),
        };

        assert_eq!(
            config.archive_path(&workspace),
            Utf8PathBuf::from("/work/boost_1_86_0.tar.gz")
        );
        assert_eq!(
            config.module_root_path(&workspace),
            Utf8PathBuf::from("/work/boost_1_86_0/boost")
        );
        assert_eq!(
            config.target_path(&workspace),
            Utf8PathBuf::from("/project/include/observable_property/detail/boost")
        );
    }

    #[test]
    fn workspace_at_uses_one_root() {
        let workspace = Workspace::at(Utf8Path::new("/host"));
        assert_eq!(workspace.work_dir, workspace.project_root);
    }
}

//! Shared test utilities for the vendoring crate.
//!
//! Builds gzip tarball fixtures in memory (including deliberately hostile
//! entries that `tar::Builder` would refuse to write), lays out fake upstream
//! source trees, and provides stub downloaders for pipeline tests.

use crate::artefact::download::{ArchiveDownloader, DownloadError};
use crate::config::VendorConfig;
use crate::selection::SelectionEntry;
use camino::{Utf8Path, Utf8PathBuf};
use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};
use std::cell::Cell;
use std::fs;
use std::io;

/// One entry in a generated tarball fixture.
#[derive(Debug, Clone, Copy)]
pub enum FixtureEntry<'a> {
    /// A directory entry.
    Dir(&'a str),
    /// A regular file with the given contents.
    File(&'a str, &'a [u8]),
    /// A regular file whose name is written verbatim into the header,
    /// bypassing the path checks in `tar::Builder`.
    RawFile(&'a str, &'a [u8]),
    /// A symbolic link whose name and target are written verbatim.
    RawSymlink(&'a str, &'a str),
}

/// Returns the lowercase hex SHA-256 digest of `bytes`.
#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// Builds a gzip-compressed tarball containing `entries`, in order.
///
/// # Errors
///
/// Returns an error if the tar or gzip encoder fails.
pub fn tar_gz_bytes(entries: &[FixtureEntry<'_>]) -> io::Result<Vec<u8>> {
    let encoder = GzEncoder::new(Vec::new(), Compression::fast());
    let mut builder = tar::Builder::new(encoder);
    for entry in entries {
        append_entry(&mut builder, *entry)?;
    }
    builder.into_inner()?.finish()
}

/// Writes a gzip-compressed tarball containing `entries` to `path`.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_tar_gz(path: &Utf8Path, entries: &[FixtureEntry<'_>]) -> io::Result<()> {
    fs::write(path, tar_gz_bytes(entries)?)
}

fn append_entry<W: io::Write>(
    builder: &mut tar::Builder<W>,
    entry: FixtureEntry<'_>,
) -> io::Result<()> {
    let mut header = tar::Header::new_gnu();
    match entry {
        FixtureEntry::Dir(path) => {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_mode(0o755);
            header.set_size(0);
            builder.append_data(&mut header, path, io::empty())
        }
        FixtureEntry::File(path, contents) => {
            header.set_entry_type(tar::EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(contents.len() as u64);
            builder.append_data(&mut header, path, contents)
        }
        FixtureEntry::RawFile(path, contents) => {
            header.set_entry_type(tar::EntryType::Regular);
            header.set_mode(0o644);
            header.set_size(contents.len() as u64);
            write_raw_bytes(&mut header.as_old_mut().name, path);
            header.set_cksum();
            builder.append(&header, contents)
        }
        FixtureEntry::RawSymlink(path, target) => {
            header.set_entry_type(tar::EntryType::Symlink);
            header.set_mode(0o777);
            header.set_size(0);
            write_raw_bytes(&mut header.as_old_mut().name, path);
            write_raw_bytes(&mut header.as_old_mut().linkname, target);
            header.set_cksum();
            builder.append(&header, io::empty())
        }
    }
}

/// Copies `value` into a fixed-width, NUL-padded header field.
fn write_raw_bytes(field: &mut [u8], value: &str) {
    field.fill(0);
    for (slot, byte) in field.iter_mut().zip(value.bytes()) {
        *slot = byte;
    }
}

/// Writes each `(relative path, contents)` pair under `root`, creating
/// parent directories as needed.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be created.
pub fn write_tree(root: &Utf8Path, files: &[(&str, &str)]) -> io::Result<()> {
    for (relative, contents) in files {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
    }
    Ok(())
}

/// Lists every regular file under `root` as sorted, `/`-separated relative
/// paths paired with their contents.
///
/// # Errors
///
/// Returns an error if the tree cannot be read or contains non-UTF-8 names.
pub fn snapshot_tree(root: &Utf8Path) -> io::Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();
    collect_files(root, root, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(
    root: &Utf8Path,
    dir: &Utf8Path,
    files: &mut Vec<(String, Vec<u8>)>,
) -> io::Result<()> {
    for entry in dir.read_dir_utf8()? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(root, path, files)?;
        } else {
            let relative = path
                .strip_prefix(root)
                .map_err(io::Error::other)?
                .as_str()
                .replace('\\', "/");
            files.push((relative, fs::read(path)?));
        }
    }
    Ok(())
}

/// Converts a `tempfile` directory into a UTF-8 path.
///
/// # Panics
///
/// Panics if the temporary directory path is not valid UTF-8.
#[must_use]
pub fn utf8_temp_path(dir: &tempfile::TempDir) -> Utf8PathBuf {
    Utf8PathBuf::try_from(dir.path().to_path_buf()).expect("temp dir path should be UTF-8")
}

/// A downloader that serves fixed bytes and counts how often it was called.
#[derive(Debug)]
pub struct FixtureDownloader {
    archive: Vec<u8>,
    calls: Cell<usize>,
}

impl FixtureDownloader {
    /// Creates a downloader that writes `archive` to every destination.
    #[must_use]
    pub const fn new(archive: Vec<u8>) -> Self {
        Self {
            archive,
            calls: Cell::new(0),
        }
    }

    /// Returns how many downloads were requested.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ArchiveDownloader for FixtureDownloader {
    fn download(&self, _url: &str, dest: &Utf8Path) -> Result<(), DownloadError> {
        self.calls.set(self.calls.get() + 1);
        fs::write(dest, &self.archive).map_err(DownloadError::Io)
    }
}

/// A downloader that always fails as if the host refused the connection.
#[derive(Debug, Default)]
pub struct UnreachableDownloader;

impl ArchiveDownloader for UnreachableDownloader {
    fn download(&self, url: &str, _dest: &Utf8Path) -> Result<(), DownloadError> {
        Err(DownloadError::HttpError {
            url: url.to_owned(),
            reason: "connection refused".to_owned(),
        })
    }
}

/// Selection used with [`mini_boost_entries`].
pub const MINI_BOOST_SELECTION: &[SelectionEntry] = &[
    SelectionEntry::module("signals2"),
    SelectionEntry::module("core"),
    SelectionEntry::header("version.hpp"),
];

/// A tiny stand-in for the Boost release layout.
#[must_use]
pub fn mini_boost_entries() -> Vec<FixtureEntry<'static>> {
    vec![
        FixtureEntry::Dir("boost_1_86_0/"),
        FixtureEntry::File("boost_1_86_0/README.md", b"Boost C++ Libraries\n"),
        FixtureEntry::Dir("boost_1_86_0/boost/"),
        FixtureEntry::File("boost_1_86_0/boost/version.hpp", b"#define BOOST_VERSION 108600\n"),
        FixtureEntry::File("boost_1_86_0/boost/signals2.hpp", b"#include <boost/signals2/signal.hpp>\n"),
        FixtureEntry::File("boost_1_86_0/boost/signals2/signal.hpp", b"// signal\n"),
        FixtureEntry::File(
            "boost_1_86_0/boost/signals2/detail/slot_groups.hpp",
            b"// slot groups\n",
        ),
        FixtureEntry::File("boost_1_86_0/boost/core/ref.hpp", b"// ref\n"),
        FixtureEntry::File("boost_1_86_0/boost/core.hpp", b"// not vendored\n"),
        FixtureEntry::File("boost_1_86_0/boost/unselected/thing.hpp", b"// not vendored\n"),
    ]
}

/// Configuration pointing at an archive with the given bytes, using the
/// pinned names and paths but [`MINI_BOOST_SELECTION`].
#[must_use]
pub fn fixture_config(archive: &[u8]) -> VendorConfig {
    VendorConfig {
        url: "https://archives.example.test/boost_1_86_0.tar.gz".to_owned(),
        expected_sha256: sha256_hex(archive),
        selection: MINI_BOOST_SELECTION,
        ..VendorConfig::boost()
    }
}

//! The five-stage vendoring pipeline.
//!
//! fetch → verify → extract → copy → cleanup, strictly in that order. Any
//! stage failure aborts the rest; only cleanup failures are downgraded to a
//! warning, since by then the target tree is already complete. The digest
//! check is the only integrity guarantee and always precedes extraction.

use camino::Utf8Path;
use std::io::Write;

use crate::artefact::download::{ArchiveDownloader, HttpDownloader};
use crate::artefact::extraction::{ArchiveExtractor, GzipTarExtractor};
use crate::artefact::sha256_digest::Sha256Digest;
use crate::artefact::verification::verify_sha256;
use crate::cleanup::remove_artefacts;
use crate::config::{VendorConfig, Workspace};
use crate::copier::Copier;
use crate::error::{Result, VendorError};
use crate::output::write_stderr_line;

/// Summary of a successful run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorReport {
    /// Selection records applied.
    pub entries_applied: usize,
    /// Files written into the target tree.
    pub files_copied: usize,
    /// Whether the archive and extracted tree were removed.
    pub cleaned_up: bool,
}

/// Run the pipeline with the production HTTP downloader and gzip tarball
/// extractor.
///
/// # Errors
///
/// Returns the first stage failure; see [`run_pipeline`].
pub fn vendor(
    config: &VendorConfig,
    workspace: &Workspace,
    stderr: &mut dyn Write,
) -> Result<VendorReport> {
    run_pipeline(config, workspace, &HttpDownloader, &GzipTarExtractor, stderr)
}

/// Testable inner function with injected fetch and extract stages.
///
/// # Errors
///
/// - [`VendorError::InvalidDigest`] if the configured checksum is malformed.
/// - [`VendorError::Network`] if the download fails.
/// - [`VendorError::Integrity`] if the archive digest does not match.
/// - [`VendorError::Io`] if the archive cannot be read for hashing.
/// - [`VendorError::Extraction`] if unpacking fails or the archive lacks
///   the expected top-level directory.
/// - [`VendorError::Filesystem`] if a selected module or header is missing
///   or cannot be copied.
pub fn run_pipeline(
    config: &VendorConfig,
    workspace: &Workspace,
    downloader: &dyn ArchiveDownloader,
    extractor: &dyn ArchiveExtractor,
    stderr: &mut dyn Write,
) -> Result<VendorReport> {
    let expected = Sha256Digest::try_from(config.expected_sha256.as_str())?;
    let archive_path = config.archive_path(workspace);

    // Step 1: Fetch.
    write_stderr_line(stderr, format!("Downloading Boost from {}...", config.url));
    downloader.download(&config.url, &archive_path)?;

    // Step 2: Verify before anything is unpacked.
    write_stderr_line(stderr, "Verifying SHA-256 checksum...");
    verify_sha256(&archive_path, &expected)?;

    // Step 3: Extract.
    write_stderr_line(stderr, format!("Extracting {}...", config.archive_name));
    let tree = extractor.extract(&archive_path, &workspace.work_dir)?;
    tree.require_top_level(&config.source_dir)?;
    log::info!(
        "extracted {} entries into {}",
        tree.entries(),
        config.source_path(workspace)
    );

    // Step 4: Copy the selection.
    let copier = Copier::new(
        config.module_root_path(workspace),
        config.target_path(workspace),
    );
    write_stderr_line(
        stderr,
        format!(
            "Copying {} selections into {}...",
            config.selection.len(),
            copier.target_root()
        ),
    );
    let files_copied = copier.apply_all(config.selection)?;
    log::info!("copied {files_copied} files into {}", copier.target_root());

    // Step 5: Cleanup.
    write_stderr_line(stderr, "Cleaning up...");
    let cleaned_up = clean_up(&archive_path, &config.source_path(workspace), stderr);

    Ok(VendorReport {
        entries_applied: config.selection.len(),
        files_copied,
        cleaned_up,
    })
}

/// Remove temporary artefacts, downgrading failure to a warning.
fn clean_up(archive: &Utf8Path, source_dir: &Utf8Path, stderr: &mut dyn Write) -> bool {
    match remove_artefacts(archive, source_dir) {
        Ok(()) => true,
        Err(e) => {
            let err = VendorError::from(e);
            log::warn!("{err}");
            write_stderr_line(stderr, format!("Warning: {err}"));
            false
        }
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

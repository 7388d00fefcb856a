//! Archive download over HTTP.
//!
//! Provides a trait-based abstraction for fetching the release archive so
//! that the pipeline can be exercised in tests without network access.

use camino::Utf8Path;
use std::fs;
use std::sync::OnceLock;
use std::time::Duration;

/// Global timeout for the archive download.
///
/// The Boost source tarball is well over 100 MiB, so this is generous; it
/// exists only to stop a stalled connection from hanging a setup step.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Trait for fetching a remote archive to local disk.
///
/// # Examples
///
/// ```
/// use boost_vendor::artefact::download::HttpDownloader;
///
/// let downloader = HttpDownloader;
/// // Use downloader.download(url, dest) in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveDownloader {
    /// Download `url` and write the body to `dest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the file cannot be written.
    fn download(&self, url: &str, dest: &Utf8Path) -> Result<(), DownloadError>;
}

/// Errors arising from archive download.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request or body transfer failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The server answered 404.
    #[error("archive not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// HTTP-based downloader using `ureq`.
///
/// A failed transfer removes whatever was written to `dest`, so a broken
/// download never lingers in the working directory.
pub struct HttpDownloader;

impl ArchiveDownloader for HttpDownloader {
    fn download(&self, url: &str, dest: &Utf8Path) -> Result<(), DownloadError> {
        let result = download_to_file(url, dest);
        if result.is_err() {
            discard_partial(dest);
        }
        result
    }
}

/// Download a URL and stream the body into a file.
fn download_to_file(url: &str, dest: &Utf8Path) -> Result<(), DownloadError> {
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;
    let mut file = fs::File::create(dest)?;
    let bytes = std::io::copy(&mut response.into_body().as_reader(), &mut file).map_err(|e| {
        DownloadError::HttpError {
            url: url.to_owned(),
            reason: e.to_string(),
        }
    })?;
    file.sync_all()?;
    log::debug!("wrote {bytes} bytes from {url} to {dest}");
    Ok(())
}

/// Remove a partially written download, ignoring a file that never existed.
fn discard_partial(dest: &Utf8Path) {
    match fs::remove_file(dest) {
        Ok(()) => log::debug!("removed partial download {dest}"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("could not remove partial download {dest}: {e}"),
    }
}

/// Shared `ureq` agent with request timeout configuration.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(DOWNLOAD_TIMEOUT))
            .build();
        ureq::Agent::new_with_config(config)
    })
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

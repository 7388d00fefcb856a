//! Error types for the vendoring pipeline.
//!
//! Each stage keeps its own error enum; [`VendorError`] gathers them into
//! one type with a variant per failure class so the top level can report a
//! single diagnostic line while tests can still match on the kind.

use crate::artefact::download::DownloadError;
use crate::artefact::error::ArtefactError;
use crate::artefact::extraction::ExtractionError;
use crate::artefact::verification::VerificationError;
use crate::cleanup::CleanupError;
use crate::copier::CopyError;
use thiserror::Error;

/// Errors that can abort a vendoring run.
#[derive(Debug, Error)]
pub enum VendorError {
    /// Fetching the archive failed.
    #[error("network failure: {0}")]
    Network(#[from] DownloadError),

    /// The archive digest did not match the pinned checksum.
    #[error("integrity check failed: {0}")]
    Integrity(#[source] VerificationError),

    /// The configured checksum is not a valid SHA-256 digest.
    #[error("invalid configuration: {0}")]
    InvalidDigest(#[from] ArtefactError),

    /// Unpacking the archive failed or was rejected.
    #[error("extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// Copying selected content into the target tree failed.
    #[error("copy failed: {0}")]
    Filesystem(#[from] CopyError),

    /// Removing temporary artefacts failed.
    ///
    /// The pipeline logs this rather than returning it, so it never fails an
    /// otherwise successful run.
    #[error("cleanup failed: {0}")]
    Cleanup(#[from] CleanupError),

    /// Any other I/O failure, including reading the archive for hashing.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<VerificationError> for VendorError {
    fn from(err: VerificationError) -> Self {
        match err {
            mismatch @ VerificationError::Mismatch { .. } => Self::Integrity(mismatch),
            VerificationError::Io { path, source } => Self::Io(std::io::Error::new(
                source.kind(),
                format!("failed to read {path} for hashing: {source}"),
            )),
        }
    }
}

/// Result type alias using [`VendorError`].
pub type Result<T> = std::result::Result<T, VendorError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::sha256_digest::Sha256Digest;
    use camino::Utf8PathBuf;

    fn digest(c: char) -> Sha256Digest {
        Sha256Digest::try_from(c.to_string().repeat(64)).expect("valid digest")
    }

    #[test]
    fn mismatch_maps_to_integrity() {
        let err = VendorError::from(VerificationError::Mismatch {
            path: Utf8PathBuf::from("boost.tar.gz"),
            expected: digest('a'),
            actual: digest('b'),
        });
        assert!(matches!(err, VendorError::Integrity(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("integrity check failed"));
        assert!(msg.contains(&"a".repeat(64)));
        assert!(msg.contains(&"b".repeat(64)));
    }

    #[test]
    fn hashing_read_failure_maps_to_io() {
        let err = VendorError::from(VerificationError::Io {
            path: Utf8PathBuf::from("boost.tar.gz"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        });
        match err {
            VendorError::Io(source) => {
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
                assert!(source.to_string().contains("boost.tar.gz"));
            }
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn network_error_includes_url() {
        let err = VendorError::from(DownloadError::NotFound {
            url: "https://example.test/boost.tar.gz".to_owned(),
        });
        let msg = err.to_string();
        assert!(msg.contains("network failure"));
        assert!(msg.contains("https://example.test/boost.tar.gz"));
    }

    #[test]
    fn copy_error_preserves_source_chain() {
        let err = VendorError::from(CopyError::Io {
            path: Utf8PathBuf::from("target/signals2.hpp"),
            source: std::io::Error::other("permission denied"),
        });
        assert!(err.to_string().contains("target/signals2.hpp"));
        assert!(std::error::Error::source(&err).is_some());
    }
}

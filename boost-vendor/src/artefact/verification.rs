//! Streaming SHA-256 verification for downloaded archives.
//!
//! The archive is hashed in fixed-size chunks so that large release tarballs
//! never have to fit in memory. The whole file is always hashed before the
//! digest is compared; there is no early exit.

use super::sha256_digest::Sha256Digest;
use camino::{Utf8Path, Utf8PathBuf};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read};

/// Size of each read while hashing.
pub const HASH_CHUNK_SIZE: usize = 4096;

/// Errors arising from archive verification.
///
/// An integrity mismatch and a read failure are separate variants so that
/// callers can tell a corrupted download from an unreadable one.
#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    /// The computed digest differs from the expected digest.
    #[error("SHA-256 mismatch for {path}: expected {expected}, got {actual}")]
    Mismatch {
        /// The file that was hashed.
        path: Utf8PathBuf,
        /// The digest the file should have had.
        expected: Sha256Digest,
        /// The digest that was computed.
        actual: Sha256Digest,
    },

    /// The file could not be opened or read.
    #[error("failed to read {path} for hashing: {source}")]
    Io {
        /// The file that was being hashed.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

/// Compute the SHA-256 digest of the file at `path`.
///
/// Reads the file in [`HASH_CHUNK_SIZE`] chunks and feeds each one to the
/// hasher incrementally.
///
/// # Errors
///
/// Returns [`VerificationError::Io`] if the file cannot be opened or read.
pub fn compute_sha256(path: &Utf8Path) -> Result<Sha256Digest, VerificationError> {
    let io_error = |source| VerificationError::Io {
        path: path.to_owned(),
        source,
    };
    let mut file = fs::File::open(path).map_err(io_error)?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; HASH_CHUNK_SIZE];
    loop {
        let bytes_read = file.read(&mut buffer).map_err(io_error)?;
        match buffer.get(..bytes_read) {
            Some([]) | None => break,
            Some(chunk) => hasher.update(chunk),
        }
    }
    Ok(Sha256Digest::from_hasher(hasher))
}

/// Verify that the file at `path` hashes to `expected`.
///
/// # Errors
///
/// Returns [`VerificationError::Mismatch`] when the digests differ and
/// [`VerificationError::Io`] when the file cannot be read.
///
/// # Examples
///
/// ```no_run
/// use boost_vendor::artefact::sha256_digest::Sha256Digest;
/// use boost_vendor::artefact::verification::verify_sha256;
/// use camino::Utf8Path;
///
/// let expected = Sha256Digest::try_from("a".repeat(64)).unwrap();
/// verify_sha256(Utf8Path::new("boost_1_86_0.tar.gz"), &expected).unwrap();
/// ```
pub fn verify_sha256(path: &Utf8Path, expected: &Sha256Digest) -> Result<(), VerificationError> {
    let actual = compute_sha256(path)?;
    if actual.as_str() != expected.as_str() {
        return Err(VerificationError::Mismatch {
            path: path.to_owned(),
            expected: expected.clone(),
            actual,
        });
    }
    log::debug!("{path} matches SHA-256 {expected}");
    Ok(())
}

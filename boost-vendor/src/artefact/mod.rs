//! Release archive handling: download, integrity verification, extraction.
//!
//! # Sub-modules
//!
//! - [`download`] - Archive download trait and HTTP implementation.
//! - [`error`] - Validation errors for artefact values.
//! - [`extraction`] - Gzip tarball extraction with path traversal protection.
//! - [`sha256_digest`] - SHA-256 digest newtype (`Sha256Digest`).
//! - [`verification`] - Streaming checksum computation and comparison.

pub mod download;
pub mod error;
pub mod extraction;
pub mod sha256_digest;
pub mod verification;

//! Error types for artefact value validation.
//!
//! Each variant identifies the rejected input and the constraint it broke.

use thiserror::Error;

/// Errors arising from invalid artefact-related values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArtefactError {
    /// A SHA-256 digest is not a valid 64-character lowercase hex string.
    #[error("invalid SHA-256 digest \"{value}\": {reason}")]
    InvalidSha256Digest {
        /// The rejected digest string.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ArtefactError`].
pub type Result<T> = std::result::Result<T, ArtefactError>;

//! SHA-256 digest newtype used for archive integrity checks.
//!
//! A digest is a 64-character lowercase hexadecimal string. Both the pinned
//! release checksum and the value computed from the downloaded archive are
//! carried in this type so that comparison is a plain string equality.

use super::error::{ArtefactError, Result};
use sha2::{Digest, Sha256};
use std::fmt;

/// Expected length of a hex-encoded SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// A validated hex-encoded SHA-256 digest string.
///
/// # Examples
///
/// ```
/// use boost_vendor::artefact::sha256_digest::Sha256Digest;
///
/// let hex = "a".repeat(64);
/// let digest = Sha256Digest::try_from(hex.as_str()).unwrap();
/// assert_eq!(digest.as_str().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Return the digest as a hex string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Finish `hasher` and wrap its lowercase hex output.
    ///
    /// `sha2` always renders 64 lowercase hex characters, so the result
    /// needs no further validation.
    #[must_use]
    pub fn from_hasher(hasher: Sha256) -> Self {
        Self(format!("{:x}", hasher.finalize()))
    }
}

impl TryFrom<&str> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: &str) -> Result<Self> {
        validate_sha256(value)?;
        Ok(Self(value.to_owned()))
    }
}

impl TryFrom<String> for Sha256Digest {
    type Error = ArtefactError;

    fn try_from(value: String) -> Result<Self> {
        validate_sha256(&value)?;
        Ok(Self(value))
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate that `value` is a well-formed hex-encoded SHA-256 digest.
fn validate_sha256(value: &str) -> Result<()> {
    let invalid = |reason: String| ArtefactError::InvalidSha256Digest {
        value: value.to_owned(),
        reason,
    };
    if value.len() != DIGEST_HEX_LEN {
        return Err(invalid(format!(
            "expected {DIGEST_HEX_LEN} hex characters, got {}",
            value.len()
        )));
    }
    if let Some(bad) = value.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(invalid(format!("non-hex character '{bad}'")));
    }
    if value.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(invalid("digest must be lowercase".to_owned()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn accepts_valid_sixty_four_char_hex() {
        let digest = Sha256Digest::try_from("0123456789abcdef".repeat(4).as_str());
        assert!(digest.is_ok());
    }

    #[rstest]
    #[case::too_short("abcdef".to_owned())]
    #[case::too_long("a".repeat(65))]
    #[case::non_hex(format!("{}g", "a".repeat(63)))]
    #[case::uppercase("A".repeat(64))]
    fn rejects_malformed_digest(#[case] value: String) {
        let result = Sha256Digest::try_from(value.as_str());
        assert!(
            matches!(result, Err(ArtefactError::InvalidSha256Digest { .. })),
            "expected rejection for {value}"
        );
    }

    #[test]
    fn error_message_names_the_rejected_value() {
        let err = Sha256Digest::try_from("xyz").expect_err("short digest is invalid");
        let msg = err.to_string();
        assert!(msg.contains("xyz"));
        assert!(msg.contains("expected 64 hex characters, got 3"));
    }

    #[test]
    fn from_hasher_matches_known_empty_input_digest() {
        let digest = Sha256Digest::from_hasher(Sha256::new());
        assert_eq!(
            digest.as_str(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn display_shows_full_digest() {
        let hex = "c".repeat(64);
        let digest = Sha256Digest::try_from(hex.clone()).expect("known good");
        assert_eq!(format!("{digest}"), hex);
    }
}

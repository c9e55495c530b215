//! Content hashes of persisted profile state used for optimistic concurrency.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// SHA-256 digest (lower-case hex) of an entity's canonical JSON form.
///
/// Fields skipped by serialisation, such as attached errors, do not affect
/// the fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Computes the fingerprint of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`FingerprintError`] when the entity cannot be serialised.
    pub fn of<T: Serialize>(entity: &T) -> Result<Self, FingerprintError> {
        let canonical = serde_json::to_vec(entity).map_err(FingerprintError)?;
        Ok(Self(hex::encode(Sha256::digest(&canonical))))
    }

    /// Wraps a fingerprint previously handed to a caller.
    #[must_use]
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    /// Hex digest.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The entity could not be serialised for hashing.
#[derive(Debug, Error)]
#[error("failed to serialise entity for fingerprinting: {0}")]
pub struct FingerprintError(#[source] serde_json::Error);

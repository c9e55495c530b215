//! Decryption collaborator for secure property values.

use thiserror::Error;

/// Decrypts cipher text stored in secure properties.
///
/// A decrypt failure while a profile is being validated is treated as
/// transient; the commit collaborator re-checks encrypted values and reports
/// the real problem.
pub trait Cipher: Send + Sync {
    /// Returns the plain text for `cipher_text`.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError`] when the value cannot be decrypted.
    fn decrypt(&self, cipher_text: &str) -> Result<String, CipherError>;
}

/// A value could not be decrypted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not decrypt value: {reason}")]
pub struct CipherError {
    reason: String,
}

impl CipherError {
    /// Creates an error with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Why decryption failed.
    #[must_use]
    pub const fn reason(&self) -> &str {
        self.reason.as_str()
    }
}

/// A property whose encrypted value could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("property '{key}' could not be resolved: {source}")]
pub struct UnresolvedProperty {
    key: String,
    #[source]
    source: CipherError,
}

impl UnresolvedProperty {
    /// Wraps `source` for the property `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, source: CipherError) -> Self {
        Self {
            key: key.into(),
            source,
        }
    }

    /// Property name.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Underlying decryption failure.
    #[must_use]
    pub const fn cipher_error(&self) -> &CipherError {
        &self.source
    }
}

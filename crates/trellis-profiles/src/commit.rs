//! Contract of the external configuration-commit collaborator.

use thiserror::Error;

use crate::command::{ProfileCommand, Username};
use crate::fingerprint::Fingerprint;

/// What a successful commit produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    fingerprint: Option<Fingerprint>,
}

impl CommitReceipt {
    /// Receipt carrying the new persisted fingerprint.
    #[must_use]
    pub const fn stored(fingerprint: Fingerprint) -> Self {
        Self {
            fingerprint: Some(fingerprint),
        }
    }

    /// Receipt for a removal; nothing remains to fingerprint.
    #[must_use]
    pub const fn removed() -> Self {
        Self { fingerprint: None }
    }

    /// Fingerprint of the persisted profile after the commit.
    #[must_use]
    pub const fn fingerprint(&self) -> Option<&Fingerprint> {
        self.fingerprint.as_ref()
    }
}

/// Failures reported by the commit collaborator.
#[derive(Debug, Error)]
pub enum CommitError {
    /// Structural or semantic rejection of the new document.
    #[error("configuration is invalid: {}", .errors.join("; "))]
    ConfigInvalid {
        /// Every problem found.
        errors: Vec<String>,
    },

    /// The persisted profile changed since the caller read it.
    #[error("profile '{profile_id}' fingerprint mismatch: expected {expected}, found {current}")]
    ConcurrencyConflict {
        /// Profile id.
        profile_id: String,
        /// Fingerprint supplied with the command.
        expected: Fingerprint,
        /// Fingerprint of the persisted profile.
        current: Fingerprint,
    },

    /// Any other failure.
    #[error("commit failed: {message}")]
    Internal {
        /// Description of the failure.
        message: String,
        /// Underlying cause, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl CommitError {
    /// Builds a structural rejection.
    #[must_use]
    pub const fn invalid(errors: Vec<String>) -> Self {
        Self::ConfigInvalid { errors }
    }

    /// Builds an internal failure with no underlying cause.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
            source: None,
        }
    }
}

/// Applies a command to the configuration document.
///
/// The collaborator serialises access to the document, performs its own
/// structural checks and compares the command's fingerprint with the
/// persisted one. It is the only component that mutates the document.
pub trait ConfigCommitter<P>: Send + Sync {
    /// Commits `command` on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns [`CommitError`] describing why the document was not changed.
    fn commit(
        &self,
        command: &ProfileCommand<P>,
        actor: &Username,
    ) -> Result<CommitReceipt, CommitError>;
}

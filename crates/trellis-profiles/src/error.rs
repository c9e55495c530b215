//! Operational errors raised by the profile registries.
//!
//! Expected negative outcomes (missing profiles in `find`, validation
//! problems, stale fingerprints) are values; these errors cover misuse and
//! lookups that require existence.

use thiserror::Error;

use crate::command::CommandStateError;

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    /// No profile of the family carries the id.
    #[error("{tag} profile '{id}' was not found")]
    RecordNotFound {
        /// Display tag of the family.
        tag: &'static str,
        /// Id that was looked up.
        id: String,
    },

    /// The persisted profile could not be fingerprinted.
    #[error("failed to fingerprint {tag} profile '{id}': {message}")]
    Fingerprint {
        /// Display tag of the family.
        tag: &'static str,
        /// Profile id.
        id: String,
        /// Serialisation failure text.
        message: String,
    },

    /// The command was already submitted.
    #[error("command for '{id}' is {state}; build a new command to resubmit")]
    CommandFinalised {
        /// Profile id.
        id: String,
        /// State the command is in.
        state: &'static str,
    },

    /// The command was driven through an illegal transition.
    #[error(transparent)]
    CommandState(#[from] CommandStateError),
}

impl ProfileError {
    /// Returns `true` for [`ProfileError::RecordNotFound`].
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::RecordNotFound { .. })
    }
}

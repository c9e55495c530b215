//! Mutation intents and their per-command state machine.
//!
//! A [`ProfileCommand`] moves `Built → Validated → Committed` or
//! `Built → Validated → Rejected`. Committed and rejected commands are
//! terminal: their profile can no longer be mutated and they cannot be
//! submitted again.

use thiserror::Error;

use crate::commit::CommitReceipt;
use crate::fingerprint::Fingerprint;
use crate::profile::PluginProfile;
use crate::validation::ValidationOutcome;

/// Identity of the caller performing a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Wraps a user name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for Username {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The mutation a command carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Add a new profile.
    Create,
    /// Replace a profile read with the given fingerprint.
    Update {
        /// Fingerprint captured when the caller read the profile.
        fingerprint: Fingerprint,
    },
    /// Remove a profile, optionally guarded by a fingerprint.
    Delete {
        /// Fingerprint captured when the caller read the profile.
        fingerprint: Option<Fingerprint>,
    },
}

impl Operation {
    /// Lower-case operation name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
        }
    }

    /// Fingerprint the commit collaborator must compare against.
    #[must_use]
    pub const fn expected_fingerprint(&self) -> Option<&Fingerprint> {
        match self {
            Self::Create => None,
            Self::Update { fingerprint } => Some(fingerprint),
            Self::Delete { fingerprint } => fingerprint.as_ref(),
        }
    }

    /// Deletes are not sent to the plugin.
    #[must_use]
    pub const fn requires_validation(&self) -> bool {
        !matches!(self, Self::Delete { .. })
    }
}

/// Why a command was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The persisted profile changed since it was read.
    ConcurrencyConflict {
        /// Caller-facing message.
        message: String,
    },
    /// The commit collaborator rejected the profile's content.
    ValidationConflict {
        /// Aggregate caller-facing message.
        message: String,
        /// Individual problems reported by the collaborator.
        errors: Vec<String>,
    },
    /// An unexpected failure; details are only in the logs.
    InternalError {
        /// Generic caller-facing message.
        message: String,
    },
}

impl Rejection {
    /// Caller-facing message.
    #[must_use]
    pub const fn message(&self) -> &str {
        match self {
            Self::ConcurrencyConflict { message }
            | Self::ValidationConflict { message, .. }
            | Self::InternalError { message } => message.as_str(),
        }
    }
}

/// Where a command is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandState {
    /// Constructed, not yet submitted.
    Built,
    /// Validation has run (or was skipped for a delete).
    Validated,
    /// Terminal success.
    Committed(CommitReceipt),
    /// Terminal failure.
    Rejected(Rejection),
}

impl CommandState {
    /// Lower-case state name used in errors and logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Built => "built",
            Self::Validated => "validated",
            Self::Committed(_) => "committed",
            Self::Rejected(_) => "rejected",
        }
    }

    /// Returns `true` for committed and rejected states.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Committed(_) | Self::Rejected(_))
    }
}

/// A command was driven through an illegal transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandStateError {
    /// The command already reached a terminal state.
    #[error("command for '{id}' is {state} and can no longer change")]
    Finalised {
        /// Profile id.
        id: String,
        /// Terminal state name.
        state: &'static str,
    },
    /// The requested transition is not allowed from the current state.
    #[error("command for '{id}' cannot move from {from} to {to}")]
    IllegalTransition {
        /// Profile id.
        id: String,
        /// Current state name.
        from: &'static str,
        /// Requested state name.
        to: &'static str,
    },
}

/// One create, update or delete intent for a profile.
///
/// # Example
///
/// ```
/// use trellis_profiles::{ElasticProfile, ProfileCommand, Username};
///
/// let command = ProfileCommand::create(ElasticProfile::new("p1", None), Username::new("admin"));
/// assert_eq!(command.operation().name(), "create");
/// assert!(command.expected_fingerprint().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct ProfileCommand<P> {
    profile: P,
    actor: Username,
    operation: Operation,
    state: CommandState,
    validation: Option<ValidationOutcome>,
}

impl<P: PluginProfile> ProfileCommand<P> {
    /// Intent to add `profile`.
    #[must_use]
    pub const fn create(profile: P, actor: Username) -> Self {
        Self::built(profile, actor, Operation::Create)
    }

    /// Intent to replace the profile read with `fingerprint`.
    #[must_use]
    pub const fn update(profile: P, actor: Username, fingerprint: Fingerprint) -> Self {
        Self::built(profile, actor, Operation::Update { fingerprint })
    }

    /// Intent to remove `profile` regardless of concurrent edits.
    #[must_use]
    pub const fn delete(profile: P, actor: Username) -> Self {
        Self::built(profile, actor, Operation::Delete { fingerprint: None })
    }

    /// Intent to remove `profile` only if it is unchanged since read.
    #[must_use]
    pub const fn delete_checked(profile: P, actor: Username, fingerprint: Fingerprint) -> Self {
        Self::built(
            profile,
            actor,
            Operation::Delete {
                fingerprint: Some(fingerprint),
            },
        )
    }

    const fn built(profile: P, actor: Username, operation: Operation) -> Self {
        Self {
            profile,
            actor,
            operation,
            state: CommandState::Built,
            validation: None,
        }
    }

    /// Target profile, with any errors validation attached.
    #[must_use]
    pub const fn profile(&self) -> &P {
        &self.profile
    }

    /// Mutable access to the profile while the command is not terminal.
    ///
    /// # Errors
    ///
    /// Returns [`CommandStateError::Finalised`] once committed or rejected.
    pub fn profile_mut(&mut self) -> Result<&mut P, CommandStateError> {
        if self.state.is_terminal() {
            return Err(self.finalised());
        }
        Ok(&mut self.profile)
    }

    /// Consumes the command, yielding its profile.
    #[must_use]
    pub fn into_profile(self) -> P {
        self.profile
    }

    /// Acting identity.
    #[must_use]
    pub const fn actor(&self) -> &Username {
        &self.actor
    }

    /// The mutation carried.
    #[must_use]
    pub const fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Fingerprint the commit must match, if any.
    #[must_use]
    pub const fn expected_fingerprint(&self) -> Option<&Fingerprint> {
        self.operation.expected_fingerprint()
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &CommandState {
        &self.state
    }

    /// Outcome of the validation step, once it has run.
    #[must_use]
    pub const fn validation(&self) -> Option<&ValidationOutcome> {
        self.validation.as_ref()
    }

    /// Returns `true` once committed.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self.state, CommandState::Committed(_))
    }

    /// Rejection reason, if rejected.
    #[must_use]
    pub const fn rejection(&self) -> Option<&Rejection> {
        match &self.state {
            CommandState::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    /// Records the validation outcome.
    ///
    /// # Errors
    ///
    /// Fails unless the command is still `Built`.
    pub fn mark_validated(&mut self, outcome: ValidationOutcome) -> Result<(), CommandStateError> {
        self.transition("validated", |state| matches!(state, CommandState::Built))?;
        self.validation = Some(outcome);
        self.state = CommandState::Validated;
        Ok(())
    }

    /// Records a successful commit.
    ///
    /// # Errors
    ///
    /// Fails unless the command is `Validated`.
    pub fn mark_committed(&mut self, receipt: CommitReceipt) -> Result<(), CommandStateError> {
        self.transition("committed", |state| matches!(state, CommandState::Validated))?;
        self.state = CommandState::Committed(receipt);
        Ok(())
    }

    /// Records a rejected commit.
    ///
    /// # Errors
    ///
    /// Fails unless the command is `Validated`.
    pub fn mark_rejected(&mut self, rejection: Rejection) -> Result<(), CommandStateError> {
        self.transition("rejected", |state| matches!(state, CommandState::Validated))?;
        self.state = CommandState::Rejected(rejection);
        Ok(())
    }

    fn transition(
        &self,
        to: &'static str,
        allowed: impl Fn(&CommandState) -> bool,
    ) -> Result<(), CommandStateError> {
        if self.state.is_terminal() {
            return Err(self.finalised());
        }
        if allowed(&self.state) {
            Ok(())
        } else {
            Err(CommandStateError::IllegalTransition {
                id: self.profile.id().to_owned(),
                from: self.state.name(),
                to,
            })
        }
    }

    fn finalised(&self) -> CommandStateError {
        CommandStateError::Finalised {
            id: self.profile.id().to_owned(),
            state: self.state.name(),
        }
    }
}

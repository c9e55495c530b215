//! Generic CRUD surface over one profile family.
//!
//! A [`ProfileRegistry`] is composed from capabilities supplied at
//! construction: a snapshot provider, a [`FamilyAccessor`] projecting the
//! family out of the document, the commit collaborator, the validation
//! gateway, and a [`PluginResolver`] deciding which plugin owns a profile.
//! It never mutates the document itself and holds no lock between
//! validation and commit; stale writes are caught by fingerprint comparison
//! in the commit collaborator.

mod listing;

use std::sync::Arc;

use tracing::{debug, error};

pub use self::listing::ProfileListing;
use crate::command::{CommandState, ProfileCommand, Rejection};
use crate::commit::{CommitError, CommitReceipt, ConfigCommitter};
use crate::error::ProfileError;
use crate::messages;
use crate::profile::PluginProfile;
use crate::result::OperationResult;
use crate::snapshot::{ConfigSnapshot, ConfigSnapshotProvider, FamilyAccessor};
use crate::telemetry::RegistryTelemetry;
use crate::validation::{ValidationGateway, ValidationOutcome};

/// Decides which plugin owns a profile.
pub trait PluginResolver<P>: Send + Sync {
    /// Plugin id for `profile` given the current document, if any.
    fn effective_plugin_id(&self, profile: &P, snapshot: &ConfigSnapshot) -> Option<String>;
}

/// Resolves to the plugin id a profile declares itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredPluginId;

impl<P: PluginProfile> PluginResolver<P> for DeclaredPluginId {
    fn effective_plugin_id(&self, profile: &P, _snapshot: &ConfigSnapshot) -> Option<String> {
        profile.declared_plugin_id().map(str::to_owned)
    }
}

/// Terminal outcome of a submitted command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The document now reflects the command.
    Committed(CommitReceipt),
    /// The document was left unchanged.
    Rejected(Rejection),
}

impl SubmitOutcome {
    /// Returns `true` for [`SubmitOutcome::Committed`].
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        matches!(self, Self::Committed(_))
    }
}

/// Find, list and submit for one profile family.
pub struct ProfileRegistry<P> {
    snapshots: Arc<dyn ConfigSnapshotProvider>,
    family: FamilyAccessor<P>,
    committer: Arc<dyn ConfigCommitter<P>>,
    gateway: ValidationGateway,
    resolver: Arc<dyn PluginResolver<P>>,
    telemetry: RegistryTelemetry,
}

impl<P: PluginProfile> ProfileRegistry<P> {
    /// Creates a registry resolving plugins from the profile's own
    /// declaration and logging through the host's default subscriber.
    #[must_use]
    pub fn new(
        snapshots: Arc<dyn ConfigSnapshotProvider>,
        family: FamilyAccessor<P>,
        committer: Arc<dyn ConfigCommitter<P>>,
        gateway: ValidationGateway,
    ) -> Self {
        Self {
            snapshots,
            family,
            committer,
            gateway,
            resolver: Arc::new(DeclaredPluginId),
            telemetry: RegistryTelemetry::inherited(),
        }
    }

    /// Replaces the plugin resolver.
    #[must_use]
    pub fn with_resolver(mut self, resolver: Arc<dyn PluginResolver<P>>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replaces the telemetry capability.
    #[must_use]
    pub fn with_telemetry(mut self, telemetry: RegistryTelemetry) -> Self {
        self.telemetry = telemetry;
        self
    }

    /// Telemetry used by this registry.
    #[must_use]
    pub const fn telemetry(&self) -> &RegistryTelemetry {
        &self.telemetry
    }

    /// Current document.
    #[must_use]
    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.snapshots.snapshot()
    }

    /// Profile with `id` in the current document; `None` is not an error.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<P> {
        self.telemetry.in_scope(&P::KIND, "find", || {
            let snapshot = self.snapshots.snapshot();
            let found = self
                .family
                .profiles(&snapshot)
                .iter()
                .rev()
                .find(|profile| profile.id() == id)
                .cloned();
            debug!(profile_id = id, found = found.is_some(), "looked up profile");
            found
        })
    }

    /// Every profile, keyed by id in document order.
    #[must_use]
    pub fn list_all(&self) -> ProfileListing<P> {
        self.telemetry.in_scope(&P::KIND, "list_all", || {
            let snapshot = self.snapshots.snapshot();
            let listing = ProfileListing::from_profiles(self.family.profiles(&snapshot));
            debug!(profiles = listing.len(), "listed profiles");
            listing
        })
    }

    /// Plugin owning `profile` in the current document.
    #[must_use]
    pub fn effective_plugin_id(&self, profile: &P) -> Option<String> {
        let snapshot = self.snapshots.snapshot();
        self.resolver.effective_plugin_id(profile, &snapshot)
    }

    /// Validates `profile` with its resolved plugin, attaching any errors.
    pub fn validate(&self, profile: &mut P) -> ValidationOutcome {
        self.telemetry.in_scope(&P::KIND, "validate", || {
            let plugin_id = self.effective_plugin_id(profile);
            self.gateway.validate(profile, plugin_id.as_deref())
        })
    }

    /// Runs `command` through validation and commit.
    ///
    /// Rejections are reported through the returned outcome and `result`;
    /// validation errors alone do not stop the commit attempt, which is the
    /// commit collaborator's decision.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::CommandFinalised`] when the command has
    /// already been submitted.
    pub fn submit(
        &self,
        command: &mut ProfileCommand<P>,
        result: &mut OperationResult,
    ) -> Result<SubmitOutcome, ProfileError> {
        self.telemetry
            .in_scope(&P::KIND, command.operation().name(), || {
                self.run(command, result)
            })
    }

    fn run(
        &self,
        command: &mut ProfileCommand<P>,
        result: &mut OperationResult,
    ) -> Result<SubmitOutcome, ProfileError> {
        if !matches!(command.state(), CommandState::Built) {
            return Err(ProfileError::CommandFinalised {
                id: command.profile().id().to_owned(),
                state: command.state().name(),
            });
        }

        let outcome = if command.operation().requires_validation() {
            let plugin_id = self.effective_plugin_id(command.profile());
            self.gateway
                .validate(command.profile_mut()?, plugin_id.as_deref())
        } else {
            ValidationOutcome::NotRequired
        };
        debug!(
            profile_id = command.profile().id(),
            outcome = ?outcome,
            "validation finished"
        );
        command.mark_validated(outcome)?;

        match self.committer.commit(command, command.actor()) {
            Ok(receipt) => {
                debug!(
                    profile_id = command.profile().id(),
                    actor = %command.actor(),
                    "committed profile"
                );
                command.mark_committed(receipt.clone())?;
                Ok(SubmitOutcome::Committed(receipt))
            }
            Err(failure) => {
                let rejection = self.reject(command, failure, result);
                command.mark_rejected(rejection.clone())?;
                Ok(SubmitOutcome::Rejected(rejection))
            }
        }
    }

    fn reject(
        &self,
        command: &ProfileCommand<P>,
        failure: CommitError,
        result: &mut OperationResult,
    ) -> Rejection {
        let id = command.profile().id();
        match failure {
            CommitError::ConcurrencyConflict { .. } => {
                debug!(profile_id = id, error = %failure, "rejected stale profile");
                let message = messages::stale_configuration(&P::KIND, id);
                result.precondition_failed(message.clone());
                Rejection::ConcurrencyConflict { message }
            }
            CommitError::ConfigInvalid { errors } => {
                debug!(profile_id = id, errors = errors.len(), "profile failed commit checks");
                let message = messages::validation_failed(&P::KIND, id, &errors);
                result.unprocessable_entity(message.clone());
                Rejection::ValidationConflict { message, errors }
            }
            CommitError::Internal { .. } => {
                error!(
                    profile_id = id,
                    operation = command.operation().name(),
                    actor = %command.actor(),
                    error = ?failure,
                    "failed to commit profile"
                );
                let message = messages::save_failed(&P::KIND);
                result.internal_error(message.clone());
                Rejection::InternalError { message }
            }
        }
    }
}

impl<P: PluginProfile> std::fmt::Debug for ProfileRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileRegistry")
            .field("kind", &P::KIND.kind())
            .field("telemetry", &self.telemetry)
            .finish_non_exhaustive()
    }
}

//! Plugin-backed validation of profiles.
//!
//! The [`ValidationGateway`] resolves a profile's properties, calls the
//! plugin's validation entry point, and writes reported problems into the
//! profile's [`ErrorBag`](crate::ErrorBag). Failures that the commit step will
//! re-check (undecryptable values, a plugin that crashed) are swallowed and
//! surfaced as [`ValidationOutcome::TransientFailure`] so callers and tests
//! can still tell them apart from real validation errors.

use std::sync::Arc;

use tracing::{debug, warn};
use trellis_plugins::{PluginError, ValidationEntryPoint, ValidationError};

use crate::messages;
use crate::profile::PluginProfile;
use crate::secret::Cipher;

/// Why a validation attempt was abandoned without reporting errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransientCause {
    /// A secure property could not be decrypted yet.
    UndecryptableProperty {
        /// Property name.
        key: String,
        /// Decryption failure text.
        reason: String,
    },
    /// The plugin failed while handling the request.
    PluginFailure {
        /// Plugin id.
        plugin_id: String,
        /// Failure text.
        message: String,
    },
}

/// Result of validating one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// The operation does not validate (deletes).
    NotRequired,
    /// No plugin id could be resolved; nothing was called.
    NoPlugin,
    /// The plugin accepted the properties.
    Success,
    /// The plugin reported problems; they are attached to the profile.
    ValidationErrors(Vec<ValidationError>),
    /// The resolved plugin is not loaded; an entity error is attached.
    PluginNotFound {
        /// Plugin id that could not be found.
        plugin_id: String,
    },
    /// Validation was abandoned; the commit step re-checks.
    TransientFailure(TransientCause),
}

impl ValidationOutcome {
    /// Returns `true` when errors were attached to the profile.
    #[must_use]
    pub const fn reported_errors(&self) -> bool {
        matches!(
            self,
            Self::ValidationErrors(_) | Self::PluginNotFound { .. }
        )
    }
}

/// Calls plugins to validate profiles and merges their answers.
#[derive(Clone)]
pub struct ValidationGateway {
    entry_point: Arc<dyn ValidationEntryPoint>,
    cipher: Arc<dyn Cipher>,
}

impl ValidationGateway {
    /// Creates a gateway over a plugin entry point and a cipher.
    #[must_use]
    pub const fn new(entry_point: Arc<dyn ValidationEntryPoint>, cipher: Arc<dyn Cipher>) -> Self {
        Self {
            entry_point,
            cipher,
        }
    }

    /// Validates `profile` with the plugin `plugin_id`.
    ///
    /// `None` means no plugin could be resolved and the call is skipped.
    pub fn validate<P: PluginProfile>(
        &self,
        profile: &mut P,
        plugin_id: Option<&str>,
    ) -> ValidationOutcome {
        let Some(plugin_id) = plugin_id else {
            debug!(profile_id = profile.id(), "no plugin resolved; skipping validation");
            return ValidationOutcome::NoPlugin;
        };

        let properties = match profile.resolved_properties(self.cipher.as_ref()) {
            Ok(properties) => properties,
            Err(error) => {
                warn!(
                    profile_id = profile.id(),
                    plugin_id,
                    property = error.key(),
                    error = %error,
                    "deferring validation: property cannot be decrypted yet"
                );
                return ValidationOutcome::TransientFailure(TransientCause::UndecryptableProperty {
                    key: error.key().to_owned(),
                    reason: error.cipher_error().reason().to_owned(),
                });
            }
        };

        match self.entry_point.validate(plugin_id, &properties) {
            Ok(result) if result.is_successful() => ValidationOutcome::Success,
            Ok(result) => {
                let errors = result.into_errors();
                for error in &errors {
                    profile.add_error(error.key(), error.message());
                }
                debug!(
                    profile_id = profile.id(),
                    plugin_id,
                    errors = errors.len(),
                    "plugin reported validation errors"
                );
                ValidationOutcome::ValidationErrors(errors)
            }
            Err(PluginError::NotFound { .. } | PluginError::UnsupportedExtension { .. }) => {
                profile
                    .errors_mut()
                    .add_entity(messages::plugin_not_found(plugin_id));
                ValidationOutcome::PluginNotFound {
                    plugin_id: plugin_id.to_owned(),
                }
            }
            Err(error) => {
                warn!(
                    profile_id = profile.id(),
                    plugin_id,
                    error = %error,
                    "deferring validation: plugin call failed"
                );
                ValidationOutcome::TransientFailure(TransientCause::PluginFailure {
                    plugin_id: plugin_id.to_owned(),
                    message: error.to_string(),
                })
            }
        }
    }
}

impl std::fmt::Debug for ValidationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationGateway").finish_non_exhaustive()
    }
}

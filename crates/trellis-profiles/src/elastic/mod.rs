//! Elastic agent profiles: plugin resolution through cluster profiles and
//! usage across the pipeline topology.

mod usage;

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

pub use self::usage::{UsageOrigin, UsageRecord};
use crate::command::{ProfileCommand, Username};
use crate::commit::ConfigCommitter;
use crate::error::ProfileError;
use crate::fingerprint::Fingerprint;
use crate::messages;
use crate::profile::{ElasticProfile, PluginProfile};
use crate::registry::{PluginResolver, ProfileListing, ProfileRegistry, SubmitOutcome};
use crate::result::OperationResult;
use crate::snapshot::{ConfigSnapshot, ConfigSnapshotProvider, ELASTIC_PROFILES};
use crate::telemetry::RegistryTelemetry;
use crate::validation::{ValidationGateway, ValidationOutcome};

/// Resolves an elastic profile's plugin through its linked cluster profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterProfilePluginId;

impl PluginResolver<ElasticProfile> for ClusterProfilePluginId {
    fn effective_plugin_id(
        &self,
        profile: &ElasticProfile,
        snapshot: &ConfigSnapshot,
    ) -> Option<String> {
        let cluster_id = profile.cluster_profile_id()?;
        snapshot
            .cluster_profiles()
            .iter()
            .find(|cluster| cluster.id() == cluster_id)
            .map(|cluster| cluster.plugin_id().to_owned())
    }
}

/// Registry for elastic agent profiles.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use trellis_plugins::{PluginError, PropertyMap, ValidationEntryPoint, ValidationResult};
/// use trellis_profiles::{
///     Cipher, CipherError, ClusterProfile, ConfigSnapshot, ElasticProfile,
///     ElasticProfileRegistry, InMemoryConfigStore, OperationResult, ValidationGateway,
///     Username,
/// };
///
/// struct Plaintext;
/// impl Cipher for Plaintext {
///     fn decrypt(&self, cipher_text: &str) -> Result<String, CipherError> {
///         Ok(cipher_text.to_owned())
///     }
/// }
///
/// struct AcceptAll;
/// impl ValidationEntryPoint for AcceptAll {
///     fn validate(&self, _: &str, _: &PropertyMap) -> Result<ValidationResult, PluginError> {
///         Ok(ValidationResult::success())
///     }
/// }
///
/// let cipher: Arc<dyn Cipher> = Arc::new(Plaintext);
/// let store = Arc::new(InMemoryConfigStore::new(
///     ConfigSnapshot::new().with_cluster_profile(ClusterProfile::new("docker", "docker-plugin")),
///     Arc::clone(&cipher),
/// ));
/// let registry = ElasticProfileRegistry::new(
///     store.clone(),
///     Arc::new(store.elastic_committer()),
///     ValidationGateway::new(Arc::new(AcceptAll), cipher),
/// );
///
/// let mut result = OperationResult::new();
/// let command = registry
///     .create(Username::new("admin"), ElasticProfile::new("small", Some("docker")), &mut result)
///     .unwrap();
/// assert!(command.is_committed());
/// assert!(registry.find("small").is_some());
/// ```
#[derive(Debug)]
pub struct ElasticProfileRegistry {
    profiles: ProfileRegistry<ElasticProfile>,
}

impl ElasticProfileRegistry {
    /// Creates the registry over the elastic profile family.
    #[must_use]
    pub fn new(
        snapshots: Arc<dyn ConfigSnapshotProvider>,
        committer: Arc<dyn ConfigCommitter<ElasticProfile>>,
        gateway: ValidationGateway,
    ) -> Self {
        let profiles = ProfileRegistry::new(snapshots, ELASTIC_PROFILES, committer, gateway)
            .with_resolver(Arc::new(ClusterProfilePluginId));
        Self { profiles }
    }

    /// Replaces the telemetry capability.
    #[must_use]
    pub fn with_telemetry(self, telemetry: RegistryTelemetry) -> Self {
        Self {
            profiles: self.profiles.with_telemetry(telemetry),
        }
    }

    /// The underlying generic registry.
    #[must_use]
    pub const fn profiles(&self) -> &ProfileRegistry<ElasticProfile> {
        &self.profiles
    }

    /// Profile with `id`, if any.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<ElasticProfile> {
        self.profiles.find(id)
    }

    /// Every profile in document order.
    #[must_use]
    pub fn list_all(&self) -> ProfileListing<ElasticProfile> {
        self.profiles.list_all()
    }

    /// Plugin id of the cluster profile `profile` links to.
    #[must_use]
    pub fn effective_plugin_id(&self, profile: &ElasticProfile) -> Option<String> {
        self.profiles.effective_plugin_id(profile)
    }

    /// Validates `profile` without committing it.
    pub fn validate(&self, profile: &mut ElasticProfile) -> ValidationOutcome {
        self.profiles.validate(profile)
    }

    /// Fingerprint of the persisted profile `id`, for a later update.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::RecordNotFound`] when no profile carries `id`.
    pub fn fingerprint_of(&self, id: &str) -> Result<Fingerprint, ProfileError> {
        let profile = self.find(id).ok_or_else(|| not_found(id))?;
        Fingerprint::of(&profile).map_err(|error| ProfileError::Fingerprint {
            tag: ElasticProfile::KIND.display_tag(),
            id: id.to_owned(),
            message: error.to_string(),
        })
    }

    /// Validates and commits a new profile.
    ///
    /// # Errors
    ///
    /// Propagates [`ProfileError`] from [`ProfileRegistry::submit`].
    pub fn create(
        &self,
        actor: Username,
        profile: ElasticProfile,
        result: &mut OperationResult,
    ) -> Result<ProfileCommand<ElasticProfile>, ProfileError> {
        let mut command = ProfileCommand::create(profile, actor);
        self.profiles.submit(&mut command, result)?;
        Ok(command)
    }

    /// Validates and commits a replacement for the profile read with
    /// `fingerprint`.
    ///
    /// # Errors
    ///
    /// Propagates [`ProfileError`] from [`ProfileRegistry::submit`].
    pub fn update(
        &self,
        actor: Username,
        fingerprint: Fingerprint,
        profile: ElasticProfile,
        result: &mut OperationResult,
    ) -> Result<ProfileCommand<ElasticProfile>, ProfileError> {
        let mut command = ProfileCommand::update(profile, actor, fingerprint);
        self.profiles.submit(&mut command, result)?;
        Ok(command)
    }

    /// Removes the profile, setting a confirmation message on success.
    ///
    /// # Errors
    ///
    /// Propagates [`ProfileError`] from [`ProfileRegistry::submit`].
    pub fn delete(
        &self,
        actor: Username,
        profile: ElasticProfile,
        result: &mut OperationResult,
    ) -> Result<ProfileCommand<ElasticProfile>, ProfileError> {
        let mut command = ProfileCommand::delete(profile, actor);
        let outcome = self.profiles.submit(&mut command, result)?;
        if outcome.is_committed() {
            result.set_message(messages::deleted(&ElasticProfile::KIND, command.profile().id()));
        }
        Ok(command)
    }

    /// Submits a caller-built command.
    ///
    /// # Errors
    ///
    /// Propagates [`ProfileError`] from [`ProfileRegistry::submit`].
    pub fn submit(
        &self,
        command: &mut ProfileCommand<ElasticProfile>,
        result: &mut OperationResult,
    ) -> Result<SubmitOutcome, ProfileError> {
        self.profiles.submit(command, result)
    }

    /// Jobs that run on agents described by the profile `profile_id`.
    ///
    /// The scan reads one snapshot of the topology; it may not reflect edits
    /// committed while it runs.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::RecordNotFound`] when no profile carries
    /// `profile_id`.
    pub fn usage_of(&self, profile_id: &str) -> Result<HashSet<UsageRecord>, ProfileError> {
        if self.find(profile_id).is_none() {
            return Err(not_found(profile_id));
        }
        self.profiles
            .telemetry()
            .in_scope(&ElasticProfile::KIND, "usage_of", || {
                let snapshot = self.profiles.snapshot();
                let usages = usage::scan(snapshot.pipelines(), profile_id);
                debug!(profile_id, usages = usages.len(), "scanned profile usage");
                Ok(usages)
            })
    }
}

fn not_found(id: &str) -> ProfileError {
    ProfileError::RecordNotFound {
        tag: ElasticProfile::KIND.display_tag(),
        id: id.to_owned(),
    }
}

#[cfg(test)]
mod tests;

//! Reference configuration store: snapshot provider and commit collaborator.
//!
//! The store keeps the document behind an `RwLock<Arc<ConfigSnapshot>>`.
//! Readers clone the `Arc` and keep a point-in-time view; a commit builds the
//! next document from a copy and swaps it in while holding the write lock,
//! so commits are serialised and never observed half-applied.

use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::command::{Operation, ProfileCommand, Username};
use crate::commit::{CommitError, CommitReceipt, ConfigCommitter};
use crate::fingerprint::Fingerprint;
use crate::profile::{ClusterProfile, ElasticProfile, PluginProfile};
use crate::secret::Cipher;
use crate::snapshot::{
    CLUSTER_PROFILES, ConfigSnapshot, ConfigSnapshotProvider, ELASTIC_PROFILES, FamilyAccessor,
};

/// In-memory configuration document.
pub struct InMemoryConfigStore {
    current: RwLock<Arc<ConfigSnapshot>>,
    cipher: Arc<dyn Cipher>,
}

impl InMemoryConfigStore {
    /// Creates a store holding `snapshot`, re-checking secure values with
    /// `cipher` on commit.
    #[must_use]
    pub fn new(snapshot: ConfigSnapshot, cipher: Arc<dyn Cipher>) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
            cipher,
        }
    }

    /// Replaces the document wholesale, as an external edit would.
    pub fn replace(&self, snapshot: ConfigSnapshot) {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *current = Arc::new(snapshot);
    }

    /// Commit collaborator for the family `family`.
    #[must_use]
    pub fn committer<P: PluginProfile>(
        self: &Arc<Self>,
        family: FamilyAccessor<P>,
    ) -> StoreCommitter<P> {
        StoreCommitter {
            store: Arc::clone(self),
            family,
        }
    }

    /// Commit collaborator for elastic profiles.
    #[must_use]
    pub fn elastic_committer(self: &Arc<Self>) -> StoreCommitter<ElasticProfile> {
        self.committer(ELASTIC_PROFILES)
    }

    /// Commit collaborator for cluster profiles.
    #[must_use]
    pub fn cluster_committer(self: &Arc<Self>) -> StoreCommitter<ClusterProfile> {
        self.committer(CLUSTER_PROFILES)
    }
}

impl ConfigSnapshotProvider for InMemoryConfigStore {
    fn snapshot(&self) -> Arc<ConfigSnapshot> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current)
    }
}

impl std::fmt::Debug for InMemoryConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryConfigStore").finish_non_exhaustive()
    }
}

/// Applies commands for one family to an [`InMemoryConfigStore`].
pub struct StoreCommitter<P> {
    store: Arc<InMemoryConfigStore>,
    family: FamilyAccessor<P>,
}

impl<P: PluginProfile> std::fmt::Debug for StoreCommitter<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreCommitter")
            .field("family", &self.family)
            .finish_non_exhaustive()
    }
}

impl<P: PluginProfile> ConfigCommitter<P> for StoreCommitter<P> {
    fn commit(
        &self,
        command: &ProfileCommand<P>,
        actor: &Username,
    ) -> Result<CommitReceipt, CommitError> {
        let mut current = self
            .store
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let mut next = ConfigSnapshot::clone(&current);
        let receipt = apply(&self.family, &mut next, command, self.store.cipher.as_ref())?;
        *current = Arc::new(next);
        debug!(
            profile_id = command.profile().id(),
            operation = command.operation().name(),
            actor = %actor,
            "applied profile command to document"
        );
        Ok(receipt)
    }
}

fn apply<P: PluginProfile>(
    family: &FamilyAccessor<P>,
    document: &mut ConfigSnapshot,
    command: &ProfileCommand<P>,
    cipher: &dyn Cipher,
) -> Result<CommitReceipt, CommitError> {
    let profile = command.profile();
    let id = profile.id();
    let tag = P::KIND.display_tag();
    if id.trim().is_empty() {
        return Err(CommitError::invalid(vec![format!(
            "{tag} profile id cannot be blank."
        )]));
    }
    // Last definition wins, as in `ProfileRegistry::find`.
    let position = family
        .profiles(document)
        .iter()
        .rposition(|existing| existing.id() == id);

    match (command.operation(), position) {
        (Operation::Create, Some(_)) => Err(CommitError::invalid(vec![format!(
            "{tag} profile id '{id}' is not unique."
        )])),
        (Operation::Create, None) => {
            ensure_persistable(profile, cipher)?;
            let stored = persisted(profile);
            let fingerprint = fingerprint(&stored)?;
            family.profiles_mut(document).push(stored);
            Ok(CommitReceipt::stored(fingerprint))
        }
        (Operation::Update { .. } | Operation::Delete { .. }, None) => Err(CommitError::invalid(
            vec![format!("{tag} profile '{id}' does not exist.")],
        )),
        (Operation::Update { fingerprint: expected }, Some(index)) => {
            ensure_unchanged(family, document, index, id, expected)?;
            ensure_persistable(profile, cipher)?;
            let stored = persisted(profile);
            let updated = fingerprint(&stored)?;
            if let Some(slot) = family.profiles_mut(document).get_mut(index) {
                *slot = stored;
            }
            Ok(CommitReceipt::stored(updated))
        }
        (Operation::Delete { fingerprint: expected }, Some(index)) => {
            if let Some(expected) = expected {
                ensure_unchanged(family, document, index, id, expected)?;
            }
            let referrers = family.referrers(document, id);
            if !referrers.is_empty() {
                return Err(CommitError::invalid(vec![format!(
                    "Cannot delete the {tag} profile '{id}' as it is used by: {}.",
                    referrers.join(", ")
                )]));
            }
            family.profiles_mut(document).remove(index);
            Ok(CommitReceipt::removed())
        }
    }
}

fn ensure_unchanged<P: PluginProfile>(
    family: &FamilyAccessor<P>,
    document: &ConfigSnapshot,
    index: usize,
    id: &str,
    expected: &Fingerprint,
) -> Result<(), CommitError> {
    let Some(existing) = family.profiles(document).get(index) else {
        return Err(CommitError::internal(format!("profile '{id}' vanished during commit")));
    };
    let current = fingerprint(existing)?;
    if &current == expected {
        Ok(())
    } else {
        Err(CommitError::ConcurrencyConflict {
            profile_id: id.to_owned(),
            expected: expected.clone(),
            current,
        })
    }
}

fn ensure_persistable<P: PluginProfile>(
    profile: &P,
    cipher: &dyn Cipher,
) -> Result<(), CommitError> {
    let mut errors = profile.errors().messages();
    for property in profile.properties() {
        if let Err(error) = property.resolve(cipher) {
            errors.push(format!(
                "Could not decrypt property '{}': {}",
                property.key(),
                error.reason()
            ));
        }
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CommitError::invalid(errors))
    }
}

fn persisted<P: PluginProfile>(profile: &P) -> P {
    let mut stored = profile.clone();
    stored.errors_mut().clear();
    stored
}

fn fingerprint<P: PluginProfile>(profile: &P) -> Result<Fingerprint, CommitError> {
    Fingerprint::of(profile).map_err(|error| CommitError::Internal {
        message: format!("could not fingerprint profile '{}'", profile.id()),
        source: Some(Box::new(error)),
    })
}

//! Plugin-backed configuration profiles.
//!
//! Profiles are named configuration records whose property schema belongs
//! to an external plugin. This crate provides:
//!
//! - [`ErrorBag`], accumulating entity-level and per-property errors;
//! - [`ValidationGateway`], calling a plugin's validation entry point and
//!   merging its answer into the profile;
//! - [`ProfileCommand`], one create, update or delete intent with its
//!   optimistic-concurrency [`Fingerprint`];
//! - [`ProfileRegistry`], generic find, list and submit over a profile
//!   family;
//! - [`ElasticProfileRegistry`], resolving plugins through cluster profiles
//!   and reporting which jobs use a profile;
//! - [`InMemoryConfigStore`], a reference snapshot provider and commit
//!   collaborator.
//!
//! The configuration document itself is owned by the commit collaborator.
//! Registries read point-in-time snapshots, never lock across the
//! validate/commit boundary, and rely on fingerprint comparison at commit to
//! reject stale writes. Conflicts are reported, never retried.

mod command;
mod commit;
mod elastic;
mod error;
mod error_bag;
mod fingerprint;
pub mod messages;
mod profile;
mod registry;
mod result;
mod secret;
mod snapshot;
mod store;
pub mod telemetry;
mod topology;
mod validation;

#[cfg(test)]
mod tests;

pub use command::{
    CommandState, CommandStateError, Operation, ProfileCommand, Rejection, Username,
};
pub use commit::{CommitError, CommitReceipt, ConfigCommitter};
pub use elastic::{ClusterProfilePluginId, ElasticProfileRegistry, UsageOrigin, UsageRecord};
pub use error::ProfileError;
pub use error_bag::{ErrorBag, ErrorKey};
pub use fingerprint::{Fingerprint, FingerprintError};
pub use profile::{
    ClusterProfile, ConfigurationProperty, ElasticProfile, PluginProfile, ProfileKind,
    PropertyValue,
};
pub use registry::{
    DeclaredPluginId, PluginResolver, ProfileListing, ProfileRegistry, SubmitOutcome,
};
pub use result::{OperationResult, ResultStatus};
pub use secret::{Cipher, CipherError, UnresolvedProperty};
pub use snapshot::{
    CLUSTER_PROFILES, ConfigSnapshot, ConfigSnapshotProvider, ELASTIC_PROFILES, FamilyAccessor,
};
pub use store::{InMemoryConfigStore, StoreCommitter};
pub use telemetry::{RegistryTelemetry, TelemetryError};
pub use topology::{ConfigOrigin, JobConfig, PipelineConfig, StageConfig};
pub use validation::{TransientCause, ValidationGateway, ValidationOutcome};

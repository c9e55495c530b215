//! Point-in-time configuration snapshots and per-family accessors.
//!
//! Registries never hold a snapshot across calls: every read asks the
//! [`ConfigSnapshotProvider`] for the current [`Arc`]'d value, so a scan sees
//! one consistent view even while commits replace the document.

use std::sync::Arc;

use crate::profile::{ClusterProfile, ElasticProfile, PluginProfile};
use crate::topology::PipelineConfig;

/// The slice of the configuration document the registries read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigSnapshot {
    elastic_profiles: Vec<ElasticProfile>,
    cluster_profiles: Vec<ClusterProfile>,
    pipelines: Vec<PipelineConfig>,
}

impl ConfigSnapshot {
    /// An empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            elastic_profiles: Vec::new(),
            cluster_profiles: Vec::new(),
            pipelines: Vec::new(),
        }
    }

    /// Appends an elastic profile.
    #[must_use]
    pub fn with_elastic_profile(mut self, profile: ElasticProfile) -> Self {
        self.elastic_profiles.push(profile);
        self
    }

    /// Appends a cluster profile.
    #[must_use]
    pub fn with_cluster_profile(mut self, profile: ClusterProfile) -> Self {
        self.cluster_profiles.push(profile);
        self
    }

    /// Appends a pipeline.
    #[must_use]
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipelines.push(pipeline);
        self
    }

    /// Elastic profiles in document order.
    #[must_use]
    pub fn elastic_profiles(&self) -> &[ElasticProfile] {
        &self.elastic_profiles
    }

    /// Cluster profiles in document order.
    #[must_use]
    pub fn cluster_profiles(&self) -> &[ClusterProfile] {
        &self.cluster_profiles
    }

    /// Pipelines in document order.
    #[must_use]
    pub fn pipelines(&self) -> &[PipelineConfig] {
        &self.pipelines
    }

    /// Mutable pipeline list, for hosts editing the topology.
    pub const fn pipelines_mut(&mut self) -> &mut Vec<PipelineConfig> {
        &mut self.pipelines
    }

    /// Ids of jobs (as `pipeline/stage/job`) referencing the elastic profile.
    #[must_use]
    pub fn jobs_using_elastic_profile(&self, profile_id: &str) -> Vec<String> {
        self.pipelines
            .iter()
            .flat_map(move |pipeline| {
                pipeline.stages().iter().flat_map(move |stage| {
                    stage
                        .jobs()
                        .iter()
                        .filter(move |job| job.elastic_profile_id() == Some(profile_id))
                        .map(move |job| {
                            format!("{}/{}/{}", pipeline.name(), stage.name(), job.name())
                        })
                })
            })
            .collect()
    }

    /// Ids of elastic profiles linked to the cluster profile.
    #[must_use]
    pub fn elastic_profiles_using_cluster(&self, cluster_id: &str) -> Vec<String> {
        self.elastic_profiles
            .iter()
            .filter(|profile| profile.cluster_profile_id() == Some(cluster_id))
            .map(|profile| profile.id().to_owned())
            .collect()
    }
}

/// Supplies the current configuration snapshot.
pub trait ConfigSnapshotProvider: Send + Sync {
    /// Returns the current document. Callers may keep the `Arc` as a
    /// point-in-time view.
    fn snapshot(&self) -> Arc<ConfigSnapshot>;
}

/// Capability giving a generic registry access to one profile family.
pub struct FamilyAccessor<P> {
    read: fn(&ConfigSnapshot) -> &[P],
    write: fn(&mut ConfigSnapshot) -> &mut Vec<P>,
    referrers: fn(&ConfigSnapshot, &str) -> Vec<String>,
}

impl<P> FamilyAccessor<P> {
    /// Builds an accessor from its three projections.
    #[must_use]
    pub const fn new(
        read: fn(&ConfigSnapshot) -> &[P],
        write: fn(&mut ConfigSnapshot) -> &mut Vec<P>,
        referrers: fn(&ConfigSnapshot, &str) -> Vec<String>,
    ) -> Self {
        Self {
            read,
            write,
            referrers,
        }
    }

    /// The family's profiles in `snapshot`.
    #[must_use]
    pub fn profiles<'a>(&self, snapshot: &'a ConfigSnapshot) -> &'a [P] {
        (self.read)(snapshot)
    }

    /// Mutable family storage in `snapshot`.
    pub fn profiles_mut<'a>(&self, snapshot: &'a mut ConfigSnapshot) -> &'a mut Vec<P> {
        (self.write)(snapshot)
    }

    /// Entities in `snapshot` that still reference the profile `id`.
    #[must_use]
    pub fn referrers(&self, snapshot: &ConfigSnapshot, id: &str) -> Vec<String> {
        (self.referrers)(snapshot, id)
    }
}

impl<P> Clone for FamilyAccessor<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for FamilyAccessor<P> {}

impl<P: PluginProfile> std::fmt::Debug for FamilyAccessor<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FamilyAccessor")
            .field("kind", &P::KIND.kind())
            .finish_non_exhaustive()
    }
}

fn read_elastic(snapshot: &ConfigSnapshot) -> &[ElasticProfile] {
    &snapshot.elastic_profiles
}

const fn write_elastic(snapshot: &mut ConfigSnapshot) -> &mut Vec<ElasticProfile> {
    &mut snapshot.elastic_profiles
}

fn read_cluster(snapshot: &ConfigSnapshot) -> &[ClusterProfile] {
    &snapshot.cluster_profiles
}

const fn write_cluster(snapshot: &mut ConfigSnapshot) -> &mut Vec<ClusterProfile> {
    &mut snapshot.cluster_profiles
}

/// Accessor for the elastic profile family; referrers are jobs.
pub const ELASTIC_PROFILES: FamilyAccessor<ElasticProfile> = FamilyAccessor::new(
    read_elastic,
    write_elastic,
    ConfigSnapshot::jobs_using_elastic_profile,
);

/// Accessor for the cluster profile family; referrers are elastic profiles.
pub const CLUSTER_PROFILES: FamilyAccessor<ClusterProfile> = FamilyAccessor::new(
    read_cluster,
    write_cluster,
    ConfigSnapshot::elastic_profiles_using_cluster,
);

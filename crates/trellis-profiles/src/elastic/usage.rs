//! Scan of the pipeline topology for jobs using an elastic profile.

use std::collections::HashSet;

use serde::Serialize;

use crate::topology::{ConfigOrigin, PipelineConfig};

/// Where the using pipeline is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UsageOrigin {
    /// The primary configuration store, labelled `gocd`.
    #[serde(rename = "gocd")]
    Primary,
    /// An external configuration repository.
    ConfigRepo,
}

impl UsageOrigin {
    /// Canonical string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "gocd",
            Self::ConfigRepo => "config_repo",
        }
    }
}

impl From<&ConfigOrigin> for UsageOrigin {
    fn from(origin: &ConfigOrigin) -> Self {
        match origin {
            ConfigOrigin::File => Self::Primary,
            ConfigOrigin::ConfigRepo { .. } => Self::ConfigRepo,
        }
    }
}

impl std::fmt::Display for UsageOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job that runs on agents described by a given elastic profile.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UsageRecord {
    pipeline_name: String,
    stage_name: String,
    job_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    template_name: Option<String>,
    origin: UsageOrigin,
}

impl UsageRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(
        pipeline_name: impl Into<String>,
        stage_name: impl Into<String>,
        job_name: impl Into<String>,
        template_name: Option<&str>,
        origin: UsageOrigin,
    ) -> Self {
        Self {
            pipeline_name: pipeline_name.into(),
            stage_name: stage_name.into(),
            job_name: job_name.into(),
            template_name: template_name.map(str::to_owned),
            origin,
        }
    }

    /// Pipeline name.
    #[must_use]
    pub const fn pipeline_name(&self) -> &str {
        self.pipeline_name.as_str()
    }

    /// Stage name.
    #[must_use]
    pub const fn stage_name(&self) -> &str {
        self.stage_name.as_str()
    }

    /// Job name.
    #[must_use]
    pub const fn job_name(&self) -> &str {
        self.job_name.as_str()
    }

    /// Template the pipeline is built from, if any.
    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.template_name.as_deref()
    }

    /// Where the pipeline is defined.
    #[must_use]
    pub const fn origin(&self) -> UsageOrigin {
        self.origin
    }
}

/// Every job in `pipelines` whose elastic profile reference is `profile_id`.
pub(crate) fn scan(pipelines: &[PipelineConfig], profile_id: &str) -> HashSet<UsageRecord> {
    let mut usages = HashSet::new();
    for pipeline in pipelines {
        let origin = UsageOrigin::from(pipeline.origin());
        for stage in pipeline.stages() {
            for job in stage.jobs() {
                if job.elastic_profile_id() == Some(profile_id) {
                    usages.insert(UsageRecord::new(
                        pipeline.name(),
                        stage.name(),
                        job.name(),
                        pipeline.template_name(),
                        origin,
                    ));
                }
            }
        }
    }
    usages
}

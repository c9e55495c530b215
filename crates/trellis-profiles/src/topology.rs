//! Read-only view of the pipeline → stage → job topology scanned for
//! profile usage.

use serde::{Deserialize, Serialize};

/// Where a pipeline's definition lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ConfigOrigin {
    /// The primary configuration store.
    File,
    /// Materialised from an external configuration repository.
    ConfigRepo {
        /// Repository the definition came from.
        repo_id: String,
    },
}

/// A job, optionally running on elastic agents described by a profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    elastic_profile_id: Option<String>,
}

impl JobConfig {
    /// Creates a job that runs on static agents.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            elastic_profile_id: None,
        }
    }

    /// Runs the job on agents described by the elastic profile `profile_id`.
    #[must_use]
    pub fn with_elastic_profile(mut self, profile_id: impl Into<String>) -> Self {
        self.elastic_profile_id = Some(profile_id.into());
        self
    }

    /// Job name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Referenced elastic profile.
    #[must_use]
    pub fn elastic_profile_id(&self) -> Option<&str> {
        self.elastic_profile_id.as_deref()
    }
}

/// A stage and its jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    name: String,
    jobs: Vec<JobConfig>,
}

impl StageConfig {
    /// Creates a stage.
    #[must_use]
    pub fn new(name: impl Into<String>, jobs: Vec<JobConfig>) -> Self {
        Self {
            name: name.into(),
            jobs,
        }
    }

    /// Stage name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Jobs in order.
    #[must_use]
    pub fn jobs(&self) -> &[JobConfig] {
        &self.jobs
    }
}

/// A pipeline with its (template-expanded) stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    template_name: Option<String>,
    origin: ConfigOrigin,
    stages: Vec<StageConfig>,
}

impl PipelineConfig {
    /// Creates a pipeline defined in the primary store.
    #[must_use]
    pub fn new(name: impl Into<String>, stages: Vec<StageConfig>) -> Self {
        Self {
            name: name.into(),
            template_name: None,
            origin: ConfigOrigin::File,
            stages,
        }
    }

    /// Marks the pipeline as built from `template`.
    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template_name = Some(template.into());
        self
    }

    /// Sets where the definition lives.
    #[must_use]
    pub fn with_origin(mut self, origin: ConfigOrigin) -> Self {
        self.origin = origin;
        self
    }

    /// Pipeline name.
    #[must_use]
    pub const fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Template name when the pipeline is templated.
    #[must_use]
    pub fn template_name(&self) -> Option<&str> {
        self.template_name.as_deref()
    }

    /// Definition origin.
    #[must_use]
    pub const fn origin(&self) -> &ConfigOrigin {
        &self.origin
    }

    /// Stages in order.
    #[must_use]
    pub fn stages(&self) -> &[StageConfig] {
        &self.stages
    }
}

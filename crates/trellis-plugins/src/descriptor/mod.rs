//! Plugin descriptors naming a loaded plugin and the extension points it serves.
//!
//! A [`PluginDescriptor`] is what the host plugin runtime reports for each
//! plugin it has loaded. Only the parts the profile registries need are
//! modelled: the plugin id profiles refer to, its version, and which
//! extension points (elastic agents, authorization, ...) it implements.

use serde::{Deserialize, Serialize};

use crate::error::PluginError;

/// Extension point a plugin can implement.
///
/// # Example
///
/// ```
/// use trellis_plugins::ExtensionKind;
///
/// assert_eq!(ExtensionKind::ElasticAgent.as_str(), "elastic-agent");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExtensionKind {
    /// Provisions elastic agents from cluster and elastic profiles.
    ElasticAgent,
    /// Authenticates and authorises users from security auth configs.
    Authorization,
    /// Resolves secret references from secret configs.
    Secrets,
    /// Publishes and fetches build artifacts from artifact stores.
    ArtifactStore,
}

impl ExtensionKind {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ElasticAgent => "elastic-agent",
            Self::Authorization => "authorization",
            Self::Secrets => "secrets",
            Self::ArtifactStore => "artifact-store",
        }
    }
}

impl std::fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity and extension points of a loaded plugin.
///
/// # Example
///
/// ```
/// use trellis_plugins::{ExtensionKind, PluginDescriptor};
///
/// let descriptor = PluginDescriptor::new(
///     "cd.go.contrib.elastic-agent.docker",
///     "3.1.0",
///     vec![ExtensionKind::ElasticAgent],
/// );
/// assert!(descriptor.supports(ExtensionKind::ElasticAgent));
/// assert!(descriptor.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginDescriptor {
    id: String,
    version: String,
    #[serde(default)]
    extensions: Vec<ExtensionKind>,
}

impl PluginDescriptor {
    /// Creates a descriptor.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        version: impl Into<String>,
        extensions: Vec<ExtensionKind>,
    ) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
            extensions,
        }
    }

    /// Validates the descriptor, returning an error if it is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Descriptor`] if the id or version is blank or
    /// no extension point is declared.
    pub fn validate(&self) -> Result<(), PluginError> {
        if self.id.trim().is_empty() {
            return Err(PluginError::Descriptor {
                message: String::from("plugin id must not be empty"),
            });
        }
        if self.version.trim().is_empty() {
            return Err(PluginError::Descriptor {
                message: format!("plugin '{}' must declare a version", self.id),
            });
        }
        if self.extensions.is_empty() {
            return Err(PluginError::Descriptor {
                message: format!("plugin '{}' must implement at least one extension", self.id),
            });
        }
        Ok(())
    }

    /// Returns the plugin id.
    #[must_use]
    pub const fn id(&self) -> &str {
        self.id.as_str()
    }

    /// Returns the plugin version.
    #[must_use]
    pub const fn version(&self) -> &str {
        self.version.as_str()
    }

    /// Returns the implemented extension points.
    #[must_use]
    pub fn extensions(&self) -> &[ExtensionKind] {
        &self.extensions
    }

    /// Returns `true` when the plugin implements `extension`.
    #[must_use]
    pub fn supports(&self, extension: ExtensionKind) -> bool {
        self.extensions.contains(&extension)
    }
}

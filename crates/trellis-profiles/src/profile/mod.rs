//! Plugin-backed profile values and the trait the generic registry is
//! parametric over.
//!
//! A profile is an id, an ordered list of properties whose schema belongs to
//! a plugin, and an [`ErrorBag`] that validation and commit failures are
//! written into. Each profile family carries static [`ProfileKind`] metadata
//! naming it in messages and telemetry.

use serde::{Deserialize, Serialize};
use trellis_plugins::PropertyMap;

use crate::error_bag::{ErrorBag, ErrorKey};
use crate::secret::{Cipher, CipherError, UnresolvedProperty};

/// Static description of a profile family.
///
/// # Example
///
/// ```
/// use trellis_profiles::{ElasticProfile, PluginProfile};
///
/// assert_eq!(ElasticProfile::KIND.kind(), "elasticProfile");
/// assert_eq!(ElasticProfile::KIND.display_tag(), "elastic");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProfileKind {
    kind: &'static str,
    display_tag: &'static str,
    entity_name: &'static str,
}

impl ProfileKind {
    /// Creates family metadata.
    #[must_use]
    pub const fn new(
        kind: &'static str,
        display_tag: &'static str,
        entity_name: &'static str,
    ) -> Self {
        Self {
            kind,
            display_tag,
            entity_name,
        }
    }

    /// Machine name, used as the telemetry span field.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.kind
    }

    /// Tag used in aggregate validation and conflict messages.
    #[must_use]
    pub const fn display_tag(&self) -> &'static str {
        self.display_tag
    }

    /// Human-readable entity name, e.g. `elastic agent profile`.
    #[must_use]
    pub const fn entity_name(&self) -> &'static str {
        self.entity_name
    }
}

/// A property value, stored either in plain text or as cipher text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyValue {
    /// Plain-text value.
    Value(String),
    /// Cipher text, decrypted through a [`Cipher`] when needed.
    EncryptedValue(String),
}

/// A single plugin-defined property of a profile.
///
/// # Example
///
/// ```
/// use trellis_profiles::ConfigurationProperty;
///
/// let image = ConfigurationProperty::plain("Image", "alpine:3");
/// assert_eq!(image.key(), "Image");
/// assert!(!image.is_secure());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationProperty {
    key: String,
    #[serde(flatten)]
    value: PropertyValue,
}

impl ConfigurationProperty {
    /// A plain-text property.
    #[must_use]
    pub fn plain(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::Value(value.into()),
        }
    }

    /// A property whose value is cipher text.
    #[must_use]
    pub fn secure(key: impl Into<String>, cipher_text: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: PropertyValue::EncryptedValue(cipher_text.into()),
        }
    }

    /// Property name.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Stored value.
    #[must_use]
    pub const fn value(&self) -> &PropertyValue {
        &self.value
    }

    /// Returns `true` when the value is stored encrypted.
    #[must_use]
    pub const fn is_secure(&self) -> bool {
        matches!(self.value, PropertyValue::EncryptedValue(_))
    }

    /// Returns the plain-text value, decrypting through `cipher` if needed.
    ///
    /// # Errors
    ///
    /// Returns [`CipherError`] when an encrypted value cannot be decrypted.
    pub fn resolve(&self, cipher: &dyn Cipher) -> Result<String, CipherError> {
        match &self.value {
            PropertyValue::Value(value) => Ok(value.clone()),
            PropertyValue::EncryptedValue(cipher_text) => cipher.decrypt(cipher_text),
        }
    }
}

/// A plugin-backed configuration record belonging to one family.
///
/// Implementors supply storage accessors; routing of plugin-reported errors
/// and property resolution are provided.
pub trait PluginProfile: Clone + Serialize + Send + Sync + 'static {
    /// Family metadata.
    const KIND: ProfileKind;

    /// Unique id within the family.
    fn id(&self) -> &str;

    /// Plugin id the profile declares itself, if any.
    ///
    /// Families that resolve their plugin indirectly return `None` and rely
    /// on a registry resolver.
    fn declared_plugin_id(&self) -> Option<&str>;

    /// Properties in document order.
    fn properties(&self) -> &[ConfigurationProperty];

    /// Errors attached to this profile.
    fn errors(&self) -> &ErrorBag;

    /// Mutable access to the attached errors.
    fn errors_mut(&mut self) -> &mut ErrorBag;

    /// Looks up a property by name.
    fn property(&self, key: &str) -> Option<&ConfigurationProperty> {
        self.properties().iter().find(|property| property.key() == key)
    }

    /// Attaches `message` to the property `key`, or to the entity when the
    /// profile has no such property. Returns where it landed.
    fn add_error(&mut self, key: &str, message: &str) -> ErrorKey {
        let known = self.property(key).is_some();
        self.errors_mut().add_routed(key, message, |_| known)
    }

    /// Resolves every property to plain text.
    ///
    /// # Errors
    ///
    /// Returns [`UnresolvedProperty`] for the first encrypted property that
    /// cannot be decrypted.
    fn resolved_properties(&self, cipher: &dyn Cipher) -> Result<PropertyMap, UnresolvedProperty> {
        self.properties()
            .iter()
            .map(|property| {
                property
                    .resolve(cipher)
                    .map(|value| (property.key().to_owned(), value))
                    .map_err(|source| UnresolvedProperty::new(property.key(), source))
            })
            .collect()
    }
}

/// An elastic agent profile, linked to its plugin through a cluster profile.
///
/// # Example
///
/// ```
/// use trellis_profiles::{ConfigurationProperty, ElasticProfile, PluginProfile};
///
/// let profile = ElasticProfile::new("docker-small", Some("docker-cluster"))
///     .with_property(ConfigurationProperty::plain("MaxMemory", "1G"));
/// assert_eq!(profile.cluster_profile_id(), Some("docker-cluster"));
/// assert!(profile.declared_plugin_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElasticProfile {
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cluster_profile_id: Option<String>,
    #[serde(default)]
    properties: Vec<ConfigurationProperty>,
    #[serde(skip)]
    errors: ErrorBag,
}

impl ElasticProfile {
    /// Creates a profile with no properties.
    #[must_use]
    pub fn new(id: impl Into<String>, cluster_profile_id: Option<&str>) -> Self {
        Self {
            id: id.into(),
            cluster_profile_id: cluster_profile_id.map(str::to_owned),
            properties: Vec::new(),
            errors: ErrorBag::new(),
        }
    }

    /// Appends a property.
    #[must_use]
    pub fn with_property(mut self, property: ConfigurationProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Id of the linked cluster profile.
    #[must_use]
    pub fn cluster_profile_id(&self) -> Option<&str> {
        self.cluster_profile_id.as_deref()
    }
}

impl PluginProfile for ElasticProfile {
    const KIND: ProfileKind = ProfileKind::new("elasticProfile", "elastic", "elastic agent profile");

    fn id(&self) -> &str {
        &self.id
    }

    fn declared_plugin_id(&self) -> Option<&str> {
        None
    }

    fn properties(&self) -> &[ConfigurationProperty] {
        &self.properties
    }

    fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }
}

/// A cluster profile, owning the plugin id its elastic profiles resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterProfile {
    id: String,
    plugin_id: String,
    #[serde(default)]
    properties: Vec<ConfigurationProperty>,
    #[serde(skip)]
    errors: ErrorBag,
}

impl ClusterProfile {
    /// Creates a cluster profile owned by `plugin_id`.
    #[must_use]
    pub fn new(id: impl Into<String>, plugin_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            plugin_id: plugin_id.into(),
            properties: Vec::new(),
            errors: ErrorBag::new(),
        }
    }

    /// Appends a property.
    #[must_use]
    pub fn with_property(mut self, property: ConfigurationProperty) -> Self {
        self.properties.push(property);
        self
    }

    /// Owning plugin.
    #[must_use]
    pub const fn plugin_id(&self) -> &str {
        self.plugin_id.as_str()
    }
}

impl PluginProfile for ClusterProfile {
    const KIND: ProfileKind = ProfileKind::new("clusterProfile", "cluster", "cluster profile");

    fn id(&self) -> &str {
        &self.id
    }

    fn declared_plugin_id(&self) -> Option<&str> {
        Some(&self.plugin_id)
    }

    fn properties(&self) -> &[ConfigurationProperty] {
        &self.properties
    }

    fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }
}

#[cfg(test)]
mod tests;

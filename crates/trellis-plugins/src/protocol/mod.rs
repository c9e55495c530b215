//! Wire types exchanged with a plugin's profile validation entry point.
//!
//! The host sends a [`ValidationRequest`] carrying the profile's resolved
//! (decrypted) property map. The plugin answers with a JSON array of
//! `{ "key": ..., "message": ... }` objects, one per problem it found; an
//! empty array means the properties are acceptable. [`ValidationResult`]
//! models that answer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::descriptor::ExtensionKind;
use crate::error::PluginError;

/// Property name to plain-text value, ordered by name.
pub type PropertyMap = BTreeMap<String, String>;

/// Request sent to a plugin's validation entry point.
///
/// # Example
///
/// ```
/// use trellis_plugins::{ExtensionKind, PropertyMap, ValidationRequest};
///
/// let mut properties = PropertyMap::new();
/// properties.insert("Image".into(), "alpine:3".into());
/// let request = ValidationRequest::new(ExtensionKind::ElasticAgent, properties);
/// assert_eq!(request.properties().len(), 1);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ValidationRequest {
    extension: ExtensionKind,
    properties: PropertyMap,
}

impl ValidationRequest {
    /// Creates a request for the given extension point.
    #[must_use]
    pub const fn new(extension: ExtensionKind, properties: PropertyMap) -> Self {
        Self {
            extension,
            properties,
        }
    }

    /// Returns the extension point being exercised.
    #[must_use]
    pub const fn extension(&self) -> ExtensionKind {
        self.extension
    }

    /// Returns the properties to validate.
    #[must_use]
    pub const fn properties(&self) -> &PropertyMap {
        &self.properties
    }

    /// Serialises the request body handed to the plugin.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::SerializeRequest`] if JSON encoding fails.
    pub fn to_json(&self) -> Result<String, PluginError> {
        serde_json::to_string(&self.properties).map_err(PluginError::SerializeRequest)
    }
}

/// A single problem reported by a plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ValidationError {
    key: String,
    message: String,
}

impl ValidationError {
    /// Creates an error attached to `key`.
    #[must_use]
    pub fn new(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Property name (or free-form key) the plugin attached the error to.
    #[must_use]
    pub const fn key(&self) -> &str {
        self.key.as_str()
    }

    /// Human-readable message.
    #[must_use]
    pub const fn message(&self) -> &str {
        self.message.as_str()
    }
}

/// Outcome of a plugin validation call.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationResult {
    errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// A result with no errors.
    #[must_use]
    pub const fn success() -> Self {
        Self { errors: Vec::new() }
    }

    /// A result carrying the given errors.
    #[must_use]
    pub const fn with_errors(errors: Vec<ValidationError>) -> Self {
        Self { errors }
    }

    /// Decodes the JSON array a plugin writes in response to a request.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::InvalidResponse`] when `body` is not an array of
    /// `{key, message}` objects.
    pub fn from_plugin_json(plugin_id: &str, body: &str) -> Result<Self, PluginError> {
        serde_json::from_str(body).map_err(|source| PluginError::InvalidResponse {
            plugin_id: plugin_id.to_owned(),
            message: source.to_string(),
            source: Some(source),
        })
    }

    /// Returns `true` when the plugin reported no errors.
    #[must_use]
    pub fn is_successful(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the reported errors.
    #[must_use]
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the result, yielding the reported errors.
    #[must_use]
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }
}

#[cfg(test)]
mod tests;

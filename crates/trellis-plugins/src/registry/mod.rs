//! Registry of plugins currently loaded by the host plugin runtime.
//!
//! The [`PluginRegistry`] stores validated descriptors keyed by plugin id and
//! answers lookups by id or extension point. Duplicate registrations for the
//! same plugin id are rejected.

use std::collections::HashMap;

use crate::descriptor::{ExtensionKind, PluginDescriptor};
use crate::error::PluginError;

/// Registry of loaded plugin descriptors.
///
/// # Example
///
/// ```
/// use trellis_plugins::{ExtensionKind, PluginDescriptor, PluginRegistry};
///
/// let mut registry = PluginRegistry::new();
/// let descriptor = PluginDescriptor::new("docker", "1.0", vec![ExtensionKind::ElasticAgent]);
/// registry.register(descriptor).expect("registration succeeds");
/// assert!(registry.get("docker").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    descriptors: HashMap<String, PluginDescriptor>,
}

impl PluginRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plugin descriptor after validation.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Descriptor`] if validation fails or if a plugin
    /// with the same id is already registered.
    pub fn register(&mut self, descriptor: PluginDescriptor) -> Result<(), PluginError> {
        descriptor.validate()?;
        let id = descriptor.id().to_owned();
        if self.descriptors.contains_key(&id) {
            return Err(PluginError::Descriptor {
                message: format!("plugin '{id}' is already registered"),
            });
        }
        self.descriptors.insert(id, descriptor);
        Ok(())
    }

    /// Removes a plugin, returning its descriptor if it was registered.
    pub fn unregister(&mut self, plugin_id: &str) -> Option<PluginDescriptor> {
        self.descriptors.remove(plugin_id)
    }

    /// Looks up a plugin by id.
    #[must_use]
    pub fn get(&self, plugin_id: &str) -> Option<&PluginDescriptor> {
        self.descriptors.get(plugin_id)
    }

    /// Returns all plugins implementing the given extension point.
    #[must_use]
    pub fn find_by_extension(&self, extension: ExtensionKind) -> Vec<&PluginDescriptor> {
        self.descriptors
            .values()
            .filter(|descriptor| descriptor.supports(extension))
            .collect()
    }

    /// Returns the number of registered plugins.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` when no plugins are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests;

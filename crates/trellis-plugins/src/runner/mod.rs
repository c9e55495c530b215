//! Plugin runner exposing the validation entry point profile registries call.
//!
//! The [`PluginRunner`] resolves a plugin id against the [`PluginRegistry`],
//! checks that the plugin serves the runner's extension point, builds the
//! [`ValidationRequest`], and delegates to a [`PluginExecutor`]. Loading and
//! talking to real plugin processes belongs to the host plugin runtime, which
//! plugs in through the executor trait.

use tracing::debug;

use crate::descriptor::{ExtensionKind, PluginDescriptor};
use crate::error::PluginError;
use crate::protocol::{PropertyMap, ValidationRequest, ValidationResult};
use crate::registry::PluginRegistry;

/// Trait abstracting the host plugin runtime for testability.
///
/// # Example
///
/// ```
/// use trellis_plugins::runner::PluginExecutor;
/// use trellis_plugins::{PluginDescriptor, PluginError, ValidationRequest, ValidationResult};
///
/// struct AcceptEverything;
///
/// impl PluginExecutor for AcceptEverything {
///     fn validate(
///         &self,
///         _descriptor: &PluginDescriptor,
///         _request: &ValidationRequest,
///     ) -> Result<ValidationResult, PluginError> {
///         Ok(ValidationResult::success())
///     }
/// }
/// ```
pub trait PluginExecutor {
    /// Sends a validation request to the plugin described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns a [`PluginError`] if the plugin cannot be reached, fails while
    /// handling the request, or answers with an unreadable response.
    fn validate(
        &self,
        descriptor: &PluginDescriptor,
        request: &ValidationRequest,
    ) -> Result<ValidationResult, PluginError>;
}

/// The narrow validation contract consumed by the profile registries.
///
/// Implementations block until the plugin answers; timeouts are the
/// implementation's concern.
pub trait ValidationEntryPoint: Send + Sync {
    /// Validates `properties` with the plugin identified by `plugin_id`.
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::NotFound`] when no such plugin is loaded, or any
    /// failure raised while the plugin handled the request.
    fn validate(
        &self,
        plugin_id: &str,
        properties: &PropertyMap,
    ) -> Result<ValidationResult, PluginError>;
}

/// Resolves plugins from the registry and delegates to an executor.
///
/// # Example
///
/// ```
/// use trellis_plugins::runner::{PluginExecutor, ValidationEntryPoint};
/// use trellis_plugins::{
///     ExtensionKind, PluginDescriptor, PluginError, PluginRegistry, PluginRunner, PropertyMap,
///     ValidationError, ValidationRequest, ValidationResult,
/// };
///
/// struct RequireImage;
/// impl PluginExecutor for RequireImage {
///     fn validate(
///         &self,
///         _descriptor: &PluginDescriptor,
///         request: &ValidationRequest,
///     ) -> Result<ValidationResult, PluginError> {
///         if request.properties().contains_key("Image") {
///             Ok(ValidationResult::success())
///         } else {
///             Ok(ValidationResult::with_errors(vec![ValidationError::new(
///                 "Image",
///                 "Image must not be blank.",
///             )]))
///         }
///     }
/// }
///
/// let mut registry = PluginRegistry::new();
/// registry
///     .register(PluginDescriptor::new("docker", "1.0", vec![ExtensionKind::ElasticAgent]))
///     .unwrap();
///
/// let runner = PluginRunner::new(registry, RequireImage, ExtensionKind::ElasticAgent);
/// let result = runner.validate("docker", &PropertyMap::new()).unwrap();
/// assert!(!result.is_successful());
/// ```
#[derive(Debug)]
pub struct PluginRunner<E> {
    registry: PluginRegistry,
    executor: E,
    extension: ExtensionKind,
}

impl<E> PluginRunner<E> {
    /// Creates a runner serving `extension` with the given registry and executor.
    #[must_use]
    pub const fn new(registry: PluginRegistry, executor: E, extension: ExtensionKind) -> Self {
        Self {
            registry,
            executor,
            extension,
        }
    }

    /// Returns a reference to the plugin registry.
    #[must_use]
    pub const fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    /// Returns a mutable reference to the plugin registry.
    #[must_use]
    pub const fn registry_mut(&mut self) -> &mut PluginRegistry {
        &mut self.registry
    }

    /// Returns the extension point this runner serves.
    #[must_use]
    pub const fn extension(&self) -> ExtensionKind {
        self.extension
    }

    fn resolve(&self, plugin_id: &str) -> Result<&PluginDescriptor, PluginError> {
        let descriptor = self
            .registry
            .get(plugin_id)
            .ok_or_else(|| PluginError::NotFound {
                plugin_id: plugin_id.to_owned(),
            })?;
        if !descriptor.supports(self.extension) {
            return Err(PluginError::UnsupportedExtension {
                plugin_id: plugin_id.to_owned(),
                extension: self.extension.as_str().to_owned(),
            });
        }
        Ok(descriptor)
    }
}

impl<E: PluginExecutor + Send + Sync> ValidationEntryPoint for PluginRunner<E> {
    fn validate(
        &self,
        plugin_id: &str,
        properties: &PropertyMap,
    ) -> Result<ValidationResult, PluginError> {
        let descriptor = self.resolve(plugin_id)?;
        let request = ValidationRequest::new(self.extension, properties.clone());
        debug!(
            target: "trellis_plugins::runner",
            plugin_id,
            extension = %self.extension,
            properties = properties.len(),
            "dispatching validation request"
        );
        self.executor.validate(descriptor, &request)
    }
}

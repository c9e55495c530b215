//! Plugin validation contract for plugin-backed configuration profiles.
//!
//! Profiles such as elastic agent profiles carry properties whose schema is
//! owned by an external plugin rather than the host. This crate models the
//! narrow slice of the plugin runtime the profile registries depend on:
//!
//! - [`PluginDescriptor`]s describing loaded plugins and the extension points
//!   they implement, held in a [`PluginRegistry`];
//! - the wire types exchanged with a plugin's validation entry point
//!   ([`ValidationRequest`], [`ValidationResult`]);
//! - the [`ValidationEntryPoint`] trait the registries call, implemented by
//!   [`PluginRunner`] on top of a host-supplied [`PluginExecutor`].
//!
//! Loading plugins and talking to plugin processes stay with the host runtime.
//!
//! # Example
//!
//! ```rust,no_run
//! use trellis_plugins::{ExtensionKind, PluginDescriptor, PluginRegistry, PluginRunner};
//! # use trellis_plugins::{PluginError, ValidationRequest, ValidationResult};
//! # struct HostRuntime;
//! # impl trellis_plugins::PluginExecutor for HostRuntime {
//! #     fn validate(&self, _: &PluginDescriptor, _: &ValidationRequest)
//! #         -> Result<ValidationResult, PluginError> { Ok(ValidationResult::success()) }
//! # }
//!
//! let mut registry = PluginRegistry::new();
//! registry
//!     .register(PluginDescriptor::new(
//!         "cd.go.contrib.elastic-agent.docker",
//!         "3.1.0",
//!         vec![ExtensionKind::ElasticAgent],
//!     ))
//!     .expect("registration succeeds");
//!
//! let runner = PluginRunner::new(registry, HostRuntime, ExtensionKind::ElasticAgent);
//! // runner.validate("cd.go.contrib.elastic-agent.docker", &properties)
//! ```

pub mod descriptor;
pub mod error;
pub mod protocol;
pub mod registry;
pub mod runner;

#[cfg(test)]
mod tests;

pub use self::descriptor::{ExtensionKind, PluginDescriptor};
pub use self::error::PluginError;
pub use self::protocol::{PropertyMap, ValidationError, ValidationRequest, ValidationResult};
pub use self::registry::PluginRegistry;
pub use self::runner::{PluginExecutor, PluginRunner, ValidationEntryPoint};

//! Domain errors raised while invoking a plugin's validation entry point.
//!
//! All errors use `thiserror`-derived enums with structured context so callers
//! can tell a missing plugin apart from a plugin that failed while running.

use thiserror::Error;

/// Errors arising from plugin lookup and invocation.
#[derive(Debug, Error)]
pub enum PluginError {
    /// No loaded plugin carries the requested id.
    #[error("plugin '{plugin_id}' not found in registry")]
    NotFound {
        /// Id that was looked up.
        plugin_id: String,
    },

    /// The plugin is loaded but does not implement the requested extension.
    #[error("plugin '{plugin_id}' does not implement the {extension} extension")]
    UnsupportedExtension {
        /// Plugin id.
        plugin_id: String,
        /// Extension point that was requested.
        extension: String,
    },

    /// The plugin raised a failure while handling the request.
    #[error("plugin '{plugin_id}' failed during {operation}: {message}")]
    Invocation {
        /// Plugin id.
        plugin_id: String,
        /// Name of the entry point that was called.
        operation: String,
        /// Human-readable failure description.
        message: String,
    },

    /// The plugin request could not be serialised to JSON.
    #[error("failed to serialise plugin request: {0}")]
    SerializeRequest(#[source] serde_json::Error),

    /// The plugin response could not be decoded.
    #[error("plugin '{plugin_id}' returned an unreadable response: {message}")]
    InvalidResponse {
        /// Plugin id.
        plugin_id: String,
        /// Description of the decoding failure.
        message: String,
        /// Optional underlying JSON error.
        #[source]
        source: Option<serde_json::Error>,
    },

    /// A plugin descriptor failed validation.
    #[error("descriptor error: {message}")]
    Descriptor {
        /// Description of the validation failure.
        message: String,
    },
}

impl PluginError {
    /// Returns `true` when the error means no usable plugin exists for the id.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

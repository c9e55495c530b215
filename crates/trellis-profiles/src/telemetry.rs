//! Structured logging scoped to a registry instance.
//!
//! Registries never install a global subscriber. Each one carries a
//! [`RegistryTelemetry`]; when it holds a [`Dispatch`], every registry
//! operation runs with that dispatch as the thread's default, inside a span
//! naming the profile family and operation. Without one, events go to
//! whatever subscriber the host installed.

use std::io::{self, IsTerminal};

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use trellis_config::{Config, LogFormat};

use crate::profile::ProfileKind;

/// Errors encountered while building a telemetry dispatch.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to parse the configured log filter expression.
    #[error("invalid log filter: {0}")]
    Filter(String),
}

/// Logging capability injected into a registry.
#[derive(Debug, Clone, Default)]
pub struct RegistryTelemetry {
    dispatch: Option<Dispatch>,
}

impl RegistryTelemetry {
    /// Telemetry that logs through the host's default subscriber.
    #[must_use]
    pub const fn inherited() -> Self {
        Self { dispatch: None }
    }

    /// Telemetry that logs through `dispatch`.
    #[must_use]
    pub const fn with_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch: Some(dispatch),
        }
    }

    /// Builds a stderr dispatch from the shared configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::Filter`] when the filter does not parse.
    pub fn from_config(config: &Config) -> Result<Self, TelemetryError> {
        build_dispatch(config).map(Self::with_dispatch)
    }

    /// Runs `operation` inside a span for `kind`, under this telemetry's
    /// dispatch when it has one.
    pub(crate) fn in_scope<R>(
        &self,
        kind: &ProfileKind,
        operation: &'static str,
        f: impl FnOnce() -> R,
    ) -> R {
        let run = || {
            let span = tracing::debug_span!("profile_registry", kind = kind.kind(), operation);
            span.in_scope(f)
        };
        match &self.dispatch {
            Some(dispatch) => tracing::dispatcher::with_default(dispatch, run),
            None => run(),
        }
    }
}

/// Builds the `tracing` dispatch described by `config`.
///
/// # Errors
///
/// Returns [`TelemetryError::Filter`] when the filter does not parse.
pub fn build_dispatch(config: &Config) -> Result<Dispatch, TelemetryError> {
    let filter = EnvFilter::try_new(config.log_filter())
        .map_err(|error| TelemetryError::Filter(error.to_string()))?;

    let builder = |filter: EnvFilter| {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_level(true)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .with_timer(fmt::time::UtcTime::rfc_3339())
    };

    let dispatch = match config.log_format() {
        LogFormat::Json => Dispatch::new(builder(filter).json().flatten_event(true).finish()),
        LogFormat::Compact => Dispatch::new(builder(filter).compact().finish()),
    };
    Ok(dispatch)
}

//! Log output settings shared by every registry in a host.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Filter used when no file, environment variable or flag sets one.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// How telemetry lines are rendered on stderr.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// One JSON object per event with fields flattened to the top level.
    #[default]
    Json,
    /// Single-line text for interactive terminals.
    Compact,
}

impl LogFormat {
    /// Returns `true` for machine-readable output.
    #[must_use]
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

/// Parse failure for [`LogFormat`].
pub type LogFormatParseError = strum::ParseError;

/// Owned default filter, for `ortho_config` field defaults.
#[must_use]
pub fn default_log_filter_string() -> String {
    DEFAULT_LOG_FILTER.to_owned()
}

/// Default rendering for telemetry.
#[must_use]
pub const fn default_log_format() -> LogFormat {
    LogFormat::Json
}

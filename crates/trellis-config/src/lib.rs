//! Shared configuration for hosts embedding the profile registries.
//!
//! Configuration is layered by `ortho_config`: built-in defaults first, then
//! an optional TOML file supplied through `--config-path`, then `TRELLIS_*`
//! environment variables, and finally command-line flags. Later layers win.
//!
//! The registries themselves never read configuration directly. Hosts load a
//! [`Config`] once (via the derived `Config::load` or `Config::load_from_iter`)
//! and derive the telemetry handed to each registry from it.

mod logging;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};

pub use self::logging::{
    DEFAULT_LOG_FILTER, LogFormat, LogFormatParseError, default_log_filter_string,
    default_log_format,
};

/// Resolved configuration shared by every registry in a host process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "TRELLIS")]
pub struct Config {
    /// `tracing` filter expression, e.g. `info` or `trellis_profiles=debug`.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Output format for structured log lines.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
}

impl Config {
    /// Filter expression handed to the telemetry subscriber.
    #[must_use]
    pub const fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format handed to the telemetry subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.log_filter(), DEFAULT_LOG_FILTER);
        assert_eq!(config.log_format(), LogFormat::Json);
    }

    #[rstest]
    #[case::json("json", LogFormat::Json)]
    #[case::compact("compact", LogFormat::Compact)]
    #[case::shouting("COMPACT", LogFormat::Compact)]
    fn log_format_parses_case_insensitively(#[case] text: &str, #[case] expected: LogFormat) {
        let parsed: LogFormat = text.parse().expect("format should parse");
        assert_eq!(parsed, expected);
    }

    #[test]
    fn log_format_rejects_unknown_values() {
        assert!("xml".parse::<LogFormat>().is_err());
    }

    #[test]
    fn log_format_displays_in_snake_case() {
        assert_eq!(LogFormat::Compact.to_string(), "compact");
    }

    #[rstest]
    #[case::json(LogFormat::Json, true)]
    #[case::compact(LogFormat::Compact, false)]
    fn only_json_is_structured(#[case] format: LogFormat, #[case] structured: bool) {
        assert_eq!(format.is_structured(), structured);
    }
}

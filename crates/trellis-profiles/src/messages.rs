//! Caller-facing message texts.

use crate::profile::ProfileKind;

/// Generic text surfaced for unexpected commit failures.
///
/// Never carries the underlying error.
#[must_use]
pub fn save_failed(kind: &ProfileKind) -> String {
    format!(
        "An error occurred while saving the {}. Please check the logs for more information.",
        kind.entity_name()
    )
}

/// A resolved plugin id has no loaded plugin.
#[must_use]
pub fn plugin_not_found(plugin_id: &str) -> String {
    format!("Plugin with id `{plugin_id}` is not found.")
}

/// Aggregate of every error reported for a rejected profile.
#[must_use]
pub fn validation_failed(kind: &ProfileKind, id: &str, errors: &[String]) -> String {
    format!(
        "Validations failed for {} '{id}'. Error(s): [{}]. Please correct and resubmit.",
        kind.display_tag(),
        errors.join(", ")
    )
}

/// The profile changed since the caller read it.
#[must_use]
pub fn stale_configuration(kind: &ProfileKind, id: &str) -> String {
    format!(
        "Someone has modified the configuration for {} '{id}'. Please update your copy of the config with the changes and try again.",
        kind.display_tag()
    )
}

/// Successful delete.
#[must_use]
pub fn deleted(kind: &ProfileKind, id: &str) -> String {
    format!("The {} '{id}' was deleted successfully.", kind.entity_name())
}

/// No profile with `id` exists.
#[must_use]
pub fn record_not_found(kind: &ProfileKind, id: &str) -> String {
    format!("{} '{id}' was not found!", kind.entity_name())
}

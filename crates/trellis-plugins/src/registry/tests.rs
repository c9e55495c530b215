//! Unit tests for descriptor registration and lookup.

use rstest::{fixture, rstest};

use super::*;
use crate::error::PluginError;

fn make_plugin(id: &str, extensions: Vec<ExtensionKind>) -> PluginDescriptor {
    PluginDescriptor::new(id, "1.0", extensions)
}

#[fixture]
fn loaded() -> PluginRegistry {
    let mut registry = PluginRegistry::new();
    registry
        .register(make_plugin("docker", vec![ExtensionKind::ElasticAgent]))
        .expect("register docker");
    registry
        .register(make_plugin("k8s", vec![ExtensionKind::ElasticAgent]))
        .expect("register k8s");
    registry
        .register(make_plugin(
            "ldap",
            vec![ExtensionKind::Authorization, ExtensionKind::Secrets],
        ))
        .expect("register ldap");
    registry
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[test]
fn new_registry_is_empty() {
    let registry = PluginRegistry::new();
    assert!(registry.is_empty());
    assert_eq!(registry.len(), 0);
}

#[test]
fn register_and_get() {
    let mut registry = PluginRegistry::new();
    registry
        .register(make_plugin("docker", vec![ExtensionKind::ElasticAgent]))
        .expect("register");
    assert_eq!(registry.len(), 1);
    let descriptor = registry.get("docker").expect("get docker");
    assert_eq!(descriptor.id(), "docker");
}

#[test]
fn duplicate_ids_are_refused() {
    let mut registry = PluginRegistry::new();
    registry
        .register(make_plugin("docker", vec![ExtensionKind::ElasticAgent]))
        .expect("first register");
    let err = registry
        .register(make_plugin("docker", vec![ExtensionKind::ElasticAgent]))
        .expect_err("second registration must fail");
    assert!(matches!(err, PluginError::Descriptor { .. }));
    assert!(err.to_string().contains("already registered"));
}

#[test]
fn register_rejects_invalid_descriptor() {
    let mut registry = PluginRegistry::new();
    let err = registry
        .register(make_plugin("docker", vec![]))
        .expect_err("should reject descriptor without extensions");
    assert!(matches!(err, PluginError::Descriptor { .. }));
    assert!(registry.is_empty());
}

#[rstest]
fn unregister_removes_plugin(mut loaded: PluginRegistry) {
    let removed = loaded.unregister("docker").expect("was registered");
    assert_eq!(removed.id(), "docker");
    assert!(loaded.get("docker").is_none());
    assert!(loaded.unregister("docker").is_none());
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[rstest]
fn unknown_ids_are_absent(loaded: PluginRegistry) {
    assert!(loaded.get("nonexistent").is_none());
}

#[rstest]
fn find_by_extension_elastic(loaded: PluginRegistry) {
    let plugins = loaded.find_by_extension(ExtensionKind::ElasticAgent);
    assert_eq!(plugins.len(), 2);
    let ids: Vec<&str> = plugins.iter().map(|d| d.id()).collect();
    assert!(ids.contains(&"docker"));
    assert!(ids.contains(&"k8s"));
}

#[rstest]
fn find_by_extension_returns_empty_for_unused(loaded: PluginRegistry) {
    assert!(
        loaded
            .find_by_extension(ExtensionKind::ArtifactStore)
            .is_empty()
    );
}

#[rstest]
fn counts_registered_plugins(loaded: PluginRegistry) {
    assert_eq!(loaded.len(), 3);
    assert!(!loaded.is_empty());
}

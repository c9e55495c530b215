//! Unit tests for profile values.

use rstest::rstest;

use super::*;
use crate::tests::{ReversingCipher, elastic_profile};

// ---------------------------------------------------------------------------
// Error routing
// ---------------------------------------------------------------------------

#[rstest]
#[case::known_property("url", ErrorKey::property("url"))]
#[case::unknown_property("nonexistent", ErrorKey::Entity)]
fn plugin_errors_route_by_property_name(#[case] key: &str, #[case] expected: ErrorKey) {
    let mut profile = ElasticProfile::new("p1", Some("c1"))
        .with_property(ConfigurationProperty::plain("url", "http://example"));
    let landed = profile.add_error(key, "is wrong");
    assert_eq!(landed, expected);
    assert_eq!(profile.errors().get(&expected), &["is wrong"]);
}

#[test]
fn errors_for_the_same_property_accumulate() {
    let mut profile = elastic_profile("p1", Some("c1"));
    profile.add_error("Image", "must not be blank");
    profile.add_error("Image", "must be a docker image");
    assert_eq!(profile.errors().property_errors("Image").len(), 2);
}

// ---------------------------------------------------------------------------
// Property resolution
// ---------------------------------------------------------------------------

#[test]
fn resolved_properties_decrypt_secure_values() {
    let profile = ElasticProfile::new("p1", None)
        .with_property(ConfigurationProperty::plain("Image", "alpine"))
        .with_property(ConfigurationProperty::secure("Token", "terces"));
    let resolved = profile
        .resolved_properties(&ReversingCipher)
        .expect("properties should resolve");
    assert_eq!(resolved.get("Image").map(String::as_str), Some("alpine"));
    assert_eq!(resolved.get("Token").map(String::as_str), Some("secret"));
}

#[test]
fn resolved_properties_report_the_undecryptable_key() {
    let profile = ElasticProfile::new("p1", None)
        .with_property(ConfigurationProperty::secure("Token", ReversingCipher::UNDECRYPTABLE));
    let error = profile
        .resolved_properties(&ReversingCipher)
        .expect_err("decryption should fail");
    assert_eq!(error.key(), "Token");
}

// ---------------------------------------------------------------------------
// Persisted form
// ---------------------------------------------------------------------------

#[test]
fn persisted_form_excludes_errors() {
    let mut profile = elastic_profile("p1", Some("c1"));
    let clean = serde_json::to_value(&profile).expect("serialise");
    profile.errors_mut().add_entity("transient");
    let dirty = serde_json::to_value(&profile).expect("serialise");
    assert_eq!(clean, dirty);
}

#[test]
fn property_values_serialise_by_storage_kind() {
    let json = serde_json::to_value(ConfigurationProperty::secure("Token", "abc")).expect("serialise");
    assert_eq!(json, serde_json::json!({ "key": "Token", "encrypted_value": "abc" }));
    let back: ConfigurationProperty = serde_json::from_value(json).expect("deserialise");
    assert!(back.is_secure());
}

#[test]
fn cluster_profiles_declare_their_plugin() {
    let cluster = ClusterProfile::new("c1", "docker-plugin");
    assert_eq!(cluster.declared_plugin_id(), Some("docker-plugin"));
    assert_eq!(ClusterProfile::KIND.display_tag(), "cluster");
}

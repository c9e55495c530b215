//! Unit tests for the validation wire types.

use rstest::rstest;

use super::*;

fn docker_properties() -> PropertyMap {
    let mut properties = PropertyMap::new();
    properties.insert("Image".into(), "alpine:3".into());
    properties.insert("Command".into(), String::new());
    properties
}

#[test]
fn request_body_is_the_property_object() {
    let request = ValidationRequest::new(ExtensionKind::ElasticAgent, docker_properties());
    let body = request.to_json().expect("serialise");
    assert_eq!(body, r#"{"Command":"","Image":"alpine:3"}"#);
    assert_eq!(request.extension(), ExtensionKind::ElasticAgent);
}

#[test]
fn decodes_plugin_error_array() {
    let body = r#"[{"key":"Image","message":"Image must not be blank."},
                   {"key":"MaxMemory","message":"Invalid size."}]"#;
    let result = ValidationResult::from_plugin_json("docker", body).expect("decode");
    assert!(!result.is_successful());
    let keys: Vec<&str> = result.errors().iter().map(ValidationError::key).collect();
    assert_eq!(keys, vec!["Image", "MaxMemory"]);
    assert_eq!(
        result.errors().first().map(ValidationError::message),
        Some("Image must not be blank.")
    );
}

#[test]
fn empty_array_is_success() {
    let result = ValidationResult::from_plugin_json("docker", "[]").expect("decode");
    assert!(result.is_successful());
    assert_eq!(result, ValidationResult::success());
}

#[rstest]
#[case::object(r#"{"key":"Image"}"#)]
#[case::missing_message(r#"[{"key":"Image"}]"#)]
#[case::garbage("not json")]
fn rejects_malformed_responses(#[case] body: &str) {
    let err = ValidationResult::from_plugin_json("docker", body).expect_err("should fail");
    match err {
        PluginError::InvalidResponse {
            plugin_id, source, ..
        } => {
            assert_eq!(plugin_id, "docker");
            assert!(source.is_some());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn into_errors_yields_reported_errors() {
    let result = ValidationResult::with_errors(vec![ValidationError::new("url", "bad url")]);
    let errors = result.into_errors();
    assert_eq!(errors, vec![ValidationError::new("url", "bad url")]);
}

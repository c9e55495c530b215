//! Unit tests for the elastic profile registry.

use std::collections::HashSet;
use std::sync::Arc;

use rstest::{fixture, rstest};
use trellis_plugins::ValidationResult;

use super::*;
use crate::command::Rejection;
use crate::profile::ClusterProfile;
use crate::result::ResultStatus;
use crate::store::InMemoryConfigStore;
use crate::tests::{MockEntryPoint, ReversingCipher, elastic_profile};
use crate::topology::{ConfigOrigin, JobConfig, PipelineConfig, StageConfig};

#[fixture]
fn snapshot() -> ConfigSnapshot {
    ConfigSnapshot::new()
        .with_cluster_profile(ClusterProfile::new("docker", "docker-plugin"))
        .with_elastic_profile(elastic_profile("P3", Some("docker")))
        .with_elastic_profile(elastic_profile("idle", Some("docker")))
        .with_pipeline(
            PipelineConfig::new(
                "PL1",
                vec![StageConfig::new(
                    "S1",
                    vec![
                        JobConfig::new("J1").with_elastic_profile("P3"),
                        JobConfig::new("J2"),
                    ],
                )],
            )
            .with_template("T1")
            .with_origin(ConfigOrigin::ConfigRepo {
                repo_id: String::from("repo-1"),
            }),
        )
        .with_pipeline(PipelineConfig::new(
            "PL2",
            vec![
                StageConfig::new("build", vec![JobConfig::new("unit").with_elastic_profile("P3")]),
                StageConfig::new("deploy", vec![JobConfig::new("prod").with_elastic_profile("P3")]),
            ],
        ))
}

fn accepting() -> MockEntryPoint {
    let mut entry_point = MockEntryPoint::new();
    entry_point
        .expect_validate()
        .returning(|_, _| Ok(ValidationResult::success()));
    entry_point
}

fn registry_over(snapshot: ConfigSnapshot, entry_point: MockEntryPoint) -> ElasticProfileRegistry {
    let cipher = Arc::new(ReversingCipher);
    let store = Arc::new(InMemoryConfigStore::new(snapshot, cipher.clone()));
    ElasticProfileRegistry::new(
        store.clone(),
        Arc::new(store.elastic_committer()),
        ValidationGateway::new(Arc::new(entry_point), cipher),
    )
}

fn admin() -> Username {
    Username::new("admin")
}

// ---------------------------------------------------------------------------
// Plugin resolution
// ---------------------------------------------------------------------------

#[rstest]
#[case::linked(Some("docker"), Some("docker-plugin"))]
#[case::dangling(Some("gone"), None)]
#[case::unlinked(None, None)]
fn plugin_resolves_through_cluster_profile(
    snapshot: ConfigSnapshot,
    #[case] cluster: Option<&str>,
    #[case] expected: Option<&str>,
) {
    let registry = registry_over(snapshot, MockEntryPoint::new());
    let profile = ElasticProfile::new("x", cluster);
    assert_eq!(registry.effective_plugin_id(&profile).as_deref(), expected);
}

#[rstest]
fn unlinked_profiles_are_not_sent_to_a_plugin(snapshot: ConfigSnapshot) {
    let mut entry_point = MockEntryPoint::new();
    entry_point.expect_validate().never();
    let registry = registry_over(snapshot, entry_point);
    let mut profile = elastic_profile("x", Some("gone"));

    assert_eq!(registry.validate(&mut profile), ValidationOutcome::NoPlugin);
    assert!(!profile.errors().has_errors());
}

#[rstest]
fn linked_profiles_are_validated_by_the_cluster_plugin(snapshot: ConfigSnapshot) {
    let mut entry_point = MockEntryPoint::new();
    entry_point
        .expect_validate()
        .withf(|plugin_id, _| plugin_id == "docker-plugin")
        .times(1)
        .returning(|_, _| Ok(ValidationResult::success()));
    let registry = registry_over(snapshot, entry_point);
    let mut profile = elastic_profile("x", Some("docker"));

    assert_eq!(registry.validate(&mut profile), ValidationOutcome::Success);
}

// ---------------------------------------------------------------------------
// Usage
// ---------------------------------------------------------------------------

#[rstest]
fn usage_of_unknown_profile_is_not_found(snapshot: ConfigSnapshot) {
    let registry = registry_over(snapshot, MockEntryPoint::new());
    let err = registry.usage_of("nope").expect_err("unknown profile");
    assert!(err.is_not_found());
    assert_eq!(
        err,
        ProfileError::RecordNotFound {
            tag: "elastic",
            id: String::from("nope"),
        }
    );
}

#[rstest]
fn usage_of_lists_every_referencing_job(snapshot: ConfigSnapshot) {
    let registry = registry_over(snapshot, MockEntryPoint::new());

    let usages = registry.usage_of("P3").expect("known profile");

    let expected: HashSet<UsageRecord> = [
        UsageRecord::new("PL1", "S1", "J1", Some("T1"), UsageOrigin::ConfigRepo),
        UsageRecord::new("PL2", "build", "unit", None, UsageOrigin::Primary),
        UsageRecord::new("PL2", "deploy", "prod", None, UsageOrigin::Primary),
    ]
    .into_iter()
    .collect();
    assert_eq!(usages, expected);
}

#[rstest]
fn usage_of_unused_profile_is_empty(snapshot: ConfigSnapshot) {
    let registry = registry_over(snapshot, MockEntryPoint::new());
    assert!(registry.usage_of("idle").expect("known profile").is_empty());
}

#[test]
fn usage_records_serialise_origin_labels() {
    let record = UsageRecord::new("PL1", "S1", "J1", Some("T1"), UsageOrigin::ConfigRepo);
    let json = serde_json::to_value(&record).expect("serialise");
    assert_eq!(json["origin"], "config_repo");
    assert_eq!(json["template_name"], "T1");

    let primary = UsageRecord::new("PL2", "build", "unit", None, UsageOrigin::Primary);
    let json = serde_json::to_value(&primary).expect("serialise");
    assert_eq!(json["origin"], "gocd");
    assert!(json.get("template_name").is_none());
    assert_eq!(UsageOrigin::Primary.as_str(), "gocd");
    assert_eq!(UsageOrigin::Primary.to_string(), "gocd");
}

// ---------------------------------------------------------------------------
// Mutations against the reference store
// ---------------------------------------------------------------------------

#[rstest]
fn create_persists_profile(snapshot: ConfigSnapshot) {
    let registry = registry_over(snapshot, accepting());
    let mut result = OperationResult::new();

    let command = registry
        .create(admin(), elastic_profile("fresh", Some("docker")), &mut result)
        .expect("create");

    assert!(command.is_committed());
    assert!(result.is_successful());
    assert_eq!(registry.list_all().ids().last(), Some("fresh"));
}

#[rstest]
fn update_with_current_fingerprint_replaces_profile(snapshot: ConfigSnapshot) {
    let registry = registry_over(snapshot, accepting());
    let fingerprint = registry.fingerprint_of("idle").expect("fingerprint");
    let replacement = ElasticProfile::new("idle", Some("docker"))
        .with_property(crate::profile::ConfigurationProperty::plain("Image", "ubuntu"));
    let mut result = OperationResult::new();

    let command = registry
        .update(admin(), fingerprint.clone(), replacement.clone(), &mut result)
        .expect("update");

    assert!(command.is_committed());
    assert_eq!(registry.find("idle"), Some(replacement));
    assert_ne!(registry.fingerprint_of("idle").expect("fingerprint"), fingerprint);
}

#[rstest]
fn delete_reports_success_message(snapshot: ConfigSnapshot) {
    let registry = registry_over(snapshot, MockEntryPoint::new());
    let mut result = OperationResult::new();

    let command = registry
        .delete(admin(), elastic_profile("idle", Some("docker")), &mut result)
        .expect("delete");

    assert!(command.is_committed());
    assert_eq!(
        result.message(),
        Some("The elastic agent profile 'idle' was deleted successfully.")
    );
    assert!(registry.find("idle").is_none());
}

#[rstest]
fn delete_of_used_profile_is_rejected_without_success_message(snapshot: ConfigSnapshot) {
    let registry = registry_over(snapshot, MockEntryPoint::new());
    let mut result = OperationResult::new();

    let command = registry
        .delete(admin(), elastic_profile("P3", Some("docker")), &mut result)
        .expect("delete");

    assert!(matches!(
        command.rejection(),
        Some(Rejection::ValidationConflict { .. })
    ));
    assert_eq!(result.status(), ResultStatus::UnprocessableEntity);
    assert!(result.message().is_some_and(|m| m.contains("PL1/S1/J1")));
    assert!(registry.find("P3").is_some());
}

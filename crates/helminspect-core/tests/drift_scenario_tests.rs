#![allow(clippy::unwrap_used, clippy::expect_used)]

use helminspect_core::diff::model::LogStatus;
use helminspect_core::model::{IgnoreRule, IgnoreSet, Path, Resource, ResourceKind};
use helminspect_core::ops::{prune, select_relevant};
use helminspect_core::source::{StaticLiveSource, StaticManifestSource};
use helminspect_core::{check_release, compare_resource, DriftSummary, DriftType};
use serde_json::{json, Value};

fn resource(kind: &str, name: &str, block: &str, content: Value) -> Resource {
    Resource::from_document(json!({
        "apiVersion": "v1",
        "kind": kind,
        "metadata": {"name": name},
        block: content,
    }))
    .unwrap()
}

fn service(name: &str, spec: Value) -> Resource {
    resource("Service", name, "spec", spec)
}

fn config_map(name: &str, data: Value) -> Resource {
    resource("ConfigMap", name, "data", data)
}

fn deployment(name: &str, spec: Value) -> Resource {
    resource("Deployment", name, "spec", spec)
}

fn kind_rule(kind: &str, path: &str) -> IgnoreSet {
    [IgnoreRule::for_kind(ResourceKind::from_platform(kind), Path::parse(path))]
        .into_iter()
        .collect()
}

#[test]
fn test_service_cluster_ip_ignored_yields_no_drift() {
    let declared = service("api", json!({"ports": [{"port": 80}], "clusterIP": "None"}));
    let live = service("api", json!({"ports": [{"port": 80}], "clusterIP": "10.0.0.5"}));
    let ignore = kind_rule("Service", "clusterIP");

    let paths = ignore.paths_for(&ResourceKind::NetworkService, "api");
    assert!(prune(&select_relevant(&declared), &paths).get("clusterIP").is_none());
    assert!(prune(&select_relevant(&live), &paths).get("clusterIP").is_none());

    let cmp = compare_resource(&declared, &live, Some(&ignore));
    assert!(cmp.changes.is_empty());
    assert!(cmp.diff.is_empty());
}

#[test]
fn test_service_cluster_ip_without_ignore_is_modified() {
    let declared = service("api", json!({"clusterIP": "None"}));
    let live = service("api", json!({"clusterIP": "10.0.0.5"}));

    let cmp = compare_resource(&declared, &live, None);
    assert_eq!(cmp.changes.len(), 1);
    assert_eq!(cmp.changes[0].drift_type, DriftType::ValueModified);
    assert_eq!(cmp.changes[0].old_value, Some(json!("None")));
    assert_eq!(cmp.changes[0].new_value, Some(json!("10.0.0.5")));
}

#[test]
fn test_config_map_new_key() {
    let manifest = StaticManifestSource::new().with_release(
        "web",
        "prod",
        vec![config_map("settings", json!({"a": "1"}))],
    );
    let live = StaticLiveSource::new().with(config_map("settings", json!({"a": "1", "b": "2"})));

    let report = check_release("web", "prod", &manifest, &live, None).unwrap();
    assert_eq!(report.drift_reports.len(), 1);
    let record = &report.drift_reports[0];
    assert_eq!(record.drift_type, DriftType::NewKey);
    assert_eq!(record.path, Path::parse("b"));
    assert_eq!(record.new_value, Some(json!("2")));
    assert_eq!(
        report.drift_summary,
        DriftSummary {
            total_drifts: 1,
            new_keys: 1,
            removed_keys: 0,
            modified_keys: 0
        }
    );
}

#[test]
fn test_pruning_collapses_emptied_volume_list() {
    let declared = deployment(
        "web",
        json!({
            "replicas": 2,
            "volumes": [{"configMap": {"defaultMode": 420}}]
        }),
    );
    let pruned = prune(
        &select_relevant(&declared),
        &[Path::parse("volumes[0].configMap.defaultMode")],
    );
    assert_eq!(pruned, json!({"replicas": 2}));
}

#[test]
fn test_pruning_keeps_volume_with_remaining_fields() {
    let declared = deployment(
        "web",
        json!({
            "volumes": [{"name": "cfg", "configMap": {"defaultMode": 420}}]
        }),
    );
    let pruned = prune(
        &select_relevant(&declared),
        &[Path::parse("volumes[0].configMap.defaultMode")],
    );
    assert_eq!(pruned, json!({"volumes": [{"name": "cfg"}]}));
}

#[test]
fn test_missing_live_resource_is_isolated() {
    let manifest = StaticManifestSource::new().with_release(
        "web",
        "prod",
        vec![
            config_map("gone", json!({"a": "1"})),
            config_map("present", json!({"a": "1"})),
        ],
    );
    let live = StaticLiveSource::new().with(config_map("present", json!({"a": "2"})));

    let report = check_release("web", "prod", &manifest, &live, None).unwrap();

    let missing: Vec<_> = report
        .drift_logs
        .iter()
        .filter(|e| e.status == LogStatus::Missing)
        .collect();
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].name.as_deref(), Some("gone"));
    assert_eq!(
        missing[0].message,
        "Drift detected: ConfigMap `gone` is missing in Kubernetes."
    );

    assert_eq!(
        report
            .records_for(&ResourceKind::ConfigMap, "gone")
            .count(),
        0
    );
    assert_eq!(report.drift_summary.total_drifts, 1);
    assert_eq!(report.drift_summary.modified_keys, 1);
}

#[test]
fn test_release_not_found_short_circuits() {
    let manifest = StaticManifestSource::new();
    let report = check_release("ghost", "prod", &manifest, &StaticLiveSource::new(), None).unwrap();

    assert_eq!(report.drift_summary, DriftSummary::default());
    assert!(report.drift_reports.is_empty());
    assert_eq!(report.drift_logs.len(), 1);
    assert_eq!(report.drift_logs[0].status, LogStatus::ReleaseNotFound);
}

#[test]
fn test_records_follow_manifest_order() {
    let manifest = StaticManifestSource::new().with_release(
        "web",
        "prod",
        vec![
            config_map("zeta", json!({"a": "1"})),
            config_map("alpha", json!({"a": "1"})),
        ],
    );
    let live = StaticLiveSource::new()
        .with(config_map("zeta", json!({"a": "2"})))
        .with(config_map("alpha", json!({"a": "2"})));

    let report = check_release("web", "prod", &manifest, &live, None).unwrap();
    let names: Vec<&str> = report.drift_reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["zeta", "alpha"]);
}

#[test]
fn test_learned_rules_do_not_bleed_across_resources() {
    let ignore = IgnoreSet::from_learned(["ConfigMap;one;extra"]);
    let manifest = StaticManifestSource::new().with_release(
        "web",
        "prod",
        vec![
            config_map("one", json!({"a": "1"})),
            config_map("two", json!({"a": "1"})),
        ],
    );
    let live = StaticLiveSource::new()
        .with(config_map("one", json!({"a": "1", "extra": "x"})))
        .with(config_map("two", json!({"a": "1", "extra": "x"})));

    let report = check_release("web", "prod", &manifest, &live, Some(&ignore)).unwrap();
    assert_eq!(report.drift_reports.len(), 1);
    assert_eq!(report.drift_reports[0].name, "two");
}

#[test]
fn test_default_ignore_set_hides_injected_service_fields() {
    let declared = service("api", json!({"ports": [{"port": 80}], "selector": {"app": "api"}}));
    let live = service(
        "api",
        json!({
            "ports": [{"port": 80}],
            "selector": {"app": "api"},
            "clusterIP": "10.0.0.5",
            "clusterIPs": ["10.0.0.5"],
            "ipFamilies": ["IPv4"],
            "ipFamilyPolicy": "SingleStack",
            "sessionAffinity": "None",
            "internalTrafficPolicy": "Cluster"
        }),
    );
    let cmp = compare_resource(&declared, &live, Some(&IgnoreSet::defaults()));
    assert!(cmp.changes.is_empty(), "unexpected changes: {:?}", cmp.changes);
}

#[test]
fn test_annotation_keys_with_dots_are_pruned_whole() {
    let declared = deployment("web", json!({"template": {"metadata": {"labels": {"app": "web"}}}}));
    let live = deployment(
        "web",
        json!({"template": {"metadata": {
            "labels": {"app": "web"},
            "annotations": {"kubectl.kubernetes.io/restartedAt": "2024-05-01T00:00:00Z"}
        }}}),
    );
    let ignore = kind_rule(
        "Deployment",
        "template.metadata.annotations.kubectl.kubernetes.io/restartedAt",
    );
    let cmp = compare_resource(&declared, &live, Some(&ignore));
    assert!(cmp.changes.is_empty());
}

#![allow(clippy::unwrap_used, clippy::expect_used)]

use chrono::{TimeZone, Utc};
use helminspect_core::diff::model::{DriftLogEntry, LogStatus};
use helminspect_core::model::{IgnoreSet, Path, ResourceKind};
use helminspect_core::{CalibrationSnapshot, DriftRecord, DriftReport, DriftType, ExErrorKind, RunIdentity};
use helminspect_store::{
    delete_calibration, load_calibration, read_calibration, read_drift_report, save_calibration,
    save_drift_report, StoreLayout,
};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn identity() -> RunIdentity {
    RunIdentity::new("web", "prod", "kind-dev")
}

fn snapshot(keys: &[&str]) -> CalibrationSnapshot {
    let learned = IgnoreSet::from_learned(keys.iter().copied());
    CalibrationSnapshot::new(
        &identity(),
        Utc.with_ymd_and_hms(2026, 2, 3, 4, 5, 6).unwrap(),
        &learned,
    )
}

#[test]
fn test_calibration_save_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let layout = StoreLayout::new(dir.path());
    let saved = snapshot(&["Service;api;clusterIP", "Deployment;web;strategy.type"]);

    save_calibration(&layout, &saved).unwrap();
    let loaded = load_calibration(&layout, &identity()).unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(loaded.ignore_set().len(), 2);
}

#[test]
fn test_calibration_file_has_wire_fields() {
    let dir = TempDir::new().unwrap();
    let layout = StoreLayout::new(dir.path());
    let path = save_calibration(&layout, &snapshot(&["Service;api;clusterIP"])).unwrap();

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
    assert_eq!(raw["release"], json!("web"));
    assert_eq!(raw["namespace"], json!("prod"));
    assert_eq!(raw["cluster"], json!("kind-dev"));
    assert_eq!(raw["ignorable_keys"], json!(["Service;api;clusterIP"]));
    assert_eq!(raw["date"], json!("2026-02-03T04:05:06Z"));
}

#[test]
fn test_recalibration_replaces_wholesale() {
    let dir = TempDir::new().unwrap();
    let layout = StoreLayout::new(dir.path());

    save_calibration(&layout, &snapshot(&["Service;api;clusterIP"])).unwrap();
    assert!(delete_calibration(&layout, &identity()).unwrap());
    save_calibration(&layout, &snapshot(&["ConfigMap;cfg;extra"])).unwrap();

    let loaded = load_calibration(&layout, &identity()).unwrap();
    assert_eq!(loaded.ignorable_keys, vec!["ConfigMap;cfg;extra".to_string()]);
}

#[test]
fn test_missing_calibration_is_absent() {
    let dir = TempDir::new().unwrap();
    let layout = StoreLayout::new(dir.path());
    assert!(load_calibration(&layout, &identity()).is_none());
}

#[test]
fn test_malformed_calibration_is_absent() {
    let dir = TempDir::new().unwrap();
    let layout = StoreLayout::new(dir.path());
    let path = layout.calibration_path(&identity());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, b"{ not json").unwrap();

    assert!(load_calibration(&layout, &identity()).is_none());
    let err = read_calibration(&path).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidSnapshot);
}

#[test]
fn test_drift_report_round_trip() {
    let dir = TempDir::new().unwrap();
    let layout = StoreLayout::new(dir.path());

    let mut report = DriftReport::new();
    report.push_log(DriftLogEntry {
        status: LogStatus::Drift,
        kind: Some(ResourceKind::ConfigMap),
        name: Some("settings".to_string()),
        message: "❌ Drift detected in ConfigMap `settings`:".to_string(),
    });
    report.push_record(DriftRecord {
        kind: ResourceKind::ConfigMap,
        name: "settings".to_string(),
        drift_type: DriftType::NewKey,
        path: Path::parse("b"),
        old_value: None,
        new_value: Some(json!("2")),
    });

    let path = save_drift_report(&layout, &identity(), &report).unwrap();
    assert_eq!(
        path,
        dir.path().join("drift").join("drift_web_prod_kind-dev.json")
    );

    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(
        raw["drift_summary"],
        json!({"total_drifts": 1, "new_keys": 1, "removed_keys": 0, "modified_keys": 0})
    );
    assert_eq!(raw["drift_reports"][0]["drift_type"], json!("new_key"));

    assert_eq!(read_drift_report(&path).unwrap(), report);
}

//! Drift output types.
//!
//! The report types serialize to the persisted drift report JSON:
//! `{drift_logs, drift_reports, drift_summary}`.

use crate::model::{Path, ResourceKind};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Classification of one leaf difference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftType {
    /// Path exists only in the live tree
    NewKey,
    /// Path exists only in the declared tree
    KeyRemoved,
    /// Path exists in both with different values
    ValueModified,
}

/// A leaf difference between two trees, before it is tied to a resource
#[derive(Debug, Clone, PartialEq)]
pub struct LeafChange {
    pub drift_type: DriftType,
    pub path: Path,
    /// Declared value (absent for `NewKey`)
    pub old_value: Option<Value>,
    /// Live value (absent for `KeyRemoved`)
    pub new_value: Option<Value>,
}

/// Result of comparing one declared tree against one live tree
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TreeComparison {
    /// Unified diff lines; empty when the canonical forms are identical
    pub diff: Vec<String>,
    pub changes: Vec<LeafChange>,
}

impl TreeComparison {
    pub fn is_clean(&self) -> bool {
        self.diff.is_empty() && self.changes.is_empty()
    }
}

/// One atomic drift finding for a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftRecord {
    pub kind: ResourceKind,
    pub name: String,
    pub drift_type: DriftType,
    pub path: Path,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Value>,
}

impl DriftRecord {
    pub fn from_change(kind: &ResourceKind, name: &str, change: LeafChange) -> Self {
        Self {
            kind: kind.clone(),
            name: name.to_string(),
            drift_type: change.drift_type,
            path: change.path,
            old_value: change.old_value,
            new_value: change.new_value,
        }
    }
}

/// Outcome of checking one resource (or the whole release)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    Clean,
    Drift,
    Missing,
    ReleaseNotFound,
}

/// Human-oriented log line kept in the persisted report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftLogEntry {
    pub status: LogStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ResourceKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub message: String,
}

/// Aggregate counts over all records of a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    pub total_drifts: usize,
    pub new_keys: usize,
    pub removed_keys: usize,
    pub modified_keys: usize,
}

impl DriftSummary {
    pub fn record(&mut self, drift_type: DriftType) {
        self.total_drifts += 1;
        match drift_type {
            DriftType::NewKey => self.new_keys += 1,
            DriftType::KeyRemoved => self.removed_keys += 1,
            DriftType::ValueModified => self.modified_keys += 1,
        }
    }

    pub fn has_drift(&self) -> bool {
        self.total_drifts > 0
    }
}

/// Full result of a drift run, persisted wholesale
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriftReport {
    pub drift_logs: Vec<DriftLogEntry>,
    pub drift_reports: Vec<DriftRecord>,
    pub drift_summary: DriftSummary,
}

impl DriftReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report for a release whose declared manifest could not be found
    pub fn release_not_found(release: &str, namespace: &str) -> Self {
        let mut report = Self::new();
        report.drift_logs.push(DriftLogEntry {
            status: LogStatus::ReleaseNotFound,
            kind: None,
            name: None,
            message: format!(
                "No Helm manifest found for release `{release}` in namespace `{namespace}`. Ensure the release exists and try again."
            ),
        });
        report
    }

    pub fn push_log(&mut self, entry: DriftLogEntry) {
        self.drift_logs.push(entry);
    }

    /// Append a fully classified record and count it
    pub fn push_record(&mut self, record: DriftRecord) {
        self.drift_summary.record(record.drift_type);
        self.drift_reports.push(record);
    }

    /// Records belonging to one resource
    pub fn records_for<'a>(
        &'a self,
        kind: &'a ResourceKind,
        name: &'a str,
    ) -> impl Iterator<Item = &'a DriftRecord> {
        self.drift_reports
            .iter()
            .filter(move |r| &r.kind == kind && r.name == name)
    }
}

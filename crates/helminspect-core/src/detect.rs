//! Release-level drift detection.
//!
//! Walks the declared resources of a release in manifest order, pairs each
//! with its live counterpart, and folds the per-resource comparisons into a
//! single [`DriftReport`].

use crate::diff::engine::compare;
use crate::diff::model::{DriftLogEntry, DriftRecord, DriftReport, LogStatus, TreeComparison};
use crate::errors::Result;
use crate::model::{IgnoreSet, Resource};
use crate::ops::{prune, select_relevant};
use crate::source::{LiveSource, ManifestSource};
use crate::{log_op_end, log_op_error, log_op_start};
use std::time::Instant;

/// Compare one declared resource against its live counterpart
///
/// Both sides go through relevance selection, then pruning with the paths
/// `ignore` holds for the declared resource's identity. `None` disables
/// pruning entirely.
pub fn compare_resource(
    declared: &Resource,
    live: &Resource,
    ignore: Option<&IgnoreSet>,
) -> TreeComparison {
    let paths = ignore
        .map(|set| set.paths_for(&declared.kind, &declared.name))
        .unwrap_or_default();

    let declared_tree = prune(&select_relevant(declared), &paths);
    let live_tree = prune(&select_relevant(live), &paths);
    compare(&declared_tree, &live_tree)
}

/// Check every declared resource of a release for drift
///
/// - An empty declared set yields the release-not-found report.
/// - Kinds outside the compared set are skipped.
/// - A resource with no live counterpart (or whose live fetch fails) gets a
///   single `missing` log entry and no records.
///
/// # Errors
///
/// Returns the manifest source's error if the declared state cannot be fetched.
#[allow(clippy::result_large_err)]
pub fn check_release(
    release: &str,
    namespace: &str,
    manifest: &dyn ManifestSource,
    live: &dyn LiveSource,
    ignore: Option<&IgnoreSet>,
) -> Result<DriftReport> {
    let start = Instant::now();
    log_op_start!("check_release", release = release, namespace = namespace);

    let declared = match manifest.fetch_declared(release, namespace) {
        Ok(declared) => declared,
        Err(err) => {
            log_op_error!(
                "check_release",
                err,
                duration_ms = start.elapsed().as_millis() as u64
            );
            return Err(err);
        }
    };

    if declared.is_empty() {
        let report = DriftReport::release_not_found(release, namespace);
        for entry in &report.drift_logs {
            tracing::error!(release = release, namespace = namespace, "{}", entry.message);
        }
        log_op_end!(
            "check_release",
            duration_ms = start.elapsed().as_millis() as u64,
            resource_count = 0u64,
            drift_count = 0u64
        );
        return Ok(report);
    }

    let mut report = DriftReport::new();
    for resource in &declared {
        check_resource(&mut report, resource, namespace, live, ignore);
    }

    log_op_end!(
        "check_release",
        duration_ms = start.elapsed().as_millis() as u64,
        resource_count = declared.len() as u64,
        drift_count = report.drift_summary.total_drifts as u64
    );
    Ok(report)
}

fn check_resource(
    report: &mut DriftReport,
    declared: &Resource,
    namespace: &str,
    live: &dyn LiveSource,
    ignore: Option<&IgnoreSet>,
) {
    let (kind, name) = declared.identity();
    if !kind.is_compared() {
        tracing::debug!(resource_kind = %kind, resource_name = name, "skipping unsupported kind");
        return;
    }

    let live_resource = match live.fetch_live(kind, name, namespace) {
        Ok(found) => found,
        Err(err) => {
            let err = err
                .with_resource_kind(kind.to_string())
                .with_resource_name(name);
            tracing::warn!(
                resource_kind = %kind,
                resource_name = name,
                err_code = err.code(),
                "live fetch failed, treating resource as missing: {}",
                err
            );
            None
        }
    };

    let Some(live_resource) = live_resource else {
        let message = format!("Drift detected: {kind} `{name}` is missing in Kubernetes.");
        tracing::error!(resource_kind = %kind, resource_name = name, "{}", message);
        report.push_log(DriftLogEntry {
            status: LogStatus::Missing,
            kind: Some(kind.clone()),
            name: Some(name.to_string()),
            message,
        });
        return;
    };

    let comparison = compare_resource(declared, &live_resource, ignore);

    if comparison.diff.is_empty() {
        let message = format!("✅ No drift detected in {kind} `{name}`.");
        tracing::info!(resource_kind = %kind, resource_name = name, "{}", message);
        report.push_log(DriftLogEntry {
            status: LogStatus::Clean,
            kind: Some(kind.clone()),
            name: Some(name.to_string()),
            message,
        });
    } else {
        let message = format!(
            "❌ Drift detected in {kind} `{name}`:\n{}",
            comparison.diff.join("\n")
        );
        tracing::error!(resource_kind = %kind, resource_name = name, "{}", message);
        report.push_log(DriftLogEntry {
            status: LogStatus::Drift,
            kind: Some(kind.clone()),
            name: Some(name.to_string()),
            message,
        });
    }

    for change in comparison.changes {
        tracing::debug!(
            resource_kind = %kind,
            resource_name = name,
            path = %change.path,
            drift_type = ?change.drift_type,
            "classified drift"
        );
        report.push_record(DriftRecord::from_change(kind, name, change));
    }
}

//! Drift report persistence.

#![allow(clippy::result_large_err)]

use crate::atomic::atomic_write;
use crate::errors::{io_error, serialization_error, Result};
use crate::layout::StoreLayout;
use helminspect_core::model::RunIdentity;
use helminspect_core::DriftReport;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the report for `identity`, replacing the previous run's report
///
/// # Errors
///
/// Returns `ExErrorKind::Io` if the file cannot be written.
pub fn save_drift_report(
    layout: &StoreLayout,
    identity: &RunIdentity,
    report: &DriftReport,
) -> Result<PathBuf> {
    let path = layout.drift_path(identity);
    let content =
        serde_json::to_vec_pretty(report).map_err(|e| serialization_error("save_drift_report", e))?;
    atomic_write(&path, &content)?;
    tracing::info!(path = %path.display(), "✅ Drift data saved successfully.");
    Ok(path)
}

/// Read a persisted drift report
///
/// # Errors
///
/// Returns `ExErrorKind::Io` if the file cannot be read and
/// `ExErrorKind::Serialization` if it does not parse.
pub fn read_drift_report(path: &Path) -> Result<DriftReport> {
    let content = fs::read(path).map_err(|e| io_error("read_drift_report", path, e))?;
    serde_json::from_slice(&content).map_err(|e| serialization_error("read_drift_report", e))
}

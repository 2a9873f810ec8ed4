//! Calibration snapshot persistence.
//!
//! One file per run identity, replaced wholesale by every calibration.

#![allow(clippy::result_large_err)]

use crate::atomic::atomic_write;
use crate::errors::{invalid_snapshot, io_error, serialization_error, Result};
use crate::layout::StoreLayout;
use helminspect_core::model::{CalibrationSnapshot, RunIdentity};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Write `snapshot` for its identity, replacing any previous one
///
/// # Errors
///
/// Returns `ExErrorKind::Io` if the file cannot be written.
pub fn save_calibration(layout: &StoreLayout, snapshot: &CalibrationSnapshot) -> Result<PathBuf> {
    let identity = RunIdentity::new(&snapshot.release, &snapshot.namespace, &snapshot.cluster);
    let path = layout.calibration_path(&identity);
    let content =
        serde_json::to_vec_pretty(snapshot).map_err(|e| serialization_error("save_calibration", e))?;
    atomic_write(&path, &content)?;
    tracing::info!(path = %path.display(), "✅ Calibration data saved successfully.");
    Ok(path)
}

/// Read and parse a snapshot file
///
/// # Errors
///
/// Returns `ExErrorKind::Io` if the file cannot be read and
/// `ExErrorKind::InvalidSnapshot` if it does not parse.
pub fn read_calibration(path: &Path) -> Result<CalibrationSnapshot> {
    let content = fs::read(path).map_err(|e| io_error("read_calibration", path, e))?;
    serde_json::from_slice(&content).map_err(|e| invalid_snapshot(path, e))
}

/// Load the snapshot for `identity`
///
/// A missing file is `None`. An unreadable or malformed file is also
/// `None`, after a warning.
pub fn load_calibration(layout: &StoreLayout, identity: &RunIdentity) -> Option<CalibrationSnapshot> {
    let path = layout.calibration_path(identity);
    if !path.exists() {
        return None;
    }
    match read_calibration(&path) {
        Ok(snapshot) => Some(snapshot),
        Err(err) => {
            tracing::warn!(err_code = err.code(), "{}", err);
            None
        }
    }
}

/// Delete the snapshot for `identity`; returns whether a file was removed
///
/// # Errors
///
/// Returns `ExErrorKind::Io` if an existing file cannot be removed.
pub fn delete_calibration(layout: &StoreLayout, identity: &RunIdentity) -> Result<bool> {
    let path = layout.calibration_path(identity);
    match fs::remove_file(&path) {
        Ok(()) => {
            tracing::info!(path = %path.display(), "✅ Calibration data deleted successfully.");
            Ok(true)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_error("delete_calibration", &path, e)),
    }
}

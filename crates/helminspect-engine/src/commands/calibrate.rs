//! Calibration command.

#![allow(clippy::result_large_err)]

use crate::commands::engine_command::EngineContext;
use chrono::{DateTime, Utc};
use helminspect_core::errors::{ExError, ExErrorKind, Result};
use helminspect_core::{calibrate, log_op_end, log_op_error, log_op_start};
use helminspect_core::{CalibrationSnapshot, RunIdentity};
use helminspect_store::{delete_calibration, save_calibration};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct CalibrateOutcome {
    pub snapshot: CalibrationSnapshot,
    pub snapshot_path: PathBuf,
    /// Resources that had a live counterpart
    pub analyzed: usize,
}

/// Replace the calibration snapshot of `identity` with a freshly learned one
///
/// # Errors
///
/// Returns `ExErrorKind::NotFound` if the release has no declared
/// resources, the manifest source's error if it cannot be fetched, and
/// `ExErrorKind::Io` if the new snapshot cannot be written.
pub fn run_calibrate(
    identity: &RunIdentity,
    ctx: &EngineContext<'_>,
    now: DateTime<Utc>,
) -> Result<CalibrateOutcome> {
    let start = Instant::now();
    log_op_start!("calibrate_release", release = %identity.release, namespace = %identity.namespace);

    let outcome = learn_and_persist(identity, ctx, now);
    match &outcome {
        Ok(done) => {
            log_op_end!(
                "calibrate_release",
                duration_ms = start.elapsed().as_millis() as u64,
                resource_count = done.analyzed as u64
            );
        }
        Err(err) => {
            log_op_error!(
                "calibrate_release",
                *err,
                duration_ms = start.elapsed().as_millis() as u64
            );
        }
    }
    outcome
}

fn learn_and_persist(
    identity: &RunIdentity,
    ctx: &EngineContext<'_>,
    now: DateTime<Utc>,
) -> Result<CalibrateOutcome> {
    if let Err(err) = delete_calibration(ctx.layout, identity) {
        tracing::error!(err_code = err.code(), "Failed to delete calibration file: {}", err);
    }

    let declared = ctx
        .manifest
        .fetch_declared(&identity.release, &identity.namespace)?;
    if declared.is_empty() {
        return Err(ExError::new(ExErrorKind::NotFound)
            .with_op("calibrate_release")
            .with_message(format!(
                "No Helm manifest found for release `{}` in namespace `{}`",
                identity.release, identity.namespace
            )));
    }

    tracing::info!("🔍 Starting Analysis for calibration...");
    let learned = calibrate(&declared, &identity.namespace, ctx.live);

    let snapshot = CalibrationSnapshot::new(identity, now, &learned.ignore);
    let snapshot_path = save_calibration(ctx.layout, &snapshot)?;

    Ok(CalibrateOutcome {
        snapshot,
        snapshot_path,
        analyzed: learned.analyzed,
    })
}

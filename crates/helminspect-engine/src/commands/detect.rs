//! Drift detection command.

#![allow(clippy::result_large_err)]

use crate::commands::engine_command::EngineContext;
use chrono::{DateTime, Utc};
use helminspect_core::diff::render_drift_summary;
use helminspect_core::errors::Result;
use helminspect_core::{check_release, log_op_end, log_op_error, log_op_start};
use helminspect_core::{DriftReport, IgnoreSet, RunIdentity};
use helminspect_store::{load_calibration, save_drift_report};
use std::path::PathBuf;
use std::time::Instant;

/// Where the ignore rules of a detection run came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreSource {
    /// `--no-ignore`: nothing is pruned
    Disabled,
    /// Rules learned by the last calibration
    Calibration,
    /// Built-in kind-scoped defaults
    Defaults,
}

#[derive(Debug, Clone)]
pub struct DetectOutcome {
    pub report: DriftReport,
    /// `None` when the report could not be written
    pub report_path: Option<PathBuf>,
    pub ignore_source: IgnoreSource,
}

/// Detect drift for `identity`
///
/// Persistence and notification failures are logged and do not fail the run.
///
/// # Errors
///
/// Returns an error only if the declared manifest cannot be fetched or parsed.
pub fn run_detect(
    identity: &RunIdentity,
    ctx: &EngineContext<'_>,
    no_ignore: bool,
    now: DateTime<Utc>,
) -> Result<DetectOutcome> {
    let start = Instant::now();
    log_op_start!("detect", release = %identity.release, namespace = %identity.namespace);

    let snapshot = load_calibration(ctx.layout, identity);
    if let Some(snapshot) = &snapshot {
        if snapshot.is_stale(now) {
            tracing::warn!(
                "⚠️ Calibration data is {} days old. Consider recalibrating.",
                snapshot.age_days(now)
            );
        }
    }

    let (ignore, ignore_source) = if no_ignore {
        tracing::info!("✨ Proceeding without ignoring any keys.");
        (None, IgnoreSource::Disabled)
    } else if let Some(snapshot) = &snapshot {
        tracing::info!("✨ Using existing calibration data.");
        (Some(snapshot.ignore_set()), IgnoreSource::Calibration)
    } else {
        tracing::warn!(
            "⚠️ No calibration data found!\n  \
             • Using default ignorable keys which may not be accurate.\n  \
             • Run 'helm-inspect --calibrate --release {} --namespace {}'\n    \
             immediately after a fresh Helm installation for accurate drift detection.",
            identity.release,
            identity.namespace
        );
        (Some(IgnoreSet::defaults()), IgnoreSource::Defaults)
    };

    let report = match check_release(
        &identity.release,
        &identity.namespace,
        ctx.manifest,
        ctx.live,
        ignore.as_ref(),
    ) {
        Ok(report) => report,
        Err(err) => {
            log_op_error!("detect", err, duration_ms = start.elapsed().as_millis() as u64);
            return Err(err);
        }
    };

    let report_path = match save_drift_report(ctx.layout, identity, &report) {
        Ok(path) => Some(path),
        Err(err) => {
            tracing::error!(err_code = err.code(), "Failed to save drift file: {}", err);
            None
        }
    };

    tracing::info!("✨ Drift detection completed.");
    tracing::info!(
        "{}",
        render_drift_summary(identity, &report.drift_summary, report_path.as_deref())
    );

    if let Err(err) = ctx.notifier.notify(identity, &report) {
        tracing::error!(err_code = err.code(), "❌ Failed to send notification: {}", err);
    }

    log_op_end!(
        "detect",
        duration_ms = start.elapsed().as_millis() as u64,
        drift_count = report.drift_summary.total_drifts as u64
    );

    Ok(DetectOutcome {
        report,
        report_path,
        ignore_source,
    })
}

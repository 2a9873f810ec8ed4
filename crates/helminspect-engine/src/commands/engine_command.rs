//! Engine-level commands.

#![allow(clippy::result_large_err)]

use crate::commands::calibrate::{run_calibrate, CalibrateOutcome};
use crate::commands::detect::{run_detect, DetectOutcome};
use crate::notify::Notifier;
use chrono::{DateTime, Utc};
use helminspect_core::errors::Result;
use helminspect_core::source::{LiveSource, ManifestSource};
use helminspect_core::RunIdentity;
use helminspect_store::StoreLayout;

/// Collaborators shared by every engine command
pub struct EngineContext<'a> {
    pub layout: &'a StoreLayout,
    pub manifest: &'a dyn ManifestSource,
    pub live: &'a dyn LiveSource,
    pub notifier: &'a dyn Notifier,
}

/// Engine-level commands that require I/O (cluster, store, chat).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Compare the release against the cluster.
    Detect {
        /// Skip every ignore rule.
        no_ignore: bool,
    },
    /// Learn drift-prone paths and replace the calibration snapshot.
    Calibrate,
}

/// Result of applying an engine command.
#[derive(Debug, Clone)]
pub enum EngineCommandResult {
    Detect(DetectOutcome),
    Calibrate(CalibrateOutcome),
}

/// Apply an engine command for one run identity.
///
/// `now` stamps new snapshots and ages existing ones.
///
/// # Errors
///
/// Returns the first fatal error of the command; see [`run_detect`] and
/// [`run_calibrate`].
pub fn apply_engine_command(
    cmd: EngineCommand,
    identity: &RunIdentity,
    ctx: &EngineContext<'_>,
    now: DateTime<Utc>,
) -> Result<EngineCommandResult> {
    match cmd {
        EngineCommand::Detect { no_ignore } => {
            run_detect(identity, ctx, no_ignore, now).map(EngineCommandResult::Detect)
        }
        EngineCommand::Calibrate => {
            run_calibrate(identity, ctx, now).map(EngineCommandResult::Calibrate)
        }
    }
}

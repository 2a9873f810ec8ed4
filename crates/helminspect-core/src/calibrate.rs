//! Calibration: learning drift-prone paths from a clean install.
//!
//! Right after a fresh `helm install`, every structural difference between
//! the declared and live shape of a resource is something the platform
//! injected or dropped. Those paths become name-scoped ignore rules.

use crate::model::{IgnoreRule, IgnoreSet, Path, Resource};
use crate::ops::{flatten, select_relevant};
use crate::source::LiveSource;
use crate::{log_op_end, log_op_start};
use std::collections::BTreeSet;
use std::time::Instant;

/// Outcome of a calibration pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calibration {
    /// Learned name-scoped rules
    pub ignore: IgnoreSet,
    /// Resources that had a live counterpart and were analysed
    pub analyzed: usize,
}

/// Learn the ignorable paths of a release
///
/// Every declared resource is considered, whatever its kind. Resources with
/// no live counterpart are skipped. Only path existence matters: a path on
/// both sides with different values is left to surface as drift.
pub fn calibrate(declared: &[Resource], namespace: &str, live: &dyn LiveSource) -> Calibration {
    let start = Instant::now();
    log_op_start!("calibrate", namespace = namespace);

    let mut calibration = Calibration::default();
    for resource in declared {
        let (kind, name) = resource.identity();
        tracing::info!(resource_kind = %kind, resource_name = name, "Checking drift for {kind} `{name}`...");

        let live_resource = match live.fetch_live(kind, name, namespace) {
            Ok(Some(found)) => found,
            Ok(None) => {
                tracing::warn!(
                    resource_kind = %kind,
                    resource_name = name,
                    "Resource {kind} `{name}` not found during calibration"
                );
                continue;
            }
            Err(err) => {
                let err = err
                    .with_resource_kind(kind.to_string())
                    .with_resource_name(name);
                tracing::warn!(
                    resource_kind = %kind,
                    resource_name = name,
                    err_code = err.code(),
                    "Resource {kind} `{name}` could not be fetched during calibration: {err}"
                );
                continue;
            }
        };

        for path in drift_prone_paths(resource, &live_resource) {
            calibration
                .ignore
                .insert(IgnoreRule::for_resource(kind.clone(), name, path));
        }
        calibration.analyzed += 1;
    }

    tracing::info!(
        "Analyzed {} resources and found {} drift-prone keys.",
        calibration.analyzed,
        calibration.ignore.len()
    );
    log_op_end!(
        "calibrate",
        duration_ms = start.elapsed().as_millis() as u64,
        resource_count = calibration.analyzed as u64
    );
    calibration
}

/// Paths present on exactly one side of the unpruned relevant trees
fn drift_prone_paths(declared: &Resource, live: &Resource) -> BTreeSet<Path> {
    let declared_keys: BTreeSet<_> = flatten(&select_relevant(declared)).into_keys().collect();
    let live_keys: BTreeSet<_> = flatten(&select_relevant(live)).into_keys().collect();
    declared_keys
        .symmetric_difference(&live_keys)
        .cloned()
        .collect()
}

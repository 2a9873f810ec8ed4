//! helm-inspect core - drift reconciliation engine
//!
//! This crate holds everything needed to compare a declared Helm manifest
//! against live cluster state, independent of how either side is fetched:
//! - Resource, kind and path models
//! - Relevance selection, flattening and ignore-path pruning
//! - Drift classification and unified-diff rendering
//! - Calibration (learning drift-prone paths from a clean install)
//! - Collaborator traits for manifest and live-state sources
//! - Structured error and logging facilities

pub mod calibrate;
pub mod detect;
pub mod diff;
pub mod errors;
pub mod logging_facility;
pub mod model;
pub mod ops;
pub mod source;

// Re-export commonly used types
pub use calibrate::{calibrate, Calibration};
pub use detect::{check_release, compare_resource};
pub use diff::model::{DriftRecord, DriftReport, DriftSummary, DriftType};
pub use errors::{DriftError, ExError, ExErrorKind, Result};
pub use model::{CalibrationSnapshot, IgnoreRule, IgnoreSet, Path, Resource, ResourceKind, RunIdentity};
pub use source::{LiveSource, ManifestSource};

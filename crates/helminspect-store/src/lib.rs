//! helm-inspect store - filesystem persistence
//!
//! Provides:
//! - Base directory layout (`HI_BASE_DIR` or `~/.helminspect`)
//! - Calibration snapshot save/load/delete
//! - Drift report persistence
//! - Atomic temp→rename writes so readers never see partial files

pub mod atomic;
pub mod calibration;
pub mod errors;
pub mod layout;
pub mod report;

// Re-export key types
pub use calibration::{delete_calibration, load_calibration, read_calibration, save_calibration};
pub use errors::Result;
pub use layout::StoreLayout;
pub use report::{read_drift_report, save_drift_report};

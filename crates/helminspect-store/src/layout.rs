//! On-disk layout of the store directory.
//!
//! ```text
//! <base>/
//!   tmp/calibration_<release>_<namespace>_<cluster>.json
//!   drift/drift_<release>_<namespace>_<cluster>.json
//! ```

#![allow(clippy::result_large_err)]

use crate::errors::{no_base_dir, Result};
use helminspect_core::model::RunIdentity;
use std::path::{Path, PathBuf};

/// Environment variable overriding the base directory
pub const BASE_DIR_ENV: &str = "HI_BASE_DIR";

/// Directory created under `$HOME` when no override is given
pub const DEFAULT_DIR_NAME: &str = ".helminspect";

const CALIBRATION_DIR: &str = "tmp";
const DRIFT_DIR: &str = "drift";

/// Resolved locations of persisted artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    base: PathBuf,
}

impl StoreLayout {
    /// Layout rooted at an explicit base directory
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Resolve the base directory: `explicit`, then `HI_BASE_DIR`, then `$HOME/.helminspect`
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::Persistence` if none of the three is available.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        if let Some(base) = explicit {
            return Ok(Self::new(base));
        }
        if let Some(base) = std::env::var_os(BASE_DIR_ENV).filter(|v| !v.is_empty()) {
            return Ok(Self::new(base));
        }
        std::env::var_os("HOME")
            .filter(|v| !v.is_empty())
            .map(|home| Self::new(PathBuf::from(home).join(DEFAULT_DIR_NAME)))
            .ok_or_else(no_base_dir)
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn calibration_dir(&self) -> PathBuf {
        self.base.join(CALIBRATION_DIR)
    }

    pub fn drift_dir(&self) -> PathBuf {
        self.base.join(DRIFT_DIR)
    }

    /// Calibration snapshot file for a run identity
    pub fn calibration_path(&self, identity: &RunIdentity) -> PathBuf {
        self.calibration_dir()
            .join(format!("calibration_{}.json", identity.file_stem()))
    }

    /// Drift report file for a run identity
    pub fn drift_path(&self, identity: &RunIdentity) -> PathBuf {
        self.drift_dir()
            .join(format!("drift_{}.json", identity.file_stem()))
    }
}

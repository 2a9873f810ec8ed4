//! Error handling for helminspect-store
//!
//! Wraps helminspect-core ExError with store-specific helpers

use helminspect_core::errors::{ExError, ExErrorKind};
use std::path::Path;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create an IO error
pub fn io_error(operation: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_path(path.display().to_string())
        .with_message(err.to_string())
}

/// Create a serialization error
pub fn serialization_error(operation: &str, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::Serialization)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

/// Create an unparsable snapshot error
pub fn invalid_snapshot(path: &Path, err: serde_json::Error) -> ExError {
    ExError::new(ExErrorKind::InvalidSnapshot)
        .with_op("read_calibration")
        .with_path(path.display().to_string())
        .with_message(format!("Failed to read calibration file: {}", err))
}

/// Create a missing base directory error
pub fn no_base_dir() -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("resolve_layout")
        .with_message("Neither HI_BASE_DIR nor HOME is set; cannot locate the store directory")
}

//! Atomic write primitives
//!
//! Uses temp→rename pattern to ensure no partial writes

#![allow(clippy::result_large_err)]

use crate::errors::{io_error, Result};
use std::fs;
use std::path::Path;

/// Atomically replace `target_path` with `content`
///
/// Missing parent directories are created.
pub fn atomic_write(target_path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = target_path.parent() {
        fs::create_dir_all(parent).map_err(|e| io_error("create_store_dir", parent, e))?;
    }

    let temp_path = target_path.with_extension("json.tmp");

    fs::write(&temp_path, content).map_err(|e| io_error("write_temp", &temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, target_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(io_error("rename_temp", target_path, e));
    }

    Ok(())
}

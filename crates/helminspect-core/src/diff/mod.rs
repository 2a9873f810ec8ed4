//! Drift comparison.
//!
//! Compares a declared tree against a live tree and produces both a
//! unified text diff for humans and classified leaf changes for machines.
//!
//! ## Entry point
//!
//! ```
//! use helminspect_core::diff::engine::compare;
//! use serde_json::json;
//!
//! let cmp = compare(&json!({"a": "1"}), &json!({"a": "1", "b": "2"}));
//! assert_eq!(cmp.changes.len(), 1);
//! ```
//!
//! ## Guarantees
//!
//! - **Determinism**: changes are ordered by kind of change, then path.
//! - **One record per leaf**: comparison runs on flattened views, so a
//!   changed leaf never also reports its ancestors.
//! - **Value-free text diff**: the unified diff is computed on canonical
//!   (sorted-key, two-space indented) JSON.

pub mod engine;
pub mod human_summary;
pub mod model;

pub use engine::{classify, compare, unified_diff};
pub use human_summary::render_drift_summary;
pub use model::{DriftLogEntry, DriftRecord, DriftReport, DriftSummary, DriftType, LeafChange, LogStatus, TreeComparison};

//! Human-readable summary renderer for drift runs.

use crate::diff::model::DriftSummary;
use crate::model::RunIdentity;

/// Render the end-of-run summary table.
///
/// Informational only; the persisted report is the source of truth.
pub fn render_drift_summary(
    identity: &RunIdentity,
    summary: &DriftSummary,
    report_file: Option<&std::path::Path>,
) -> String {
    let mut out = String::new();

    out.push_str("-----\n\nDrift Summary\n\n");
    out.push_str(&format!(
        " • Cluster: {}\n • Release: {}\n • Namespace: {}\n\n",
        identity.cluster, identity.release, identity.namespace
    ));

    out.push_str(&format!(" • Drifts: {}\n", summary.total_drifts));
    out.push_str("   +---------------------+-----------------------+\n");
    out.push_str("   | Type                | Count                 |\n");
    out.push_str("   +---------------------+-----------------------+\n");
    out.push_str(&row("New Keys", summary.new_keys));
    out.push_str(&row("Missing Keys", summary.removed_keys));
    out.push_str(&row("Changed Keys", summary.modified_keys));
    out.push_str("   +---------------------+-----------------------+\n");

    if let Some(path) = report_file {
        out.push_str(&format!("\n  • Drift Report File: {}\n", path.display()));
    }

    out
}

fn row(label: &str, count: usize) -> String {
    format!("   | {label:<20}| {count:<22}|\n")
}

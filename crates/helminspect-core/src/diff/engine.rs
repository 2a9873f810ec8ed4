//! Drift comparison engine.
//!
//! [`compare`] is the entry point; [`classify`] and [`unified_diff`] are
//! its two independent halves.

use crate::diff::model::{DriftType, LeafChange, TreeComparison};
use crate::ops::flatten::{flatten, FlatView};
use serde_json::Value;
use similar::TextDiff;

/// Label of the declared side in the unified diff header.
pub const DECLARED_LABEL: &str = "Helm Manifest";
/// Label of the live side in the unified diff header.
pub const LIVE_LABEL: &str = "Live Kubernetes";

/// Lines of context around each hunk.
const CONTEXT_RADIUS: usize = 3;

/// Serialize a tree canonically: sorted keys, two-space indentation, trailing newline.
pub fn canonical_json(tree: &Value) -> String {
    let mut text = serde_json::to_string_pretty(tree).unwrap_or_default();
    text.push('\n');
    text
}

/// Line-based unified diff of the canonical forms of two trees
///
/// Returns no lines when the canonical forms are identical.
pub fn unified_diff(declared: &Value, live: &Value) -> Vec<String> {
    let declared_text = canonical_json(declared);
    let live_text = canonical_json(live);
    if declared_text == live_text {
        return Vec::new();
    }

    TextDiff::from_lines(&declared_text, &live_text)
        .unified_diff()
        .context_radius(CONTEXT_RADIUS)
        .header(DECLARED_LABEL, LIVE_LABEL)
        .to_string()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Classify the differences between two flattened views
///
/// Output order: all `NewKey`, then `KeyRemoved`, then `ValueModified`,
/// each in path order. Equal shared leaves produce nothing.
pub fn classify(declared: &FlatView, live: &FlatView) -> Vec<LeafChange> {
    let mut changes = Vec::new();

    for (path, value) in live {
        if !declared.contains_key(path) {
            changes.push(LeafChange {
                drift_type: DriftType::NewKey,
                path: path.clone(),
                old_value: None,
                new_value: Some(value.clone()),
            });
        }
    }

    for (path, value) in declared {
        if !live.contains_key(path) {
            changes.push(LeafChange {
                drift_type: DriftType::KeyRemoved,
                path: path.clone(),
                old_value: Some(value.clone()),
                new_value: None,
            });
        }
    }

    for (path, old) in declared {
        if let Some(new) = live.get(path) {
            if old != new {
                changes.push(LeafChange {
                    drift_type: DriftType::ValueModified,
                    path: path.clone(),
                    old_value: Some(old.clone()),
                    new_value: Some(new.clone()),
                });
            }
        }
    }

    changes
}

/// Compare a declared tree against a live tree
///
/// Both trees are expected to be relevance-selected and pruned already.
pub fn compare(declared: &Value, live: &Value) -> TreeComparison {
    let diff = unified_diff(declared, live);
    let changes = classify(&flatten(declared), &flatten(live));
    TreeComparison { diff, changes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Path;
    use serde_json::json;

    #[test]
    fn test_identical_trees_produce_nothing() {
        let tree = json!({"ports": [{"port": 80}], "type": "ClusterIP"});
        let cmp = compare(&tree, &tree);
        assert!(cmp.is_clean());
    }

    #[test]
    fn test_classification_order() {
        let declared = json!({"a": 1, "b": 2, "c": 3});
        let live = json!({"a": 1, "b": 20, "d": 4});
        let kinds: Vec<DriftType> = compare(&declared, &live)
            .changes
            .iter()
            .map(|c| c.drift_type)
            .collect();
        assert_eq!(
            kinds,
            vec![
                DriftType::NewKey,
                DriftType::KeyRemoved,
                DriftType::ValueModified
            ]
        );
    }

    #[test]
    fn test_modified_carries_both_values() {
        let cmp = compare(&json!({"replicas": 2}), &json!({"replicas": 5}));
        assert_eq!(cmp.changes.len(), 1);
        let change = &cmp.changes[0];
        assert_eq!(change.path, Path::parse("replicas"));
        assert_eq!(change.old_value, Some(json!(2)));
        assert_eq!(change.new_value, Some(json!(5)));
    }

    #[test]
    fn test_unified_diff_has_labels_and_hunks() {
        let lines = unified_diff(&json!({"a": "1"}), &json!({"a": "2"}));
        assert_eq!(lines[0], format!("--- {DECLARED_LABEL}"));
        assert_eq!(lines[1], format!("+++ {LIVE_LABEL}"));
        assert!(lines.iter().any(|l| l.starts_with("@@")));
        assert!(lines.contains(&"-  \"a\": \"1\"".to_string()));
        assert!(lines.contains(&"+  \"a\": \"2\"".to_string()));
    }

    #[test]
    fn test_canonical_json_sorts_keys() {
        let text = canonical_json(&json!({"z": 1, "a": 2}));
        assert!(text.find("\"a\"").unwrap() < text.find("\"z\"").unwrap());
    }
}

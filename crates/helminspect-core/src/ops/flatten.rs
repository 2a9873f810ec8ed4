//! Tree flattening into leaf-path → value views.

use crate::model::Path;
use serde_json::Value;
use std::collections::BTreeMap;

/// Mapping from canonical leaf path to leaf value
pub type FlatView = BTreeMap<Path, Value>;

/// Flatten `tree` into one entry per leaf
///
/// Maps and sequences delegate to their children; a container only
/// appears as its own entry when no child contributes one, which for JSON
/// trees means when it is empty. Scalars are always leaves. The result has
/// no ancestor/descendant key pairs, so set operations on two views
/// classify drift directly.
pub fn flatten(tree: &Value) -> FlatView {
    flatten_at(tree, &Path::root())
}

/// Flatten `tree` with every key placed below `prefix`
pub fn flatten_at(tree: &Value, prefix: &Path) -> FlatView {
    let mut view = FlatView::new();
    collect(tree, prefix, &mut view);
    view
}

fn collect(node: &Value, prefix: &Path, out: &mut FlatView) {
    let before = out.len();
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                collect(child, &prefix.child_key(key.as_str()), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                collect(child, &prefix.child_index(index), out);
            }
        }
        scalar => {
            out.insert(prefix.clone(), scalar.clone());
            return;
        }
    }
    if out.len() == before {
        out.insert(prefix.clone(), node.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn keys(view: &FlatView) -> Vec<String> {
        view.keys().map(Path::render).collect()
    }

    #[test]
    fn test_nested_maps_and_sequences() {
        let view = flatten(&json!({
            "replicas": 2,
            "ports": [{"port": 80, "protocol": "TCP"}],
            "selector": {"app": "web"}
        }));
        assert_eq!(
            keys(&view),
            vec!["ports[0].port", "ports[0].protocol", "replicas", "selector.app"]
        );
        assert_eq!(view[&Path::parse("ports[0].port")], json!(80));
    }

    #[test]
    fn test_empty_containers_are_leaves() {
        let view = flatten(&json!({"securityContext": {}, "args": []}));
        assert_eq!(view[&Path::parse("securityContext")], json!({}));
        assert_eq!(view[&Path::parse("args")], json!([]));
        assert_eq!(view.len(), 2);
    }

    #[test]
    fn test_scalar_root_is_single_root_entry() {
        let view = flatten(&json!("plain"));
        assert_eq!(view.len(), 1);
        assert_eq!(view[&Path::root()], json!("plain"));
    }

    #[test]
    fn test_nested_sequences_use_chained_indices() {
        let view = flatten(&json!({"m": [[1, 2]]}));
        assert_eq!(keys(&view), vec!["m[0][0]", "m[0][1]"]);
    }
}

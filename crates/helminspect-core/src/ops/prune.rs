//! Ignore-path pruning.
//!
//! Removes the nodes addressed by a set of paths and collapses every
//! ancestor container that the removal left empty, so no `{"volumes": []}`
//! or `{"annotations": {}}` shells survive. Paths that do not resolve
//! (absent key, index out of range, key on a sequence, index on a map) are
//! skipped silently: ignore sets may mention paths a resource lacks.

use crate::model::{Path, PathSegment};
use serde_json::Value;
use std::collections::BTreeSet;

/// Return a copy of `tree` with `paths` pruned; `tree` is left untouched.
pub fn prune(tree: &Value, paths: &[Path]) -> Value {
    let mut pruned = tree.clone();
    prune_in_place(&mut pruned, paths);
    pruned
}

/// Prune `paths` from `tree` in place and return how many nodes were removed.
///
/// The paths are applied as a batch in descending structural order, so an
/// index always refers to the element's position before pruning started
/// (`items[1]` is removed before `items[0]`). A path lying below another
/// path of the batch is skipped, so it can never collapse that ancestor
/// ahead of time. The root itself is never removed.
pub fn prune_in_place(tree: &mut Value, paths: &[Path]) -> usize {
    let batch: BTreeSet<&Path> = paths.iter().filter(|p| !p.is_root()).collect();
    let ordered: Vec<&Path> = batch
        .iter()
        .rev()
        .filter(|path| !has_ancestor_in(path, &batch))
        .copied()
        .collect();

    let mut removed = 0;
    for path in ordered {
        if remove_at(tree, path.segments()) {
            tracing::trace!(path = %path, "pruned ignorable path");
            removed += 1;
        }
    }
    removed
}

/// Remove the node at `segments` below `node`.
///
/// On the way back up, any child that became an empty container is removed
/// from its parent as well.
fn remove_at(node: &mut Value, segments: &[PathSegment]) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };

    if rest.is_empty() {
        return match (node, head) {
            (Value::Object(map), PathSegment::Key(key)) => map.remove(key).is_some(),
            (Value::Array(items), PathSegment::Index(index)) if *index < items.len() => {
                items.remove(*index);
                true
            }
            _ => false,
        };
    }

    match (node, head) {
        (Value::Object(map), PathSegment::Key(key)) => {
            let Some(child) = map.get_mut(key) else {
                return false;
            };
            let removed = remove_at(child, rest);
            if removed && is_empty_container(child) {
                map.remove(key);
            }
            removed
        }
        (Value::Array(items), PathSegment::Index(index)) => {
            let Some(child) = items.get_mut(*index) else {
                return false;
            };
            let removed = remove_at(child, rest);
            if removed && is_empty_container(child) {
                items.remove(*index);
            }
            removed
        }
        _ => false,
    }
}

fn has_ancestor_in(path: &Path, batch: &BTreeSet<&Path>) -> bool {
    let segments = path.segments();
    (1..segments.len()).any(|len| {
        let ancestor = Path::from_segments(segments[..len].to_vec());
        batch.contains(&ancestor)
    })
}

fn is_empty_container(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

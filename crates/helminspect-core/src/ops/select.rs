//! Relevance selection: the part of a resource that is compared.

use crate::model::{Resource, ResourceKind};
use serde_json::{Map, Value};

/// Block holding the key/value payload of config-like kinds.
pub const DATA_BLOCK: &str = "data";
/// Block holding the desired state of workload-like kinds.
pub const SPEC_BLOCK: &str = "spec";

/// Extract the substructure of `resource` that is meaningful to compare
///
/// - `ConfigMap`, `Secret`: the `data` block
/// - `Deployment`, `Service`, `Ingress`: the `spec` block
/// - anything else: the whole body
///
/// A missing block selects as an empty map.
pub fn select_relevant(resource: &Resource) -> Value {
    match &resource.kind {
        ResourceKind::ConfigMap | ResourceKind::SecretMap => block(&resource.body, DATA_BLOCK),
        ResourceKind::Workload | ResourceKind::NetworkService | ResourceKind::IngressRoute => {
            block(&resource.body, SPEC_BLOCK)
        }
        ResourceKind::Other(_) => resource.body.clone(),
    }
}

fn block(body: &Value, key: &str) -> Value {
    body.get(key)
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource(kind: &str, body: Value) -> Resource {
        Resource::new(ResourceKind::from_platform(kind), "r", body)
    }

    #[test]
    fn test_config_map_selects_data() {
        let res = resource(
            "ConfigMap",
            json!({"metadata": {"resourceVersion": "7"}, "data": {"a": "1"}}),
        );
        assert_eq!(select_relevant(&res), json!({"a": "1"}));
    }

    #[test]
    fn test_deployment_selects_spec() {
        let res = resource(
            "Deployment",
            json!({"spec": {"replicas": 2}, "status": {"readyReplicas": 2}}),
        );
        assert_eq!(select_relevant(&res), json!({"replicas": 2}));
    }

    #[test]
    fn test_missing_block_is_empty_map() {
        let res = resource("Secret", json!({"metadata": {"name": "s"}}));
        assert_eq!(select_relevant(&res), json!({}));
    }

    #[test]
    fn test_other_kind_passes_through() {
        let body = json!({"kind": "StatefulSet", "spec": {"replicas": 1}, "status": {}});
        let res = resource("StatefulSet", body.clone());
        assert_eq!(select_relevant(&res), body);
    }
}

use crate::model::kind::ResourceKind;
use serde_json::Value;

/// Placeholder used when a document has no `kind` or `metadata.name`.
pub const UNKNOWN: &str = "Unknown";

/// One declared or live resource under comparison
///
/// `body` is the full document as fetched; relevance selection picks the
/// part that is compared.
#[derive(Debug, Clone, PartialEq)]
pub struct Resource {
    pub kind: ResourceKind,
    pub name: String,
    pub body: Value,
}

impl Resource {
    /// Create a resource from its parts
    pub fn new(kind: ResourceKind, name: impl Into<String>, body: Value) -> Self {
        Self {
            kind,
            name: name.into(),
            body,
        }
    }

    /// Build a resource from a parsed document
    ///
    /// Returns `None` for empty documents (`null`, or an empty object such as
    /// the ones produced by a trailing `---` in a manifest stream).
    pub fn from_document(body: Value) -> Option<Self> {
        match &body {
            Value::Null => return None,
            Value::Object(map) if map.is_empty() => return None,
            _ => {}
        }

        let kind = body
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN);
        let name = body
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
            .unwrap_or(UNKNOWN);

        Some(Self {
            kind: ResourceKind::from_platform(kind),
            name: name.to_string(),
            body,
        })
    }

    /// `(kind, name)` pairing key used to match declared and live resources
    pub fn identity(&self) -> (&ResourceKind, &str) {
        (&self.kind, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_document_reads_kind_and_name() {
        let res = Resource::from_document(json!({
            "kind": "Service",
            "metadata": {"name": "api"},
            "spec": {}
        }))
        .unwrap();
        assert_eq!(res.kind, ResourceKind::NetworkService);
        assert_eq!(res.name, "api");
    }

    #[test]
    fn test_from_document_defaults_to_unknown() {
        let res = Resource::from_document(json!({"spec": {"a": 1}})).unwrap();
        assert_eq!(res.kind, ResourceKind::Other(UNKNOWN.to_string()));
        assert_eq!(res.name, UNKNOWN);
    }

    #[test]
    fn test_empty_documents_are_skipped() {
        assert!(Resource::from_document(Value::Null).is_none());
        assert!(Resource::from_document(json!({})).is_none());
    }
}

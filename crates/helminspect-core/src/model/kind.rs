use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a declared or live resource
///
/// The five kinds the drift check understands are closed variants; any
/// other platform kind is carried verbatim in `Other` and passes through
/// relevance selection unfiltered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceKind {
    /// `Deployment`
    Workload,
    /// `Service`
    NetworkService,
    /// `Ingress`
    IngressRoute,
    /// `ConfigMap`
    ConfigMap,
    /// `Secret`
    SecretMap,
    /// Any other platform kind
    Other(String),
}

impl ResourceKind {
    /// Kinds that take part in drift comparison, in their platform spelling.
    pub const COMPARED: [ResourceKind; 5] = [
        ResourceKind::Workload,
        ResourceKind::NetworkService,
        ResourceKind::IngressRoute,
        ResourceKind::ConfigMap,
        ResourceKind::SecretMap,
    ];

    /// Map a platform kind string (`Deployment`, `Service`, ...) to a kind
    pub fn from_platform(kind: &str) -> Self {
        match kind {
            "Deployment" => ResourceKind::Workload,
            "Service" => ResourceKind::NetworkService,
            "Ingress" => ResourceKind::IngressRoute,
            "ConfigMap" => ResourceKind::ConfigMap,
            "Secret" => ResourceKind::SecretMap,
            other => ResourceKind::Other(other.to_string()),
        }
    }

    /// The platform spelling of this kind
    pub fn as_platform(&self) -> &str {
        match self {
            ResourceKind::Workload => "Deployment",
            ResourceKind::NetworkService => "Service",
            ResourceKind::IngressRoute => "Ingress",
            ResourceKind::ConfigMap => "ConfigMap",
            ResourceKind::SecretMap => "Secret",
            ResourceKind::Other(kind) => kind,
        }
    }

    /// Whether resources of this kind are compared during drift detection
    pub fn is_compared(&self) -> bool {
        match self {
            ResourceKind::Workload
            | ResourceKind::NetworkService
            | ResourceKind::IngressRoute
            | ResourceKind::ConfigMap
            | ResourceKind::SecretMap => true,
            ResourceKind::Other(_) => false,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_platform())
    }
}

impl From<String> for ResourceKind {
    fn from(kind: String) -> Self {
        ResourceKind::from_platform(&kind)
    }
}

impl From<&str> for ResourceKind {
    fn from(kind: &str) -> Self {
        ResourceKind::from_platform(kind)
    }
}

impl From<ResourceKind> for String {
    fn from(kind: ResourceKind) -> Self {
        kind.as_platform().to_string()
    }
}

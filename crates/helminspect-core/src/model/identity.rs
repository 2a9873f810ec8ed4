use serde::{Deserialize, Serialize};

/// Identity of one drift run: which release, where, on which cluster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunIdentity {
    pub release: String,
    pub namespace: String,
    pub cluster: String,
}

impl RunIdentity {
    pub fn new(
        release: impl Into<String>,
        namespace: impl Into<String>,
        cluster: impl Into<String>,
    ) -> Self {
        Self {
            release: release.into(),
            namespace: namespace.into(),
            cluster: cluster.into(),
        }
    }

    /// `<release>_<namespace>_<cluster>`, used to name persisted artifacts
    ///
    /// Path separators become `_`, so cluster names such as EKS ARNs
    /// (`arn:aws:eks:…:cluster/prod`) stay a single file name.
    pub fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.release, self.namespace, self.cluster)
            .replace(['/', '\\'], "_")
    }
}

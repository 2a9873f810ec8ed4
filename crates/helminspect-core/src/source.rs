//! Collaborator interfaces for declared and live state.
//!
//! The drift pipeline never fetches anything itself; it is handed a
//! [`ManifestSource`] and a [`LiveSource`]. The engine crate provides the
//! `helm`/`kubectl` backed implementations; the static ones here serve
//! tests and offline comparisons.

use crate::errors::Result;
use crate::model::{Resource, ResourceKind};
use std::collections::BTreeMap;

/// Supplies the declared resources of a release.
#[allow(clippy::result_large_err)]
pub trait ManifestSource {
    /// Fetch every declared resource of `release` in `namespace`, in manifest order.
    ///
    /// An empty vector means the release was not found.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidManifest` if the manifest cannot be parsed.
    fn fetch_declared(&self, release: &str, namespace: &str) -> Result<Vec<Resource>>;
}

/// Supplies the live state of a single resource.
#[allow(clippy::result_large_err)]
pub trait LiveSource {
    /// Fetch the live counterpart of `(kind, name)` in `namespace`.
    ///
    /// Absence is `Ok(None)`, never an error.
    ///
    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidManifest` if the live document cannot be parsed.
    fn fetch_live(
        &self,
        kind: &ResourceKind,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Resource>>;
}

/// In-memory manifest source keyed by `(release, namespace)`.
#[derive(Debug, Clone, Default)]
pub struct StaticManifestSource {
    releases: BTreeMap<(String, String), Vec<Resource>>,
}

impl StaticManifestSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the declared resources of a release
    pub fn with_release(
        mut self,
        release: impl Into<String>,
        namespace: impl Into<String>,
        resources: Vec<Resource>,
    ) -> Self {
        self.releases
            .insert((release.into(), namespace.into()), resources);
        self
    }
}

impl ManifestSource for StaticManifestSource {
    fn fetch_declared(&self, release: &str, namespace: &str) -> Result<Vec<Resource>> {
        Ok(self
            .releases
            .get(&(release.to_string(), namespace.to_string()))
            .cloned()
            .unwrap_or_default())
    }
}

/// In-memory live source; the namespace is not part of the key.
#[derive(Debug, Clone, Default)]
pub struct StaticLiveSource {
    resources: BTreeMap<(ResourceKind, String), Resource>,
}

impl StaticLiveSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a live resource
    pub fn with(mut self, resource: Resource) -> Self {
        self.insert(resource);
        self
    }

    pub fn insert(&mut self, resource: Resource) {
        self.resources
            .insert((resource.kind.clone(), resource.name.clone()), resource);
    }
}

impl FromIterator<Resource> for StaticLiveSource {
    fn from_iter<T: IntoIterator<Item = Resource>>(iter: T) -> Self {
        let mut source = Self::new();
        for resource in iter {
            source.insert(resource);
        }
        source
    }
}

impl LiveSource for StaticLiveSource {
    fn fetch_live(
        &self,
        kind: &ResourceKind,
        name: &str,
        _namespace: &str,
    ) -> Result<Option<Resource>> {
        Ok(self.resources.get(&(kind.clone(), name.to_string())).cloned())
    }
}

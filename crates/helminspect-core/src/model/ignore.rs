//! Ignore rules: structural paths excised before comparison.
//!
//! Rules come in two scopes:
//!
//! - kind-scoped (`Kind;path`): hand-maintained, applies to every resource of the kind
//! - name-scoped (`Kind;name;path`): learned by calibration, applies to one resource

use crate::errors::DriftError;
use crate::model::kind::ResourceKind;
use crate::model::path::Path;
use std::collections::BTreeSet;
use std::fmt;

/// System-injected fields that vary between a Helm manifest and the live
/// object on a stock cluster, used when no calibration snapshot exists.
pub const DEFAULT_IGNORABLE_KEYS: &[&str] = &[
    "Ingress;ingressClassName",
    "Deployment;template.metadata.creationTimestamp",
    "Deployment;template.spec.containers[0].terminationMessagePath",
    "Deployment;progressDeadlineSeconds",
    "Deployment;template.spec.schedulerName",
    "Deployment;revisionHistoryLimit",
    "Deployment;template.spec.securityContext",
    "Service;ipFamilyPolicy",
    "Service;clusterIPs[0]",
    "Deployment;template.spec.dnsPolicy",
    "Deployment;template.spec.terminationGracePeriodSeconds",
    "Deployment;template.spec.volumes[0].configMap.defaultMode",
    "Deployment;strategy.rollingUpdate.maxUnavailable",
    "Service;ipFamilies[0]",
    "Service;sessionAffinity",
    "Deployment;template.spec.restartPolicy",
    "Deployment;strategy.type",
    "Service;clusterIP",
    "Service;internalTrafficPolicy",
    "Deployment;template.spec.containers[0].terminationMessagePolicy",
    "Deployment;strategy.rollingUpdate.maxSurge",
    "Deployment;template.spec.containers[0].resources",
    "Deployment;template.spec.containers[0].ports[0].protocol",
];

/// A single ignorable path, scoped by kind and optionally by resource name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IgnoreRule {
    pub kind: ResourceKind,
    pub name: Option<String>,
    pub path: Path,
}

impl IgnoreRule {
    /// Rule applying to every resource of `kind`
    pub fn for_kind(kind: ResourceKind, path: Path) -> Self {
        Self {
            kind,
            name: None,
            path,
        }
    }

    /// Rule applying only to the resource `(kind, name)`
    pub fn for_resource(kind: ResourceKind, name: impl Into<String>, path: Path) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            path,
        }
    }

    /// Parse a hand-authored `Kind;path` entry
    pub fn parse_kind_scoped(entry: &str) -> Result<Self, DriftError> {
        match entry.split_once(';') {
            Some((kind, path)) if !kind.is_empty() => Ok(Self::for_kind(
                ResourceKind::from_platform(kind),
                Path::parse(path),
            )),
            _ => Err(DriftError::InvalidIgnoreRule {
                entry: entry.to_string(),
            }),
        }
    }

    /// Parse a calibration-learned `Kind;name;path` entry
    pub fn parse_name_scoped(entry: &str) -> Result<Self, DriftError> {
        let mut parts = entry.splitn(3, ';');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(kind), Some(name), Some(path)) if !kind.is_empty() => Ok(Self::for_resource(
                ResourceKind::from_platform(kind),
                name,
                Path::parse(path),
            )),
            _ => Err(DriftError::InvalidIgnoreRule {
                entry: entry.to_string(),
            }),
        }
    }

    /// Whether this rule applies to the resource `(kind, name)`
    pub fn applies_to(&self, kind: &ResourceKind, name: &str) -> bool {
        &self.kind == kind && self.name.as_deref().map_or(true, |n| n == name)
    }
}

impl fmt::Display for IgnoreRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{};{};{}", self.kind, name, self.path),
            None => write!(f, "{};{}", self.kind, self.path),
        }
    }
}

/// A set of ignore rules injected into a drift run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IgnoreSet {
    rules: BTreeSet<IgnoreRule>,
}

impl IgnoreSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in kind-scoped defaults
    pub fn defaults() -> Self {
        DEFAULT_IGNORABLE_KEYS
            .iter()
            .filter_map(|entry| IgnoreRule::parse_kind_scoped(entry).ok())
            .collect()
    }

    /// Build a set from learned `Kind;name;path` entries, skipping malformed ones
    pub fn from_learned<'a>(entries: impl IntoIterator<Item = &'a str>) -> Self {
        let mut set = Self::new();
        for entry in entries {
            match IgnoreRule::parse_name_scoped(entry) {
                Ok(rule) => set.insert(rule),
                Err(err) => tracing::warn!(entry, "skipping ignore entry: {}", err),
            }
        }
        set
    }

    pub fn insert(&mut self, rule: IgnoreRule) {
        self.rules.insert(rule);
    }

    pub fn extend(&mut self, other: IgnoreSet) {
        self.rules.extend(other.rules);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IgnoreRule> {
        self.rules.iter()
    }

    /// Paths to prune from the resource `(kind, name)`
    pub fn paths_for(&self, kind: &ResourceKind, name: &str) -> Vec<Path> {
        let paths: BTreeSet<&Path> = self
            .rules
            .iter()
            .filter(|rule| rule.applies_to(kind, name))
            .map(|rule| &rule.path)
            .collect();
        paths.into_iter().cloned().collect()
    }

    /// String forms of all rules, in set order
    pub fn to_entries(&self) -> Vec<String> {
        self.rules.iter().map(ToString::to_string).collect()
    }
}

impl FromIterator<IgnoreRule> for IgnoreSet {
    fn from_iter<T: IntoIterator<Item = IgnoreRule>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_parse_completely() {
        assert_eq!(IgnoreSet::defaults().len(), DEFAULT_IGNORABLE_KEYS.len());
    }

    #[test]
    fn test_kind_scoped_rule_applies_to_every_name() {
        let set = IgnoreSet::defaults();
        let paths = set.paths_for(&ResourceKind::NetworkService, "anything");
        assert!(paths.contains(&Path::parse("clusterIP")));
        assert!(set
            .paths_for(&ResourceKind::ConfigMap, "anything")
            .is_empty());
    }

    #[test]
    fn test_name_scoped_rule_is_confined_to_its_resource() {
        let set = IgnoreSet::from_learned(["Deployment;web;template.spec.dnsPolicy"]);
        assert_eq!(set.paths_for(&ResourceKind::Workload, "web").len(), 1);
        assert!(set.paths_for(&ResourceKind::Workload, "worker").is_empty());
    }

    #[test]
    fn test_rule_display_round_trips() {
        let entry = "Service;api;metadata.annotations.example.com/hash";
        let rule = IgnoreRule::parse_name_scoped(entry).unwrap();
        assert_eq!(rule.to_string(), entry);
    }

    #[test]
    fn test_malformed_entries() {
        assert!(IgnoreRule::parse_kind_scoped("no-separator").is_err());
        assert!(IgnoreRule::parse_name_scoped("Deployment;only-two").is_err());
        let set = IgnoreSet::from_learned(["garbage", "ConfigMap;cfg;a"]);
        assert_eq!(set.len(), 1);
    }
}

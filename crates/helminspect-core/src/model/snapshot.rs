//! Calibration snapshot model.

use crate::model::identity::RunIdentity;
use crate::model::ignore::IgnoreSet;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Age in days after which a snapshot triggers a recalibration warning.
pub const STALE_AFTER_DAYS: i64 = 30;

/// Drift-prone paths learned right after a clean install
///
/// Persisted once per calibration run and replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationSnapshot {
    #[serde(deserialize_with = "deserialize_utc")]
    pub date: DateTime<Utc>,
    pub release: String,
    pub namespace: String,
    pub cluster: String,
    pub ignorable_keys: Vec<String>,
}

impl CalibrationSnapshot {
    pub fn new(identity: &RunIdentity, date: DateTime<Utc>, ignore: &IgnoreSet) -> Self {
        Self {
            date,
            release: identity.release.clone(),
            namespace: identity.namespace.clone(),
            cluster: identity.cluster.clone(),
            ignorable_keys: ignore.to_entries(),
        }
    }

    /// Whole days elapsed since the snapshot was taken
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.date).num_days()
    }

    /// Advisory only: stale snapshots are still used
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        self.age_days(now) > STALE_AFTER_DAYS
    }

    /// The learned name-scoped ignore set
    pub fn ignore_set(&self) -> IgnoreSet {
        IgnoreSet::from_learned(self.ignorable_keys.iter().map(String::as_str))
    }
}

/// Accept RFC 3339 timestamps, and offset-less ISO-8601 ones read as UTC.
fn deserialize_utc<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(date) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    fn snapshot_at(date: DateTime<Utc>) -> CalibrationSnapshot {
        CalibrationSnapshot {
            date,
            release: "web".to_string(),
            namespace: "prod".to_string(),
            cluster: "kind-dev".to_string(),
            ignorable_keys: vec!["Deployment;web;template.spec.dnsPolicy".to_string()],
        }
    }

    #[test]
    fn test_staleness_threshold() {
        let now = Utc::now();
        assert!(!snapshot_at(now - Duration::days(30)).is_stale(now));
        assert!(snapshot_at(now - Duration::days(31)).is_stale(now));
    }

    #[test]
    fn test_accepts_naive_timestamp() {
        let snapshot: CalibrationSnapshot = serde_json::from_value(json!({
            "date": "2025-03-01T12:30:00.123456",
            "release": "web",
            "namespace": "prod",
            "cluster": "kind-dev",
            "ignorable_keys": []
        }))
        .unwrap();
        assert_eq!(snapshot.date.to_rfc3339(), "2025-03-01T12:30:00.123456+00:00");
    }

    #[test]
    fn test_ignore_set_is_name_scoped() {
        let set = snapshot_at(Utc::now()).ignore_set();
        assert_eq!(set.len(), 1);
        assert!(set.iter().all(|rule| rule.name.as_deref() == Some("web")));
    }
}

//! Health statuses reported per namespace.

use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;

/// Health of an entity or namespace.
///
/// Variants are declared from least to most severe, so `Ord` ranks by
/// severity and `max()` picks the worst status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealthStatus {
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "NA"))]
    NotAvailable,
    Healthy,
    #[cfg_attr(feature = "serde", serde(rename = "Not Ready"))]
    NotReady,
    Degraded,
    Failure,
}

impl HealthStatus {
    /// All statuses, most severe first.
    pub const BY_PRIORITY: [HealthStatus; 5] = [
        HealthStatus::Failure,
        HealthStatus::Degraded,
        HealthStatus::NotReady,
        HealthStatus::Healthy,
        HealthStatus::NotAvailable,
    ];

    /// Rollup priority: 1 is the most severe, 5 the least.
    pub fn priority(&self) -> u8 {
        match self {
            HealthStatus::Failure => 1,
            HealthStatus::Degraded => 2,
            HealthStatus::NotReady => 3,
            HealthStatus::Healthy => 4,
            HealthStatus::NotAvailable => 5,
        }
    }

    /// Parse the status string the backend calculates.
    ///
    /// Anything unrecognized, including `"NA"`, means no health information.
    pub fn from_backend(status: &str) -> Self {
        match status {
            "Healthy" => HealthStatus::Healthy,
            "Degraded" => HealthStatus::Degraded,
            "Failure" => HealthStatus::Failure,
            "Not Ready" => HealthStatus::NotReady,
            _ => HealthStatus::NotAvailable,
        }
    }

    /// The backend spelling of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            HealthStatus::Failure => "Failure",
            HealthStatus::Degraded => "Degraded",
            HealthStatus::NotReady => "Not Ready",
            HealthStatus::Healthy => "Healthy",
            HealthStatus::NotAvailable => "NA",
        }
    }
}

/// Health of one namespace, broken down by dimension.
///
/// Each map goes from entity name (app, service or workload) to the status
/// the backend calculated for it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct NamespaceHealth {
    pub app_health: BTreeMap<String, HealthStatus>,
    pub service_health: BTreeMap<String, HealthStatus>,
    pub workload_health: BTreeMap<String, HealthStatus>,
}

impl NamespaceHealth {
    pub fn is_empty(&self) -> bool {
        self.app_health.is_empty() && self.service_health.is_empty() && self.workload_health.is_empty()
    }
}

/// Entities of one health dimension bucketed by status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct NamespaceStatus {
    pub in_error: Vec<String>,
    pub in_warning: Vec<String>,
    pub in_not_ready: Vec<String>,
    pub in_success: Vec<String>,
    pub not_available: Vec<String>,
}

impl NamespaceStatus {
    /// File an entity under the bucket for its status.
    pub fn push(&mut self, entity: impl Into<String>, status: HealthStatus) {
        self.bucket_mut(status).push(entity.into());
    }

    /// Entities filed under a status.
    pub fn bucket(&self, status: HealthStatus) -> &[String] {
        match status {
            HealthStatus::Failure => &self.in_error,
            HealthStatus::Degraded => &self.in_warning,
            HealthStatus::NotReady => &self.in_not_ready,
            HealthStatus::Healthy => &self.in_success,
            HealthStatus::NotAvailable => &self.not_available,
        }
    }

    fn bucket_mut(&mut self, status: HealthStatus) -> &mut Vec<String> {
        match status {
            HealthStatus::Failure => &mut self.in_error,
            HealthStatus::Degraded => &mut self.in_warning,
            HealthStatus::NotReady => &mut self.in_not_ready,
            HealthStatus::Healthy => &mut self.in_success,
            HealthStatus::NotAvailable => &mut self.not_available,
        }
    }

    pub fn is_empty(&self) -> bool {
        HealthStatus::BY_PRIORITY
            .iter()
            .all(|status| self.bucket(*status).is_empty())
    }

    /// Total number of entities across all buckets.
    pub fn len(&self) -> usize {
        HealthStatus::BY_PRIORITY
            .iter()
            .map(|status| self.bucket(*status).len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(HealthStatus::Failure > HealthStatus::Degraded);
        assert!(HealthStatus::Degraded > HealthStatus::NotReady);
        assert!(HealthStatus::NotReady > HealthStatus::Healthy);
        assert!(HealthStatus::Healthy > HealthStatus::NotAvailable);
    }

    #[test]
    fn test_priority_matches_ordering() {
        for pair in HealthStatus::BY_PRIORITY.windows(2) {
            assert!(pair[0] > pair[1]);
            assert!(pair[0].priority() < pair[1].priority());
        }
    }

    #[test]
    fn test_from_backend() {
        assert_eq!(HealthStatus::from_backend("Not Ready"), HealthStatus::NotReady);
        assert_eq!(HealthStatus::from_backend("Failure"), HealthStatus::Failure);
        assert_eq!(HealthStatus::from_backend("NA"), HealthStatus::NotAvailable);
        assert_eq!(HealthStatus::from_backend("bogus"), HealthStatus::NotAvailable);
    }

    #[test]
    fn test_namespace_status_buckets() {
        let mut status = NamespaceStatus::default();
        assert!(status.is_empty());

        status.push("reviews", HealthStatus::Degraded);
        status.push("ratings", HealthStatus::Healthy);

        assert_eq!(status.len(), 2);
        assert_eq!(status.in_warning, ["reviews"]);
        assert_eq!(status.bucket(HealthStatus::Healthy), ["ratings"]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&HealthStatus::NotReady).unwrap();
        assert_eq!(json, "\"Not Ready\"");
        let parsed: HealthStatus = serde_json::from_str("\"NA\"").unwrap();
        assert_eq!(parsed, HealthStatus::NotAvailable);
    }
}

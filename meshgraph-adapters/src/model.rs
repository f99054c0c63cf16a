//! Wire model of the console's cluster health response.
//!
//! ```json
//! {
//!   "namespaceAppHealth": {
//!     "bookinfo": { "reviews": { "status": { "status": "Degraded", "errorRatio": 0.12 } } }
//!   },
//!   "namespaceServiceHealth": { ... },
//!   "namespaceWorkloadHealth": { ... }
//! }
//! ```
//!
//! Entities carry far more than the calculated status (replica counts,
//! request histograms); only the status is kept.

use std::collections::BTreeMap;

use meshgraph_types::HealthStatus;
use serde::Deserialize;

use crate::{AdapterError, HealthMap};

type EntityMap = BTreeMap<String, Option<EntityHealth>>;

/// Body of `GET /api/clusters/health`.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClustersHealth {
    pub namespace_app_health: BTreeMap<String, EntityMap>,
    pub namespace_service_health: BTreeMap<String, EntityMap>,
    pub namespace_workload_health: BTreeMap<String, EntityMap>,
}

/// Health of one app, service or workload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EntityHealth {
    pub status: Option<CalculatedStatus>,
}

/// Status the backend pre-calculated for an entity.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculatedStatus {
    pub status: String,
    #[serde(default)]
    pub error_ratio: Option<f64>,
}

impl EntityHealth {
    fn health_status(&self) -> HealthStatus {
        self.status
            .as_ref()
            .map(|s| HealthStatus::from_backend(&s.status))
            .unwrap_or_default()
    }
}

impl ClustersHealth {
    /// Parse a response body.
    pub fn from_json(body: &str) -> Result<Self, AdapterError> {
        Ok(serde_json::from_str(body)?)
    }

    /// Fold the three dimension maps into one `NamespaceHealth` per namespace.
    pub fn into_namespace_health(self) -> HealthMap {
        let mut result = HealthMap::new();

        for (ns, entities) in self.namespace_app_health {
            result.entry(ns).or_default().app_health = statuses(entities);
        }
        for (ns, entities) in self.namespace_service_health {
            result.entry(ns).or_default().service_health = statuses(entities);
        }
        for (ns, entities) in self.namespace_workload_health {
            result.entry(ns).or_default().workload_health = statuses(entities);
        }

        result
    }
}

fn statuses(entities: EntityMap) -> BTreeMap<String, HealthStatus> {
    entities
        .into_iter()
        .map(|(name, health)| {
            let status = health
                .as_ref()
                .map(EntityHealth::health_status)
                .unwrap_or_default();
            (name, status)
        })
        .collect()
}

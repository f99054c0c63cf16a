//! The health fetch contract.

use std::collections::BTreeMap;
use std::time::Duration;

use async_trait::async_trait;
use meshgraph_types::NamespaceHealth;

use crate::AdapterError;

/// Health keyed by namespace name.
pub type HealthMap = BTreeMap<String, NamespaceHealth>;

/// Fetches namespace health from the backend.
///
/// Called once per chunk of namespaces. Implementations return the health
/// of every namespace they know about in the chunk; namespaces without data
/// may be omitted.
#[async_trait]
pub trait HealthFetcher: Send + Sync {
    /// Fetch health for `namespaces` over a rate window of `duration`,
    /// optionally scoped to one cluster.
    async fn fetch_health(
        &self,
        namespaces: &[String],
        duration: Duration,
        cluster: Option<&str>,
    ) -> Result<HealthMap, AdapterError>;
}


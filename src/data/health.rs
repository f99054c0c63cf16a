//! Namespace health: chunked fetching and worst-status rollup.
//!
//! Health for an arbitrary number of namespaces is fetched in chunks of at
//! most [`MAX_NAMESPACES_PER_CALL`] so request URIs stay bounded. All chunk
//! requests are issued together and awaited jointly; chunks are disjoint, so
//! merging is order-independent. A failed chunk fails the whole fetch.
//!
//! Each namespace's app, service and workload breakdowns reduce to one
//! status, the most severe one found in any of them.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::try_join_all;
use meshgraph_adapters::{HealthFetcher, HealthMap};
use meshgraph_types::{HealthStatus, NamespaceHealth, NamespaceStatus};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::GraphError;

/// Largest namespace list sent in one request.
pub const MAX_NAMESPACES_PER_CALL: usize = 100;

/// Fetch health for `namespaces`, chunked at [`MAX_NAMESPACES_PER_CALL`].
pub async fn fetch_namespace_health<F>(
    fetcher: &F,
    namespaces: &[String],
    duration: Duration,
    cluster: Option<&str>,
) -> Result<HealthMap, GraphError>
where
    F: HealthFetcher + ?Sized,
{
    fetch_chunked(fetcher, namespaces, duration, cluster, MAX_NAMESPACES_PER_CALL).await
}

async fn fetch_chunked<F>(
    fetcher: &F,
    namespaces: &[String],
    duration: Duration,
    cluster: Option<&str>,
    chunk_size: usize,
) -> Result<HealthMap, GraphError>
where
    F: HealthFetcher + ?Sized,
{
    if namespaces.is_empty() {
        return Ok(HealthMap::new());
    }

    let chunks: Vec<&[String]> = namespaces.chunks(chunk_size.max(1)).collect();
    debug!(
        namespaces = namespaces.len(),
        chunks = chunks.len(),
        "Fetching namespace health"
    );

    let responses = try_join_all(
        chunks
            .into_iter()
            .map(|chunk| fetcher.fetch_health(chunk, duration, cluster)),
    )
    .await?;

    let mut merged = HealthMap::new();
    for response in responses {
        merged.extend(response);
    }
    Ok(merged)
}

/// Bucket one dimension's entities by status.
pub fn namespace_status(entities: &BTreeMap<String, HealthStatus>) -> NamespaceStatus {
    let mut status = NamespaceStatus::default();
    for (entity, health) in entities {
        status.push(entity.clone(), *health);
    }
    status
}

/// The most severe status present in any of the breakdowns.
///
/// Every breakdown is examined before deciding; with nothing to go on the
/// result is `NotAvailable`.
pub fn worst_status(
    app: Option<&NamespaceStatus>,
    service: Option<&NamespaceStatus>,
    workload: Option<&NamespaceStatus>,
) -> HealthStatus {
    let breakdowns = [app, service, workload];

    HealthStatus::BY_PRIORITY
        .into_iter()
        .find(|status| {
            breakdowns
                .iter()
                .flatten()
                .any(|breakdown| !breakdown.bucket(*status).is_empty())
        })
        .unwrap_or(HealthStatus::NotAvailable)
}

/// One namespace's bucketed breakdowns and the status they reduce to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamespaceRollup {
    pub status: HealthStatus,
    pub app: NamespaceStatus,
    pub service: NamespaceStatus,
    pub workload: NamespaceStatus,
}

impl NamespaceRollup {
    pub fn from_health(health: &NamespaceHealth) -> Self {
        let app = namespace_status(&health.app_health);
        let service = namespace_status(&health.service_health);
        let workload = namespace_status(&health.workload_health);

        Self {
            status: worst_status(Some(&app), Some(&service), Some(&workload)),
            app,
            service,
            workload,
        }
    }
}

/// Roll up every namespace of a fetch result.
pub fn rollup(health: &HealthMap) -> BTreeMap<String, NamespaceRollup> {
    health
        .iter()
        .map(|(ns, health)| (ns.clone(), NamespaceRollup::from_health(health)))
        .collect()
}

/// Whether the view that started a refresh still wants its result.
///
/// Cloned into every in-flight refresh. Flips to dead when the matching
/// [`LivenessGuard`] is dropped.
#[derive(Debug, Clone)]
pub struct Liveness(Arc<AtomicBool>);

impl Liveness {
    /// A live flag and the guard that owns its lifetime.
    pub fn new() -> (Self, LivenessGuard) {
        let flag = Arc::new(AtomicBool::new(true));
        (Self(flag.clone()), LivenessGuard(flag))
    }

    pub fn is_live(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Marks the owning view torn down when dropped.
#[derive(Debug)]
pub struct LivenessGuard(Arc<AtomicBool>);

impl Drop for LivenessGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// What became of a refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Results were published for this many namespaces.
    Published(usize),
    /// The view was torn down before the fetch resolved.
    Discarded,
}

/// Fetches namespace health for one view and publishes it on a watch channel.
#[derive(Debug)]
pub struct NamespaceHealthAggregator<F> {
    fetcher: F,
    chunk_size: usize,
    duration: Duration,
    cluster: Option<String>,
}

impl<F: HealthFetcher> NamespaceHealthAggregator<F> {
    pub fn new(fetcher: F, duration: Duration) -> Self {
        Self {
            fetcher,
            chunk_size: MAX_NAMESPACES_PER_CALL,
            duration,
            cluster: None,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_cluster(mut self, cluster: Option<String>) -> Self {
        self.cluster = cluster;
        self
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch and merge health for `namespaces`.
    pub async fn fetch(&self, namespaces: &[String]) -> Result<HealthMap, GraphError> {
        fetch_chunked(
            &self.fetcher,
            namespaces,
            self.duration,
            self.cluster.as_deref(),
            self.chunk_size,
        )
        .await
    }

    /// Fetch, then publish to `sender` unless the view has been torn down.
    ///
    /// Nothing is published on failure; the previous value stays visible
    /// and the error is returned for the caller to surface.
    pub async fn refresh(
        &self,
        namespaces: &[String],
        liveness: &Liveness,
        sender: &watch::Sender<HealthMap>,
    ) -> Result<RefreshOutcome, GraphError> {
        let result = self.fetch(namespaces).await;

        if !liveness.is_live() {
            info!("View torn down before health fetch resolved, discarding");
            return Ok(RefreshOutcome::Discarded);
        }

        let health = result?;
        let count = health.len();
        sender.send_replace(health);
        Ok(RefreshOutcome::Published(count))
    }
}

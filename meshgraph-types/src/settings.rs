//! Display settings - per-view configuration supplied by the console.

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use crate::CLUSTER_DEFAULT;

/// Which entities the graph is built around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GraphType {
    App,
    Service,
    #[default]
    VersionedApp,
    Workload,
}

/// What an edge label shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EdgeLabelMode {
    /// Request, message or byte rate, with the error percentage when non-zero.
    TrafficRate,
    /// Response time.
    ResponseTime,
    /// Throughput in bytes/s.
    Throughput,
    /// Share of the source's requests carried by the edge.
    TrafficDistribution,
}

/// Global settings for one graph view.
///
/// Read-only to the topology core; lives as long as the view does.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DisplaySettings {
    /// Namespaces selected in the console.
    pub active_namespaces: Vec<String>,
    /// Cluster the console runs in; nodes from other clusters get a suffix.
    pub home_cluster: String,
    pub graph_type: GraphType,
    /// Show the missing-sidecar badge.
    pub show_missing_sidecars: bool,
    /// Show circuit breaker, virtual service, gateway and traffic source badges.
    pub show_virtual_services: bool,
    pub edge_labels: Vec<EdgeLabelMode>,
    /// Label grpc edges with request rates (`rps`) rather than message rates (`mps`).
    pub grpc_request_rates: bool,
    /// Maximum number of hostnames listed for a node before truncating.
    pub max_hosts: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            active_namespaces: Vec::new(),
            home_cluster: CLUSTER_DEFAULT.to_string(),
            graph_type: GraphType::default(),
            show_missing_sidecars: true,
            show_virtual_services: true,
            edge_labels: vec![EdgeLabelMode::TrafficRate],
            grpc_request_rates: true,
            max_hosts: 5,
        }
    }
}

impl DisplaySettings {
    /// Whether the view spans more than one namespace.
    pub fn is_multi_namespace(&self) -> bool {
        self.active_namespaces.len() > 1
    }
}

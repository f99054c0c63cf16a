//! TopologySnapshot - the graph delivered by one telemetry refresh.

use alloc::string::String;
use alloc::vec::Vec;

use crate::{EdgeRecord, NodeRecord, NodeRecordBuilder, NodeType, Protocol};

/// A point-in-time traffic graph.
///
/// This is the top-level type handed over by the backend on every refresh.
/// It is read-only input: consumers derive view models from it and discard
/// it on the next refresh.
///
/// # Example
///
/// ```rust
/// use meshgraph_types::{NodeType, Protocol, TopologySnapshot};
///
/// let snapshot = TopologySnapshot::builder()
///     .timestamp_ms(1703160000000)
///     .node("a", NodeType::Workload, |n| n.namespace("default").workload("a-v1"))
///     .node("b", NodeType::Workload, |n| n.namespace("default").workload("b-v1"))
///     .edge("a-b-http", "a", "b", Protocol::Http, 3.0)
///     .edge("a-b-tcp", "a", "b", Protocol::Tcp, 2048.0)
///     .build();
///
/// assert_eq!(snapshot.edges.len(), 2);
/// assert_eq!(snapshot.total_rate(Protocol::Tcp), 2048.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct TopologySnapshot {
    /// Unix timestamp in milliseconds of the telemetry window end.
    pub timestamp_ms: u64,
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
}

impl TopologySnapshot {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder for constructing snapshots.
    pub fn builder() -> TopologySnapshotBuilder {
        TopologySnapshotBuilder::new()
    }

    /// Check if the snapshot has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Number of nodes in the snapshot.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Find a node by id.
    pub fn node(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Total rate across edges of a protocol.
    pub fn total_rate(&self, protocol: Protocol) -> f64 {
        self.edges
            .iter()
            .filter(|e| e.protocol == protocol && e.rate.is_finite())
            .map(|e| e.rate)
            .sum()
    }
}

/// Builder for constructing `TopologySnapshot` instances.
#[derive(Debug, Default)]
pub struct TopologySnapshotBuilder {
    timestamp_ms: u64,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl TopologySnapshotBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the snapshot timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = ts;
        self
    }

    /// Add a node built using a closure.
    pub fn node<F>(mut self, id: impl Into<String>, node_type: NodeType, f: F) -> Self
    where
        F: FnOnce(NodeRecordBuilder) -> NodeRecordBuilder,
    {
        self.nodes.push(f(NodeRecordBuilder::new(id, node_type)).build());
        self
    }

    /// Add a pre-built node.
    pub fn node_record(mut self, node: NodeRecord) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add an edge.
    pub fn edge(
        mut self,
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        protocol: Protocol,
        rate: f64,
    ) -> Self {
        self.edges
            .push(EdgeRecord::new(id, source, target, protocol, rate));
        self
    }

    /// Add a pre-built edge.
    pub fn edge_record(mut self, edge: EdgeRecord) -> Self {
        self.edges.push(edge);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> TopologySnapshot {
        TopologySnapshot {
            timestamp_ms: self.timestamp_ms,
            nodes: self.nodes,
            edges: self.edges,
        }
    }
}

//! The backend's graph payload.
//!
//! The console API serves the graph in a cytoscape-style envelope where
//! every node and edge wraps its attributes in a `data` object. Edge traffic
//! rates arrive as strings keyed by protocol:
//!
//! ```json
//! {
//!   "timestamp": 1703160000,
//!   "duration": 600,
//!   "graphType": "versionedApp",
//!   "elements": {
//!     "nodes": [{ "data": { "id": "n0", "nodeType": "app", "app": "reviews" } }],
//!     "edges": [{ "data": {
//!       "id": "e0", "source": "n0", "target": "n1",
//!       "traffic": { "protocol": "http", "rates": { "http": "12.5", "httpPercentErr": "1.2" } }
//!     } }]
//!   }
//! }
//! ```
//!
//! A rate that is present but unparseable becomes NaN so the edge simply
//! does not animate; a missing rate is zero.

use std::collections::BTreeMap;

use meshgraph_types::{EdgeRecord, GraphType, NodeRecord, Protocol, TopologySnapshot};
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::error::GraphError;

/// Top-level graph response.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GraphPayload {
    /// Unix timestamp in seconds of the telemetry window end.
    pub timestamp: u64,
    /// Telemetry window in seconds.
    pub duration: u64,
    pub graph_type: Option<GraphType>,
    pub elements: Elements,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Elements {
    pub nodes: Vec<Element<NodeRecord>>,
    pub edges: Vec<Element<EdgeData>>,
}

#[derive(Debug, Deserialize)]
pub struct Element<T> {
    pub data: T,
}

/// Edge attributes as sent by the backend.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeData {
    pub id: String,
    pub source: String,
    pub target: String,
    pub response_time: Option<Value>,
    pub throughput: Option<Value>,
    pub traffic: Option<EdgeTraffic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EdgeTraffic {
    pub protocol: String,
    pub rates: BTreeMap<String, Value>,
}

impl GraphPayload {
    pub fn from_json(json: &str) -> Result<Self, GraphError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn into_snapshot(self) -> TopologySnapshot {
        TopologySnapshot {
            timestamp_ms: self.timestamp.saturating_mul(1000),
            nodes: self.elements.nodes.into_iter().map(|e| e.data).collect(),
            edges: self
                .elements
                .edges
                .into_iter()
                .map(|e| e.data.into_record())
                .collect(),
        }
    }
}

/// Parse a graph payload straight into a snapshot.
pub fn parse_graph(json: &str) -> Result<TopologySnapshot, GraphError> {
    GraphPayload::from_json(json).map(GraphPayload::into_snapshot)
}

impl EdgeData {
    fn into_record(self) -> EdgeRecord {
        let traffic = self.traffic.unwrap_or_default();
        let protocol = parse_protocol(&self.id, &traffic.protocol);
        let key = protocol.as_str();

        let rate = |name: &str| traffic.rates.get(name).map(number);

        EdgeRecord {
            rate: rate(key).unwrap_or(0.0),
            percent_err: rate(&format!("{}PercentErr", key)),
            percent_req: rate(&format!("{}PercentReq", key)),
            response_time: self.response_time.as_ref().map(number),
            throughput: self.throughput.as_ref().map(number),
            id: self.id,
            source: self.source,
            target: self.target,
            protocol,
        }
    }
}

fn parse_protocol(edge_id: &str, protocol: &str) -> Protocol {
    match protocol {
        "http" | "" => Protocol::Http,
        "grpc" => Protocol::Grpc,
        "tcp" => Protocol::Tcp,
        other => {
            warn!(edge = edge_id, protocol = other, "Unknown protocol, treating as http");
            Protocol::Http
        }
    }
}

/// A number the backend may have sent as a string.
fn number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => s.trim().parse().unwrap_or(f64::NAN),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meshgraph_types::{BoxKind, NodeType};

    const GRAPH: &str = r#"{
        "timestamp": 1703160000,
        "duration": 600,
        "graphType": "versionedApp",
        "elements": {
            "nodes": [
                { "data": { "id": "box0", "nodeType": "box", "isBox": "app", "app": "reviews", "namespace": "bookinfo" } },
                { "data": { "id": "n0", "nodeType": "app", "cluster": "east", "namespace": "bookinfo",
                            "app": "reviews", "version": "v1", "workload": "reviews-v1", "parent": "box0",
                            "hasVS": { "hostnames": ["reviews"] }, "hasRequestRouting": true,
                            "isOutOfMesh": true, "healthData": { "ignored": true } } },
                { "data": { "id": "n1", "nodeType": "service", "namespace": "bookinfo", "service": "ratings",
                            "isServiceEntry": { "location": "MESH_EXTERNAL", "hosts": ["ratings.ext"] } } },
                { "data": { "id": "n2", "nodeType": "mystery" } }
            ],
            "edges": [
                { "data": { "id": "e0", "source": "n0", "target": "n1", "responseTime": "42.5",
                            "traffic": { "protocol": "http",
                                         "rates": { "http": "12.5", "httpPercentErr": "1.2", "httpPercentReq": "80.0" } } } },
                { "data": { "id": "e1", "source": "n0", "target": "n1",
                            "traffic": { "protocol": "tcp", "rates": { "tcp": "oops" } } } },
                { "data": { "id": "e2", "source": "n1", "target": "n2" } }
            ]
        }
    }"#;

    #[test]
    fn test_parse_graph_nodes() {
        let snapshot = parse_graph(GRAPH).unwrap();

        assert_eq!(snapshot.timestamp_ms, 1703160000000);
        assert_eq!(snapshot.nodes.len(), 4);

        let app_box = snapshot.node("box0").unwrap();
        assert_eq!(app_box.node_type, NodeType::Box);
        assert_eq!(app_box.is_box, Some(BoxKind::App));

        let reviews = snapshot.node("n0").unwrap();
        assert_eq!(reviews.cluster, "east");
        assert_eq!(reviews.parent.as_deref(), Some("box0"));
        assert!(reviews.has_missing_sidecar);
        assert!(reviews.has_traffic_scenario());
        assert_eq!(reviews.has_vs.as_ref().unwrap().iter().collect::<Vec<_>>(), ["reviews"]);

        let ratings = snapshot.node("n1").unwrap();
        assert_eq!(ratings.is_service_entry.as_ref().unwrap().location, "MESH_EXTERNAL");

        assert_eq!(snapshot.node("n2").unwrap().node_type, NodeType::Unrecognized);
    }

    #[test]
    fn test_parse_graph_edges() {
        let snapshot = parse_graph(GRAPH).unwrap();
        assert_eq!(snapshot.edges.len(), 3);

        let http = &snapshot.edges[0];
        assert_eq!(http.protocol, Protocol::Http);
        assert_eq!(http.rate, 12.5);
        assert_eq!(http.percent_err, Some(1.2));
        assert_eq!(http.percent_req, Some(80.0));
        assert_eq!(http.response_time, Some(42.5));

        let tcp = &snapshot.edges[1];
        assert_eq!(tcp.protocol, Protocol::Tcp);
        assert!(tcp.rate.is_nan());
        assert!(!tcp.has_traffic());

        let idle = &snapshot.edges[2];
        assert_eq!(idle.rate, 0.0);
        assert_eq!(idle.percent_err, None);
    }

    #[test]
    fn test_numeric_rates_accepted() {
        let json = r#"{"elements": {"edges": [{"data": {"id": "e", "source": "a", "target": "b",
            "traffic": {"protocol": "grpc", "rates": {"grpc": 3.5}}}}]}}"#;
        let snapshot = parse_graph(json).unwrap();

        assert_eq!(snapshot.edges[0].protocol, Protocol::Grpc);
        assert_eq!(snapshot.edges[0].rate, 3.5);
        assert!(snapshot.nodes.is_empty());
    }

    #[test]
    fn test_malformed_payload() {
        let err = parse_graph("{ not json").unwrap_err();
        assert!(matches!(err, GraphError::Parse(_)));
    }
}

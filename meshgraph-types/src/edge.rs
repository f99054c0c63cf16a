//! Edge records - traffic between two nodes over one protocol.

use alloc::string::String;

/// Protocol carried by an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Protocol {
    #[default]
    Http,
    Grpc,
    Tcp,
}

impl Protocol {
    /// The unit the edge's rate is measured in.
    pub fn traffic_kind(&self) -> TrafficKind {
        match self {
            Protocol::Http | Protocol::Grpc => TrafficKind::Requests,
            Protocol::Tcp => TrafficKind::Bytes,
        }
    }

    /// Protocol name as the backend spells it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Grpc => "grpc",
            Protocol::Tcp => "tcp",
        }
    }
}

/// Category of traffic rate, each animated with its own calibration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrafficKind {
    /// Requests (or messages) per second: http and grpc.
    Requests,
    /// Bytes per second: tcp.
    Bytes,
}

/// One edge of the traffic graph.
///
/// Several edges may share the same (source, target) pair when more than one
/// protocol is active between two entities; those are parallel edges.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct EdgeRecord {
    pub id: String,
    pub source: String,
    pub target: String,
    pub protocol: Protocol,
    /// Requests/s for http and grpc, bytes/s for tcp. May be NaN when the
    /// backend sent something unparseable.
    pub rate: f64,

    /// Percentage of requests that errored.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub percent_err: Option<f64>,
    /// Percentage of the source's outbound requests carried by this edge.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub percent_req: Option<f64>,
    /// Response time in milliseconds.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub response_time: Option<f64>,
    /// Throughput in bytes/s.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub throughput: Option<f64>,
}

impl EdgeRecord {
    /// Create an edge with a rate; optional metrics left unset.
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        protocol: Protocol,
        rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            protocol,
            rate,
            ..Default::default()
        }
    }

    /// The ordered (source, target) pair identifying parallel edges.
    pub fn pair(&self) -> (&str, &str) {
        (&self.source, &self.target)
    }

    /// Whether the edge carried any traffic in the window.
    pub fn has_traffic(&self) -> bool {
        self.rate > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_traffic_kind() {
        assert_eq!(Protocol::Http.traffic_kind(), TrafficKind::Requests);
        assert_eq!(Protocol::Grpc.traffic_kind(), TrafficKind::Requests);
        assert_eq!(Protocol::Tcp.traffic_kind(), TrafficKind::Bytes);
    }

    #[test]
    fn test_nan_rate_has_no_traffic() {
        let edge = EdgeRecord::new("e", "a", "b", Protocol::Http, f64::NAN);
        assert!(!edge.has_traffic());
        assert_eq!(edge.pair(), ("a", "b"));
    }
}

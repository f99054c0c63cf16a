//! Graph session: turns each refresh into a view model.

use meshgraph_types::{DisplaySettings, Protocol, TopologySnapshot, TrafficKind};
use serde::Serialize;
use tracing::debug;

use crate::data::decorate::{decorate, NodeDecoration, TopologyIndex};
use crate::data::geometry::{bendpoints_for, EdgeLayout, Point};
use crate::data::{edge_label, topology_changed, AnimationSpeed, RateAnimationCalibrator};

/// Everything the renderer draws for one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: String,
    #[serde(flatten)]
    pub decoration: NodeDecoration,
}

/// Everything the renderer draws for one edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeView {
    pub id: String,
    pub source: String,
    pub target: String,
    pub protocol: Protocol,
    pub label: String,
    /// Dot interval in milliseconds; absent when the edge does not animate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_ms: Option<f64>,
    pub speed: AnimationSpeed,
    /// Filled by [`GraphView::apply_layout`].
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bendpoints: Vec<Point>,
}

/// The derived view of one snapshot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphView {
    pub timestamp_ms: u64,
    pub nodes: Vec<NodeView>,
    pub edges: Vec<EdgeView>,
}

impl GraphView {
    pub fn node(&self, id: &str) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&EdgeView> {
        self.edges.iter().find(|e| e.id == id)
    }

    /// Recompute bend-points after the renderer has laid the graph out.
    pub fn apply_layout(&mut self, layout: &impl EdgeLayout) {
        for edge in &mut self.edges {
            edge.bendpoints = bendpoints_for(layout, &edge.id);
        }
    }
}

/// Result of feeding one refresh into the session.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewUpdate {
    /// The shape of the graph changed; the renderer must lay it out again.
    pub relayout: bool,
    pub view: GraphView,
}

/// State kept across refreshes of one graph view.
///
/// Holds one calibrator per traffic category and the previous snapshot.
/// Thresholds only ratchet up across refreshes, including refreshes that
/// add or drop nodes; they start over on [`reset`](Self::reset) or when the
/// display settings change.
#[derive(Debug, Clone)]
pub struct GraphSession {
    settings: DisplaySettings,
    requests: RateAnimationCalibrator,
    bytes: RateAnimationCalibrator,
    previous: Option<TopologySnapshot>,
}

impl GraphSession {
    pub fn new(settings: DisplaySettings) -> Self {
        Self {
            settings,
            requests: RateAnimationCalibrator::new(TrafficKind::Requests),
            bytes: RateAnimationCalibrator::new(TrafficKind::Bytes),
            previous: None,
        }
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Replace the display settings. The next update is treated as a fresh
    /// graph load.
    pub fn set_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings;
        self.reset();
    }

    /// Start a new graph load: calibration back to its initial state and
    /// the next update always re-lays out.
    pub fn reset(&mut self) {
        self.requests.reset_calibration();
        self.bytes.reset_calibration();
        self.previous = None;
    }

    pub fn calibrator(&self, kind: TrafficKind) -> &RateAnimationCalibrator {
        match kind {
            TrafficKind::Requests => &self.requests,
            TrafficKind::Bytes => &self.bytes,
        }
    }

    fn calibrator_mut(&mut self, kind: TrafficKind) -> &mut RateAnimationCalibrator {
        match kind {
            TrafficKind::Requests => &mut self.requests,
            TrafficKind::Bytes => &mut self.bytes,
        }
    }

    /// The last snapshot fed to [`update`](Self::update).
    pub fn previous(&self) -> Option<&TopologySnapshot> {
        self.previous.as_ref()
    }

    /// Derive the view for a new refresh.
    pub fn update(&mut self, snapshot: TopologySnapshot) -> ViewUpdate {
        let relayout = topology_changed(self.previous.as_ref(), Some(&snapshot));

        for edge in &snapshot.edges {
            self.calibrator_mut(edge.protocol.traffic_kind())
                .calibrate(edge.rate);
        }

        let view = self.build_view(&snapshot);
        debug!(
            nodes = view.nodes.len(),
            edges = view.edges.len(),
            relayout,
            "Graph view updated"
        );

        self.previous = Some(snapshot);
        ViewUpdate { relayout, view }
    }

    fn build_view(&self, snapshot: &TopologySnapshot) -> GraphView {
        let index = TopologyIndex::new(snapshot);

        let nodes = snapshot
            .nodes
            .iter()
            .map(|node| NodeView {
                id: node.id.clone(),
                decoration: decorate(node, &index, &self.settings),
            })
            .collect();

        let edges = snapshot
            .edges
            .iter()
            .map(|edge| {
                let calibrator = self.calibrator(edge.protocol.traffic_kind());
                EdgeView {
                    id: edge.id.clone(),
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    protocol: edge.protocol,
                    label: edge_label(edge, &self.settings),
                    delay_ms: calibrator.compute_delay(edge.rate),
                    speed: calibrator.compute_animation_speed(edge.rate),
                    bendpoints: Vec::new(),
                }
            })
            .collect();

        GraphView {
            timestamp_ms: snapshot.timestamp_ms,
            nodes,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::decorate::{Badge, NodeShape};
    use crate::data::geometry::NodePositions;
    use meshgraph_types::{NodeRecord, NodeType};
    use std::collections::HashMap;

    fn snapshot(http_rate: f64, tcp_rate: f64) -> TopologySnapshot {
        TopologySnapshot::builder()
            .timestamp_ms(1000)
            .node("a", NodeType::App, |n| n.app("productpage").namespace("bookinfo"))
            .node("b", NodeType::App, |n| {
                n.app("reviews").namespace("bookinfo").circuit_breaker()
            })
            .edge("a-b-http", "a", "b", Protocol::Http, http_rate)
            .edge("a-b-tcp", "a", "b", Protocol::Tcp, tcp_rate)
            .build()
    }

    #[test]
    fn test_first_update_relayouts() {
        let mut session = GraphSession::new(DisplaySettings::default());
        let update = session.update(snapshot(10.0, 0.0));

        assert!(update.relayout);
        assert_eq!(update.view.timestamp_ms, 1000);
        assert_eq!(update.view.nodes.len(), 2);

        let http = update.view.edge("a-b-http").unwrap();
        assert_eq!(http.delay_ms, Some(100.0));
        assert_eq!(http.label, "10");

        let tcp = update.view.edge("a-b-tcp").unwrap();
        assert_eq!(tcp.delay_ms, None);
        assert_eq!(tcp.speed, AnimationSpeed::None);
        assert_eq!(tcp.label, "");
    }

    #[test]
    fn test_nodes_are_decorated() {
        let mut session = GraphSession::new(DisplaySettings::default());
        let view = session.update(snapshot(1.0, 1.0)).view;

        let reviews = view.node("b").unwrap();
        assert_eq!(
            reviews.decoration.shape,
            NodeShape::for_node(&NodeRecord::new("b", NodeType::App))
        );
        assert_eq!(reviews.decoration.badges, [Badge::CircuitBreaker]);
        assert!(reviews.decoration.label.starts_with("reviews"));
    }

    #[test]
    fn test_calibration_ratchets_within_graph() {
        let mut session = GraphSession::new(DisplaySettings::default());
        session.update(snapshot(10.0, 0.0));

        // Same shape: no relayout, threshold widens to 400 and slows the 10 rps edge
        let update = session.update(snapshot(200.0, 0.0));
        assert!(!update.relayout);
        assert_eq!(session.calibrator(TrafficKind::Requests).state().threshold, 400.0);
        assert_eq!(update.view.edge("a-b-http").unwrap().delay_ms, Some(40.0));

        // Threshold stays raised when traffic drops back
        let update = session.update(snapshot(10.0, 0.0));
        assert_eq!(update.view.edge("a-b-http").unwrap().delay_ms, Some(800.0));
    }

    #[test]
    fn test_calibration_kept_when_node_added() {
        let mut session = GraphSession::new(DisplaySettings::default());
        session.update(snapshot(1000.0, 0.0));
        session.update(snapshot(10.0, 0.0));

        let mut grown = snapshot(10.0, 0.0);
        grown
            .nodes
            .push(NodeRecord::builder("c", NodeType::App).app("ratings").build());
        let update = session.update(grown);

        assert!(update.relayout);
        assert_eq!(session.calibrator(TrafficKind::Requests).state().threshold, 2000.0);
        let delay = update.view.edge("a-b-http").unwrap().delay_ms.unwrap();
        assert!(delay > 3000.0, "delay was {}", delay);
    }

    #[test]
    fn test_calibration_resets_on_new_load() {
        let mut session = GraphSession::new(DisplaySettings::default());
        session.update(snapshot(200.0, 0.0));
        session.reset();

        let other = TopologySnapshot::builder()
            .node("x", NodeType::Service, |n| n.service("x"))
            .node("y", NodeType::Service, |n| n.service("y"))
            .edge("x-y", "x", "y", Protocol::Http, 10.0)
            .build();
        let update = session.update(other);

        assert!(update.relayout);
        assert_eq!(update.view.edge("x-y").unwrap().delay_ms, Some(100.0));
    }

    #[test]
    fn test_categories_calibrate_independently() {
        let mut session = GraphSession::new(DisplaySettings::default());
        session.update(snapshot(1.0, 10_000.0));

        assert_eq!(session.calibrator(TrafficKind::Requests).state().threshold, 50.0);
        assert_eq!(session.calibrator(TrafficKind::Bytes).state().threshold, 20_000.0);
    }

    #[test]
    fn test_set_settings_forces_relayout() {
        let mut session = GraphSession::new(DisplaySettings::default());
        session.update(snapshot(1.0, 1.0));

        session.set_settings(DisplaySettings {
            show_virtual_services: false,
            ..Default::default()
        });
        let update = session.update(snapshot(1.0, 1.0));

        assert!(update.relayout);
        assert!(update.view.node("b").unwrap().decoration.badges.is_empty());
    }

    #[test]
    fn test_apply_layout_bends_parallel_edges() {
        let mut session = GraphSession::new(DisplaySettings::default());
        let snap = snapshot(1.0, 1.0);
        let mut view = session.update(snap.clone()).view;

        let positions = HashMap::from([
            ("a".to_string(), Point::new(0.0, 0.0)),
            ("b".to_string(), Point::new(100.0, 0.0)),
        ]);
        view.apply_layout(&NodePositions::new(&snap.edges, positions));

        let http = &view.edge("a-b-http").unwrap().bendpoints;
        let tcp = &view.edge("a-b-tcp").unwrap().bendpoints;
        assert_eq!(http, &[Point::new(50.0, 20.0)]);
        assert_eq!(tcp, &[Point::new(50.0, -20.0)]);
    }

    #[test]
    fn test_view_serializes() {
        let mut session = GraphSession::new(DisplaySettings::default());
        let view = session.update(snapshot(10.0, 0.0)).view;

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["timestampMs"], 1000);
        assert_eq!(json["edges"][0]["delayMs"], 100.0);
        assert_eq!(json["edges"][0]["speed"], "fast");
        assert!(json["edges"][1].get("delayMs").is_none());
        assert_eq!(json["nodes"][1]["badges"][0], "CB");
    }
}

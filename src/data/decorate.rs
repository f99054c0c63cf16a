//! Node decoration: shape, badges, label and host list.
//!
//! The same physical graph is rendered as several graph types (by app, by
//! versioned app, by workload, by service) and optionally grouped into app,
//! namespace and cluster boxes. Labels avoid repeating what an enclosing box
//! already conveys, so decoration needs a read-only view of the node's
//! ancestors. Ancestry is at most two levels deep: the node's box, and that
//! box's box.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use meshgraph_types::{
    BoxKind, DisplaySettings, GraphType, NodeRecord, NodeType, TopologySnapshot, UNKNOWN,
};
use serde::{Serialize, Serializer};

/// Shape a node is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    Ellipse,
    Hexagon,
    Rectangle,
    Rhombus,
    Trapezoid,
    Circle,
}

impl NodeShape {
    pub fn for_node(node: &NodeRecord) -> Self {
        match node.node_type {
            NodeType::Aggregate => NodeShape::Hexagon,
            NodeType::App => NodeShape::Rectangle,
            NodeType::Service if node.is_service_entry.is_some() => NodeShape::Trapezoid,
            NodeType::Service => NodeShape::Rhombus,
            NodeType::Workload => NodeShape::Circle,
            _ => NodeShape::Ellipse,
        }
    }
}

/// Small icons shown next to a node's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Badge {
    MissingSidecar,
    CircuitBreaker,
    VirtualService,
    FaultInjection,
    Mirroring,
    TrafficShifting,
    RequestTimeout,
    RequestRouting,
    WorkloadEntry,
    Gateway,
    TrafficSource,
}

impl Badge {
    /// Short id the renderer maps to an icon.
    pub fn id(&self) -> &'static str {
        match self {
            Badge::MissingSidecar => "MS",
            Badge::CircuitBreaker => "CB",
            Badge::VirtualService => "VS",
            Badge::FaultInjection => "FI",
            Badge::Mirroring => "MI",
            Badge::TrafficShifting => "TS",
            Badge::RequestTimeout => "RT",
            Badge::RequestRouting => "RR",
            Badge::WorkloadEntry => "WE",
            Badge::Gateway => "GW",
            Badge::TrafficSource => "RO",
        }
    }
}

impl Serialize for Badge {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.id())
    }
}

/// Everything the renderer needs to draw one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDecoration {
    pub shape: NodeShape,
    pub badges: Vec<Badge>,
    /// Newline-delimited: primary content, then `(namespace)`, then `(cluster)`.
    pub label: String,
    pub hosts: Vec<String>,
}

/// Read-only lookup of nodes by id, used to resolve box parents.
pub trait AncestryLookup {
    fn lookup(&self, id: &str) -> Option<&NodeRecord>;
}

impl<S: BuildHasher> AncestryLookup for HashMap<String, NodeRecord, S> {
    fn lookup(&self, id: &str) -> Option<&NodeRecord> {
        self.get(id)
    }
}

impl AncestryLookup for BTreeMap<String, NodeRecord> {
    fn lookup(&self, id: &str) -> Option<&NodeRecord> {
        self.get(id)
    }
}

/// Id index over the nodes of one snapshot.
#[derive(Debug, Clone, Default)]
pub struct TopologyIndex<'a> {
    nodes: HashMap<&'a str, &'a NodeRecord>,
}

impl<'a> TopologyIndex<'a> {
    pub fn new(snapshot: &'a TopologySnapshot) -> Self {
        Self::from_nodes(&snapshot.nodes)
    }

    pub fn from_nodes(nodes: &'a [NodeRecord]) -> Self {
        Self {
            nodes: nodes.iter().map(|n| (n.id.as_str(), n)).collect(),
        }
    }
}

impl AncestryLookup for TopologyIndex<'_> {
    fn lookup(&self, id: &str) -> Option<&NodeRecord> {
        self.nodes.get(id).copied()
    }
}

/// Which enclosing boxes already convey part of a node's identity.
#[derive(Debug, Clone, Copy, Default)]
struct Enclosure {
    app_boxed: bool,
    namespace_boxed: bool,
}

impl Enclosure {
    fn of(node: &NodeRecord, ancestry: &impl AncestryLookup) -> Self {
        let box1 = node.parent.as_deref().and_then(|id| ancestry.lookup(id));
        let box2 = box1
            .and_then(|b| b.parent.as_deref())
            .and_then(|id| ancestry.lookup(id));

        let kind1 = box1.and_then(|b| b.is_box);
        let kind2 = box2.and_then(|b| b.is_box);

        Self {
            app_boxed: kind1 == Some(BoxKind::App),
            namespace_boxed: kind1 == Some(BoxKind::Namespace)
                || kind2 == Some(BoxKind::Namespace),
        }
    }
}

/// Decorate one node.
pub fn decorate(
    node: &NodeRecord,
    ancestry: &impl AncestryLookup,
    settings: &DisplaySettings,
) -> NodeDecoration {
    NodeDecoration {
        shape: NodeShape::for_node(node),
        badges: badges(node, settings),
        label: label(node, ancestry, settings),
        hosts: hosts(node, settings.max_hosts),
    }
}

/// Decorate every node of a snapshot, keyed by node id.
pub fn decorate_snapshot(
    snapshot: &TopologySnapshot,
    settings: &DisplaySettings,
) -> BTreeMap<String, NodeDecoration> {
    let index = TopologyIndex::new(snapshot);
    snapshot
        .nodes
        .iter()
        .map(|node| (node.id.clone(), decorate(node, &index, settings)))
        .collect()
}

/// Badges in display order.
pub fn badges(node: &NodeRecord, settings: &DisplaySettings) -> Vec<Badge> {
    let mut badges = Vec::new();

    if settings.show_missing_sidecars && node.has_missing_sidecar {
        badges.push(Badge::MissingSidecar);
    }

    if !settings.show_virtual_services {
        return badges;
    }

    if node.has_cb {
        badges.push(Badge::CircuitBreaker);
    }

    // A traffic scenario implies a virtual service, so the generic badge is dropped
    if node.has_vs.is_some() {
        if !node.has_traffic_scenario() {
            badges.push(Badge::VirtualService);
        } else {
            if node.has_fault_injection {
                badges.push(Badge::FaultInjection);
            }
            if node.has_mirroring {
                badges.push(Badge::Mirroring);
            }
            if node.has_traffic_shifting || node.has_tcp_traffic_shifting {
                badges.push(Badge::TrafficShifting);
            }
            if node.has_request_timeout {
                badges.push(Badge::RequestTimeout);
            }
            if node.has_request_routing {
                badges.push(Badge::RequestRouting);
            }
        }
    }

    if node.has_workload_entry.is_some() {
        badges.push(Badge::WorkloadEntry);
    }

    let gateway = node.is_gateway.as_ref();
    if node.is_root {
        if gateway.is_some_and(|g| g.has_ingress_hostnames()) {
            badges.push(Badge::Gateway);
        }
        badges.push(Badge::TrafficSource);
    } else if gateway.is_some_and(|g| g.has_egress_hostnames()) {
        badges.push(Badge::Gateway);
    }

    badges
}

fn is_known(value: &str) -> bool {
    !value.is_empty() && value != UNKNOWN
}

/// Newline-delimited label.
pub fn label(
    node: &NodeRecord,
    ancestry: &impl AncestryLookup,
    settings: &DisplaySettings,
) -> String {
    let enclosure = Enclosure::of(node, ancestry);
    let mut lines = primary_content(node, enclosure, settings.graph_type);

    if (settings.is_multi_namespace() || node.is_outside)
        && is_known(&node.namespace)
        && !enclosure.app_boxed
        && !enclosure.namespace_boxed
        && node.is_box != Some(BoxKind::Namespace)
    {
        lines.push(format!("({})", node.namespace));
    }

    if is_known(&node.cluster)
        && node.cluster != settings.home_cluster
        && !node.is_boxed()
        && node.is_box != Some(BoxKind::Cluster)
    {
        lines.push(format!("({})", node.cluster));
    }

    lines.join("\n")
}

fn primary_content(node: &NodeRecord, enclosure: Enclosure, graph_type: GraphType) -> Vec<String> {
    let app = node.app.as_deref().unwrap_or_default();
    let text = |s: &Option<String>| s.clone().unwrap_or_default();

    match node.node_type {
        NodeType::Aggregate => vec![text(&node.aggregate_value)],
        NodeType::App => {
            let version = node.version.as_deref().unwrap_or_default();
            if enclosure.app_boxed {
                let line = if graph_type == GraphType::App {
                    app
                } else if is_known(version) {
                    version
                } else {
                    match node.workload.as_deref() {
                        Some(workload) if !workload.is_empty() => workload,
                        _ => app,
                    }
                };
                vec![line.to_string()]
            } else if graph_type == GraphType::App || version == UNKNOWN || version.is_empty() {
                vec![app.to_string()]
            } else {
                vec![app.to_string(), version.to_string()]
            }
        }
        NodeType::Box => match node.is_box {
            Some(BoxKind::App) => vec![app.to_string()],
            Some(BoxKind::Cluster) => vec![node.cluster.clone()],
            Some(BoxKind::Namespace) => vec![node.namespace.clone()],
            None => Vec::new(),
        },
        NodeType::Service => vec![text(&node.service)],
        NodeType::Workload => vec![text(&node.workload)],
        NodeType::Unknown => vec![UNKNOWN.to_string()],
        NodeType::Unrecognized => vec!["error".to_string()],
    }
}

/// Hostnames shown for the node, truncated at `max_hosts`.
pub fn hosts(node: &NodeRecord, max_hosts: usize) -> Vec<String> {
    if node.node_type == NodeType::Box || node.is_box.is_some() {
        return Vec::new();
    }

    let gateway = node.is_gateway.as_ref();
    let sources = [
        node.has_vs.as_ref(),
        gateway.and_then(|g| g.ingress_info.as_ref()),
        gateway.and_then(|g| g.egress_info.as_ref()),
        gateway.and_then(|g| g.gateway_api_info.as_ref()),
    ];

    let all: Vec<String> = sources
        .into_iter()
        .flatten()
        .flat_map(|info| info.iter())
        .map(|host| {
            if host == "*" {
                "* (all hosts)".to_string()
            } else {
                host.to_string()
            }
        })
        .collect();

    truncate_hosts(all, max_hosts)
}

fn truncate_hosts(mut hosts: Vec<String>, max_hosts: usize) -> Vec<String> {
    if hosts.len() <= max_hosts {
        return hosts;
    }

    let hidden = hosts.len() - max_hosts;
    hosts.truncate(max_hosts);
    hosts.push(if hidden == 1 {
        "1 more host...".to_string()
    } else {
        format!("{} more hosts...", hidden)
    });
    hosts
}

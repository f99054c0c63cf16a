//! Node records - one entity (app, service, workload, box...) of the traffic graph.

use alloc::string::String;
use alloc::vec::Vec;

/// The kind of entity a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum NodeType {
    Aggregate,
    App,
    Box,
    Service,
    Workload,
    #[default]
    Unknown,
    /// A node type this crate does not know about. Decorated as an error
    /// rather than rejected so one malformed record cannot abort a graph.
    #[cfg_attr(feature = "serde", serde(other))]
    Unrecognized,
}

/// The grouping a box node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BoxKind {
    App,
    Cluster,
    Namespace,
}

/// Hostnames attached to a gateway listener or virtual service.
///
/// `hostnames` distinguishes "no list" (`None`) from "an empty list"; the
/// gateway badge keys on the presence of the list, not its length.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HostInfo {
    pub hostnames: Option<Vec<String>>,
}

impl HostInfo {
    pub fn new<I, S>(hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hostnames: Some(hostnames.into_iter().map(Into::into).collect()),
        }
    }

    /// Whether a hostname list is present at all.
    pub fn has_hostnames(&self) -> bool {
        self.hostnames.is_some()
    }

    /// Iterate the hostnames, empty when no list is present.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.hostnames.iter().flatten().map(String::as_str)
    }
}

/// Gateway roles a node plays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GatewayInfo {
    pub ingress_info: Option<HostInfo>,
    pub egress_info: Option<HostInfo>,
    #[cfg_attr(feature = "serde", serde(rename = "gatewayAPIInfo"))]
    pub gateway_api_info: Option<HostInfo>,
}

impl GatewayInfo {
    /// True when ingress or Gateway API listeners expose a hostname list.
    pub fn has_ingress_hostnames(&self) -> bool {
        has_hosts(&self.ingress_info) || has_hosts(&self.gateway_api_info)
    }

    /// True when egress listeners expose a hostname list.
    pub fn has_egress_hostnames(&self) -> bool {
        has_hosts(&self.egress_info)
    }
}

fn has_hosts(info: &Option<HostInfo>) -> bool {
    info.as_ref().is_some_and(HostInfo::has_hostnames)
}

/// Service entry details for nodes backed by an Istio ServiceEntry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ServiceEntryInfo {
    pub hosts: Vec<String>,
    /// `MESH_EXTERNAL` or `MESH_INTERNAL`.
    pub location: String,
    /// Namespace the ServiceEntry object is defined in.
    pub namespace: String,
}

/// A workload entry backing a workload node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkloadEntryInfo {
    pub name: String,
}

/// One node of the traffic graph as delivered by the backend.
///
/// Built fresh on every telemetry refresh and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct NodeRecord {
    pub id: String,
    pub cluster: String,
    pub namespace: String,
    pub node_type: NodeType,

    pub app: Option<String>,
    pub version: Option<String>,
    pub workload: Option<String>,
    pub service: Option<String>,
    /// Name of the aggregated attribute (e.g. `request_operation`).
    pub aggregate: Option<String>,
    pub aggregate_value: Option<String>,

    /// Id of the enclosing box, if any.
    pub parent: Option<String>,
    /// Set when this node is itself a box.
    pub is_box: Option<BoxKind>,

    #[cfg_attr(feature = "serde", serde(rename = "hasCB"))]
    pub has_cb: bool,
    #[cfg_attr(feature = "serde", serde(rename = "hasVS"))]
    pub has_vs: Option<HostInfo>,
    pub has_fault_injection: bool,
    pub has_mirroring: bool,
    pub has_request_routing: bool,
    pub has_request_timeout: bool,
    pub has_traffic_shifting: bool,
    #[cfg_attr(feature = "serde", serde(rename = "hasTCPTrafficShifting"))]
    pub has_tcp_traffic_shifting: bool,
    pub has_workload_entry: Option<Vec<WorkloadEntryInfo>>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "isOutOfMesh", alias = "hasMissingSidecar")
    )]
    pub has_missing_sidecar: bool,
    pub is_root: bool,
    pub is_gateway: Option<GatewayInfo>,
    pub is_service_entry: Option<ServiceEntryInfo>,
    pub is_outside: bool,
}

impl NodeRecord {
    /// Create a node with an id and type; everything else defaulted.
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            id: id.into(),
            node_type,
            ..Default::default()
        }
    }

    /// Create a builder for a node.
    pub fn builder(id: impl Into<String>, node_type: NodeType) -> NodeRecordBuilder {
        NodeRecordBuilder::new(id, node_type)
    }

    /// Whether this node sits inside a box.
    pub fn is_boxed(&self) -> bool {
        self.parent.is_some()
    }

    /// Whether any recognized traffic scenario is configured on the node.
    pub fn has_traffic_scenario(&self) -> bool {
        self.has_fault_injection
            || self.has_mirroring
            || self.has_request_routing
            || self.has_request_timeout
            || self.has_traffic_shifting
            || self.has_tcp_traffic_shifting
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for `NodeRecord`.
#[derive(Debug)]
pub struct NodeRecordBuilder {
    node: NodeRecord,
}

impl NodeRecordBuilder {
    /// Create a new builder.
    pub fn new(id: impl Into<String>, node_type: NodeType) -> Self {
        Self {
            node: NodeRecord::new(id, node_type),
        }
    }

    pub fn cluster(mut self, cluster: impl Into<String>) -> Self {
        self.node.cluster = cluster.into();
        self
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.node.namespace = namespace.into();
        self
    }

    pub fn app(mut self, app: impl Into<String>) -> Self {
        self.node.app = Some(app.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.node.version = Some(version.into());
        self
    }

    pub fn workload(mut self, workload: impl Into<String>) -> Self {
        self.node.workload = Some(workload.into());
        self
    }

    pub fn service(mut self, service: impl Into<String>) -> Self {
        self.node.service = Some(service.into());
        self
    }

    /// Set the aggregated attribute name and its value.
    pub fn aggregate(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.node.aggregate = Some(name.into());
        self.node.aggregate_value = Some(value.into());
        self
    }

    /// Place the node inside the box with the given id.
    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.node.parent = Some(parent.into());
        self
    }

    /// Mark the node as a box of the given kind.
    pub fn boxed_as(mut self, kind: BoxKind) -> Self {
        self.node.is_box = Some(kind);
        self
    }

    pub fn circuit_breaker(mut self) -> Self {
        self.node.has_cb = true;
        self
    }

    /// Attach a virtual service routing to the given hostnames.
    pub fn virtual_service<I, S>(mut self, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.node.has_vs = Some(HostInfo::new(hostnames));
        self
    }

    pub fn fault_injection(mut self) -> Self {
        self.node.has_fault_injection = true;
        self
    }

    pub fn mirroring(mut self) -> Self {
        self.node.has_mirroring = true;
        self
    }

    pub fn request_routing(mut self) -> Self {
        self.node.has_request_routing = true;
        self
    }

    pub fn request_timeout(mut self) -> Self {
        self.node.has_request_timeout = true;
        self
    }

    pub fn traffic_shifting(mut self) -> Self {
        self.node.has_traffic_shifting = true;
        self
    }

    pub fn tcp_traffic_shifting(mut self) -> Self {
        self.node.has_tcp_traffic_shifting = true;
        self
    }

    pub fn workload_entry(mut self, name: impl Into<String>) -> Self {
        self.node
            .has_workload_entry
            .get_or_insert_with(Vec::new)
            .push(WorkloadEntryInfo { name: name.into() });
        self
    }

    pub fn missing_sidecar(mut self) -> Self {
        self.node.has_missing_sidecar = true;
        self
    }

    pub fn root(mut self) -> Self {
        self.node.is_root = true;
        self
    }

    pub fn ingress_gateway<I, S>(mut self, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gateway().ingress_info = Some(HostInfo::new(hostnames));
        self
    }

    pub fn egress_gateway<I, S>(mut self, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gateway().egress_info = Some(HostInfo::new(hostnames));
        self
    }

    pub fn gateway_api<I, S>(mut self, hostnames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gateway().gateway_api_info = Some(HostInfo::new(hostnames));
        self
    }

    pub fn service_entry(mut self, location: impl Into<String>) -> Self {
        self.node.is_service_entry = Some(ServiceEntryInfo {
            location: location.into(),
            ..Default::default()
        });
        self
    }

    pub fn outside(mut self) -> Self {
        self.node.is_outside = true;
        self
    }

    fn gateway(&mut self) -> &mut GatewayInfo {
        self.node.is_gateway.get_or_insert_with(GatewayInfo::default)
    }

    /// Build the node.
    pub fn build(self) -> NodeRecord {
        self.node
    }
}

use crate::simulation::SimulationMetrics;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// Id of the implicit external traffic source. Edges may originate from it
/// even when the graph carries no node with this id.
pub const USER_NODE_ID: &str = "user";

/// Bandwidth (Mbps) given to connections that do not specify one.
pub const DEFAULT_CONNECTION_BANDWIDTH: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Returned when a string does not name a known node kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown node type: {0}")]
pub struct ParseNodeKindError(pub String);

// ---------------------------------------------------------------------------
// Node kinds
// ---------------------------------------------------------------------------

/// The closed set of architecture tiers a node can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Load balancer.
    Lb,
    /// API gateway.
    Gateway,
    /// Application server.
    App,
    /// Microservice.
    Micro,
    /// Database.
    Db,
    /// Cache.
    Cache,
    /// Message queue.
    Mq,
    /// CDN edge.
    Cdn,
    /// Auto-scaling group.
    Asg,
    /// Disaster-recovery / backup node.
    Dr,
    /// The external traffic source. Never simulated as a server.
    User,
    /// Marker for the node representing the architecture's ingress.
    Entry,
}

impl NodeKind {
    /// Every kind, in declaration order.
    pub const ALL: [NodeKind; 12] = [
        NodeKind::Lb,
        NodeKind::Gateway,
        NodeKind::App,
        NodeKind::Micro,
        NodeKind::Db,
        NodeKind::Cache,
        NodeKind::Mq,
        NodeKind::Cdn,
        NodeKind::Asg,
        NodeKind::Dr,
        NodeKind::User,
        NodeKind::Entry,
    ];

    /// The short wire name (`"lb"`, `"db"`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Lb => "lb",
            NodeKind::Gateway => "gateway",
            NodeKind::App => "app",
            NodeKind::Micro => "micro",
            NodeKind::Db => "db",
            NodeKind::Cache => "cache",
            NodeKind::Mq => "mq",
            NodeKind::Cdn => "cdn",
            NodeKind::Asg => "asg",
            NodeKind::Dr => "dr",
            NodeKind::User => "user",
            NodeKind::Entry => "entry",
        }
    }

    /// Human-readable tier name used in validation messages.
    pub fn display_name(self) -> &'static str {
        match self {
            NodeKind::Lb => "Load Balancer",
            NodeKind::Gateway => "API Gateway",
            NodeKind::App => "Application Server",
            NodeKind::Micro => "Microservice",
            NodeKind::Db => "Database Server",
            NodeKind::Cache => "Cache Server",
            NodeKind::Mq => "Message Queue",
            NodeKind::Cdn => "CDN Edge",
            NodeKind::Asg => "Auto Scaling Group",
            NodeKind::Dr => "Backup Server",
            NodeKind::User => "User",
            NodeKind::Entry => "Entry Point",
        }
    }

    /// Application or microservice tier.
    pub fn is_compute(self) -> bool {
        matches!(self, NodeKind::App | NodeKind::Micro)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = ParseNodeKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NodeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| ParseNodeKindError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Core data structures
// ---------------------------------------------------------------------------

/// Hardware provisioned for a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerResources {
    /// Clock speed in GHz.
    pub cpu: f64,
    pub cpu_cores: u32,
    /// Memory in GB.
    pub memory: f64,
    /// Network bandwidth in Mbps.
    pub network_bandwidth: f64,
}

impl ServerResources {
    pub const fn new(cpu: f64, cpu_cores: u32, memory: f64, network_bandwidth: f64) -> Self {
        Self {
            cpu,
            cpu_cores,
            memory,
            network_bandwidth,
        }
    }
}

/// A server in the architecture graph.
///
/// `current_load`, `max_throughput` and `is_healthy` are outputs written by
/// [`crate::simulation::simulate`]; inputs may leave them at their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerNode {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NodeKind,
    /// Optional display name, e.g. the preset the node was created from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub resources: ServerResources,
    /// Load in percent, clamped to 0..=100.
    #[serde(default)]
    pub current_load: f64,
    /// Resource-bound capacity in ops/sec.
    #[serde(default)]
    pub max_throughput: f64,
    #[serde(default = "default_healthy")]
    pub is_healthy: bool,
}

fn default_healthy() -> bool {
    true
}

impl ServerNode {
    /// Create a node provisioned with its kind's default preset.
    pub fn new(id: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            label: None,
            resources: kind.default_resources(),
            current_load: 0.0,
            max_throughput: 0.0,
            is_healthy: true,
        }
    }

    pub fn with_resources(mut self, resources: ServerResources) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The label if set, otherwise the kind's display name.
    pub fn display_name(&self) -> &str {
        self.label
            .as_deref()
            .unwrap_or_else(|| self.kind.display_name())
    }
}

/// A directed link between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub id: String,
    pub source: String,
    pub target: String,
    /// Link bandwidth in Mbps.
    #[serde(default = "default_bandwidth")]
    pub bandwidth: f64,
    /// Load in percent, clamped to 0..=100.
    #[serde(default)]
    pub current_load: f64,
}

fn default_bandwidth() -> f64 {
    DEFAULT_CONNECTION_BANDWIDTH
}

impl Connection {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
            bandwidth: DEFAULT_CONNECTION_BANDWIDTH,
            current_load: 0.0,
        }
    }

    pub fn with_bandwidth(mut self, bandwidth: f64) -> Self {
        self.bandwidth = bandwidth;
        self
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

// ---------------------------------------------------------------------------
// ArchitectureGraph
// ---------------------------------------------------------------------------

/// A snapshot of the whole architecture: nodes, connections and the metrics
/// of the last simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureGraph {
    #[serde(default)]
    pub nodes: Vec<ServerNode>,
    #[serde(default)]
    pub connections: Vec<Connection>,
    #[serde(default)]
    pub metrics: SimulationMetrics,
}

impl ArchitectureGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a node.
    pub fn with_node(mut self, node: ServerNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Append a connection.
    pub fn with_connection(mut self, connection: Connection) -> Self {
        self.connections.push(connection);
        self
    }

    /// Append a connection with default bandwidth and a positional id.
    ///
    /// # Examples
    ///
    /// ```
    /// use archsim_core::graph::{ArchitectureGraph, NodeKind, ServerNode};
    ///
    /// let graph = ArchitectureGraph::new()
    ///     .with_node(ServerNode::new("lb1", NodeKind::Lb))
    ///     .with_node(ServerNode::new("db1", NodeKind::Db))
    ///     .connect("user", "lb1")
    ///     .connect("lb1", "db1");
    ///
    /// assert_eq!(graph.connections[1].id, "edge_1");
    /// ```
    pub fn connect(self, source: &str, target: &str) -> Self {
        let id = format!("edge_{}", self.connections.len());
        self.with_connection(Connection::new(id, source, target))
    }

    /// First node with the given id.
    pub fn node(&self, id: &str) -> Option<&ServerNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// First node marked as the architecture's entry point.
    pub fn entry_point(&self) -> Option<&ServerNode> {
        self.nodes.iter().find(|n| n.kind == NodeKind::Entry)
    }

    /// Build a lookup index over this snapshot.
    pub fn index(&self) -> GraphIndex<'_> {
        GraphIndex::new(self)
    }
}

// ---------------------------------------------------------------------------
// GraphIndex
// ---------------------------------------------------------------------------

/// Read-only adjacency view over an [`ArchitectureGraph`].
///
/// Duplicate node ids resolve to their first occurrence. Connections that
/// loop back to their source, or that reference an id that is neither a node
/// nor [`USER_NODE_ID`], are left out of the adjacency and kept aside so
/// callers can report them.
#[derive(Debug)]
pub struct GraphIndex<'a> {
    order: Vec<&'a ServerNode>,
    by_id: HashMap<&'a str, &'a ServerNode>,
    outgoing: HashMap<&'a str, Vec<&'a Connection>>,
    incoming: HashMap<&'a str, Vec<&'a Connection>>,
    kind_counts: HashMap<NodeKind, usize>,
    duplicate_ids: Vec<&'a str>,
    dangling: Vec<&'a Connection>,
    self_loops: Vec<&'a Connection>,
}

impl<'a> GraphIndex<'a> {
    pub fn new(graph: &'a ArchitectureGraph) -> Self {
        let mut order = Vec::with_capacity(graph.nodes.len());
        let mut by_id = HashMap::with_capacity(graph.nodes.len());
        let mut kind_counts = HashMap::new();
        let mut duplicate_ids = Vec::new();

        for node in &graph.nodes {
            if by_id.contains_key(node.id.as_str()) {
                duplicate_ids.push(node.id.as_str());
                continue;
            }
            by_id.insert(node.id.as_str(), node);
            order.push(node);
            *kind_counts.entry(node.kind).or_insert(0) += 1;
        }

        let mut outgoing: HashMap<&'a str, Vec<&'a Connection>> = HashMap::new();
        let mut incoming: HashMap<&'a str, Vec<&'a Connection>> = HashMap::new();
        let mut dangling = Vec::new();
        let mut self_loops = Vec::new();

        let resolves =
            |id: &str| -> bool { id == USER_NODE_ID || by_id.contains_key(id) };

        for conn in &graph.connections {
            if conn.is_self_loop() {
                self_loops.push(conn);
            } else if !resolves(&conn.source) || !resolves(&conn.target) {
                dangling.push(conn);
            } else {
                outgoing.entry(conn.source.as_str()).or_default().push(conn);
                incoming.entry(conn.target.as_str()).or_default().push(conn);
            }
        }

        Self {
            order,
            by_id,
            outgoing,
            incoming,
            kind_counts,
            duplicate_ids,
            dangling,
            self_loops,
        }
    }

    /// Lookup table from node id to node.
    pub fn nodes_by_id(&self) -> &HashMap<&'a str, &'a ServerNode> {
        &self.by_id
    }

    /// Unique nodes in insertion order.
    pub fn nodes(&self) -> &[&'a ServerNode] {
        &self.order
    }

    pub fn node(&self, id: &str) -> Option<&'a ServerNode> {
        self.by_id.get(id).copied()
    }

    /// The canonical `&'a str` for an id known to this graph.
    pub fn resolve_id(&self, id: &str) -> Option<&'a str> {
        if id == USER_NODE_ID {
            return Some(USER_NODE_ID);
        }
        self.by_id.get_key_value(id).map(|(k, _)| *k)
    }

    /// Connections leaving `id`.
    pub fn edges_from(&self, id: &str) -> &[&'a Connection] {
        self.outgoing.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Connections arriving at `id`.
    pub fn edges_to(&self, id: &str) -> &[&'a Connection] {
        self.incoming.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of distinct nodes of the given kind.
    pub fn count_by_type(&self, kind: NodeKind) -> usize {
        self.kind_counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn in_degree(&self, id: &str) -> usize {
        self.edges_to(id).len()
    }

    pub fn out_degree(&self, id: &str) -> usize {
        self.edges_from(id).len()
    }

    /// True if `id` denotes the external traffic source.
    pub fn is_user(&self, id: &str) -> bool {
        id == USER_NODE_ID || self.node(id).is_some_and(|n| n.kind == NodeKind::User)
    }

    /// Kind of the node `id`, if it exists.
    pub fn kind_of(&self, id: &str) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    /// Distinct targets of `id`'s outgoing connections whose kind matches.
    pub fn successors_where(&self, id: &str, pred: impl Fn(NodeKind) -> bool) -> usize {
        let mut seen: HashSet<&str> = HashSet::new();
        for conn in self.edges_from(id) {
            let target = conn.target.as_str();
            if self.kind_of(target).is_some_and(&pred) {
                seen.insert(target);
            }
        }
        seen.len()
    }

    /// Ids that appeared more than once, one entry per extra occurrence.
    pub fn duplicate_ids(&self) -> &[&'a str] {
        &self.duplicate_ids
    }

    /// Connections that reference an unknown node.
    pub fn dangling(&self) -> &[&'a Connection] {
        &self.dangling
    }

    pub fn self_loops(&self) -> &[&'a Connection] {
        &self.self_loops
    }
}

//! On-disk format of scenario documents.
//!
//! A scenario describes one architecture plus the traffic it should carry.
//! Node types and presets are plain strings here and are resolved into
//! engine types by [`crate::scenario`].

use serde::Deserialize;

/// Traffic target used when a scenario does not set one.
pub const DEFAULT_TARGET_THROUGHPUT: f64 = 1000.0;

fn default_target() -> f64 {
    DEFAULT_TARGET_THROUGHPUT
}

/// A whole scenario file.
#[derive(Debug, Clone, Deserialize)]
pub struct ScenarioData {
    #[serde(default)]
    pub name: Option<String>,
    /// Id of the ingress node. When absent, the first `entry` node is used.
    #[serde(default)]
    pub entry_point: Option<String>,
    /// ops/sec.
    #[serde(default = "default_target")]
    pub target_throughput: f64,
    #[serde(default)]
    pub nodes: Vec<NodeData>,
    #[serde(default)]
    pub connections: Vec<ConnectionData>,
}

/// A node entry.
///
/// Resources come from `resources` if given, else from the named `preset`,
/// else from the default preset of the node's type.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeData {
    pub id: String,
    /// Short type name: `lb`, `app`, `db`, ...
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub preset: Option<String>,
    #[serde(default)]
    pub resources: Option<ResourcesData>,
}

/// Explicit hardware for a node.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ResourcesData {
    /// GHz.
    pub cpu: f64,
    pub cpu_cores: u32,
    /// GB.
    pub memory: f64,
    /// Mbps.
    pub network_bandwidth: f64,
}

/// A connection entry. Ids default to `edge_{position}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectionData {
    #[serde(default)]
    pub id: Option<String>,
    pub source: String,
    pub target: String,
    /// Mbps; the engine default when absent.
    #[serde(default)]
    pub bandwidth: Option<f64>,
}

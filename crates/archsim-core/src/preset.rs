//! Named hardware presets.
//!
//! Two catalogs: one default per [`NodeKind`] (what a freshly placed node of
//! that tier is provisioned with), and a list of general-purpose server
//! configurations a host can offer when a user re-provisions a node.

use crate::graph::{NodeKind, ServerResources};

/// A named resource configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServerPreset {
    pub name: &'static str,
    pub description: &'static str,
    /// The tier this preset is the default for, if any.
    pub kind: Option<NodeKind>,
    pub resources: ServerResources,
}

const fn preset(
    name: &'static str,
    description: &'static str,
    kind: Option<NodeKind>,
    resources: ServerResources,
) -> ServerPreset {
    ServerPreset {
        name,
        description,
        kind,
        resources,
    }
}

pub const DEFAULT_SERVER: ServerResources = ServerResources::new(2.4, 4, 16.0, 1000.0);

/// Per-tier defaults.
pub static KIND_PRESETS: [ServerPreset; 10] = [
    preset(
        "Load Balancer",
        "High network throughput for traffic distribution",
        Some(NodeKind::Lb),
        ServerResources::new(2.4, 4, 16.0, 5000.0),
    ),
    preset(
        "API Gateway",
        "Optimized for request routing and API management",
        Some(NodeKind::Gateway),
        ServerResources::new(2.8, 6, 24.0, 4000.0),
    ),
    preset(
        "Application Server",
        "Balanced configuration for application workloads",
        Some(NodeKind::App),
        ServerResources::new(3.2, 8, 32.0, 2000.0),
    ),
    preset(
        "Microservice",
        "Lightweight configuration for microservices",
        Some(NodeKind::Micro),
        ServerResources::new(2.4, 4, 16.0, 2000.0),
    ),
    preset(
        "Cache Server",
        "High memory for caching operations",
        Some(NodeKind::Cache),
        ServerResources::new(2.4, 4, 32.0, 3000.0),
    ),
    preset(
        "Message Queue",
        "Optimized for message processing and queuing",
        Some(NodeKind::Mq),
        ServerResources::new(2.8, 6, 24.0, 3000.0),
    ),
    preset(
        "Database Server",
        "High performance for database operations",
        Some(NodeKind::Db),
        ServerResources::new(4.0, 8, 64.0, 2000.0),
    ),
    preset(
        "CDN Edge",
        "High bandwidth for content delivery",
        Some(NodeKind::Cdn),
        ServerResources::new(2.4, 4, 16.0, 5000.0),
    ),
    preset(
        "Auto Scaling Group",
        "Scalable configuration for dynamic workloads",
        Some(NodeKind::Asg),
        ServerResources::new(2.8, 6, 24.0, 2000.0),
    ),
    preset(
        "Backup Server",
        "Optimized for data backup and recovery",
        Some(NodeKind::Dr),
        ServerResources::new(2.4, 4, 32.0, 2000.0),
    ),
];

/// General-purpose server configurations.
pub static GENERAL_PRESETS: [ServerPreset; 12] = [
    preset(
        "Default Server",
        "Balanced configuration for general workloads",
        None,
        DEFAULT_SERVER,
    ),
    preset(
        "High Performance",
        "Optimized for compute-intensive tasks",
        None,
        ServerResources::new(3.6, 8, 32.0, 2500.0),
    ),
    preset(
        "Low Latency",
        "Designed for high-speed data processing",
        None,
        ServerResources::new(2.8, 6, 24.0, 5000.0),
    ),
    preset(
        "Storage Optimized",
        "Optimized for storage-intensive workloads",
        None,
        ServerResources::new(2.4, 4, 64.0, 2000.0),
    ),
    preset(
        "Cache Server",
        "Designed for high-speed caching",
        None,
        ServerResources::new(2.4, 4, 32.0, 2000.0),
    ),
    preset(
        "Edge Server",
        "Lightweight server for edge computing",
        None,
        ServerResources::new(2.0, 2, 8.0, 500.0),
    ),
    preset(
        "Media Server",
        "Optimized for media processing and streaming",
        None,
        ServerResources::new(3.2, 6, 32.0, 3000.0),
    ),
    preset(
        "Security Server",
        "Designed for security and monitoring",
        None,
        ServerResources::new(2.8, 4, 16.0, 2000.0),
    ),
    preset(
        "Analytics Server",
        "Optimized for data analysis and processing",
        None,
        ServerResources::new(3.6, 8, 64.0, 2000.0),
    ),
    preset(
        "IoT Server",
        "Designed for IoT device management",
        None,
        DEFAULT_SERVER,
    ),
    preset(
        "Gaming Server",
        "Optimized for gaming workloads",
        None,
        ServerResources::new(3.6, 8, 32.0, 5000.0),
    ),
    preset(
        "E-commerce Server",
        "Designed for e-commerce applications",
        None,
        ServerResources::new(3.2, 6, 24.0, 2000.0),
    ),
];

/// Every preset, per-tier defaults first.
pub fn presets() -> impl Iterator<Item = &'static ServerPreset> {
    KIND_PRESETS.iter().chain(GENERAL_PRESETS.iter())
}

/// Look up a preset by name. "Cache Server" exists in both catalogs; the
/// per-tier default wins.
pub fn preset_by_name(name: &str) -> Option<&'static ServerPreset> {
    presets().find(|p| p.name == name)
}

impl NodeKind {
    /// Resources a new node of this kind is provisioned with.
    pub fn default_resources(self) -> ServerResources {
        match self {
            NodeKind::User | NodeKind::Entry => DEFAULT_SERVER,
            kind => KIND_PRESETS
                .iter()
                .find(|p| p.kind == Some(kind))
                .map(|p| p.resources)
                .unwrap_or(DEFAULT_SERVER),
        }
    }
}

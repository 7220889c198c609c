//! Resource-bottleneck throughput simulation.
//!
//! Each node's capacity is bound by its scarcest resource (CPU, memory or
//! network); each connection's by its bandwidth. The target throughput is
//! split across nodes by [`distribute_load`] and evenly across connections,
//! then compared against those capacities. Overloaded nodes and connections
//! are reported as bottlenecks and penalize system health.

use crate::distribution::distribute_load;
use crate::graph::{ArchitectureGraph, Connection, NodeKind, ServerResources};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Errors from an inconsistent [`SimulationConfig`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a positive finite number, got {value}")]
    NonPositiveConstant { name: &'static str, value: f64 },
    #[error("latency must be a non-negative finite number, got {0}")]
    InvalidLatency(f64),
}

/// Per-resource throughput constants and the reported latency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// ops/sec contributed by each GHz of each core.
    pub cpu_ops_per_ghz_core: f64,
    /// ops/sec supported per GB of memory.
    pub memory_ops_per_gb: f64,
    /// ops/sec supported per Mbps of node network bandwidth.
    pub network_ops_per_mbps: f64,
    /// ops/sec supported per Mbps of connection bandwidth.
    pub edge_ops_per_mbps: f64,
    /// Latency echoed into the metrics, in milliseconds. Not derived from
    /// topology.
    pub latency_ms: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cpu_ops_per_ghz_core: 1000.0,
            memory_ops_per_gb: 1000.0,
            network_ops_per_mbps: 100.0,
            edge_ops_per_mbps: 100.0,
            latency_ms: 50.0,
        }
    }
}

impl SimulationConfig {
    /// Check every constant, returning the config unchanged if usable.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let constants = [
            ("cpu_ops_per_ghz_core", self.cpu_ops_per_ghz_core),
            ("memory_ops_per_gb", self.memory_ops_per_gb),
            ("network_ops_per_mbps", self.network_ops_per_mbps),
            ("edge_ops_per_mbps", self.edge_ops_per_mbps),
        ];
        for (name, value) in constants {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveConstant { name, value });
            }
        }
        if !self.latency_ms.is_finite() || self.latency_ms < 0.0 {
            return Err(ConfigError::InvalidLatency(self.latency_ms));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// System-level outcome of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationMetrics {
    /// The requested target throughput, echoed back (ops/sec).
    pub total_throughput: f64,
    /// 0..=100, reduced by every overloaded node and connection.
    pub system_health: f64,
    /// Ids of overloaded nodes followed by ids of overloaded connections.
    pub bottleneck_nodes: Vec<String>,
    /// Throughput ceiling set by the weakest node or connection (ops/sec).
    pub max_achievable_throughput: f64,
    /// Milliseconds.
    pub latency: f64,
    /// Same signal as `system_health`.
    pub reliability: f64,
}

impl Default for SimulationMetrics {
    fn default() -> Self {
        Self {
            total_throughput: 0.0,
            system_health: 100.0,
            bottleneck_nodes: Vec::new(),
            max_achievable_throughput: 0.0,
            latency: 0.0,
            reliability: 100.0,
        }
    }
}

/// An annotated copy of the simulated graph plus its metrics.
///
/// `graph.metrics` equals `metrics`.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub graph: ArchitectureGraph,
    pub metrics: SimulationMetrics,
}

// ---------------------------------------------------------------------------
// Capacity model
// ---------------------------------------------------------------------------

/// Throughput a node can sustain: the minimum over its CPU, memory and
/// network bounds. Never negative; a non-finite bound counts as zero.
pub fn node_capacity(resources: &ServerResources, config: &SimulationConfig) -> f64 {
    let cpu = resources.cpu * f64::from(resources.cpu_cores) * config.cpu_ops_per_ghz_core;
    let memory = resources.memory * config.memory_ops_per_gb;
    let network = resources.network_bandwidth * config.network_ops_per_mbps;
    // f64::min skips NaN, so each bound is sanitized first.
    sanitize_capacity(cpu)
        .min(sanitize_capacity(memory))
        .min(sanitize_capacity(network))
}

/// Throughput a connection can carry.
pub fn edge_capacity(connection: &Connection, config: &SimulationConfig) -> f64 {
    sanitize_capacity(connection.bandwidth * config.edge_ops_per_mbps)
}

fn sanitize_capacity(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Unclamped load in percent. Positive load on zero capacity is unbounded.
fn load_percentage(load: f64, capacity: f64) -> f64 {
    if capacity > 0.0 {
        load / capacity * 100.0
    } else if load > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

fn sanitize_target(target: f64) -> f64 {
    if target.is_finite() && target >= 0.0 {
        target
    } else {
        tracing::warn!(
            requested = target,
            "target throughput is not a non-negative number; using 0"
        );
        0.0
    }
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Simulate `graph` under `target_throughput` ops/sec with default constants.
pub fn simulate(graph: &ArchitectureGraph, target_throughput: f64) -> Simulation {
    simulate_with(graph, target_throughput, &SimulationConfig::default())
}

/// Simulate `graph` under `target_throughput` ops/sec.
///
/// The caller's graph is left untouched; the returned copy carries each
/// node's `max_throughput`, `current_load` and `is_healthy`, and each
/// connection's `current_load`. `user` nodes are external traffic and are
/// neither loaded nor counted.
///
/// With no server nodes or no connections the run is degenerate: capacities
/// are still reported, but nothing is loaded and the throughput figures are 0.
pub fn simulate_with(
    graph: &ArchitectureGraph,
    target_throughput: f64,
    config: &SimulationConfig,
) -> Simulation {
    let target = sanitize_target(target_throughput);
    let mut annotated = graph.clone();

    let server_count = annotated
        .nodes
        .iter()
        .filter(|n| n.kind != NodeKind::User)
        .count();
    let edge_count = annotated.connections.len();

    if server_count == 0 || edge_count == 0 {
        let metrics = idle(&mut annotated, config);
        tracing::debug!(
            nodes = server_count,
            edges = edge_count,
            "degenerate simulation, nothing to load"
        );
        annotated.metrics = metrics.clone();
        return Simulation {
            graph: annotated,
            metrics,
        };
    }

    let distribution = distribute_load(&annotated.nodes, target);
    let mut health = 100.0_f64;
    let mut bottlenecks = Vec::new();
    let mut ceiling = f64::INFINITY;

    let servers = annotated
        .nodes
        .iter_mut()
        .filter(|n| n.kind != NodeKind::User);
    for (node, share) in servers.zip(distribution.shares()) {
        let capacity = node_capacity(&node.resources, config);
        let pct = load_percentage(share.load, capacity);

        node.max_throughput = capacity;
        node.current_load = pct.min(100.0);
        node.is_healthy = pct <= 100.0;
        ceiling = ceiling.min(capacity);

        if pct > 100.0 {
            tracing::trace!(node = %node.id, load_pct = pct, capacity, "node overloaded");
            bottlenecks.push(node.id.clone());
            health -= (pct - 100.0) / server_count as f64;
        }
    }

    let edge_load = target / edge_count as f64;
    for conn in &mut annotated.connections {
        let capacity = edge_capacity(conn, config);
        let pct = load_percentage(edge_load, capacity);

        conn.current_load = pct.min(100.0);
        ceiling = ceiling.min(capacity);

        if pct > 100.0 {
            tracing::trace!(edge = %conn.id, load_pct = pct, capacity, "connection overloaded");
            bottlenecks.push(conn.id.clone());
            health -= (pct - 100.0) / edge_count as f64;
        }
    }

    let health = if health.is_nan() { 0.0 } else { health.max(0.0) };
    let metrics = SimulationMetrics {
        total_throughput: target,
        system_health: health,
        bottleneck_nodes: bottlenecks,
        max_achievable_throughput: if ceiling.is_finite() { ceiling } else { 0.0 },
        latency: config.latency_ms,
        reliability: health,
    };

    tracing::debug!(
        nodes = server_count,
        edges = edge_count,
        target_throughput = target,
        health = metrics.system_health,
        bottlenecks = metrics.bottleneck_nodes.len(),
        ceiling = metrics.max_achievable_throughput,
        "simulation complete"
    );

    annotated.metrics = metrics.clone();
    Simulation {
        graph: annotated,
        metrics,
    }
}

/// Annotate capacities without applying any load.
fn idle(graph: &mut ArchitectureGraph, config: &SimulationConfig) -> SimulationMetrics {
    for node in graph
        .nodes
        .iter_mut()
        .filter(|n| n.kind != NodeKind::User)
    {
        node.max_throughput = node_capacity(&node.resources, config);
        node.current_load = 0.0;
        node.is_healthy = true;
    }
    for conn in &mut graph.connections {
        conn.current_load = 0.0;
    }

    SimulationMetrics {
        latency: config.latency_ms,
        ..SimulationMetrics::default()
    }
}

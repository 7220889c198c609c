//! Shared graph builders for unit tests, integration tests and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`.

use crate::graph::{ArchitectureGraph, Connection, NodeKind, ServerNode, ServerResources};

// ===========================================================================
// Node constructors
// ===========================================================================

pub fn node(id: &str, kind: NodeKind) -> ServerNode {
    ServerNode::new(id, kind)
}

pub fn sized(id: &str, kind: NodeKind, cpu: f64, cores: u32, memory: f64, net: f64) -> ServerNode {
    ServerNode::new(id, kind).with_resources(ServerResources::new(cpu, cores, memory, net))
}

pub fn link(id: &str, source: &str, target: &str, bandwidth: f64) -> Connection {
    Connection::new(id, source, target).with_bandwidth(bandwidth)
}

// ===========================================================================
// Canonical architectures
// ===========================================================================

/// `user -> lb1 -> {app1, app2} -> db1`, default presets throughout.
///
/// Valid with entry point `lb1`. Node ceiling is lb1's 9600 ops/sec.
pub fn reference_architecture() -> ArchitectureGraph {
    ArchitectureGraph::new()
        .with_node(node("lb1", NodeKind::Lb))
        .with_node(node("app1", NodeKind::App))
        .with_node(node("app2", NodeKind::App))
        .with_node(node("db1", NodeKind::Db))
        .connect("user", "lb1")
        .connect("lb1", "app1")
        .connect("lb1", "app2")
        .connect("app1", "db1")
        .connect("app2", "db1")
}

/// A replicated three-tier layout with caches. Validates with no errors and
/// no warnings from entry point `lb1`.
pub fn production_architecture() -> ArchitectureGraph {
    ArchitectureGraph::new()
        .with_node(node("lb1", NodeKind::Lb))
        .with_node(node("app1", NodeKind::App))
        .with_node(node("app2", NodeKind::App))
        .with_node(node("cache1", NodeKind::Cache))
        .with_node(node("cache2", NodeKind::Cache))
        .with_node(node("db1", NodeKind::Db))
        .with_node(node("db2", NodeKind::Db))
        .connect("user", "lb1")
        .connect("lb1", "app1")
        .connect("lb1", "app2")
        .connect("app1", "cache1")
        .connect("app2", "cache2")
        .connect("app1", "db1")
        .connect("app2", "db2")
}

/// Fully connected layers: `user` feeds every `lb{i}`, every balancer feeds
/// every `app{i}`, every app writes to every `db{i}`.
pub fn layered(balancers: usize, apps: usize, databases: usize) -> ArchitectureGraph {
    let lbs: Vec<String> = (0..balancers).map(|i| format!("lb{i}")).collect();
    let app_ids: Vec<String> = (0..apps).map(|i| format!("app{i}")).collect();
    let dbs: Vec<String> = (0..databases).map(|i| format!("db{i}")).collect();

    let mut graph = ArchitectureGraph::new();
    for id in &lbs {
        graph = graph.with_node(node(id, NodeKind::Lb));
    }
    for id in &app_ids {
        graph = graph.with_node(node(id, NodeKind::App));
    }
    for id in &dbs {
        graph = graph.with_node(node(id, NodeKind::Db));
    }

    for lb in &lbs {
        graph = graph.connect("user", lb);
        for app in &app_ids {
            graph = graph.connect(lb, app);
        }
    }
    for app in &app_ids {
        for db in &dbs {
            graph = graph.connect(app, db);
        }
    }
    graph
}

/// `n0 -> n1 -> ... -> n{len-1}`, all application servers.
pub fn chain(len: usize) -> ArchitectureGraph {
    let ids: Vec<String> = (0..len).map(|i| format!("n{i}")).collect();
    let mut graph = ArchitectureGraph::new();
    for id in &ids {
        graph = graph.with_node(node(id, NodeKind::App));
    }
    for pair in ids.windows(2) {
        graph = graph.connect(&pair[0], &pair[1]);
    }
    graph
}

/// Add an `entry_0` marker node fed by `user` and feeding `first_hop`.
pub fn with_entry(graph: ArchitectureGraph, first_hop: &str) -> ArchitectureGraph {
    graph
        .with_node(node("entry_0", NodeKind::Entry))
        .connect("user", "entry_0")
        .connect("entry_0", first_hop)
}

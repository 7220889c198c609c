//! Type-weighted split of a target throughput across the server nodes.
//!
//! Different tiers absorb different fractions of end-to-end traffic: load
//! balancers and gateways see the whole stream, caches and backup nodes only
//! a fraction. Each node receives `target * weight / total_weight`.

use crate::graph::{NodeKind, ServerNode};

/// Relative share of traffic a node of `kind` absorbs.
pub fn load_weight(kind: NodeKind) -> f64 {
    match kind {
        NodeKind::Lb => 1.2,
        NodeKind::Gateway => 1.3,
        NodeKind::App => 1.0,
        NodeKind::Micro => 0.8,
        NodeKind::Db => 0.6,
        NodeKind::Cache => 0.4,
        NodeKind::Mq => 0.7,
        NodeKind::Cdn => 0.3,
        NodeKind::Asg => 1.1,
        NodeKind::Dr => 0.2,
        NodeKind::User | NodeKind::Entry => 1.0,
    }
}

/// The load assigned to one node.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeShare {
    pub node_id: String,
    pub weight: f64,
    /// Assigned load in ops/sec.
    pub load: f64,
}

/// Per-node load assignment, in the order the nodes were given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadDistribution {
    shares: Vec<NodeShare>,
}

impl LoadDistribution {
    pub fn shares(&self) -> &[NodeShare] {
        &self.shares
    }

    /// Load assigned to the first node with this id.
    pub fn load_of(&self, node_id: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.node_id == node_id)
            .map(|s| s.load)
    }

    /// Sum of all assigned loads.
    pub fn total(&self) -> f64 {
        self.shares.iter().map(|s| s.load).sum()
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

/// Split `target_throughput` across `nodes` by kind weight.
///
/// `user` nodes model external traffic rather than servers and receive no
/// share. An empty server set yields an empty distribution.
pub fn distribute_load<'a>(
    nodes: impl IntoIterator<Item = &'a ServerNode>,
    target_throughput: f64,
) -> LoadDistribution {
    let servers: Vec<&ServerNode> = nodes
        .into_iter()
        .filter(|n| n.kind != NodeKind::User)
        .collect();

    let total_weight: f64 = servers.iter().map(|n| load_weight(n.kind)).sum();
    if servers.is_empty() || total_weight <= 0.0 {
        return LoadDistribution::default();
    }

    let shares = servers
        .into_iter()
        .map(|n| {
            let weight = load_weight(n.kind);
            NodeShare {
                node_id: n.id.clone(),
                weight,
                load: target_throughput * weight / total_weight,
            }
        })
        .collect();

    LoadDistribution { shares }
}

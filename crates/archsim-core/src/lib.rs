//! Archsim Core -- validation and capacity simulation for system
//! architecture graphs.
//!
//! An [`graph::ArchitectureGraph`] is a directed graph of typed server nodes
//! (load balancers, application servers, databases, caches, ...) joined by
//! bandwidth-limited connections. This crate answers two questions about it:
//!
//! 1. **Is it production-ready?** [`validation::validate`] applies structural
//!    rules per tier and reports errors (blocking) and warnings (advisory).
//! 2. **How does it hold up under load?** [`simulation::simulate`] splits a
//!    target throughput across nodes and connections, compares it against
//!    resource-derived capacities, and reports health, bottlenecks and the
//!    throughput ceiling.
//!
//! Both operations are pure: they read a snapshot and never mutate it.
//!
//! ```
//! use archsim_core::graph::{ArchitectureGraph, NodeKind, ServerNode};
//! use archsim_core::{simulate, validate};
//!
//! let graph = ArchitectureGraph::new()
//!     .with_node(ServerNode::new("lb1", NodeKind::Lb))
//!     .with_node(ServerNode::new("app1", NodeKind::App))
//!     .with_node(ServerNode::new("app2", NodeKind::App))
//!     .with_node(ServerNode::new("db1", NodeKind::Db))
//!     .connect("user", "lb1")
//!     .connect("lb1", "app1")
//!     .connect("lb1", "app2")
//!     .connect("app1", "db1")
//!     .connect("app2", "db1");
//!
//! assert!(validate(&graph, Some("lb1")).is_valid);
//! assert_eq!(simulate(&graph, 1000.0).metrics.system_health, 100.0);
//! ```
//!
//! # Key Types
//!
//! - [`graph::GraphIndex`] -- Adjacency and per-kind counts over a snapshot.
//! - [`validation::ValidationResult`] -- Errors and warnings, each tagged
//!   with the [`validation::Rule`] that raised it.
//! - [`simulation::Simulation`] -- Annotated graph copy plus
//!   [`simulation::SimulationMetrics`].
//! - [`preset::ServerPreset`] -- Named hardware configurations.

pub mod cycle;
pub mod distribution;
pub mod graph;
pub mod preset;
pub mod simulation;
pub mod validation;

#[cfg(feature = "parallel")]
pub mod batch;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use simulation::{SimulationConfig, simulate, simulate_with};
pub use validation::{ValidationConfig, validate, validate_with};

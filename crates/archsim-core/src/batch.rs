//! Evaluate many graphs at once on the rayon thread pool.
//!
//! Results come back in input order, identical to calling [`validate_with`]
//! or [`simulate_with`] on each graph sequentially.

use crate::graph::ArchitectureGraph;
use crate::simulation::{Simulation, SimulationConfig, simulate_with};
use crate::validation::{ValidationConfig, ValidationResult, validate_with};
use rayon::prelude::*;

/// A graph paired with the id of its entry point.
pub type Candidate<'a> = (&'a ArchitectureGraph, Option<&'a str>);

pub fn validate_batch(
    candidates: &[Candidate<'_>],
    config: &ValidationConfig,
) -> Vec<ValidationResult> {
    candidates
        .par_iter()
        .map(|&(graph, entry)| validate_with(graph, entry, config))
        .collect()
}

/// Simulate every graph under the same target throughput.
pub fn simulate_batch(
    graphs: &[ArchitectureGraph],
    target_throughput: f64,
    config: &SimulationConfig,
) -> Vec<Simulation> {
    graphs
        .par_iter()
        .map(|graph| simulate_with(graph, target_throughput, config))
        .collect()
}

/// Simulate one graph across a sweep of target throughputs.
pub fn sweep_targets(
    graph: &ArchitectureGraph,
    targets: &[f64],
    config: &SimulationConfig,
) -> Vec<Simulation> {
    targets
        .par_iter()
        .map(|&target| simulate_with(graph, target, config))
        .collect()
}

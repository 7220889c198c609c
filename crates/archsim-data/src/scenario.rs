//! Scenario resolution and evaluation.
//!
//! A scenario directory holds a required `scenario.{ron,toml,json}` and an
//! optional `engine.{ron,toml,json}` with validation and simulation policy.

use crate::loader::{
    DataLoadError, check_duplicate, deserialize_file, find_data_file, require_data_file,
    resolve_name,
};
use crate::schema::{ConnectionData, NodeData, ScenarioData};
use archsim_core::graph::{
    ArchitectureGraph, Connection, NodeKind, ServerNode, ServerResources, USER_NODE_ID,
};
use archsim_core::preset::preset_by_name;
use archsim_core::simulation::{ConfigError, Simulation, SimulationConfig, simulate_with};
use archsim_core::validation::{ValidationConfig, ValidationResult, validate_with};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

pub const SCENARIO_FILE: &str = "scenario";
pub const ENGINE_FILE: &str = "engine";

// ===========================================================================
// Types
// ===========================================================================

/// Validation and simulation policy for one evaluation.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub validation: ValidationConfig,
    pub simulation: SimulationConfig,
}

impl EngineConfig {
    pub fn validated(self) -> Result<Self, ConfigError> {
        Ok(Self {
            simulation: self.simulation.validated()?,
            ..self
        })
    }
}

/// A resolved scenario, ready to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: Option<String>,
    pub entry_point: Option<String>,
    pub target_throughput: f64,
    pub graph: ArchitectureGraph,
}

/// Validation and simulation outcome for one scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioReport {
    pub validation: ValidationResult,
    pub simulation: Simulation,
}

// ===========================================================================
// Loading
// ===========================================================================

/// Load and resolve a scenario file.
pub fn load_scenario(path: &Path) -> Result<Scenario, DataLoadError> {
    let data: ScenarioData = deserialize_file(path)?;
    build_scenario(data, path)
}

/// Load `engine.*` from `dir`, or the defaults if there is none.
pub fn load_engine_config(dir: &Path) -> Result<EngineConfig, DataLoadError> {
    match find_data_file(dir, ENGINE_FILE)? {
        Some(path) => {
            let config: EngineConfig = deserialize_file(&path)?;
            Ok(config.validated()?)
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Load the scenario and engine configuration stored in `dir`.
pub fn load_scenario_dir(dir: &Path) -> Result<(Scenario, EngineConfig), DataLoadError> {
    let scenario = load_scenario(&require_data_file(dir, SCENARIO_FILE)?)?;
    let config = load_engine_config(dir)?;
    Ok((scenario, config))
}

/// Resolve node types, presets and references of a deserialized scenario.
///
/// `file` is only used for error reporting. Duplicate node or connection
/// ids and connections to undeclared nodes are rejected; `user` is always a
/// valid connection source or target.
pub fn build_scenario(data: ScenarioData, file: &Path) -> Result<Scenario, DataLoadError> {
    if !data.target_throughput.is_finite() || data.target_throughput < 0.0 {
        return Err(DataLoadError::Parse {
            file: file.to_path_buf(),
            detail: format!(
                "target_throughput must be a non-negative number, got {}",
                data.target_throughput
            ),
        });
    }

    let mut node_ids: HashMap<String, NodeKind> = HashMap::new();
    let mut nodes = Vec::with_capacity(data.nodes.len());
    for entry in &data.nodes {
        check_duplicate(&node_ids, &entry.id, file)?;
        let node = resolve_node(entry, file)?;
        node_ids.insert(node.id.clone(), node.kind);
        nodes.push(node);
    }

    let mut edge_ids: HashMap<String, usize> = HashMap::new();
    let mut connections = Vec::with_capacity(data.connections.len());
    for (position, entry) in data.connections.iter().enumerate() {
        for endpoint in [&entry.source, &entry.target] {
            if endpoint != USER_NODE_ID {
                resolve_name(&node_ids, endpoint, file, "node")?;
            }
        }
        let conn = resolve_connection(position, entry);
        check_duplicate(&edge_ids, &conn.id, file)?;
        edge_ids.insert(conn.id.clone(), position);
        connections.push(conn);
    }

    let graph = ArchitectureGraph {
        nodes,
        connections,
        ..ArchitectureGraph::default()
    };
    let entry_point = data
        .entry_point
        .or_else(|| graph.entry_point().map(|n| n.id.clone()));

    tracing::debug!(
        file = %file.display(),
        nodes = graph.nodes.len(),
        edges = graph.connections.len(),
        entry_point = entry_point.as_deref().unwrap_or("<none>"),
        "scenario resolved"
    );

    Ok(Scenario {
        name: data.name,
        entry_point,
        target_throughput: data.target_throughput,
        graph,
    })
}

fn resolve_node(data: &NodeData, file: &Path) -> Result<ServerNode, DataLoadError> {
    let kind: NodeKind = data
        .kind
        .parse()
        .map_err(|_| DataLoadError::UnresolvedRef {
            file: file.to_path_buf(),
            name: data.kind.clone(),
            expected_kind: "node type",
        })?;

    let resources = match (&data.resources, &data.preset) {
        (Some(_), Some(_)) => {
            return Err(DataLoadError::Parse {
                file: file.to_path_buf(),
                detail: format!("node '{}' sets both `preset` and `resources`", data.id),
            });
        }
        (Some(r), None) => ServerResources::new(r.cpu, r.cpu_cores, r.memory, r.network_bandwidth),
        (None, Some(name)) => {
            preset_by_name(name)
                .ok_or_else(|| DataLoadError::UnresolvedRef {
                    file: file.to_path_buf(),
                    name: name.clone(),
                    expected_kind: "preset",
                })?
                .resources
        }
        (None, None) => kind.default_resources(),
    };

    let mut node = ServerNode::new(data.id.clone(), kind).with_resources(resources);
    node.label = data.label.clone().or_else(|| data.preset.clone());
    Ok(node)
}

fn resolve_connection(position: usize, data: &ConnectionData) -> Connection {
    let id = data
        .id
        .clone()
        .unwrap_or_else(|| format!("edge_{position}"));
    let conn = Connection::new(id, data.source.clone(), data.target.clone());
    match data.bandwidth {
        Some(bandwidth) => conn.with_bandwidth(bandwidth),
        None => conn,
    }
}

// ===========================================================================
// Evaluation
// ===========================================================================

/// Validate and simulate `scenario` under `config`.
pub fn evaluate_scenario(scenario: &Scenario, config: &EngineConfig) -> ScenarioReport {
    let validation = validate_with(
        &scenario.graph,
        scenario.entry_point.as_deref(),
        &config.validation,
    );
    let simulation = simulate_with(
        &scenario.graph,
        scenario.target_throughput,
        &config.simulation,
    );
    ScenarioReport {
        validation,
        simulation,
    }
}

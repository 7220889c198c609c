pub mod loader;
pub mod scenario;
pub mod schema;

pub use loader::DataLoadError;
pub use scenario::{
    EngineConfig, Scenario, ScenarioReport, evaluate_scenario, load_engine_config, load_scenario,
    load_scenario_dir,
};

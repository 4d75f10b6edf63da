pub mod reports;
pub mod scenarios;
pub mod season;
pub mod seeds;
pub mod tester;

pub use scenarios::{find_scenario, list_scenarios};
pub use seeds::resolve_seed_inputs;
pub use tester::{LogicTester, ScenarioResult};

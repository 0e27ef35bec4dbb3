//! Scenario testing system for deterministic sling testing
//!
//! Runs scripted pointer input from TOML files against the headless
//! simulation and checks the emitted events and the resulting world state.

pub mod assertions;
pub mod input;
pub mod parser;
pub mod runner;

pub use assertions::{AssertionError, CapturedEvent, WorldState, check_sequence, check_state};
pub use input::ScriptedInputs;
pub use parser::{
    ExpectedEvent, FrameInput, ScenarioError, StateAssertion, TestDefinition, TestExpectations,
    TestSetup, parse_test_file,
};
pub use runner::{TestResult, run_test};

/// Default path for test scenarios
pub const SCENARIOS_DIR: &str = "tests/scenarios";

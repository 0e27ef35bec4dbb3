//! TOML test file parsing

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::tuning::SlingshotTuning;

/// Errors from loading a scenario file
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid scenario {name}: {reason}")]
    Invalid { name: String, reason: String },
}

/// Complete test definition from TOML file
#[derive(Debug, Deserialize)]
pub struct TestDefinition {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub setup: TestSetup,
    #[serde(default)]
    pub input: Vec<FrameInput>,
    #[serde(default)]
    pub expect: TestExpectations,
}

/// Scene overrides. Anything left out keeps the default scene.
#[derive(Debug, Default, Deserialize)]
pub struct TestSetup {
    /// Partial tuning; missing fields keep their defaults
    pub tuning: Option<SlingshotTuning>,
    pub stones: Option<Vec<[f32; 2]>>,
    pub targets: Option<Vec<[f32; 2]>>,
    pub basket_center: Option<[f32; 2]>,
    pub basket_size: Option<[f32; 2]>,
    pub basket_slots: Option<Vec<[f32; 2]>>,
}

/// Pointer actions applied right before the given frame is simulated
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrameInput {
    pub frame: u32,
    /// Move the pointer here (world units)
    pub pointer: Option<[f32; 2]>,
    #[serde(default)]
    pub down: bool,
    #[serde(default)]
    pub up: bool,
    #[serde(default)]
    pub reset: bool,
}

/// Expected test outcomes
#[derive(Debug, Default, Deserialize)]
pub struct TestExpectations {
    #[serde(default)]
    pub sequence: Vec<ExpectedEvent>,
    /// Multiple state assertions at different frames (uses [[expect.state]] TOML syntax)
    #[serde(default)]
    pub state: Vec<StateAssertion>,
}

/// Expected event in sequence
#[derive(Debug, Deserialize)]
pub struct ExpectedEvent {
    pub event: String,
    /// Index of the stone (spawn order) the event must be about
    pub stone: Option<usize>,
    pub frame_min: Option<u32>,
    pub frame_max: Option<u32>,
}

/// State assertion after simulation
#[derive(Debug, Clone, Deserialize)]
pub struct StateAssertion {
    pub after_frame: u32,
    #[serde(default)]
    pub checks: Vec<String>,
}

impl TestDefinition {
    /// Last frame the scenario needs simulated
    pub fn max_frame(&self) -> u32 {
        let inputs = self.input.iter().map(|i| i.frame);
        let states = self.expect.state.iter().map(|s| s.after_frame);
        let events = self.expect.sequence.iter().filter_map(|e| e.frame_max);
        inputs.chain(states).chain(events).max().unwrap_or(0)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if let Some(tuning) = &self.setup.tuning {
            tuning.validate().map_err(|err| ScenarioError::Invalid {
                name: self.name.clone(),
                reason: err.to_string(),
            })?;
        }
        if let Some(input) = self.input.iter().find(|i| i.frame == 0) {
            return Err(ScenarioError::Invalid {
                name: self.name.clone(),
                reason: format!("input frames start at 1, got {:?}", input),
            });
        }
        Ok(())
    }
}

/// Parse and validate a test file from path
pub fn parse_test_file(path: &Path) -> Result<TestDefinition, ScenarioError> {
    let content = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let test: TestDefinition = toml::from_str(&content).map_err(|source| ScenarioError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    test.validate()?;
    Ok(test)
}

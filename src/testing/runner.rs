//! Test execution engine

use bevy::prelude::*;

use super::assertions::{
    AssertionError, CapturedEvent, SlingState, WorldState, check_sequence, check_state,
};
use super::input::ScriptedInputs;
use super::parser::{TestDefinition, TestSetup};
use crate::projectile::ProjectileId;
use crate::simulation::{HeadlessAppBuilder, SlingSim};
use crate::world::SceneLayout;

/// Frames simulated when a scenario names no frame at all
const DEFAULT_FRAMES: u32 = 60;

/// Result of running a test
#[derive(Debug)]
pub enum TestResult {
    Pass { frames: u32 },
    Fail { error: AssertionError },
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass { .. })
    }
}

/// Apply the scenario's overrides on top of the default scene
fn layout_for(setup: &TestSetup) -> SceneLayout {
    let points = |list: &Vec<[f32; 2]>| list.iter().map(|p| Vec2::from_array(*p)).collect();
    let mut layout = SceneLayout::default();
    if let Some(stones) = &setup.stones {
        layout.stones = points(stones);
    }
    if let Some(targets) = &setup.targets {
        layout.targets = points(targets);
    }
    if let Some(center) = setup.basket_center {
        layout.basket_center = Vec2::from_array(center);
    }
    if let Some(size) = setup.basket_size {
        layout.basket_size = Vec2::from_array(size);
    }
    if let Some(slots) = &setup.basket_slots {
        layout.basket_slots = points(slots);
    }
    layout
}

fn extract_world_state(sim: &mut SlingSim, stone_ids: &[ProjectileId]) -> WorldState {
    let controller = sim.controller();
    let sling = SlingState {
        pivot: controller.pivot(),
        dragging: controller.is_dragging(),
        returning: controller.is_returning(),
        registered: controller
            .registered()
            .and_then(|id| stone_ids.iter().position(|s| *s == id)),
    };
    WorldState {
        sling,
        stones: sim.stones(),
        targets: sim.targets(),
        basket_count: sim.basket_contents().len(),
    }
}

/// Run a single test and return the result
pub fn run_test(test: &TestDefinition) -> TestResult {
    let mut builder = HeadlessAppBuilder::new()
        .with_layout(layout_for(&test.setup))
        .with_minimal_threads();
    if let Some(tuning) = test.setup.tuning {
        builder = builder.with_tuning(tuning);
    }

    let mut sim = SlingSim::new(builder);
    let stone_ids: Vec<ProjectileId> = sim.stones().iter().map(|s| s.id).collect();
    if let Some(stones) = &test.setup.stones
        && stones.len() != stone_ids.len()
    {
        return TestResult::Error {
            message: format!(
                "setup spawned {} stones, expected {}",
                stone_ids.len(),
                stones.len()
            ),
        };
    }

    let scripted = ScriptedInputs::from_inputs(&test.input);
    let max_frame = match test.max_frame().max(scripted.last_frame()) {
        0 => DEFAULT_FRAMES,
        n => n,
    };

    let mut state_checks = test.expect.state.clone();
    state_checks.sort_by_key(|s| s.after_frame);
    let mut next_check = 0;
    let mut captured = Vec::new();

    for frame in 1..=max_frame {
        scripted.apply(frame, &mut sim);
        let seen = sim.events().len();
        sim.tick();
        captured.extend(
            sim.events()[seen..]
                .iter()
                .map(|e| CapturedEvent::from_sling_event(frame, &e.event, &stone_ids)),
        );

        while next_check < state_checks.len() && state_checks[next_check].after_frame == frame {
            let state = extract_world_state(&mut sim, &stone_ids);
            if let Err(error) = check_state(&state_checks[next_check], &state) {
                return TestResult::Fail {
                    error: AssertionError {
                        message: format!("[frame {}] {}", frame, error.message),
                        ..error
                    },
                };
            }
            next_check += 1;
        }
    }

    if let Err(error) = check_sequence(&test.expect.sequence, &captured) {
        return TestResult::Fail { error };
    }

    TestResult::Pass { frames: max_frame }
}

//! Scripted pointer input for tests

use bevy::prelude::*;
use std::collections::BTreeMap;

use super::parser::FrameInput;
use crate::simulation::SlingSim;

/// Pointer actions keyed by the frame they precede
#[derive(Debug, Default)]
pub struct ScriptedInputs {
    frames: BTreeMap<u32, Vec<FrameInput>>,
}

impl ScriptedInputs {
    /// Create from parsed frame inputs
    pub fn from_inputs(inputs: &[FrameInput]) -> Self {
        let mut frames: BTreeMap<u32, Vec<FrameInput>> = BTreeMap::new();
        for input in inputs {
            frames.entry(input.frame).or_default().push(input.clone());
        }
        Self { frames }
    }

    pub fn last_frame(&self) -> u32 {
        self.frames.keys().next_back().copied().unwrap_or(0)
    }

    /// Queue this frame's actions on the sim. Within one entry the pointer
    /// moves first, then presses, then releases.
    pub fn apply(&self, frame: u32, sim: &mut SlingSim) {
        let Some(inputs) = self.frames.get(&frame) else {
            return;
        };
        for input in inputs {
            if let Some([x, y]) = input.pointer {
                sim.pointer_move(Vec2::new(x, y));
            }
            if input.down {
                sim.pointer_press();
            }
            if input.up {
                sim.pointer_up();
            }
            if input.reset {
                sim.press_reset();
            }
        }
    }
}

//! Return-spring session: the pivot's damped oscillation back to rest

use bevy::prelude::*;

use super::SpringParams;

/// Offset from rest after `elapsed` seconds of damped oscillation
pub fn spring_offset(initial_offset: Vec2, damping: f32, frequency: f32, elapsed: f32) -> Vec2 {
    initial_offset * (-damping * elapsed).exp() * (frequency * elapsed).cos()
}

/// One sample of a running session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpringSample {
    /// Still oscillating; pivot sits at rest + offset
    Moving(Vec2),
    /// Envelope fell below threshold or time ran out; pivot snaps to rest
    Settled,
}

/// A return animation in progress.
///
/// Created on release, advanced once per tick, dropped on settle or when a
/// new drag supersedes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringReturn {
    initial_offset: Vec2,
    elapsed: f32,
    /// Current envelope factor `e^(-damping*elapsed)`
    decay: f32,
}

impl SpringReturn {
    pub fn new(initial_offset: Vec2) -> Self {
        Self {
            initial_offset,
            elapsed: 0.0,
            decay: 1.0,
        }
    }

    pub fn initial_offset(&self) -> Vec2 {
        self.initial_offset
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn decay(&self) -> f32 {
        self.decay
    }

    /// Advance by `dt` seconds.
    ///
    /// Ends on whichever comes first: the envelope
    /// `|offset0| * e^(-damping*t)` dropping below `end_threshold`, or
    /// `elapsed >= max_duration`.
    pub fn advance(&mut self, dt: f32, params: &SpringParams) -> SpringSample {
        self.elapsed += dt.max(0.0);
        self.decay = (-params.damping * self.elapsed).exp();

        let envelope = self.initial_offset.length() * self.decay;
        if envelope.is_nan()
            || envelope < params.end_threshold
            || self.elapsed >= params.max_duration
        {
            return SpringSample::Settled;
        }

        SpringSample::Moving(
            self.initial_offset * self.decay * (params.frequency * self.elapsed).cos(),
        )
    }
}

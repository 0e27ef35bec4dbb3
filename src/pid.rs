//! Angular PID: bleeds spin off free stones so they settle instead of rolling forever

use bevy::prelude::*;

use crate::constants::*;
use crate::physics::{AngularVelocity, PhysicsBody, apply_torque};

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AngularPid {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub target_angular_velocity: f32,
    integral: f32,
    previous_error: f32,
}

impl Default for AngularPid {
    fn default() -> Self {
        Self::new(PID_KP, PID_KI, PID_KD, PID_TARGET_ANGULAR_VELOCITY)
    }
}

impl AngularPid {
    pub fn new(kp: f32, ki: f32, kd: f32, target_angular_velocity: f32) -> Self {
        Self {
            kp,
            ki,
            kd,
            target_angular_velocity,
            integral: 0.0,
            previous_error: 0.0,
        }
    }

    pub fn set_gains(&mut self, kp: f32, ki: f32, kd: f32, target_angular_velocity: f32) {
        self.kp = kp;
        self.ki = ki;
        self.kd = kd;
        self.target_angular_velocity = target_angular_velocity;
    }

    /// Torque to apply this step for a body spinning at `current`
    pub fn update(&mut self, current: f32, dt: f32) -> f32 {
        if dt <= 0.0 {
            return 0.0;
        }
        let error = self.target_angular_velocity - current;
        self.integral += error * dt;
        let derivative = (error - self.previous_error) / dt;
        self.previous_error = error;
        self.kp * error + self.ki * self.integral + self.kd * derivative
    }

    /// Forget accumulated error (after a reset or while frozen)
    pub fn clear(&mut self) {
        self.integral = 0.0;
        self.previous_error = 0.0;
    }
}

/// Apply PID torque to every free body that carries a controller
pub fn angular_damping(
    time: Res<Time>,
    mut query: Query<(&mut AngularPid, &PhysicsBody, &mut AngularVelocity)>,
) {
    let dt = time.delta_secs();
    for (mut pid, body, mut spin) in &mut query {
        if body.suspended {
            pid.clear();
            continue;
        }
        let torque = pid.update(spin.0, dt);
        apply_torque(&mut spin, body, torque, dt);
    }
}

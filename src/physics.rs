//! Minimal 2D rigid-body integration
//!
//! Enough physics for the scene: gravity, linear and angular velocity, and
//! a suspend flag that turns a body kinematic. `BodyMut` adapts the
//! components to the `RigidBody` seam the sling and projectiles talk to.

use bevy::prelude::*;

use crate::constants::*;
use crate::projectile::RigidBody;

#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct Velocity(pub Vec2);

/// Spin in radians per second (counter-clockwise positive)
#[derive(Component, Debug, Default, Clone, Copy, PartialEq)]
pub struct AngularVelocity(pub f32);

/// Downward acceleration in world units per second squared
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct Gravity(pub f32);

impl Default for Gravity {
    fn default() -> Self {
        Self(GRAVITY)
    }
}

/// Mass properties and solver flags of one body
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct PhysicsBody {
    pub mass: f32,
    pub inertia: f32,
    pub gravity_scale: f32,
    /// Collision circle radius
    pub radius: f32,
    /// Kinematic: skipped by gravity and integration
    pub suspended: bool,
    pub collision_enabled: bool,
}

impl PhysicsBody {
    pub fn stone() -> Self {
        Self {
            mass: STONE_MASS,
            inertia: STONE_INERTIA,
            gravity_scale: STONE_GRAVITY_SCALE,
            radius: STONE_RADIUS,
            suspended: false,
            collision_enabled: true,
        }
    }

    /// Hanging target: kinematic until knocked loose
    pub fn target() -> Self {
        Self {
            mass: 1.0,
            inertia: 0.05,
            gravity_scale: 0.0,
            radius: TARGET_RADIUS,
            suspended: true,
            collision_enabled: true,
        }
    }
}

/// Borrowed view of one body's components, usable as a `RigidBody`
pub struct BodyMut<'a> {
    pub transform: &'a mut Transform,
    pub velocity: &'a mut Velocity,
    pub spin: &'a mut AngularVelocity,
    pub body: &'a mut PhysicsBody,
}

impl RigidBody for BodyMut<'_> {
    fn position(&self) -> Vec2 {
        self.transform.translation.truncate()
    }

    fn set_position(&mut self, position: Vec2) {
        // Keep z for draw order
        self.transform.translation.x = position.x;
        self.transform.translation.y = position.y;
    }

    fn apply_impulse(&mut self, direction: Vec2, magnitude: f32) {
        self.velocity.0 += direction * magnitude / self.body.mass;
    }

    fn set_physics_suspended(&mut self, suspended: bool) {
        self.body.suspended = suspended;
    }

    fn physics_suspended(&self) -> bool {
        self.body.suspended
    }

    fn set_collision_enabled(&mut self, enabled: bool) {
        self.body.collision_enabled = enabled;
    }

    fn halt(&mut self) {
        self.velocity.0 = Vec2::ZERO;
        self.spin.0 = 0.0;
    }
}

/// Accelerate free bodies downward
pub fn apply_gravity(
    gravity: Res<Gravity>,
    time: Res<Time>,
    mut query: Query<(&PhysicsBody, &mut Velocity)>,
) {
    let dt = time.delta_secs();
    for (body, mut velocity) in &mut query {
        if body.suspended {
            continue;
        }
        velocity.0.y -= gravity.0 * body.gravity_scale * dt;
    }
}

/// Integrate position and rotation of free bodies
pub fn apply_velocity(
    time: Res<Time>,
    mut query: Query<(&PhysicsBody, &Velocity, &AngularVelocity, &mut Transform)>,
) {
    let dt = time.delta_secs();
    for (body, velocity, spin, mut transform) in &mut query {
        if body.suspended {
            continue;
        }
        transform.translation.x += velocity.0.x * dt;
        transform.translation.y += velocity.0.y * dt;
        transform.rotate_z(spin.0 * dt);
    }
}

/// Apply a torque for `dt` seconds
pub fn apply_torque(spin: &mut AngularVelocity, body: &PhysicsBody, torque: f32, dt: f32) {
    if body.inertia > 0.0 {
        spin.0 += torque / body.inertia * dt;
    }
}

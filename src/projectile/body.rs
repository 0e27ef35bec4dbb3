//! Seams between projectiles, the sling, and whatever integrates physics

use bevy::prelude::*;

use super::{Projectile, ProjectileId};

/// Rigid-body handle of a projectile.
///
/// The sling only ever teleports, freezes, and kicks bodies; integration,
/// gravity and collision response belong to the implementor.
pub trait RigidBody {
    fn position(&self) -> Vec2;

    fn set_position(&mut self, position: Vec2);

    /// Instantaneous impulse of `magnitude` along `direction` (unit or zero).
    fn apply_impulse(&mut self, direction: Vec2, magnitude: f32);

    /// Suspended bodies are kinematic: no gravity, no integration.
    fn set_physics_suspended(&mut self, suspended: bool);

    fn physics_suspended(&self) -> bool;

    fn set_collision_enabled(&mut self, enabled: bool);

    /// Zero linear and angular velocity.
    fn halt(&mut self);
}

/// Non-owning lookup from a registered id to the live projectile.
///
/// The sling holds only a `ProjectileId`; whoever owns projectiles (the ECS
/// world, a pool) resolves it for the duration of one call.
pub trait ProjectileAccess {
    /// Run `f` against the projectile with `id`, or return `None` if it is gone.
    fn with_projectile<R, F>(&mut self, id: ProjectileId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Projectile, &mut dyn RigidBody) -> R;
}

/// Access that resolves nothing, for ticks with no projectiles in play
pub struct NoProjectiles;

impl ProjectileAccess for NoProjectiles {
    fn with_projectile<R, F>(&mut self, _id: ProjectileId, _f: F) -> Option<R>
    where
        F: FnOnce(&mut Projectile, &mut dyn RigidBody) -> R,
    {
        None
    }
}

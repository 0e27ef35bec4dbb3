//! ECS bindings: resolve `ProjectileId`s against a query

use bevy::prelude::*;

use super::{Projectile, ProjectileAccess, ProjectileId, RigidBody};
use crate::physics::{AngularVelocity, BodyMut, PhysicsBody, Velocity};

/// Components a projectile entity carries
pub type ProjectileBodyData = (
    &'static mut Projectile,
    &'static mut Transform,
    &'static mut Velocity,
    &'static mut AngularVelocity,
    &'static mut PhysicsBody,
);

/// `ProjectileAccess` over a borrowed projectile query
pub struct ProjectileQuery<'q, 'w, 's> {
    query: &'q mut Query<'w, 's, ProjectileBodyData>,
}

impl<'q, 'w, 's> ProjectileQuery<'q, 'w, 's> {
    pub fn new(query: &'q mut Query<'w, 's, ProjectileBodyData>) -> Self {
        Self { query }
    }
}

impl ProjectileAccess for ProjectileQuery<'_, '_, '_> {
    fn with_projectile<R, F>(&mut self, id: ProjectileId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Projectile, &mut dyn RigidBody) -> R,
    {
        let item = self
            .query
            .iter_mut()
            .find(|(projectile, ..)| projectile.id() == id)?;
        Some(with_body(item, f))
    }
}

/// Run `f` with a projectile and its body handle from one query item
pub fn with_body<R>(
    (projectile, transform, velocity, spin, body): (
        Mut<Projectile>,
        Mut<Transform>,
        Mut<Velocity>,
        Mut<AngularVelocity>,
        Mut<PhysicsBody>,
    ),
    f: impl FnOnce(&mut Projectile, &mut dyn RigidBody) -> R,
) -> R {
    let mut handle = BodyMut {
        transform: transform.into_inner(),
        velocity: velocity.into_inner(),
        spin: spin.into_inner(),
        body: body.into_inner(),
    };
    f(projectile.into_inner(), &mut handle)
}

/// Count down launch grace timers
pub fn tick_projectiles(time: Res<Time>, mut projectiles: Query<&mut Projectile>) {
    let dt = time.delta_secs();
    for mut projectile in &mut projectiles {
        if projectile.in_launch_grace() {
            projectile.tick(dt);
        }
    }
}

//! In-memory bodies and a small pool for exercising the sling without a world

use bevy::prelude::*;

use super::{Projectile, ProjectileAccess, ProjectileId, RigidBody};

#[derive(Debug, Clone, PartialEq)]
pub struct PointBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub angular_velocity: f32,
    pub mass: f32,
    pub suspended: bool,
    pub collision_enabled: bool,
    pub impulses: Vec<(Vec2, f32)>,
}

impl PointBody {
    pub fn at(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            angular_velocity: 0.0,
            mass: 1.0,
            suspended: false,
            collision_enabled: true,
            impulses: Vec::new(),
        }
    }
}

impl RigidBody for PointBody {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    fn apply_impulse(&mut self, direction: Vec2, magnitude: f32) {
        self.impulses.push((direction, magnitude));
        self.velocity += direction * magnitude / self.mass;
    }

    fn set_physics_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    fn physics_suspended(&self) -> bool {
        self.suspended
    }

    fn set_collision_enabled(&mut self, enabled: bool) {
        self.collision_enabled = enabled;
    }

    fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
        self.angular_velocity = 0.0;
    }
}

/// Owns projectiles and their bodies, like a spawner would
#[derive(Default)]
pub struct ProjectilePool {
    entries: Vec<(Projectile, PointBody)>,
}

impl ProjectilePool {
    pub fn spawn(&mut self, id: u64, position: Vec2) -> ProjectileId {
        let id = ProjectileId(id);
        self.entries.push((Projectile::new(id), PointBody::at(position)));
        id
    }

    pub fn get(&self, id: ProjectileId) -> Option<&(Projectile, PointBody)> {
        self.entries.iter().find(|(p, _)| p.id() == id)
    }

    pub fn get_mut(&mut self, id: ProjectileId) -> Option<(&mut Projectile, &mut PointBody)> {
        self.entries
            .iter_mut()
            .find(|(p, _)| p.id() == id)
            .map(|(p, b)| (p, b))
    }

    pub fn despawn(&mut self, id: ProjectileId) {
        self.entries.retain(|(p, _)| p.id() != id);
    }
}

impl ProjectileAccess for ProjectilePool {
    fn with_projectile<R, F>(&mut self, id: ProjectileId, f: F) -> Option<R>
    where
        F: FnOnce(&mut Projectile, &mut dyn RigidBody) -> R,
    {
        let (projectile, body) = self.get_mut(id)?;
        let body: &mut dyn RigidBody = body;
        Some(f(projectile, body))
    }
}

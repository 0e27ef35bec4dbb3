//! Hanging targets knocked loose by launched stones

use bevy::prelude::*;

use crate::constants::*;
use crate::events::{EventBus, SlingEvent};
use crate::helpers::circles_overlap;
use crate::physics::{AngularVelocity, PhysicsBody, Velocity};
use crate::projectile::{Projectile, ProjectileState};

/// Kinematic until hit, then falls under `gravity_scale`.
///
/// The hit itself imparts no motion; whatever velocity the body has is
/// cleared once, `activate_delay` seconds after activation.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Target {
    /// Where the target hangs before it is hit
    pub spawn: Vec2,
    pub gravity_scale: f32,
    pub activate_delay: f32,
    pub(crate) activated: bool,
    pub(crate) settle_timer: Option<f32>,
}

impl Default for Target {
    fn default() -> Self {
        Self {
            spawn: Vec2::ZERO,
            gravity_scale: TARGET_GRAVITY_SCALE,
            activate_delay: TARGET_ACTIVATE_DELAY,
            activated: false,
            settle_timer: None,
        }
    }
}

impl Target {
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Switch the body to dynamic. Returns false if already active.
    pub fn activate(&mut self, body: &mut PhysicsBody) -> bool {
        if self.activated {
            return false;
        }
        self.activated = true;
        self.settle_timer = Some(self.activate_delay);
        body.suspended = false;
        body.gravity_scale = self.gravity_scale;
        true
    }

    /// Back to kinematic and weightless, waiting for the next hit
    pub fn reset(&mut self, body: &mut PhysicsBody) {
        self.activated = false;
        self.settle_timer = None;
        body.suspended = true;
        body.gravity_scale = 0.0;
    }

    /// Count down the settle timer. True on the tick it runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        let Some(remaining) = self.settle_timer.as_mut() else {
            return false;
        };
        *remaining -= dt;
        if *remaining <= 0.0 {
            self.settle_timer = None;
            return true;
        }
        false
    }
}

/// Activate targets touched by a stone in flight
pub fn target_impacts(
    projectiles: Query<(&Projectile, &Transform, &PhysicsBody)>,
    mut targets: Query<(&mut Target, &Transform, &mut PhysicsBody), Without<Projectile>>,
    mut bus: ResMut<EventBus>,
) {
    for (projectile, stone_transform, stone_body) in &projectiles {
        if projectile.state() != ProjectileState::InFlight
            || projectile.in_launch_grace()
            || !stone_body.collision_enabled
        {
            continue;
        }
        let stone = stone_transform.translation.truncate();
        for (mut target, transform, mut body) in &mut targets {
            if target.is_activated() || !body.collision_enabled {
                continue;
            }
            let at = transform.translation.truncate();
            if circles_overlap(stone, stone_body.radius, at, body.radius)
                && target.activate(&mut body)
            {
                info!("Target at {:?} hit by {}", at, projectile.id());
                bus.emit(SlingEvent::TargetActivated {
                    projectile: projectile.id(),
                });
            }
        }
    }
}

/// Clear activation velocity once the delay has passed
pub fn settle_targets(
    time: Res<Time>,
    mut targets: Query<(&mut Target, &mut Velocity, &mut AngularVelocity)>,
) {
    let dt = time.delta_secs();
    for (mut target, mut velocity, mut spin) in &mut targets {
        if target.tick(dt) {
            velocity.0 = Vec2::ZERO;
            spin.0 = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_once() {
        let mut target = Target {
            gravity_scale: 0.5,
            ..Default::default()
        };
        let mut body = PhysicsBody::target();
        assert!(body.suspended);

        assert!(target.activate(&mut body));
        assert!(!body.suspended);
        assert_eq!(body.gravity_scale, 0.5);
        assert!(!target.activate(&mut body));
    }

    #[test]
    fn test_settle_timer_fires_once() {
        let mut target = Target {
            activate_delay: 0.1,
            ..Default::default()
        };
        assert!(!target.tick(1.0));

        target.activate(&mut PhysicsBody::target());
        assert!(!target.tick(0.05));
        assert!(target.tick(0.06));
        assert!(!target.tick(0.06));
    }

    #[test]
    fn test_reset_rehangs_target() {
        let mut target = Target::default();
        let mut body = PhysicsBody::target();
        target.activate(&mut body);
        assert!(target.is_activated());

        target.reset(&mut body);
        assert!(!target.is_activated());
        assert!(body.suspended);
        assert_eq!(body.gravity_scale, 0.0);
        // Pending settle is dropped along with the activation
        assert!(!target.tick(1.0));
        // And it can be knocked loose again
        assert!(target.activate(&mut body));
    }
}

//! Projectile interaction state machine

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::RigidBody;
use crate::constants::LAUNCH_GRACE_PERIOD;
use crate::sling::LaunchController;

/// Stable identifier the sling uses to refer to a projectile it does not own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectileId(pub u64);

impl From<Entity> for ProjectileId {
    fn from(entity: Entity) -> Self {
        Self(entity.to_bits())
    }
}

impl fmt::Display for ProjectileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Projectile state - Idle, Dragging, Attached, or InFlight
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileState {
    /// Free body, not associated with the sling
    #[default]
    Idle,
    /// Moved directly by the pointer, physics suspended
    Dragging,
    /// Riding the sling pivot, physics suspended
    Attached,
    /// Launched; the physics solver owns the trajectory
    InFlight,
}

impl ProjectileState {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectileState::Idle => "Idle",
            ProjectileState::Dragging => "Dragging",
            ProjectileState::Attached => "Attached",
            ProjectileState::InFlight => "InFlight",
        }
    }
}

/// One attachable stone.
///
/// Transitions: `Idle -> Dragging` (pointer press), `Dragging -> Idle`
/// (release away from the sling), `Idle | Dragging -> Attached` (attach zone,
/// slot free), `Attached -> InFlight` (launch). Only `reset` leads back to
/// `Idle` from `InFlight`.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    id: ProjectileId,
    state: ProjectileState,
    /// Body position relative to the pointer while dragging
    grab_offset: Vec2,
    /// Time left in the post-launch grace period
    launch_grace: f32,
    grace_period: f32,
}

impl Projectile {
    pub fn new(id: ProjectileId) -> Self {
        Self {
            id,
            state: ProjectileState::Idle,
            grab_offset: Vec2::ZERO,
            launch_grace: 0.0,
            grace_period: LAUNCH_GRACE_PERIOD,
        }
    }

    pub fn with_grace_period(mut self, seconds: f32) -> Self {
        self.grace_period = seconds.max(0.0);
        self
    }

    pub fn id(&self) -> ProjectileId {
        self.id
    }

    pub fn state(&self) -> ProjectileState {
        self.state
    }

    pub fn grace_period(&self) -> f32 {
        self.grace_period
    }

    pub fn set_grace_period(&mut self, seconds: f32) {
        self.grace_period = seconds.max(0.0);
    }

    /// True while the post-launch grace timer is running
    pub fn in_launch_grace(&self) -> bool {
        self.launch_grace > 0.0
    }

    // -------------------------------------------------------------------------
    // Direct drag (pointer moves the stone itself, not the sling)
    // -------------------------------------------------------------------------

    /// Pick the stone up. Only an idle stone can be grabbed.
    pub fn begin_drag(&mut self, pointer: Vec2, body: &mut dyn RigidBody) -> bool {
        if self.state != ProjectileState::Idle {
            return false;
        }
        body.halt();
        body.set_physics_suspended(true);
        self.grab_offset = body.position() - pointer;
        self.state = ProjectileState::Dragging;
        true
    }

    pub fn update_drag(&mut self, pointer: Vec2, body: &mut dyn RigidBody) -> bool {
        if self.state != ProjectileState::Dragging {
            return false;
        }
        body.set_position(pointer + self.grab_offset);
        true
    }

    /// Drop the stone where it is and hand it back to physics
    pub fn end_drag(&mut self, body: &mut dyn RigidBody) -> bool {
        if self.state != ProjectileState::Dragging {
            return false;
        }
        body.set_physics_suspended(false);
        self.grab_offset = Vec2::ZERO;
        self.state = ProjectileState::Idle;
        true
    }

    // -------------------------------------------------------------------------
    // Sling contract
    // -------------------------------------------------------------------------

    /// The stone entered an attach-eligible region.
    ///
    /// Asks `controller` for the slot; a no-op once attached or in flight.
    pub fn on_attach_zone_enter(
        &mut self,
        controller: &mut LaunchController,
        body: &mut dyn RigidBody,
    ) -> bool {
        match self.state {
            ProjectileState::Idle | ProjectileState::Dragging => controller.attach(self, body),
            ProjectileState::Attached | ProjectileState::InFlight => false,
        }
    }

    /// Freeze onto the pivot. Called by the controller once the slot is taken.
    pub(crate) fn mark_attached(&mut self, pivot: Vec2, body: &mut dyn RigidBody) {
        body.halt();
        body.set_physics_suspended(true);
        body.set_position(pivot);
        self.grab_offset = Vec2::ZERO;
        self.launch_grace = 0.0;
        self.state = ProjectileState::Attached;
    }

    /// Launch callback. Position is left alone; the trajectory now belongs to
    /// the physics solver.
    pub fn on_launched(&mut self, body: &mut dyn RigidBody) -> bool {
        if self.state != ProjectileState::Attached {
            return false;
        }
        body.set_physics_suspended(false);
        body.set_collision_enabled(true);
        self.launch_grace = self.grace_period;
        self.state = ProjectileState::InFlight;
        true
    }

    /// Force the stone back to `Idle` from any state and cancel its timers.
    pub fn reset(&mut self, body: &mut dyn RigidBody) {
        body.set_physics_suspended(false);
        body.set_collision_enabled(true);
        self.grab_offset = Vec2::ZERO;
        self.launch_grace = 0.0;
        self.state = ProjectileState::Idle;
    }

    /// Advance object-local timers
    pub fn tick(&mut self, dt: f32) {
        if self.launch_grace > 0.0 {
            self.launch_grace = (self.launch_grace - dt).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::test_support::PointBody;
    use crate::sling::{AnchorPair, SlingConfig};

    fn controller() -> LaunchController {
        LaunchController::new(
            SlingConfig::default(),
            AnchorPair::new(Vec2::new(-1.0, 0.0), Vec2::new(1.0, 0.0)),
        )
    }

    #[test]
    fn test_direct_drag_keeps_grab_offset() {
        let mut stone = Projectile::new(ProjectileId(1));
        let mut body = PointBody::at(Vec2::new(2.0, 2.0));
        body.velocity = Vec2::new(3.0, 0.0);

        assert!(stone.begin_drag(Vec2::new(2.1, 1.9), &mut body));
        assert_eq!(stone.state(), ProjectileState::Dragging);
        assert!(body.suspended);
        assert_eq!(body.velocity, Vec2::ZERO);

        assert!(stone.update_drag(Vec2::new(4.1, 0.9), &mut body));
        assert!(body.position.abs_diff_eq(Vec2::new(4.0, 1.0), 1e-5));

        assert!(stone.end_drag(&mut body));
        assert_eq!(stone.state(), ProjectileState::Idle);
        assert!(!body.suspended);
    }

    #[test]
    fn test_drag_rejected_while_attached_or_in_flight() {
        let mut sling = controller();
        let mut stone = Projectile::new(ProjectileId(1));
        let mut body = PointBody::at(Vec2::ZERO);

        assert!(stone.on_attach_zone_enter(&mut sling, &mut body));
        assert!(!stone.begin_drag(Vec2::ZERO, &mut body));
        assert!(!stone.update_drag(Vec2::new(5.0, 5.0), &mut body));
        assert!(!stone.end_drag(&mut body));
        assert_eq!(body.position, Vec2::ZERO);

        assert!(stone.on_launched(&mut body));
        assert!(!stone.begin_drag(Vec2::ZERO, &mut body));
        assert_eq!(stone.state(), ProjectileState::InFlight);
    }

    #[test]
    fn test_attach_from_dragging() {
        let mut sling = controller();
        let mut stone = Projectile::new(ProjectileId(7));
        let mut body = PointBody::at(Vec2::new(0.3, 0.1));

        stone.begin_drag(Vec2::new(0.3, 0.1), &mut body);
        assert!(stone.on_attach_zone_enter(&mut sling, &mut body));

        assert_eq!(stone.state(), ProjectileState::Attached);
        assert_eq!(sling.registered(), Some(ProjectileId(7)));
        assert_eq!(body.position, sling.pivot());
        assert!(body.suspended);
    }

    #[test]
    fn test_attach_zone_enter_is_idempotent() {
        let mut sling = controller();
        let mut stone = Projectile::new(ProjectileId(1));
        let mut body = PointBody::at(Vec2::new(0.5, 0.5));

        assert!(stone.on_attach_zone_enter(&mut sling, &mut body));
        assert!(!stone.on_attach_zone_enter(&mut sling, &mut body));
        assert_eq!(stone.state(), ProjectileState::Attached);

        stone.on_launched(&mut body);
        assert!(!stone.on_attach_zone_enter(&mut sling, &mut body));
        assert_eq!(stone.state(), ProjectileState::InFlight);
        assert_eq!(sling.registered(), None);
    }

    #[test]
    fn test_attach_rejected_when_slot_taken() {
        let mut sling = controller();
        let mut first = Projectile::new(ProjectileId(1));
        let mut second = Projectile::new(ProjectileId(2));
        let mut first_body = PointBody::at(Vec2::ZERO);
        let mut second_body = PointBody::at(Vec2::new(0.2, 0.0));

        assert!(first.on_attach_zone_enter(&mut sling, &mut first_body));
        assert!(!second.on_attach_zone_enter(&mut sling, &mut second_body));

        assert_eq!(second.state(), ProjectileState::Idle);
        assert_eq!(second_body.position, Vec2::new(0.2, 0.0));
        assert!(!second_body.suspended);
        assert_eq!(sling.registered(), Some(ProjectileId(1)));
    }

    #[test]
    fn test_on_launched_only_from_attached() {
        let mut stone = Projectile::new(ProjectileId(1));
        let mut body = PointBody::at(Vec2::ZERO);
        assert!(!stone.on_launched(&mut body));
        assert_eq!(stone.state(), ProjectileState::Idle);
    }

    #[test]
    fn test_launch_position_untouched_and_collision_restored() {
        let mut sling = controller();
        let mut stone = Projectile::new(ProjectileId(1));
        let mut body = PointBody::at(Vec2::ZERO);
        stone.on_attach_zone_enter(&mut sling, &mut body);
        body.collision_enabled = false;
        body.position = Vec2::new(0.4, -0.8);

        assert!(stone.on_launched(&mut body));
        assert_eq!(body.position, Vec2::new(0.4, -0.8));
        assert!(body.collision_enabled);
        assert!(!body.suspended);
        assert!(stone.in_launch_grace());
    }

    #[test]
    fn test_grace_timer_counts_down() {
        let mut sling = controller();
        let mut stone = Projectile::new(ProjectileId(1)).with_grace_period(0.1);
        assert_eq!(stone.grace_period(), 0.1);
        let mut body = PointBody::at(Vec2::ZERO);
        stone.on_attach_zone_enter(&mut sling, &mut body);
        stone.on_launched(&mut body);

        stone.tick(0.05);
        assert!(stone.in_launch_grace());
        stone.tick(0.06);
        assert!(!stone.in_launch_grace());

        stone.set_grace_period(-1.0);
        assert_eq!(stone.grace_period(), 0.0);
    }

    #[test]
    fn test_reset_from_every_state() {
        let states: [fn(&mut Projectile, &mut LaunchController, &mut PointBody); 4] = [
            |_, _, _| {},
            |p, _, b| {
                p.begin_drag(Vec2::ZERO, b);
            },
            |p, c, b| {
                p.on_attach_zone_enter(c, b);
            },
            |p, c, b| {
                p.on_attach_zone_enter(c, b);
                p.on_launched(b);
            },
        ];

        for enter in states {
            let mut sling = controller();
            let mut stone = Projectile::new(ProjectileId(3));
            let mut body = PointBody::at(Vec2::new(1.0, 1.0));
            enter(&mut stone, &mut sling, &mut body);
            body.collision_enabled = false;

            stone.reset(&mut body);
            stone.reset(&mut body);

            assert_eq!(stone.state(), ProjectileState::Idle);
            assert!(!body.suspended);
            assert!(body.collision_enabled);
            assert!(!stone.in_launch_grace());
        }
    }

    #[test]
    fn test_no_automatic_return_to_idle() {
        let mut sling = controller();
        let mut stone = Projectile::new(ProjectileId(1));
        let mut body = PointBody::at(Vec2::ZERO);
        stone.on_attach_zone_enter(&mut sling, &mut body);
        stone.on_launched(&mut body);

        for _ in 0..600 {
            stone.tick(1.0 / 60.0);
        }
        assert_eq!(stone.state(), ProjectileState::InFlight);
    }
}

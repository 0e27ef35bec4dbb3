//! Launch controller: pivot drag, launch impulse, and the return spring

use bevy::prelude::*;

use super::spring::{SpringReturn, SpringSample};
use super::SlingConfig;
use crate::helpers::{clamp_to_radius, direction_or_zero, launch_force, midpoint};
use crate::projectile::{Projectile, ProjectileAccess, ProjectileId, ProjectileState, RigidBody};

/// The two sling endpoints. Their midpoint is the pivot's rest position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorPair {
    pub left: Vec2,
    pub right: Vec2,
}

impl AnchorPair {
    pub fn new(left: Vec2, right: Vec2) -> Self {
        Self { left, right }
    }

    pub fn midpoint(&self) -> Vec2 {
        midpoint(self.left, self.right)
    }
}

/// Control points handed to the line renderer each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SlingLine {
    /// Straight chord: left anchor, right anchor
    Rest([Vec2; 2]),
    /// Bent at the pivot: left anchor, pivot, right anchor
    Pulled([Vec2; 3]),
}

impl SlingLine {
    pub fn points(&self) -> &[Vec2] {
        match self {
            SlingLine::Rest(points) => points,
            SlingLine::Pulled(points) => points,
        }
    }
}

/// Impulse handed to a projectile on release
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub projectile: ProjectileId,
    /// Unit vector from pivot toward rest, or zero for a dead-center release
    pub direction: Vec2,
    pub magnitude: f32,
}

/// Result of `end_drag`
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Release {
    /// Not dragging; nothing happened
    Ignored,
    /// Sling released with nothing in it
    Empty,
    Launched(Launch),
}

/// Result of one return-animation step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnStep {
    /// No session running
    AtRest,
    Moving,
    /// Session ended this tick; pivot is back at rest
    Settled,
}

/// Owns the pivot, the anchors, and the single projectile slot.
///
/// The slot holds an id, never the projectile: callers pass a
/// `ProjectileAccess` so the controller can reach it for the duration of a
/// call. All mutation of the pivot and the slot goes through here.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct LaunchController {
    config: SlingConfig,
    anchors: AnchorPair,
    pivot: Vec2,
    dragging: bool,
    registered: Option<ProjectileId>,
    spring: Option<SpringReturn>,
}

impl LaunchController {
    pub fn new(config: SlingConfig, anchors: AnchorPair) -> Self {
        Self {
            config,
            anchors,
            pivot: anchors.midpoint(),
            dragging: false,
            registered: None,
            spring: None,
        }
    }

    pub fn config(&self) -> &SlingConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SlingConfig) {
        self.config = config;
    }

    pub fn anchors(&self) -> AnchorPair {
        self.anchors
    }

    /// Move the anchors. At rest the pivot follows the new midpoint; while
    /// dragging or returning it is recomputed on the next update/step.
    pub fn set_anchors(&mut self, anchors: AnchorPair) {
        self.anchors = anchors;
        if !self.dragging && self.spring.is_none() {
            self.pivot = anchors.midpoint();
        }
    }

    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    pub fn rest_position(&self) -> Vec2 {
        self.anchors.midpoint()
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn is_returning(&self) -> bool {
        self.spring.is_some()
    }

    pub fn return_session(&self) -> Option<&SpringReturn> {
        self.spring.as_ref()
    }

    pub fn registered(&self) -> Option<ProjectileId> {
        self.registered
    }

    /// Pivot position for a pointer at `pointer`: unchanged inside
    /// `max_drag_distance` of rest, on the boundary circle beyond it.
    pub fn clamp_pull(&self, pointer: Vec2) -> Vec2 {
        clamp_to_radius(self.rest_position(), pointer, self.config.max_drag_distance)
    }

    /// Impulse magnitude for a pull of `pull_distance`
    pub fn launch_force(&self, pull_distance: f32) -> f32 {
        launch_force(
            pull_distance,
            self.config.force_multiplier,
            self.config.max_force,
        )
    }

    pub fn line(&self) -> SlingLine {
        if self.dragging || self.spring.is_some() {
            SlingLine::Pulled([self.anchors.left, self.pivot, self.anchors.right])
        } else {
            SlingLine::Rest([self.anchors.left, self.anchors.right])
        }
    }

    // -------------------------------------------------------------------------
    // Drag
    // -------------------------------------------------------------------------

    /// Grab the pivot. Ignored unless `pointer` is within the capture radius.
    /// Cancels a running return animation.
    pub fn begin_drag(&mut self, pointer: Vec2) -> bool {
        if self.dragging {
            return false;
        }
        if pointer.distance(self.pivot) > self.config.capture_radius {
            debug!(
                "Drag start at {:?} outside capture radius of pivot {:?}",
                pointer, self.pivot
            );
            return false;
        }
        self.spring = None;
        self.dragging = true;
        true
    }

    /// Follow the pointer, clamped around the current anchor midpoint.
    ///
    /// The registered projectile is moved onto the new pivot in the same
    /// call. Returns the bent line, or `None` when not dragging.
    pub fn update_drag(
        &mut self,
        pointer: Vec2,
        projectiles: &mut impl ProjectileAccess,
    ) -> Option<[Vec2; 3]> {
        if !self.dragging {
            return None;
        }
        self.pivot = self.clamp_pull(pointer);
        self.mirror_registered(projectiles);
        Some([self.anchors.left, self.pivot, self.anchors.right])
    }

    /// Let go. Launches the registered projectile (if any) toward rest and
    /// always starts a fresh return animation from the current pull.
    pub fn end_drag(&mut self, projectiles: &mut impl ProjectileAccess) -> Release {
        if !self.dragging {
            return Release::Ignored;
        }
        self.dragging = false;

        let rest = self.rest_position();
        let pull = self.pivot - rest;
        let release = match self.registered.take() {
            Some(id) => {
                let direction = direction_or_zero(rest - self.pivot);
                let magnitude = self.launch_force(pull.length());
                let launched = projectiles.with_projectile(id, |projectile, body| {
                    if !projectile.on_launched(body) {
                        return false;
                    }
                    body.apply_impulse(direction, magnitude);
                    true
                });
                match launched {
                    Some(true) => Release::Launched(Launch {
                        projectile: id,
                        direction,
                        magnitude,
                    }),
                    Some(false) => {
                        warn!("Registered projectile {} was not attached at release", id);
                        Release::Empty
                    }
                    None => {
                        warn!("Registered projectile {} no longer exists", id);
                        Release::Empty
                    }
                }
            }
            None => Release::Empty,
        };

        self.spring = Some(SpringReturn::new(pull));
        release
    }

    // -------------------------------------------------------------------------
    // Slot
    // -------------------------------------------------------------------------

    /// Take `projectile` into the slot and freeze it on the pivot.
    /// First come wins: rejected while the slot is occupied.
    pub fn attach(&mut self, projectile: &mut Projectile, body: &mut dyn RigidBody) -> bool {
        if let Some(current) = self.registered {
            debug!(
                "Attach of {} rejected, slot held by {}",
                projectile.id(),
                current
            );
            return false;
        }
        self.registered = Some(projectile.id());
        projectile.mark_attached(self.pivot, body);
        true
    }

    /// Reset `projectile` and drop it from the slot if it is the one held.
    /// Returns whether it was registered.
    pub fn detach(&mut self, projectile: &mut Projectile, body: &mut dyn RigidBody) -> bool {
        let was_registered = self.registered == Some(projectile.id());
        if was_registered {
            self.registered = None;
        }
        projectile.reset(body);
        was_registered
    }

    // -------------------------------------------------------------------------
    // Tick
    // -------------------------------------------------------------------------

    /// Advance the return animation by `dt` and keep an attached projectile
    /// on the pivot. Runs every tick whether or not a drag is in progress.
    pub fn step(&mut self, dt: f32, projectiles: &mut impl ProjectileAccess) -> ReturnStep {
        let rest = self.rest_position();
        let step = match self.spring.as_mut() {
            None => {
                if !self.dragging {
                    self.pivot = rest;
                }
                ReturnStep::AtRest
            }
            Some(session) => match session.advance(dt, &self.config.spring) {
                SpringSample::Moving(offset) => {
                    self.pivot =
                        clamp_to_radius(rest, rest + offset, self.config.max_drag_distance);
                    ReturnStep::Moving
                }
                SpringSample::Settled => {
                    self.spring = None;
                    self.pivot = rest;
                    ReturnStep::Settled
                }
            },
        };
        self.mirror_registered(projectiles);
        step
    }

    /// Put the registered projectile on the pivot; forget it if it is gone
    fn mirror_registered(&mut self, projectiles: &mut impl ProjectileAccess) {
        let Some(id) = self.registered else {
            return;
        };
        let pivot = self.pivot;
        let found = projectiles.with_projectile(id, |projectile, body| {
            if projectile.state() == ProjectileState::Attached {
                body.set_position(pivot);
            }
        });
        if found.is_none() {
            warn!("Registered projectile {} no longer exists, clearing slot", id);
            self.registered = None;
        }
    }
}

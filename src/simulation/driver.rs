//! SlingSim - step the headless app one fixed tick at a time

use bevy::prelude::*;
use std::time::Duration;

use super::HeadlessAppBuilder;
use crate::constants::FIXED_HZ;
use crate::events::{BusEvent, EventBus};
use crate::input::PointerInput;
use crate::physics::{PhysicsBody, Velocity};
use crate::projectile::{Projectile, ProjectileId, ProjectileState};
use crate::sling::LaunchController;
use crate::world::{Basket, Target};

/// Snapshot of one stone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoneView {
    pub id: ProjectileId,
    pub state: ProjectileState,
    pub position: Vec2,
    pub velocity: Vec2,
    pub suspended: bool,
    pub in_launch_grace: bool,
}

/// Snapshot of one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub position: Vec2,
    pub activated: bool,
}

/// Deterministic driver: pointer actions are queued on `PointerInput` and
/// take effect on the next `tick`.
pub struct SlingSim {
    app: App,
    step: Duration,
    ticks: u32,
    events: Vec<BusEvent>,
}

impl Default for SlingSim {
    fn default() -> Self {
        Self::new(HeadlessAppBuilder::new())
    }
}

impl SlingSim {
    /// Build the app and run Startup
    pub fn new(builder: HeadlessAppBuilder) -> Self {
        let mut app = builder.build();
        app.world_mut().run_schedule(Startup);
        Self {
            app,
            step: Duration::from_secs_f64(1.0 / FIXED_HZ),
            ticks: 0,
            events: Vec::new(),
        }
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }

    pub fn dt(&self) -> f32 {
        self.step.as_secs_f32()
    }

    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Advance time by one step and run `FixedUpdate` once
    pub fn tick(&mut self) {
        let step = self.step;
        let world = self.app.world_mut();
        world.resource_mut::<Time>().advance_by(step);
        world.run_schedule(FixedUpdate);
        self.events.extend(world.resource_mut::<EventBus>().drain());
        self.ticks += 1;
    }

    pub fn run_ticks(&mut self, n: u32) {
        for _ in 0..n {
            self.tick();
        }
    }

    /// Tick until `done` holds or `max_ticks` pass. Returns whether it held.
    pub fn run_until(
        &mut self,
        max_ticks: u32,
        mut done: impl FnMut(&mut SlingSim) -> bool,
    ) -> bool {
        for _ in 0..max_ticks {
            if done(self) {
                return true;
            }
            self.tick();
        }
        done(self)
    }

    // -------------------------------------------------------------------------
    // Pointer
    // -------------------------------------------------------------------------

    pub fn pointer_down(&mut self, at: Vec2) {
        self.pointer_move(at);
        self.pointer_press();
    }

    /// Press wherever the pointer currently is
    pub fn pointer_press(&mut self) {
        let mut input = self.app.world_mut().resource_mut::<PointerInput>();
        input.pressed = true;
    }

    pub fn pointer_move(&mut self, to: Vec2) {
        self.app.world_mut().resource_mut::<PointerInput>().position = Some(to);
    }

    pub fn pointer_up(&mut self) {
        let mut input = self.app.world_mut().resource_mut::<PointerInput>();
        input.released = true;
    }

    pub fn press_reset(&mut self) {
        self.app
            .world_mut()
            .resource_mut::<PointerInput>()
            .reset_pressed = true;
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    pub fn controller(&self) -> &LaunchController {
        self.app.world().resource::<LaunchController>()
    }

    /// Every event emitted so far, in order
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    pub fn event_kinds(&self) -> Vec<&'static str> {
        self.events.iter().map(|e| e.event.kind()).collect()
    }

    /// Stones in spawn order
    pub fn stones(&mut self) -> Vec<StoneView> {
        let world = self.app.world_mut();
        let mut query = world.query::<(&Projectile, &Transform, &Velocity, &PhysicsBody)>();
        let mut stones: Vec<StoneView> = query
            .iter(world)
            .map(|(projectile, transform, velocity, body)| StoneView {
                id: projectile.id(),
                state: projectile.state(),
                position: transform.translation.truncate(),
                velocity: velocity.0,
                suspended: body.suspended,
                in_launch_grace: projectile.in_launch_grace(),
            })
            .collect();
        stones.sort_by_key(|stone| stone.id);
        stones
    }

    pub fn stone(&mut self, index: usize) -> Option<StoneView> {
        self.stones().get(index).copied()
    }

    /// Targets in spawn order
    pub fn targets(&mut self) -> Vec<TargetView> {
        let world = self.app.world_mut();
        let mut query = world.query::<(Entity, &Target, &Transform)>();
        let mut targets: Vec<(Entity, TargetView)> = query
            .iter(world)
            .map(|(entity, target, transform)| {
                (
                    entity,
                    TargetView {
                        position: transform.translation.truncate(),
                        activated: target.is_activated(),
                    },
                )
            })
            .collect();
        targets.sort_by_key(|(entity, _)| *entity);
        targets.into_iter().map(|(_, view)| view).collect()
    }

    pub fn basket_contents(&mut self) -> Vec<ProjectileId> {
        let world = self.app.world_mut();
        let mut query = world.query::<&Basket>();
        query
            .iter(world)
            .flat_map(|basket| basket.stored().to_vec())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::SlingEvent;
    use crate::world::SceneLayout;

    const REST: Vec2 = Vec2::new(-4.0, -1.0);

    /// Drag stone 0 into the attach zone and let go
    fn load_sling(sim: &mut SlingSim) -> ProjectileId {
        let stone = sim.stone(0).unwrap();
        sim.pointer_down(stone.position);
        sim.tick();
        assert_eq!(sim.stone(0).unwrap().state, ProjectileState::Dragging);
        sim.pointer_move(REST + Vec2::new(0.1, 0.0));
        sim.tick();
        sim.pointer_up();
        sim.tick();
        assert_eq!(sim.stone(0).unwrap().state, ProjectileState::Attached);
        stone.id
    }

    /// Pull from the pivot to `to` and release
    fn pull_and_release(sim: &mut SlingSim, to: Vec2) {
        sim.pointer_down(REST);
        sim.tick();
        sim.pointer_move(to);
        sim.tick();
        sim.pointer_up();
        sim.tick();
    }

    #[test]
    fn test_stones_settle_on_screen_floor() {
        let mut sim = SlingSim::default();
        sim.run_ticks(60);
        for stone in sim.stones() {
            assert_eq!(stone.state, ProjectileState::Idle);
            assert!((stone.position.y + 4.8).abs() < 1e-4);
            assert_eq!(stone.velocity.y, 0.0);
        }
    }

    #[test]
    fn test_load_pull_and_launch() {
        let mut sim = SlingSim::default();
        sim.run_ticks(30);
        let id = load_sling(&mut sim);
        assert_eq!(sim.controller().registered(), Some(id));
        assert_eq!(sim.stone(0).unwrap().position, REST);

        pull_and_release(&mut sim, REST + Vec2::new(-3.0, -3.0));

        let launched = sim
            .events()
            .iter()
            .find_map(|e| match e.event {
                SlingEvent::Launched {
                    projectile,
                    direction,
                    magnitude,
                } => Some((projectile, Vec2::from_array(direction), magnitude)),
                _ => None,
            })
            .unwrap();
        assert_eq!(launched.0, id);
        assert!(launched.1.abs_diff_eq(Vec2::new(1.0, 1.0).normalize(), 1e-5));
        assert!((launched.2 - 10.0).abs() < 1e-4);

        let stone = sim.stone(0).unwrap();
        assert_eq!(stone.state, ProjectileState::InFlight);
        assert!(!stone.suspended);
        assert!(stone.velocity.x > 6.0);
        assert_eq!(sim.controller().registered(), None);
        assert!(sim.controller().is_returning());

        let kinds = sim.event_kinds();
        assert_eq!(kinds, vec!["ProjectileAttached", "DragStarted", "Launched"]);
    }

    #[test]
    fn test_empty_release_springs_back_and_settles() {
        let mut sim = SlingSim::default();
        pull_and_release(&mut sim, REST + Vec2::new(0.0, -1.5));
        assert_eq!(sim.event_kinds(), vec!["DragStarted", "ReleasedEmpty"]);

        let settled = sim.run_until(400, |sim| !sim.controller().is_returning());
        assert!(settled);
        assert_eq!(sim.controller().pivot(), REST);
        assert_eq!(sim.event_kinds().last(), Some(&"ReturnSettled"));
    }

    #[test]
    fn test_press_away_from_pivot_does_nothing() {
        let mut sim = SlingSim::default();
        sim.pointer_down(Vec2::new(0.0, 3.0));
        sim.tick();
        sim.pointer_move(Vec2::new(1.0, 3.0));
        sim.tick();
        sim.pointer_up();
        sim.tick();
        assert!(!sim.controller().is_dragging());
        assert!(!sim.controller().is_returning());
        assert!(sim.events().is_empty());
    }

    #[test]
    fn test_launch_into_basket() {
        let layout = SceneLayout {
            basket_center: Vec2::new(-3.0, 0.0),
            basket_size: Vec2::new(2.0, 2.0),
            basket_slots: vec![Vec2::new(-3.0, -0.5)],
            targets: Vec::new(),
            ..Default::default()
        };
        let mut sim = SlingSim::new(HeadlessAppBuilder::new().with_layout(layout));
        sim.run_ticks(30);
        let id = load_sling(&mut sim);
        pull_and_release(&mut sim, REST + Vec2::new(-3.0, -3.0));

        let stored = sim.run_until(60, |sim| {
            sim.events()
                .iter()
                .any(|e| matches!(e.event, SlingEvent::BasketStored { .. }))
        });
        assert!(stored);
        assert_eq!(sim.basket_contents(), vec![id]);

        sim.run_ticks(10);
        let stone = sim.stone(0).unwrap();
        assert!(stone.suspended);
        assert_eq!(stone.velocity, Vec2::ZERO);
        assert_eq!(stone.position, Vec2::new(-3.0, -0.5));
    }

    #[test]
    fn test_launch_knocks_target_loose() {
        let layout = SceneLayout {
            targets: vec![Vec2::new(-3.3, -0.7)],
            ..Default::default()
        };
        let mut sim = SlingSim::new(HeadlessAppBuilder::new().with_layout(layout));
        sim.run_ticks(30);
        load_sling(&mut sim);
        pull_and_release(&mut sim, REST + Vec2::new(-3.0, -3.0));

        let hit = sim.run_until(60, |sim| sim.targets()[0].activated);
        assert!(hit);
        let before = sim.targets()[0].position;
        sim.run_ticks(30);
        assert!(sim.targets()[0].position.y < before.y);
    }

    #[test]
    fn test_launch_moves_stone_on_release_tick() {
        let mut sim = SlingSim::default();
        sim.run_ticks(30);
        load_sling(&mut sim);
        sim.pointer_down(REST);
        sim.tick();
        sim.pointer_move(REST + Vec2::new(-3.0, -3.0));
        sim.tick();
        let pivot = sim.controller().pivot();
        assert_eq!(sim.stone(0).unwrap().position, pivot);

        sim.pointer_up();
        sim.tick();
        let stone = sim.stone(0).unwrap();
        assert_eq!(stone.state, ProjectileState::InFlight);
        assert_ne!(stone.position, pivot);
        let expected = pivot + stone.velocity * sim.dt();
        assert!(stone.position.abs_diff_eq(expected, 1e-4));
    }

    #[test]
    fn test_press_before_any_position_is_kept() {
        let mut sim = SlingSim::default();
        sim.pointer_press();
        sim.tick();
        assert!(sim.events().is_empty());

        sim.pointer_move(REST);
        sim.tick();
        assert!(sim.controller().is_dragging());
        assert_eq!(sim.event_kinds(), vec!["DragStarted"]);
    }

    #[test]
    fn test_stone_carried_into_basket_is_stored() {
        let layout = SceneLayout {
            basket_center: Vec2::new(-3.0, 0.0),
            basket_size: Vec2::new(2.0, 2.0),
            basket_slots: vec![Vec2::new(-3.0, -0.5)],
            targets: Vec::new(),
            ..Default::default()
        };
        let mut sim = SlingSim::new(HeadlessAppBuilder::new().with_layout(layout));
        sim.run_ticks(30);
        let stone = sim.stone(0).unwrap();
        sim.pointer_down(stone.position);
        sim.tick();
        sim.pointer_move(Vec2::new(-3.0, 0.5));
        sim.tick();

        assert_eq!(sim.basket_contents(), vec![stone.id]);
        let stored = sim.stone(0).unwrap();
        assert_eq!(stored.state, ProjectileState::Idle);
        assert!(stored.suspended);
        assert_eq!(stored.position, Vec2::new(-3.0, -0.5));

        // Letting go afterwards changes nothing
        sim.pointer_up();
        sim.run_ticks(10);
        assert_eq!(sim.stone(0).unwrap().position, Vec2::new(-3.0, -0.5));
        assert_eq!(sim.event_kinds(), vec!["BasketStored"]);
    }

    #[test]
    fn test_reset_rehangs_knocked_targets() {
        let hook = Vec2::new(-3.3, -0.7);
        let layout = SceneLayout {
            targets: vec![hook],
            ..Default::default()
        };
        let mut sim = SlingSim::new(HeadlessAppBuilder::new().with_layout(layout));
        sim.run_ticks(30);
        load_sling(&mut sim);
        pull_and_release(&mut sim, REST + Vec2::new(-3.0, -3.0));
        assert!(sim.run_until(60, |sim| sim.targets()[0].activated));
        sim.run_ticks(30);
        assert_ne!(sim.targets()[0].position, hook);

        sim.press_reset();
        sim.tick();
        let target = sim.targets()[0];
        assert!(!target.activated);
        assert_eq!(target.position, hook);
        assert!(sim.event_kinds().contains(&"TargetReset"));

        // Kinematic again: it stays on the hook
        sim.run_ticks(30);
        assert_eq!(sim.targets()[0].position, hook);
    }

    #[test]
    fn test_reset_brings_stones_home() {
        let mut sim = SlingSim::default();
        sim.run_ticks(30);
        load_sling(&mut sim);
        sim.press_reset();
        sim.tick();

        assert_eq!(sim.controller().registered(), None);
        let stone = sim.stone(0).unwrap();
        assert_eq!(stone.state, ProjectileState::Idle);
        assert!(!stone.suspended);
        let resets = sim
            .event_kinds()
            .into_iter()
            .filter(|kind| *kind == "ProjectileReset")
            .count();
        assert_eq!(resets, 3);
    }
}

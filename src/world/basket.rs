//! Basket that catches launched stones into fixed slots

use bevy::prelude::*;

use crate::events::{EventBus, SlingEvent};
use crate::helpers::circle_overlaps_box;
use crate::physics::BodyMut;
use crate::projectile::{Projectile, ProjectileBodyData, ProjectileId, ProjectileState, RigidBody};

/// What happened to a stone that entered the basket
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasketOutcome {
    Stored(usize),
    /// No slot left; the stone is frozen where it entered
    Full,
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Basket {
    pub half_size: Vec2,
    /// Resting points in world space, filled in order
    slots: Vec<Vec2>,
    stored: Vec<ProjectileId>,
    turned_away: Vec<ProjectileId>,
}

impl Basket {
    pub fn new(half_size: Vec2, slots: Vec<Vec2>) -> Self {
        Self {
            half_size,
            slots,
            stored: Vec::new(),
            turned_away: Vec::new(),
        }
    }

    pub fn stored(&self) -> &[ProjectileId] {
        &self.stored
    }

    pub fn is_full(&self) -> bool {
        self.stored.len() >= self.slots.len()
    }

    /// Whether `id` already entered (stored or turned away)
    pub fn contains(&self, id: ProjectileId) -> bool {
        self.stored.contains(&id) || self.turned_away.contains(&id)
    }

    /// Halt and freeze the stone, then snap it into the next free slot.
    /// `None` if this stone was already handled.
    pub fn store(&mut self, id: ProjectileId, body: &mut dyn RigidBody) -> Option<BasketOutcome> {
        if self.contains(id) {
            return None;
        }
        body.halt();
        body.set_physics_suspended(true);

        match self.slots.get(self.stored.len()) {
            Some(&slot) => {
                body.set_position(slot);
                self.stored.push(id);
                Some(BasketOutcome::Stored(self.stored.len() - 1))
            }
            None => {
                self.turned_away.push(id);
                Some(BasketOutcome::Full)
            }
        }
    }

    /// Forget the contents (stones are being reset)
    pub fn clear(&mut self) {
        self.stored.clear();
        self.turned_away.clear();
    }
}

/// Whether a stone in `state` is caught on contact. Stones carried in by
/// the pointer count too; launched ones only after their grace period.
pub fn catches(state: ProjectileState, in_launch_grace: bool) -> bool {
    match state {
        ProjectileState::InFlight => !in_launch_grace,
        ProjectileState::Dragging => true,
        ProjectileState::Idle | ProjectileState::Attached => false,
    }
}

/// Catch stones that touch a basket, in flight or carried by the pointer
pub fn basket_impacts(
    mut baskets: Query<(&mut Basket, &Transform), Without<Projectile>>,
    mut projectiles: Query<ProjectileBodyData>,
    mut bus: ResMut<EventBus>,
) {
    for (mut basket, basket_transform) in &mut baskets {
        let center = basket_transform.translation.truncate();
        for (mut projectile, mut transform, mut velocity, mut spin, mut body) in &mut projectiles
        {
            if !catches(projectile.state(), projectile.in_launch_grace())
                || !body.collision_enabled
                || basket.contains(projectile.id())
            {
                continue;
            }
            let position = transform.translation.truncate();
            if !circle_overlaps_box(position, body.radius, center, basket.half_size) {
                continue;
            }

            let id = projectile.id();
            let mut handle = BodyMut {
                transform: &mut transform,
                velocity: &mut velocity,
                spin: &mut spin,
                body: &mut body,
            };
            // The pointer lets go of a stone it drops in
            projectile.end_drag(&mut handle);
            match basket.store(id, &mut handle) {
                Some(BasketOutcome::Stored(slot)) => {
                    transform.rotation = Quat::IDENTITY;
                    bus.emit(SlingEvent::BasketStored {
                        projectile: id,
                        slot,
                    });
                }
                Some(BasketOutcome::Full) => {
                    info!("Basket full, {} left where it landed", id);
                    bus.emit(SlingEvent::BasketFull { projectile: id });
                }
                None => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::test_support::PointBody;

    fn basket() -> Basket {
        Basket::new(
            Vec2::new(1.0, 0.5),
            vec![Vec2::new(-0.5, 0.0), Vec2::new(0.5, 0.0)],
        )
    }

    #[test]
    fn test_fills_slots_in_order_then_reports_full() {
        let mut basket = basket();
        let mut bodies: Vec<PointBody> = (0..3)
            .map(|_| {
                let mut body = PointBody::at(Vec2::new(0.0, 1.0));
                body.velocity = Vec2::new(2.0, -3.0);
                body
            })
            .collect();

        assert_eq!(
            basket.store(ProjectileId(1), &mut bodies[0]),
            Some(BasketOutcome::Stored(0))
        );
        assert_eq!(
            basket.store(ProjectileId(2), &mut bodies[1]),
            Some(BasketOutcome::Stored(1))
        );
        assert!(basket.is_full());
        assert_eq!(
            basket.store(ProjectileId(3), &mut bodies[2]),
            Some(BasketOutcome::Full)
        );

        assert_eq!(bodies[0].position, Vec2::new(-0.5, 0.0));
        assert_eq!(bodies[1].position, Vec2::new(0.5, 0.0));
        // Overflow stays put, but frozen
        assert_eq!(bodies[2].position, Vec2::new(0.0, 1.0));
        for body in &bodies {
            assert!(body.suspended);
            assert_eq!(body.velocity, Vec2::ZERO);
        }
    }

    #[test]
    fn test_catches_launched_and_carried_stones() {
        assert!(catches(ProjectileState::InFlight, false));
        assert!(!catches(ProjectileState::InFlight, true));
        assert!(catches(ProjectileState::Dragging, false));
        assert!(!catches(ProjectileState::Idle, false));
        assert!(!catches(ProjectileState::Attached, false));
    }

    #[test]
    fn test_each_stone_handled_once() {
        let mut basket = basket();
        let mut body = PointBody::at(Vec2::ZERO);
        assert!(basket.store(ProjectileId(1), &mut body).is_some());
        assert_eq!(basket.store(ProjectileId(1), &mut body), None);
        assert_eq!(basket.stored(), &[ProjectileId(1)]);

        basket.clear();
        assert!(!basket.contains(ProjectileId(1)));
    }
}

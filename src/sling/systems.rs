//! Sling systems: glue between the ECS world and `LaunchController`

use bevy::prelude::*;

use super::{LaunchController, Release, ReturnStep, SlingLine};
use crate::constants::*;
use crate::events::{EventBus, SlingEvent};
use crate::helpers::circles_overlap;
use crate::input::PointerInput;
use crate::projectile::{
    Projectile, ProjectileBodyData, ProjectileQuery, ProjectileState, with_body,
};
use crate::world::{AttachZone, PullPoint, SlingAnchor};

/// Feed anchor entity positions into the controller and keep the attach
/// zone on the rest position
pub fn sync_anchors(
    anchors: Query<(&SlingAnchor, &Transform), Without<AttachZone>>,
    mut zones: Query<&mut Transform, With<AttachZone>>,
    mut controller: ResMut<LaunchController>,
) {
    let mut pair = controller.anchors();
    for (side, transform) in &anchors {
        let position = transform.translation.truncate();
        match side {
            SlingAnchor::Left => pair.left = position,
            SlingAnchor::Right => pair.right = position,
        }
    }
    if pair != controller.anchors() {
        controller.set_anchors(pair);
    }

    let rest = controller.rest_position();
    for mut transform in &mut zones {
        transform.translation.x = rest.x;
        transform.translation.y = rest.y;
    }
}

/// Consume pointer edges: the sling gets first claim on a press, then the
/// closest idle stone under the pointer.
pub fn handle_pointer(
    mut input: ResMut<PointerInput>,
    mut controller: ResMut<LaunchController>,
    mut projectiles: Query<ProjectileBodyData>,
    mut bus: ResMut<EventBus>,
) {
    // Edges wait for a position rather than being dropped
    let Some(pointer) = input.position else {
        return;
    };
    let pressed = input.take_pressed();
    let released = input.take_released();

    if pressed {
        if controller.begin_drag(pointer) {
            bus.emit(SlingEvent::DragStarted {
                pivot: controller.pivot().to_array(),
            });
        } else {
            pick_stone(pointer, &mut projectiles);
        }
    }

    if controller.is_dragging() {
        controller.update_drag(pointer, &mut ProjectileQuery::new(&mut projectiles));
    }
    for item in &mut projectiles {
        if item.0.state() == ProjectileState::Dragging {
            with_body(item, |projectile, body| projectile.update_drag(pointer, body));
        }
    }

    if released {
        match controller.end_drag(&mut ProjectileQuery::new(&mut projectiles)) {
            Release::Launched(launch) => {
                info!(
                    "Launched {} dir={:?} force={:.2}",
                    launch.projectile, launch.direction, launch.magnitude
                );
                bus.emit(SlingEvent::Launched {
                    projectile: launch.projectile,
                    direction: launch.direction.to_array(),
                    magnitude: launch.magnitude,
                });
            }
            Release::Empty => {
                let pull = controller
                    .return_session()
                    .map(|session| session.initial_offset())
                    .unwrap_or_default();
                bus.emit(SlingEvent::ReleasedEmpty {
                    pull: pull.to_array(),
                });
            }
            Release::Ignored => {}
        }
        for item in &mut projectiles {
            if item.0.state() == ProjectileState::Dragging {
                with_body(item, |projectile, body| projectile.end_drag(body));
            }
        }
    }
}

/// Grab the idle stone closest to `pointer` whose circle contains it
fn pick_stone(pointer: Vec2, projectiles: &mut Query<ProjectileBodyData>) {
    let closest = projectiles
        .iter()
        .filter(|(projectile, transform, _, _, body)| {
            projectile.state() == ProjectileState::Idle
                && transform.translation.truncate().distance(pointer) <= body.radius
        })
        .min_by(|a, b| {
            let da = a.1.translation.truncate().distance_squared(pointer);
            let db = b.1.translation.truncate().distance_squared(pointer);
            da.total_cmp(&db)
        })
        .map(|(projectile, ..)| projectile.id());

    let Some(id) = closest else {
        return;
    };
    for item in projectiles.iter_mut() {
        if item.0.id() == id {
            with_body(item, |projectile, body| projectile.begin_drag(pointer, body));
            return;
        }
    }
}

/// Offer the sling slot to stones entering the attach zone
pub fn attach_zone_triggers(
    mut zones: Query<(&mut AttachZone, &Transform), Without<Projectile>>,
    mut controller: ResMut<LaunchController>,
    mut projectiles: Query<ProjectileBodyData>,
    mut bus: ResMut<EventBus>,
) {
    for (mut zone, zone_transform) in &mut zones {
        let center = zone_transform.translation.truncate();
        for item in &mut projectiles {
            let position = item.1.translation.truncate();
            let overlapping = item.4.collision_enabled
                && circles_overlap(position, item.4.radius, center, zone.radius);
            if !zone.track(item.0.id(), overlapping) {
                continue;
            }
            let attached = with_body(item, |projectile, body| {
                projectile
                    .on_attach_zone_enter(&mut controller, body)
                    .then(|| projectile.id())
            });
            if let Some(id) = attached {
                info!("{} attached to sling", id);
                bus.emit(SlingEvent::ProjectileAttached { projectile: id });
            }
        }
    }
}

/// Advance the return spring and keep the attached stone on the pivot
pub fn spring_return(
    time: Res<Time>,
    mut controller: ResMut<LaunchController>,
    mut projectiles: Query<ProjectileBodyData>,
    mut bus: ResMut<EventBus>,
) {
    let step = controller.step(
        time.delta_secs(),
        &mut ProjectileQuery::new(&mut projectiles),
    );
    if step == ReturnStep::Settled {
        bus.emit(SlingEvent::ReturnSettled);
    }
}

/// Move the pull-point visual onto the pivot
pub fn sync_pull_point(
    controller: Res<LaunchController>,
    mut points: Query<&mut Transform, With<PullPoint>>,
) {
    let pivot = controller.pivot();
    for mut transform in &mut points {
        transform.translation.x = pivot.x;
        transform.translation.y = pivot.y;
    }
}

/// Draw the band and the capture radius
pub fn draw_sling(controller: Res<LaunchController>, mut gizmos: Gizmos) {
    let line = controller.line();
    gizmos.linestrip_2d(line.points().iter().copied(), SLING_LINE_COLOR);
    if matches!(line, SlingLine::Rest(_)) {
        gizmos.circle_2d(
            controller.pivot(),
            controller.config().capture_radius,
            CAPTURE_GIZMO_COLOR,
        );
    }
}

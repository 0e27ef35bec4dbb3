//! Geometry helpers shared by the sling, projectiles and world systems

use bevy::prelude::*;

/// Midpoint of two points
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) / 2.0
}

/// Unit vector along `v`, or zero when `v` has no length.
pub fn direction_or_zero(v: Vec2) -> Vec2 {
    v.normalize_or_zero()
}

/// Clamp `point` to lie within `max_distance` of `center`.
///
/// Points already inside the radius are returned unchanged (bit-for-bit), so a
/// short pull never drifts through a normalize/rescale round trip. Points
/// outside land exactly on the circle along the ray from `center` through
/// `point`.
pub fn clamp_to_radius(center: Vec2, point: Vec2, max_distance: f32) -> Vec2 {
    let offset = point - center;
    let distance = offset.length();
    if distance > max_distance {
        center + direction_or_zero(offset) * max_distance
    } else {
        point
    }
}

/// Launch impulse for a pull of `pull_distance`: linear in the pull, capped.
pub fn launch_force(pull_distance: f32, multiplier: f32, max_force: f32) -> f32 {
    (pull_distance * multiplier).min(max_force)
}

/// Circle-circle overlap test
pub fn circles_overlap(a: Vec2, radius_a: f32, b: Vec2, radius_b: f32) -> bool {
    a.distance_squared(b) <= (radius_a + radius_b) * (radius_a + radius_b)
}

/// Circle vs axis-aligned box overlap test
pub fn circle_overlaps_box(center: Vec2, radius: f32, box_center: Vec2, half_size: Vec2) -> bool {
    let nearest = center.clamp(box_center - half_size, box_center + half_size);
    center.distance_squared(nearest) <= radius * radius
}

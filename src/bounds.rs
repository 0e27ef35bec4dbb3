//! Keep bodies inside the visible area

use bevy::prelude::*;

use crate::constants::*;
use crate::physics::Velocity;
use crate::projectile::{Projectile, ProjectileState};

/// Visible world rectangle
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for ScreenBounds {
    /// Bounds of the default window under a fixed-vertical camera at the origin
    fn default() -> Self {
        let half_height = VIEW_HEIGHT / 2.0;
        let half_width = half_height * WINDOW_WIDTH as f32 / WINDOW_HEIGHT as f32;
        let half = Vec2::new(half_width, half_height);
        Self {
            min: -half,
            max: half,
        }
    }
}

impl ScreenBounds {
    /// Clamp a body centre so its `half_size` extents stay on screen.
    /// A body larger than the screen is centred on that axis.
    pub fn clamp(&self, position: Vec2, half_size: Vec2) -> Vec2 {
        let lo = self.min + half_size;
        let hi = self.max - half_size;
        let center = (self.min + self.max) / 2.0;
        Vec2::new(
            if lo.x <= hi.x {
                position.x.clamp(lo.x, hi.x)
            } else {
                center.x
            },
            if lo.y <= hi.y {
                position.y.clamp(lo.y, hi.y)
            } else {
                center.y
            },
        )
    }
}

/// Zero each velocity component that points along `correction`'s opposite
fn stop_outward(velocity: Vec2, correction: Vec2) -> Vec2 {
    let mut v = velocity;
    if correction.x * v.x < 0.0 {
        v.x = 0.0;
    }
    if correction.y * v.y < 0.0 {
        v.y = 0.0;
    }
    v
}

/// Marker for bodies held inside `ScreenBounds`
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Bounded {
    pub half_size: Vec2,
}

impl Bounded {
    pub fn circle(radius: f32) -> Self {
        Self {
            half_size: Vec2::splat(radius),
        }
    }
}

/// Recompute bounds from the camera each frame (window resizes)
pub fn update_screen_bounds(
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera2d>>,
    mut bounds: ResMut<ScreenBounds>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let size = window.size();
    let (Ok(top_left), Ok(bottom_right)) = (
        camera.viewport_to_world_2d(camera_transform, Vec2::ZERO),
        camera.viewport_to_world_2d(camera_transform, size),
    ) else {
        return;
    };
    let next = ScreenBounds {
        min: top_left.min(bottom_right),
        max: top_left.max(bottom_right),
    };
    if *bounds != next {
        *bounds = next;
    }
}

/// Clamp bounded bodies and drop the velocity that pushed them out. Stones
/// held by the pointer or the sling are left where their owner put them.
pub fn clamp_to_screen(
    bounds: Res<ScreenBounds>,
    mut query: Query<(
        &Bounded,
        &mut Transform,
        Option<&mut Velocity>,
        Option<&Projectile>,
    )>,
) {
    for (bounded, mut transform, velocity, projectile) in &mut query {
        if let Some(projectile) = projectile
            && matches!(
                projectile.state(),
                ProjectileState::Dragging | ProjectileState::Attached
            )
        {
            continue;
        }
        let position = transform.translation.truncate();
        let clamped = bounds.clamp(position, bounded.half_size);
        if clamped == position {
            continue;
        }
        transform.translation.x = clamped.x;
        transform.translation.y = clamped.y;
        if let Some(mut velocity) = velocity {
            velocity.0 = stop_outward(velocity.0, clamped - position);
        }
    }
}

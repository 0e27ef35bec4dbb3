//! Input module - PointerInput resource and capture_pointer system

use bevy::prelude::*;

use crate::constants::VIEW_HEIGHT;

/// Buffered pointer state for the fixed-step systems.
///
/// Press/release edges are latched until consumed so a click shorter than
/// one fixed step is never lost.
#[derive(Resource, Debug, Default, Clone, PartialEq)]
pub struct PointerInput {
    /// Pointer in world space, `None` while outside the window
    pub position: Option<Vec2>,
    pub pressed: bool,  // Left button went down - consumed by handle_pointer
    pub released: bool, // Left button went up - consumed by handle_pointer
    pub reset_pressed: bool, // R key - consumed by reset_projectiles
}

impl PointerInput {
    /// Take the press edge
    pub fn take_pressed(&mut self) -> bool {
        std::mem::take(&mut self.pressed)
    }

    pub fn take_released(&mut self) -> bool {
        std::mem::take(&mut self.released)
    }

    pub fn take_reset(&mut self) -> bool {
        std::mem::take(&mut self.reset_pressed)
    }
}

/// Map a window cursor position (origin top-left, y down) to world space
/// for an orthographic camera showing `view_height` units vertically.
pub fn screen_to_world(
    cursor: Vec2,
    window_size: Vec2,
    camera_center: Vec2,
    view_height: f32,
) -> Vec2 {
    if window_size.y <= 0.0 {
        return camera_center;
    }
    let units_per_pixel = view_height / window_size.y;
    let from_center = cursor - window_size / 2.0;
    camera_center + Vec2::new(from_center.x, -from_center.y) * units_per_pixel
}

/// Runs in Update to capture mouse state before it's cleared
pub fn capture_pointer(
    mouse: Res<ButtonInput<MouseButton>>,
    keyboard: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window>,
    cameras: Query<&GlobalTransform, With<Camera2d>>,
    mut input: ResMut<PointerInput>,
) {
    let cursor = windows.single().ok().and_then(|window| {
        let camera = cameras.single().ok()?;
        let cursor = window.cursor_position()?;
        Some(screen_to_world(
            cursor,
            window.size(),
            camera.translation().truncate(),
            VIEW_HEIGHT,
        ))
    });
    // Keep the last known position while the cursor is outside so a drag
    // in progress does not jump
    if cursor.is_some() {
        input.position = cursor;
    }

    if mouse.just_pressed(MouseButton::Left) {
        input.pressed = true;
    }
    if mouse.just_released(MouseButton::Left) {
        input.released = true;
    }

    if keyboard.just_pressed(KeyCode::KeyR) {
        input.reset_pressed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: Vec2 = Vec2::new(1280.0, 720.0);

    #[test]
    fn test_center_maps_to_camera() {
        let world = screen_to_world(WINDOW / 2.0, WINDOW, Vec2::new(2.0, 1.0), 10.0);
        assert_eq!(world, Vec2::new(2.0, 1.0));
    }

    #[test]
    fn test_corners_flip_y() {
        let top_left = screen_to_world(Vec2::ZERO, WINDOW, Vec2::ZERO, 10.0);
        assert!((top_left.y - 5.0).abs() < 1e-5);
        assert!((top_left.x + 640.0 * 10.0 / 720.0).abs() < 1e-4);

        let bottom_right = screen_to_world(WINDOW, WINDOW, Vec2::ZERO, 10.0);
        assert!((bottom_right.y + 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_degenerate_window() {
        assert_eq!(
            screen_to_world(Vec2::new(5.0, 5.0), Vec2::ZERO, Vec2::ONE, 10.0),
            Vec2::ONE
        );
    }

    #[test]
    fn test_edges_latch_until_taken() {
        let mut input = PointerInput {
            pressed: true,
            ..Default::default()
        };
        assert!(input.take_pressed());
        assert!(!input.take_pressed());
        assert!(!input.take_released());
    }
}

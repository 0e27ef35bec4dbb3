//! Tunable constants for the slingshot
//!
//! All gameplay defaults are defined here for easy tweaking. World units are
//! scene units (the camera shows `VIEW_HEIGHT` of them vertically).

use bevy::prelude::*;

// =============================================================================
// COLORS
// =============================================================================

pub const BACKGROUND_COLOR: Color = Color::srgb(0.55, 0.75, 0.85);
pub const SLING_LINE_COLOR: Color = Color::srgb(0.35, 0.2, 0.1);
pub const ANCHOR_COLOR: Color = Color::srgb(0.4, 0.25, 0.12);
pub const STONE_COLOR: Color = Color::srgb(0.5, 0.5, 0.52);
pub const TARGET_COLOR: Color = Color::srgb(0.8, 0.15, 0.1);
pub const BASKET_COLOR: Color = Color::srgb(0.6, 0.45, 0.2);
pub const CAPTURE_GIZMO_COLOR: Color = Color::srgb(0.0, 1.0, 1.0); // Cyan, like a scene-view gizmo

// =============================================================================
// VIEW
// =============================================================================

pub const VIEW_HEIGHT: f32 = 10.0;
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 720;
pub const FIXED_HZ: f64 = 60.0;

// =============================================================================
// SLING
// =============================================================================

pub const SLING_LEFT_ANCHOR: Vec2 = Vec2::new(-4.5, -1.0);
pub const SLING_RIGHT_ANCHOR: Vec2 = Vec2::new(-3.5, -1.0);
pub const SLING_CAPTURE_RADIUS: f32 = 0.5; // Pointer must press this close to the pivot
pub const SLING_MAX_DRAG_DISTANCE: f32 = 2.0; // Pivot never leaves this radius around rest
pub const SLING_FORCE_MULTIPLIER: f32 = 5.0; // Impulse per unit of pull
pub const SLING_MAX_FORCE: f32 = 10.0; // Impulse cap
pub const SLING_ATTACH_ZONE_RADIUS: f32 = 0.6; // Trigger region around the rest position

// =============================================================================
// RETURN SPRING
// =============================================================================

pub const SPRING_DAMPING: f32 = 3.0; // Exponential decay rate of the oscillation
pub const SPRING_FREQUENCY: f32 = 10.0; // Angular frequency (rad/s)
pub const SPRING_END_THRESHOLD: f32 = 0.01; // Stop once the envelope is below this
pub const SPRING_MAX_DURATION: f32 = 3.0; // Hard stop (seconds)

// =============================================================================
// PROJECTILES
// =============================================================================

pub const STONE_RADIUS: f32 = 0.2;
pub const STONE_MASS: f32 = 1.0;
pub const STONE_INERTIA: f32 = 0.02;
pub const STONE_COUNT: usize = 3;
pub const STONE_SPAWN: Vec2 = Vec2::new(-6.5, -4.3); // First stone; the rest scatter to the right
pub const STONE_SPAWN_SPACING: f32 = 0.6;
pub const STONE_SPAWN_JITTER: f32 = 0.1;
pub const LAUNCH_GRACE_PERIOD: f32 = 0.1; // Post-launch window with no target/basket impacts

// =============================================================================
// PHYSICS
// =============================================================================

pub const GRAVITY: f32 = 9.81;
pub const STONE_GRAVITY_SCALE: f32 = 1.0;

// =============================================================================
// ANGULAR DAMPING
// =============================================================================

pub const PID_KP: f32 = 1.0;
pub const PID_KI: f32 = 0.0;
pub const PID_KD: f32 = 0.0;
pub const PID_TARGET_ANGULAR_VELOCITY: f32 = 0.0;

// =============================================================================
// TARGETS
// =============================================================================

pub const TARGET_RADIUS: f32 = 0.3;
pub const TARGET_GRAVITY_SCALE: f32 = 1.0;
pub const TARGET_ACTIVATE_DELAY: f32 = 0.1; // Velocity is zeroed once after this delay
pub const TARGET_POSITIONS: &[Vec2] = &[
    Vec2::new(3.0, 1.5),
    Vec2::new(4.2, 0.5),
    Vec2::new(5.4, 2.2),
];

// =============================================================================
// BASKET
// =============================================================================

pub const BASKET_CENTER: Vec2 = Vec2::new(6.5, -3.8);
pub const BASKET_SIZE: Vec2 = Vec2::new(1.6, 0.8);
pub const BASKET_SLOTS: &[Vec2] = &[
    Vec2::new(6.0, -3.9),
    Vec2::new(6.5, -3.9),
    Vec2::new(7.0, -3.9),
    Vec2::new(6.25, -3.5),
    Vec2::new(6.75, -3.5),
];

// =============================================================================
// FILES
// =============================================================================

pub const TUNING_FILE: &str = "config/slingshot_tuning.json";

//! SlingshotPlugin - resources and system registration shared by the demo
//! binary and the headless harness

use bevy::prelude::*;

use crate::bounds::{ScreenBounds, clamp_to_screen, update_screen_bounds};
use crate::config_watcher::{ConfigWatcher, check_config_changes};
use crate::constants::*;
use crate::events::{EventBus, EventLogger, flush_event_log, start_event_log, update_event_bus_time};
use crate::input::{PointerInput, capture_pointer};
use crate::physics::{Gravity, apply_gravity, apply_velocity};
use crate::pid::angular_damping;
use crate::projectile::tick_projectiles;
use crate::sling::{
    AnchorPair, LaunchController, attach_zone_triggers, draw_sling, handle_pointer,
    spring_return, sync_anchors, sync_pull_point,
};
use crate::tuning::{SlingshotTuning, apply_tuning};
use crate::world::{
    SceneLayout, basket_impacts, reset_projectiles, settle_targets, spawn_scene, target_impacts,
};

pub struct SlingshotPlugin {
    /// Add pointer capture, camera-derived bounds, gizmos and hot reload
    pub windowed: bool,
    /// Write the event bus to `logs/`
    pub event_log: bool,
}

impl SlingshotPlugin {
    pub fn windowed() -> Self {
        Self {
            windowed: true,
            event_log: true,
        }
    }

    /// Fixed-step simulation only; events stay on the bus for inspection
    pub fn headless() -> Self {
        Self {
            windowed: false,
            event_log: false,
        }
    }
}

impl Plugin for SlingshotPlugin {
    fn build(&self, app: &mut App) {
        // Callers may insert their own tuning/layout first
        if !app.world().contains_resource::<SlingshotTuning>() {
            app.insert_resource(SlingshotTuning::load_or_default(TUNING_FILE));
        }
        app.init_resource::<SceneLayout>();

        let tuning = *app.world().resource::<SlingshotTuning>();
        let layout = app.world().resource::<SceneLayout>().clone();
        app.insert_resource(LaunchController::new(
            tuning.sling,
            AnchorPair::new(layout.left_anchor, layout.right_anchor),
        ))
        .insert_resource(Gravity(tuning.gravity))
        .insert_resource(EventBus::new())
        .init_resource::<PointerInput>()
        .init_resource::<ScreenBounds>();

        app.add_systems(Startup, spawn_scene);

        app.add_systems(
            FixedUpdate,
            (
                update_event_bus_time,
                apply_tuning,
                reset_projectiles,
                sync_anchors,
                handle_pointer,
                attach_zone_triggers,
                spring_return,
                tick_projectiles,
                angular_damping,
                apply_gravity,
                apply_velocity,
                target_impacts,
                basket_impacts,
                settle_targets,
                clamp_to_screen,
                sync_pull_point,
            )
                .chain(),
        );

        if self.windowed {
            app.insert_resource(Time::<Fixed>::from_hz(FIXED_HZ))
                .init_resource::<ConfigWatcher>()
                .add_systems(
                    Update,
                    (
                        capture_pointer,
                        update_screen_bounds,
                        check_config_changes,
                        draw_sling,
                    ),
                );
        }

        if self.event_log {
            app.init_resource::<EventLogger>()
                .add_systems(Startup, start_event_log)
                .add_systems(PostUpdate, flush_event_log);
        }
    }
}

//! Slingshot - windowed demo
//!
//! Drag a stone onto the sling, pull back and let go. R puts every stone
//! back where it started.

use bevy::{camera::ScalingMode, prelude::*};
use slingshot::{SceneLayout, SlingshotPlugin, constants::*};

fn main() {
    let layout = SceneLayout::scattered(&mut rand::thread_rng());

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                resolution: bevy::window::WindowResolution::new(WINDOW_WIDTH, WINDOW_HEIGHT)
                    .with_scale_factor_override(1.0),
                title: "Slingshot".into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(BACKGROUND_COLOR))
        .insert_resource(layout)
        .add_plugins(SlingshotPlugin::windowed())
        .add_systems(Startup, spawn_camera)
        .run();
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        Transform::from_xyz(0.0, 0.0, 0.0),
        Projection::Orthographic(OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEW_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        }),
    ));
}

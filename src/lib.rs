//! Slingshot - a pull-and-release launcher built with Bevy
//!
//! The launch mechanic lives in plain structs (`LaunchController`,
//! `Projectile`) that talk to bodies through the `RigidBody` trait. The
//! ECS systems around them are wired up by `SlingshotPlugin`.

// Core modules
pub mod config_watcher;
pub mod constants;
pub mod events;
pub mod helpers;
pub mod plugin;
pub mod simulation;
pub mod testing;
pub mod tuning;

// Mechanic modules
pub mod bounds;
pub mod input;
pub mod physics;
pub mod pid;
pub mod projectile;
pub mod sling;
pub mod world;

// Re-export commonly used types for convenience
pub use bounds::{Bounded, ScreenBounds};
pub use config_watcher::ConfigWatcher;
pub use constants::*;
pub use events::{BusEvent, EventBus, EventLogConfig, EventLogger, SlingEvent};
pub use helpers::*;
pub use input::PointerInput;
pub use physics::{AngularVelocity, Gravity, PhysicsBody, Velocity};
pub use pid::AngularPid;
pub use plugin::SlingshotPlugin;
pub use projectile::{Projectile, ProjectileAccess, ProjectileId, ProjectileState, RigidBody};
pub use simulation::{HeadlessAppBuilder, SlingSim};
pub use sling::{AnchorPair, LaunchController, Release, SlingConfig, SpringParams};
pub use tuning::{SlingshotTuning, TuningError};
pub use world::{AttachZone, Basket, SceneLayout, SlingAnchor, Stone, Target};

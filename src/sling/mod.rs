//! Sling module - launch controller, return spring, and their systems

pub mod config;
mod controller;
mod spring;
mod systems;

pub use config::{SlingConfig, SpringParams};
pub(crate) use config::non_negative;
pub use controller::{AnchorPair, Launch, LaunchController, Release, ReturnStep, SlingLine};
pub use spring::{SpringReturn, SpringSample, spring_offset};
pub use systems::*;

//! Headless simulation - the slingshot without a window
//!
//! `HeadlessAppBuilder` assembles the app; `SlingSim` steps it one fixed
//! tick at a time with scripted pointer input.

mod app_builder;
mod driver;

pub use app_builder::HeadlessAppBuilder;
pub use driver::{SlingSim, StoneView, TargetView};

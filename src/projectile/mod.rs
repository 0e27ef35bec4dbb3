//! Projectile module - attachable stones, their state machine, and the seams
//! the sling uses to reach them

mod body;
mod ecs;
mod state;

pub use body::*;
pub use ecs::*;
pub use state::*;

#[cfg(test)]
pub(crate) mod test_support;

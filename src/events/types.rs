//! Event type definitions for the sling event log

use serde::{Deserialize, Serialize};

use crate::projectile::ProjectileId;

/// Everything worth auditing that happens around the sling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SlingEvent {
    // === Session Events ===
    /// Log session started
    SessionStart {
        session_id: String, // UUID v4
        timestamp: String,  // RFC 3339
    },

    // === Sling Events ===
    /// Pointer captured the pivot
    DragStarted { pivot: [f32; 2] },
    /// Sling released with nothing in it
    ReleasedEmpty { pull: [f32; 2] },
    /// Return animation finished, pivot back at rest
    ReturnSettled,

    // === Projectile Events ===
    ProjectileAttached { projectile: ProjectileId },
    Launched {
        projectile: ProjectileId,
        direction: [f32; 2],
        magnitude: f32,
    },
    ProjectileReset { projectile: ProjectileId },

    // === World Events ===
    TargetActivated { projectile: ProjectileId },
    /// Target put back on its hook
    TargetReset { position: [f32; 2] },
    BasketStored { projectile: ProjectileId, slot: usize },
    BasketFull { projectile: ProjectileId },
}

impl SlingEvent {
    /// Short name used by scenario expectations
    pub fn kind(&self) -> &'static str {
        match self {
            SlingEvent::SessionStart { .. } => "SessionStart",
            SlingEvent::DragStarted { .. } => "DragStarted",
            SlingEvent::ReleasedEmpty { .. } => "ReleasedEmpty",
            SlingEvent::ReturnSettled => "ReturnSettled",
            SlingEvent::ProjectileAttached { .. } => "ProjectileAttached",
            SlingEvent::Launched { .. } => "Launched",
            SlingEvent::ProjectileReset { .. } => "ProjectileReset",
            SlingEvent::TargetActivated { .. } => "TargetActivated",
            SlingEvent::TargetReset { .. } => "TargetReset",
            SlingEvent::BasketStored { .. } => "BasketStored",
            SlingEvent::BasketFull { .. } => "BasketFull",
        }
    }

    /// Projectile the event is about, if any
    pub fn projectile(&self) -> Option<ProjectileId> {
        match self {
            SlingEvent::ProjectileAttached { projectile }
            | SlingEvent::Launched { projectile, .. }
            | SlingEvent::ProjectileReset { projectile }
            | SlingEvent::TargetActivated { projectile }
            | SlingEvent::BasketStored { projectile, .. }
            | SlingEvent::BasketFull { projectile } => Some(*projectile),
            _ => None,
        }
    }
}

//! Event bus for sling events
//!
//! Sling, projectile and world systems emit here during `FixedUpdate`. The
//! log writer and the headless driver take turns draining it, so whoever
//! drains first owns the events.

use bevy::prelude::*;

use super::types::SlingEvent;

/// A sling event stamped with the fixed tick and clock it happened on
#[derive(Debug, Clone, PartialEq)]
pub struct BusEvent {
    /// Fixed ticks since startup, starting at 1 for the first tick
    pub tick: u32,
    /// Simulated milliseconds since startup
    pub time_ms: u32,
    pub event: SlingEvent,
}

#[derive(Resource, Debug, Default)]
pub struct EventBus {
    queue: Vec<BusEvent>,
    tick: u32,
    time_ms: u32,
    muted: bool,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bus that drops everything, for runs nobody inspects
    pub fn muted() -> Self {
        Self {
            muted: true,
            ..Default::default()
        }
    }

    /// Start a new fixed tick at `elapsed_secs` of simulated time
    pub fn begin_tick(&mut self, elapsed_secs: f32) {
        self.tick += 1;
        self.time_ms = (elapsed_secs * 1000.0).round() as u32;
    }

    pub fn emit(&mut self, event: SlingEvent) {
        if self.muted {
            return;
        }
        debug!("[tick {}] {}", self.tick, event.kind());
        self.queue.push(BusEvent {
            tick: self.tick,
            time_ms: self.time_ms,
            event,
        });
    }

    /// Queued events, oldest first
    pub fn queued(&self) -> &[BusEvent] {
        &self.queue
    }

    pub fn drain(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.queue)
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn tick(&self) -> u32 {
        self.tick
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

/// First system of the fixed chain: stamp what follows with this tick
pub fn update_event_bus_time(mut bus: ResMut<EventBus>, time: Res<Time>) {
    bus.begin_tick(time.elapsed_secs());
}

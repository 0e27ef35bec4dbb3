//! Sling event logging
//!
//! Systems emit `SlingEvent`s to the `EventBus`; the `EventLogger` drains
//! them to a JSON-lines file per session.

mod bus;
mod logger;
mod types;

pub use bus::{BusEvent, EventBus, update_event_bus_time};
pub use logger::{EventLogConfig, EventLogger, flush_event_log, start_event_log};
pub use types::SlingEvent;

//! Event logger: writes drained bus events as JSON lines

use bevy::prelude::*;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::bus::{BusEvent, EventBus};
use super::types::SlingEvent;

/// Configuration for event logging
#[derive(Resource, Clone, Debug)]
pub struct EventLogConfig {
    /// Directory for log files
    pub log_dir: PathBuf,
    /// Whether logging is enabled
    pub enabled: bool,
}

impl Default for EventLogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            enabled: true,
        }
    }
}

/// One line of the log file
#[derive(Serialize)]
struct LogLine<'a> {
    tick: u32,
    time_ms: u32,
    event: &'a SlingEvent,
}

/// Active event logger with file handle
#[derive(Resource)]
pub struct EventLogger {
    writer: Option<BufWriter<File>>,
    path: Option<PathBuf>,
    session_id: String,
    config: EventLogConfig,
}

impl EventLogger {
    /// Create a new event logger (but don't open the file yet)
    pub fn new(config: EventLogConfig) -> Self {
        Self {
            writer: None,
            path: None,
            session_id: String::new(),
            config,
        }
    }

    /// Open `<log_dir>/<timestamp>_<session>.jsonl` and log SessionStart
    pub fn start_session(&mut self, timestamp: &str) {
        if !self.config.enabled {
            return;
        }

        self.session_id = Uuid::new_v4().to_string();

        if let Err(e) = std::fs::create_dir_all(&self.config.log_dir) {
            warn!("Failed to create log directory: {}", e);
            return;
        }

        let filename = format!("{}_{}.jsonl", timestamp, &self.session_id[..8]);
        let path = self.config.log_dir.join(filename);

        match OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
        {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                info!(
                    "Event logging started: {} (session: {})",
                    path.display(),
                    &self.session_id[..8]
                );
                self.path = Some(path);
                self.log(&BusEvent {
                    tick: 0,
                    time_ms: 0,
                    event: SlingEvent::SessionStart {
                        session_id: self.session_id.clone(),
                        timestamp: chrono::Utc::now().to_rfc3339(),
                    },
                });
            }
            Err(e) => {
                warn!("Failed to open event log: {}", e);
            }
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Write one event
    pub fn log(&mut self, entry: &BusEvent) {
        let Some(writer) = &mut self.writer else {
            return;
        };

        let record = LogLine {
            tick: entry.tick,
            time_ms: entry.time_ms,
            event: &entry.event,
        };
        let line = match serde_json::to_string(&record) {
            Ok(line) => line,
            Err(e) => {
                warn!("Failed to serialize event: {}", e);
                return;
            }
        };
        if let Err(e) = writeln!(writer, "{}", line) {
            warn!("Failed to write event: {}", e);
        }
    }

    pub fn flush(&mut self) {
        if let Some(writer) = &mut self.writer
            && let Err(e) = writer.flush()
        {
            warn!("Failed to flush event log: {}", e);
        }
    }

    /// Flush and close the current session
    pub fn end_session(&mut self) {
        self.flush();
        self.writer = None;
    }

    pub fn is_active(&self) -> bool {
        self.writer.is_some()
    }
}

impl Default for EventLogger {
    fn default() -> Self {
        Self::new(EventLogConfig::default())
    }
}

/// Startup system: open the log file
pub fn start_event_log(mut logger: ResMut<EventLogger>) {
    let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S").to_string();
    logger.start_session(&timestamp);
}

/// Drain the bus into the log file each frame
pub fn flush_event_log(mut bus: ResMut<EventBus>, mut logger: ResMut<EventLogger>) {
    if bus.is_empty() {
        return;
    }
    for entry in bus.drain() {
        logger.log(&entry);
    }
    logger.flush();
}

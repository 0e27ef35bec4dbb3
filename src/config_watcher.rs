//! Config file auto-reload system
//!
//! Polls the tuning file every 2 seconds and reloads it when modified.

use bevy::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::constants::TUNING_FILE;
use crate::tuning::SlingshotTuning;

/// How often to check for config changes (seconds)
const CHECK_INTERVAL: f32 = 2.0;

/// Tracks the tuning file's modification time for hot-reload
#[derive(Resource)]
pub struct ConfigWatcher {
    /// Time since last check
    pub timer: f32,
    pub path: PathBuf,
    /// Last known modification time
    pub mtime: Option<SystemTime>,
}

impl ConfigWatcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            timer: 0.0,
            mtime: get_mtime(&path),
            path,
        }
    }

    /// Advance the poll timer; returns a freshly loaded tuning when the file
    /// changed since the last look and still parses.
    pub fn poll(&mut self, dt: f32) -> Option<SlingshotTuning> {
        self.timer += dt;
        if self.timer < CHECK_INTERVAL {
            return None;
        }
        self.timer = 0.0;

        let mtime = get_mtime(&self.path);
        if mtime == self.mtime {
            return None;
        }
        self.mtime = mtime;
        if mtime.is_none() {
            warn!("{} removed, keeping current tuning", self.path.display());
            return None;
        }

        match SlingshotTuning::load(&self.path) {
            Ok(tuning) => Some(tuning),
            Err(err) => {
                warn!("{}; keeping current tuning", err);
                None
            }
        }
    }
}

impl Default for ConfigWatcher {
    fn default() -> Self {
        Self::new(TUNING_FILE)
    }
}

/// Get file modification time, or None if file doesn't exist
fn get_mtime(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).ok().and_then(|m| m.modified().ok())
}

/// Check for tuning file changes and swap in the new values.
/// `apply_tuning` picks the change up on the next fixed tick.
pub fn check_config_changes(
    time: Res<Time>,
    mut watcher: ResMut<ConfigWatcher>,
    mut tuning: ResMut<SlingshotTuning>,
) {
    if let Some(next) = watcher.poll(time.delta_secs())
        && next != *tuning
    {
        *tuning = next;
        info!("Auto-reloaded tuning from {}", watcher.path.display());
    }
}

//! Headless App Builder
//!
//! Builds a Bevy app with the slingshot plugin and no window, renderer or
//! clock. Time only moves when the caller advances it, which keeps runs
//! deterministic. Used by `SlingSim` and the scenario runner.

use bevy::prelude::*;

use crate::plugin::SlingshotPlugin;
use crate::tuning::SlingshotTuning;
use crate::world::SceneLayout;

/// Builder for creating headless Bevy apps
pub struct HeadlessAppBuilder {
    tuning: SlingshotTuning,
    layout: SceneLayout,
    minimal_threads: bool,
    event_log: bool,
}

impl Default for HeadlessAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessAppBuilder {
    /// Default tuning (never read from disk) and the default layout
    pub fn new() -> Self {
        Self {
            tuning: SlingshotTuning::default(),
            layout: SceneLayout::default(),
            minimal_threads: false,
            event_log: false,
        }
    }

    pub fn with_tuning(mut self, tuning: SlingshotTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_layout(mut self, layout: SceneLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Enable minimal thread mode (task pools = 1)
    ///
    /// Use this when running many apps side by side.
    pub fn with_minimal_threads(mut self) -> Self {
        self.minimal_threads = true;
        self
    }

    /// Also write the event log to `logs/`
    pub fn with_event_log(mut self) -> Self {
        self.event_log = true;
        self
    }

    /// Build the app. Startup has not run yet.
    pub fn build(self) -> App {
        let mut app = App::new();

        if self.minimal_threads {
            app.add_plugins(TaskPoolPlugin {
                task_pool_options: TaskPoolOptions::with_num_threads(1),
            });
        }

        // Plain `Time`, advanced by hand
        app.init_resource::<Time>();
        app.insert_resource(self.tuning);
        app.insert_resource(self.layout);
        app.add_plugins(SlingshotPlugin {
            windowed: false,
            event_log: self.event_log,
        });

        app
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventBus;
    use crate::sling::LaunchController;

    #[test]
    fn test_builder_creates_app() {
        let app = HeadlessAppBuilder::new().build();
        assert!(app.world().contains_resource::<EventBus>());
        assert!(app.world().contains_resource::<LaunchController>());
    }

    #[test]
    fn test_tuning_reaches_controller() {
        let mut tuning = SlingshotTuning::default();
        tuning.sling.max_force = 3.0;
        let app = HeadlessAppBuilder::new()
            .with_tuning(tuning)
            .with_minimal_threads()
            .build();
        let controller = app.world().resource::<LaunchController>();
        assert_eq!(controller.config().max_force, 3.0);
    }
}

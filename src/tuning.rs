//! Slingshot tuning settings loaded from `config/slingshot_tuning.json`

use bevy::log::{info, warn};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::constants::*;
use crate::physics::{Gravity, PhysicsBody};
use crate::pid::AngularPid;
use crate::projectile::Projectile;
use crate::sling::{LaunchController, SlingConfig, non_negative};
use crate::world::{AttachZone, Target};

/// Errors from loading or validating tuning values
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("{field} out of range: {value}")]
    OutOfRange { field: &'static str, value: f32 },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Per-stone settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// Seconds after launch during which impacts are ignored
    pub grace_period: f32,
    pub radius: f32,
    pub mass: f32,
    pub gravity_scale: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            grace_period: LAUNCH_GRACE_PERIOD,
            radius: STONE_RADIUS,
            mass: STONE_MASS,
            gravity_scale: STONE_GRAVITY_SCALE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PidTuning {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
    pub target_angular_velocity: f32,
}

impl Default for PidTuning {
    fn default() -> Self {
        Self {
            kp: PID_KP,
            ki: PID_KI,
            kd: PID_KD,
            target_angular_velocity: PID_TARGET_ANGULAR_VELOCITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTuning {
    /// Gravity scale once knocked loose
    pub gravity_scale: f32,
    /// Delay before the activation velocity is cleared
    pub activate_delay: f32,
}

impl Default for TargetTuning {
    fn default() -> Self {
        Self {
            gravity_scale: TARGET_GRAVITY_SCALE,
            activate_delay: TARGET_ACTIVATE_DELAY,
        }
    }
}

/// Serializable tuning values stored in config. Missing fields keep defaults.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlingshotTuning {
    pub sling: SlingConfig,
    pub attach_zone_radius: f32,
    pub gravity: f32,
    pub projectile: ProjectileTuning,
    pub pid: PidTuning,
    pub target: TargetTuning,
}

impl Default for SlingshotTuning {
    fn default() -> Self {
        Self {
            sling: SlingConfig::default(),
            attach_zone_radius: SLING_ATTACH_ZONE_RADIUS,
            gravity: GRAVITY,
            projectile: ProjectileTuning::default(),
            pid: PidTuning::default(),
            target: TargetTuning::default(),
        }
    }
}

impl SlingshotTuning {
    pub fn validate(&self) -> Result<(), TuningError> {
        self.sling.validate()?;
        non_negative("attach_zone_radius", self.attach_zone_radius)?;
        non_negative("gravity", self.gravity)?;
        non_negative("projectile.grace_period", self.projectile.grace_period)?;
        non_negative("projectile.radius", self.projectile.radius)?;
        if !(self.projectile.mass.is_finite() && self.projectile.mass > 0.0) {
            return Err(TuningError::OutOfRange {
                field: "projectile.mass",
                value: self.projectile.mass,
            });
        }
        non_negative("projectile.gravity_scale", self.projectile.gravity_scale)?;
        non_negative("target.gravity_scale", self.target.gravity_scale)?;
        non_negative("target.activate_delay", self.target.activate_delay)?;
        for (field, value) in [
            ("pid.kp", self.pid.kp),
            ("pid.ki", self.pid.ki),
            ("pid.kd", self.pid.kd),
            ("pid.target_angular_velocity", self.pid.target_angular_velocity),
        ] {
            if !value.is_finite() {
                return Err(TuningError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Read, parse and validate a tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning: Self = serde_json::from_str(&contents).map_err(|source| TuningError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load `path`, or fall back to defaults with a warning
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(tuning) => {
                info!("Loaded slingshot tuning from {}", path.display());
                tuning
            }
            Err(TuningError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                info!("No tuning file at {}, using defaults", path.display());
                Self::default()
            }
            Err(err) => {
                warn!("{}; using default tuning", err);
                Self::default()
            }
        }
    }
}

/// Push tuning into the controller and every tuned component.
///
/// Runs whenever the `SlingshotTuning` resource changes (startup insert and
/// config reloads).
pub fn apply_tuning(
    tuning: Res<SlingshotTuning>,
    mut controller: ResMut<LaunchController>,
    mut gravity: ResMut<Gravity>,
    mut projectiles: Query<(&mut Projectile, &mut PhysicsBody, Option<&mut AngularPid>)>,
    mut targets: Query<&mut Target>,
    mut zones: Query<&mut AttachZone>,
) {
    if !tuning.is_changed() {
        return;
    }

    controller.set_config(tuning.sling);
    gravity.0 = tuning.gravity;

    for (mut projectile, mut body, pid) in &mut projectiles {
        projectile.set_grace_period(tuning.projectile.grace_period);
        body.mass = tuning.projectile.mass;
        body.radius = tuning.projectile.radius;
        body.gravity_scale = tuning.projectile.gravity_scale;
        if let Some(mut pid) = pid {
            pid.set_gains(
                tuning.pid.kp,
                tuning.pid.ki,
                tuning.pid.kd,
                tuning.pid.target_angular_velocity,
            );
        }
    }

    for mut target in &mut targets {
        target.gravity_scale = tuning.target.gravity_scale;
        target.activate_delay = tuning.target.activate_delay;
    }

    for mut zone in &mut zones {
        zone.radius = tuning.attach_zone_radius;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SlingshotTuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "sling": {{ "max_force": 14.0 }}, "projectile": {{ "grace_period": 0.25 }} }}"#
        )
        .unwrap();

        let tuning = SlingshotTuning::load(file.path()).unwrap();
        assert_eq!(tuning.sling.max_force, 14.0);
        assert_eq!(tuning.sling.capture_radius, SLING_CAPTURE_RADIUS);
        assert_eq!(tuning.projectile.grace_period, 0.25);
        assert_eq!(tuning.gravity, GRAVITY);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "projectile": {{ "mass": 0.0 }} }}"#).unwrap();
        assert!(matches!(
            SlingshotTuning::load(file.path()),
            Err(TuningError::OutOfRange {
                field: "projectile.mass",
                ..
            })
        ));
    }

    #[test]
    fn test_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            SlingshotTuning::load(&missing),
            Err(TuningError::Io { .. })
        ));
        assert_eq!(
            SlingshotTuning::load_or_default(&missing),
            SlingshotTuning::default()
        );

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, "{ not json").unwrap();
        assert!(matches!(
            SlingshotTuning::load(&broken),
            Err(TuningError::Parse { .. })
        ));
        assert_eq!(
            SlingshotTuning::load_or_default(&broken),
            SlingshotTuning::default()
        );
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let err = TuningError::OutOfRange {
            field: "sling.max_force",
            value: -1.0,
        };
        assert_eq!(err.to_string(), "sling.max_force out of range: -1");
    }
}

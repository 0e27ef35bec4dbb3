//! Sling and return-spring parameters

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::tuning::TuningError;

/// Damped return oscillation: `offset(t) = offset0 * e^(-damping*t) * cos(frequency*t)`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    pub damping: f32,
    pub frequency: f32,
    /// Session ends once the decay envelope drops below this
    pub end_threshold: f32,
    /// Hard stop in seconds, whatever the other parameters say
    pub max_duration: f32,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            damping: SPRING_DAMPING,
            frequency: SPRING_FREQUENCY,
            end_threshold: SPRING_END_THRESHOLD,
            max_duration: SPRING_MAX_DURATION,
        }
    }
}

/// Capture, clamp and launch parameters of one sling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlingConfig {
    pub capture_radius: f32,
    pub max_drag_distance: f32,
    pub force_multiplier: f32,
    pub max_force: f32,
    pub spring: SpringParams,
}

impl Default for SlingConfig {
    fn default() -> Self {
        Self {
            capture_radius: SLING_CAPTURE_RADIUS,
            max_drag_distance: SLING_MAX_DRAG_DISTANCE,
            force_multiplier: SLING_FORCE_MULTIPLIER,
            max_force: SLING_MAX_FORCE,
            spring: SpringParams::default(),
        }
    }
}

impl SlingConfig {
    /// Reject values the sling cannot work with.
    ///
    /// Damping and frequency are free: a spring that never decays still ends
    /// at `max_duration`.
    pub fn validate(&self) -> Result<(), TuningError> {
        positive("sling.capture_radius", self.capture_radius)?;
        positive("sling.max_drag_distance", self.max_drag_distance)?;
        non_negative("sling.force_multiplier", self.force_multiplier)?;
        non_negative("sling.max_force", self.max_force)?;
        finite("sling.spring.damping", self.spring.damping)?;
        finite("sling.spring.frequency", self.spring.frequency)?;
        non_negative("sling.spring.end_threshold", self.spring.end_threshold)?;
        non_negative("sling.spring.max_duration", self.spring.max_duration)?;
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TuningError::OutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange { field, value })
    }
}

pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), TuningError> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SlingConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_distances() {
        let config = SlingConfig {
            max_drag_distance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TuningError::OutOfRange {
                field: "sling.max_drag_distance",
                ..
            })
        ));

        let config = SlingConfig {
            spring: SpringParams {
                max_duration: f32::INFINITY,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_decaying_spring_is_accepted() {
        let config = SlingConfig {
            spring: SpringParams {
                damping: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SlingConfig = serde_json::from_str(r#"{ "max_force": 4.0 }"#).unwrap();
        assert_eq!(config.max_force, 4.0);
        assert_eq!(config.max_drag_distance, SLING_MAX_DRAG_DISTANCE);
        assert_eq!(config.spring, SpringParams::default());
    }
}

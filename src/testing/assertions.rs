//! Assertion checking for test expectations

use bevy::prelude::*;
use thiserror::Error;

use super::parser::{ExpectedEvent, StateAssertion};
use crate::events::SlingEvent;
use crate::projectile::ProjectileId;
use crate::simulation::{StoneView, TargetView};

/// Error when an assertion fails
#[derive(Debug, Error)]
#[error("{message}\n    Expected: {expected}\n    Actual: {actual}")]
pub struct AssertionError {
    pub message: String,
    pub expected: String,
    pub actual: String,
}

/// Captured event with timing info
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedEvent {
    pub frame: u32,
    pub event_type: &'static str,
    /// Spawn-order index of the stone involved, if any
    pub stone: Option<usize>,
}

impl CapturedEvent {
    pub fn from_sling_event(frame: u32, event: &SlingEvent, stone_ids: &[ProjectileId]) -> Self {
        let stone = event
            .projectile()
            .and_then(|id| stone_ids.iter().position(|s| *s == id));
        Self {
            frame,
            event_type: event.kind(),
            stone,
        }
    }
}

/// Check if captured events match expected sequence (in order, gaps allowed)
pub fn check_sequence(
    expected: &[ExpectedEvent],
    captured: &[CapturedEvent],
) -> Result<(), AssertionError> {
    let mut captured_idx = 0;

    for (i, exp) in expected.iter().enumerate() {
        let found = captured[captured_idx..].iter().enumerate().find(|(_, cap)| {
            cap.event_type == exp.event && (exp.stone.is_none() || cap.stone == exp.stone)
        });

        match found {
            Some((offset, cap)) => {
                if let Some(min) = exp.frame_min
                    && cap.frame < min
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too early", i + 1, exp.event),
                        expected: format!("frame >= {}", min),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                if let Some(max) = exp.frame_max
                    && cap.frame > max
                {
                    return Err(AssertionError {
                        message: format!("Event #{} '{}' occurred too late", i + 1, exp.event),
                        expected: format!("frame <= {}", max),
                        actual: format!("frame {}", cap.frame),
                    });
                }
                captured_idx += offset + 1;
            }
            None => {
                let stone_str = exp
                    .stone
                    .map(|s| format!(" (stone {})", s))
                    .unwrap_or_default();
                return Err(AssertionError {
                    message: format!("Event #{} '{}'{} not found", i + 1, exp.event, stone_str),
                    expected: format!("'{}' event in sequence", exp.event),
                    actual: format!(
                        "events after position {}: {:?}",
                        captured_idx,
                        captured[captured_idx..]
                            .iter()
                            .map(|e| e.event_type)
                            .collect::<Vec<_>>()
                    ),
                });
            }
        }
    }

    Ok(())
}

/// Sling state for assertions
#[derive(Debug, Clone, PartialEq)]
pub struct SlingState {
    pub pivot: Vec2,
    pub dragging: bool,
    pub returning: bool,
    /// Spawn-order index of the registered stone
    pub registered: Option<usize>,
}

/// World state for assertions
#[derive(Debug, Clone, PartialEq)]
pub struct WorldState {
    pub sling: SlingState,
    pub stones: Vec<StoneView>,
    pub targets: Vec<TargetView>,
    pub basket_count: usize,
}

/// Parse a check string into (path, operator, value)
fn parse_check(check: &str) -> Option<(&str, &str, &str)> {
    // Try operators in order of specificity (>= before >, etc.)
    for op in &[">=", "<=", "!=", "=", ">", "<"] {
        if let Some(idx) = check.find(op) {
            let path = check[..idx].trim();
            let value = check[idx + op.len()..].trim();
            return Some((path, op, value));
        }
    }
    None
}

/// A value a check can read
enum Actual {
    Float(f32),
    Text(String),
}

/// Split `stone2` into ("stone", 2)
fn indexed(name: &str, prefix: &str) -> Option<usize> {
    name.strip_prefix(prefix)?.parse().ok()
}

fn lookup(path: &str, state: &WorldState) -> Option<Actual> {
    let (head, field) = path.split_once('.')?;
    let bool_text = |b: bool| Actual::Text(b.to_string());

    if head == "sling" {
        return Some(match field {
            "pivot_x" => Actual::Float(state.sling.pivot.x),
            "pivot_y" => Actual::Float(state.sling.pivot.y),
            "dragging" => bool_text(state.sling.dragging),
            "returning" => bool_text(state.sling.returning),
            "registered" => Actual::Text(
                state
                    .sling
                    .registered
                    .map(|i| format!("stone{}", i))
                    .unwrap_or_else(|| "none".to_string()),
            ),
            _ => return None,
        });
    }
    if head == "basket" && field == "count" {
        return Some(Actual::Float(state.basket_count as f32));
    }
    if let Some(i) = indexed(head, "stone") {
        let stone = state.stones.get(i)?;
        return Some(match field {
            "x" => Actual::Float(stone.position.x),
            "y" => Actual::Float(stone.position.y),
            "velocity_x" => Actual::Float(stone.velocity.x),
            "velocity_y" => Actual::Float(stone.velocity.y),
            "state" => Actual::Text(stone.state.name().to_string()),
            "suspended" => bool_text(stone.suspended),
            "grace" => bool_text(stone.in_launch_grace),
            _ => return None,
        });
    }
    if let Some(i) = indexed(head, "target") {
        let target = state.targets.get(i)?;
        return Some(match field {
            "x" => Actual::Float(target.position.x),
            "y" => Actual::Float(target.position.y),
            "activated" => bool_text(target.activated),
            _ => return None,
        });
    }
    None
}

/// Check state assertions against world state
pub fn check_state(assertion: &StateAssertion, state: &WorldState) -> Result<(), AssertionError> {
    for check in &assertion.checks {
        let (path, operator, expected_value) = parse_check(check).ok_or_else(|| AssertionError {
            message: format!("Invalid check syntax: {}", check),
            expected: "format: 'stone0.state = InFlight' or 'sling.pivot_x > -4.5'".to_string(),
            actual: check.clone(),
        })?;

        let actual = lookup(path, state).ok_or_else(|| AssertionError {
            message: format!("Unknown path in check: {}", check),
            expected: "sling.*, basket.count, stoneN.*, targetN.*".to_string(),
            actual: path.to_string(),
        })?;

        match actual {
            Actual::Float(value) => check_float_comparison(path, value, operator, expected_value)?,
            Actual::Text(value) => {
                let expected = expected_value.trim_matches('"');
                let pass = match operator {
                    "=" => value == expected,
                    "!=" => value != expected,
                    _ => {
                        return Err(AssertionError {
                            message: format!("Operator {} not valid for {}", operator, path),
                            expected: "= or !=".to_string(),
                            actual: operator.to_string(),
                        });
                    }
                };
                if !pass {
                    return Err(AssertionError {
                        message: format!("Check failed: {}", check),
                        expected: expected.to_string(),
                        actual: value,
                    });
                }
            }
        }
    }

    Ok(())
}

/// Check float comparison with operator
fn check_float_comparison(
    path: &str,
    actual: f32,
    operator: &str,
    expected_str: &str,
) -> Result<(), AssertionError> {
    let value: f32 = expected_str.trim().parse().map_err(|_| AssertionError {
        message: format!("Invalid value for {}", path),
        expected: "number".to_string(),
        actual: expected_str.to_string(),
    })?;

    let pass = match operator {
        ">=" => actual >= value,
        "<=" => actual <= value,
        ">" => actual > value,
        "<" => actual < value,
        "=" => (actual - value).abs() < 0.01,
        "!=" => (actual - value).abs() >= 0.01,
        _ => false,
    };

    if !pass {
        return Err(AssertionError {
            message: format!(
                "Check failed: {} {} {} (actual: {:.3})",
                path, operator, expected_str, actual
            ),
            expected: format!("{} {} {}", path, operator, value),
            actual: format!("{:.3}", actual),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::projectile::ProjectileState;

    fn state() -> WorldState {
        WorldState {
            sling: SlingState {
                pivot: Vec2::new(-4.0, -1.0),
                dragging: false,
                returning: true,
                registered: None,
            },
            stones: vec![StoneView {
                id: ProjectileId(1),
                state: ProjectileState::InFlight,
                position: Vec2::new(1.0, 2.0),
                velocity: Vec2::new(7.0, 0.5),
                suspended: false,
                in_launch_grace: false,
            }],
            targets: Vec::new(),
            basket_count: 0,
        }
    }

    fn checks(list: &[&str]) -> StateAssertion {
        StateAssertion {
            after_frame: 1,
            checks: list.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_checks_pass() {
        let assertion = checks(&[
            "stone0.state = InFlight",
            "stone0.velocity_x > 6",
            "sling.pivot_x = -4.0",
            "sling.returning = true",
            "sling.registered = none",
            "basket.count = 0",
        ]);
        assert!(check_state(&assertion, &state()).is_ok());
    }

    #[test]
    fn test_check_failures() {
        assert!(check_state(&checks(&["stone0.state = Idle"]), &state()).is_err());
        assert!(check_state(&checks(&["stone3.x = 0"]), &state()).is_err());
        assert!(check_state(&checks(&["sling.dragging > true"]), &state()).is_err());
        assert!(check_state(&checks(&["nonsense"]), &state()).is_err());
    }

    #[test]
    fn test_sequence_in_order_with_gaps() {
        let captured = vec![
            CapturedEvent {
                frame: 3,
                event_type: "DragStarted",
                stone: None,
            },
            CapturedEvent {
                frame: 5,
                event_type: "ProjectileAttached",
                stone: Some(1),
            },
            CapturedEvent {
                frame: 9,
                event_type: "Launched",
                stone: Some(1),
            },
        ];
        let expect = |event: &str, stone: Option<usize>, frame_max: Option<u32>| ExpectedEvent {
            event: event.to_string(),
            stone,
            frame_min: None,
            frame_max,
        };

        assert!(check_sequence(&[expect("DragStarted", None, None), expect("Launched", Some(1), None)], &captured).is_ok());
        assert!(check_sequence(&[expect("Launched", None, None), expect("DragStarted", None, None)], &captured).is_err());
        assert!(check_sequence(&[expect("Launched", Some(0), None)], &captured).is_err());
        assert!(check_sequence(&[expect("Launched", None, Some(8))], &captured).is_err());
    }
}

//! Wire messages exchanged with actor processes.
//!
//! Engine to actor: a one-off [`WorldInfo`] after spawning, then a
//! [`WorldSnapshot`] every turn. Actor to engine: a JSON array naming the
//! action, checked by [`parse_action`].
use arena_core::{Action, MapDimensions, Position, RobotInfo};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Setup message: `{"width": .., "height": ..}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldInfo {
    pub width: u32,
    pub height: u32,
}

impl From<MapDimensions> for WorldInfo {
    fn from(dimensions: MapDimensions) -> Self {
        Self {
            width: dimensions.width,
            height: dimensions.height,
        }
    }
}

/// Per-turn request: every live robot, the turn number, and the receiver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub robots: Vec<RobotInfo>,
    pub turn: u64,
    #[serde(rename = "self")]
    pub me: RobotInfo,
}

/// Why an actor reply was not accepted as an action.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("reply is not a non-empty array")]
    NotAnArray,

    #[error("action tag is not a string")]
    MissingTag,

    #[error("unknown action `{0}`")]
    UnknownAction(String),

    #[error("`{action}` takes {expected} element(s), got {actual}")]
    Arity {
        action: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("target is not an [x, y] pair of integers")]
    BadTarget,

    #[error("target {target} is not adjacent to {origin}")]
    NotAdjacent { origin: Position, target: Position },
}

/// Validates a raw reply from an actor standing on `origin`.
///
/// Accepted shapes are `["guard"]`, `["suicide"]`, `["move", [x, y]]` and
/// `["attack", [x, y]]`, where `[x, y]` must be one of the four orthogonal
/// neighbours of `origin`.
pub fn parse_action(reply: &Value, origin: Position) -> Result<Action, ActionError> {
    let items = reply
        .as_array()
        .filter(|items| !items.is_empty())
        .ok_or(ActionError::NotAnArray)?;
    let tag = items[0].as_str().ok_or(ActionError::MissingTag)?;

    match tag {
        "guard" => no_arguments(items, "guard").map(|()| Action::Guard),
        "suicide" => no_arguments(items, "suicide").map(|()| Action::Suicide),
        "move" => adjacent_target(items, "move", origin).map(Action::Move),
        "attack" => adjacent_target(items, "attack", origin).map(Action::Attack),
        other => Err(ActionError::UnknownAction(other.to_owned())),
    }
}

fn no_arguments(items: &[Value], action: &'static str) -> Result<(), ActionError> {
    if items.len() == 1 {
        Ok(())
    } else {
        Err(ActionError::Arity {
            action,
            expected: 1,
            actual: items.len(),
        })
    }
}

fn adjacent_target(
    items: &[Value],
    action: &'static str,
    origin: Position,
) -> Result<Position, ActionError> {
    let [_, target] = items else {
        return Err(ActionError::Arity {
            action,
            expected: 2,
            actual: items.len(),
        });
    };
    let Some([x, y]) = target.as_array().map(Vec::as_slice) else {
        return Err(ActionError::BadTarget);
    };
    let target = Position::new(coordinate(x)?, coordinate(y)?);

    if origin.distance_squared(target) == 1 {
        Ok(target)
    } else {
        Err(ActionError::NotAdjacent { origin, target })
    }
}

/// Integers, or floats with no fractional part, that fit an `i32`.
fn coordinate(value: &Value) -> Result<i32, ActionError> {
    if let Some(int) = value.as_i64() {
        return i32::try_from(int).map_err(|_| ActionError::BadTarget);
    }
    match value.as_f64() {
        Some(float) if float.fract() == 0.0 && float.abs() <= f64::from(i32::MAX) => {
            Ok(float as i32)
        }
        _ => Err(ActionError::BadTarget),
    }
}

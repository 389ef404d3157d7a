//! Event payloads published by [`EventObserver`](super::EventObserver).
use arena_core::{Position, RobotInfo};
use serde::{Deserialize, Serialize};

/// One observer callback, captured as data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ArenaEvent {
    Spawn {
        robot: RobotInfo,
    },
    Kill {
        robot: RobotInfo,
    },
    /// `robot.location` is the cell being left.
    Move {
        robot: RobotInfo,
        to: Position,
    },
    Attack {
        robot: RobotInfo,
        target: Position,
    },
    Suicide {
        robot: RobotInfo,
    },
    /// Survivors once `turn` has been fully resolved.
    TurnEnd {
        turn: u64,
        robots: Vec<RobotInfo>,
    },
}

impl ArenaEvent {
    /// The robot the event is about, if it is about one.
    pub fn robot(&self) -> Option<&RobotInfo> {
        match self {
            ArenaEvent::Spawn { robot }
            | ArenaEvent::Kill { robot }
            | ArenaEvent::Move { robot, .. }
            | ArenaEvent::Attack { robot, .. }
            | ArenaEvent::Suicide { robot } => Some(robot),
            ArenaEvent::TurnEnd { .. } => None,
        }
    }
}

//! Per-turn intents.
//!
//! Actors choose one of [`Action::Move`], [`Action::Attack`],
//! [`Action::Guard`] or [`Action::Suicide`]. [`Action::Cancelled`] never comes
//! from an actor: movement resolution produces it when a move collides.
use std::fmt;

use crate::state::Position;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "target", rename_all = "snake_case"))]
pub enum Action {
    Move(Position),
    Attack(Position),
    #[default]
    Guard,
    Suicide,
    Cancelled,
}

impl Action {
    /// Wire tag of the action.
    pub const fn name(&self) -> &'static str {
        match self {
            Action::Move(_) => "move",
            Action::Attack(_) => "attack",
            Action::Guard => "guard",
            Action::Suicide => "suicide",
            Action::Cancelled => "cancelled",
        }
    }

    pub const fn is_guard(&self) -> bool {
        matches!(self, Action::Guard)
    }

    pub const fn is_move(&self) -> bool {
        matches!(self, Action::Move(_))
    }

    /// Cell the actor ends up in if nothing gets in the way.
    pub fn destination(&self, origin: Position) -> Position {
        match self {
            Action::Move(target) => *target,
            _ => origin,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(target) | Action::Attack(target) => {
                write!(f, "{} {}", self.name(), target)
            }
            _ => f.write_str(self.name()),
        }
    }
}

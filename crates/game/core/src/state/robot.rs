use super::common::{PlayerId, Position, RobotId};

/// Public view of a combatant, shared with every actor each turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RobotInfo {
    pub location: Position,
    pub hp: u32,
    pub player_id: PlayerId,
    pub robot_id: RobotId,
}

/// In-engine game state of one combatant.
///
/// `location` stays `None` until the combatant is placed on a board. Health
/// never goes below zero; zero means dead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Robot {
    robot_id: RobotId,
    player_id: PlayerId,
    location: Option<Position>,
    hp: u32,
}

impl Robot {
    pub fn new(robot_id: RobotId, player_id: PlayerId, hp: u32) -> Self {
        Self {
            robot_id,
            player_id,
            location: None,
            hp,
        }
    }

    /// Builder used by scenarios that start from a known layout.
    #[must_use]
    pub fn at(mut self, location: Position) -> Self {
        self.location = Some(location);
        self
    }

    pub fn robot_id(&self) -> RobotId {
        self.robot_id
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn location(&self) -> Option<Position> {
        self.location
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Public info, available once the robot has been placed.
    pub fn info(&self) -> Option<RobotInfo> {
        self.location.map(|location| RobotInfo {
            location,
            hp: self.hp,
            player_id: self.player_id,
            robot_id: self.robot_id,
        })
    }

    pub(crate) fn set_location(&mut self, location: Position) {
        self.location = Some(location);
    }

    /// Subtracts `amount`, clamping at zero.
    pub fn take_damage(&mut self, amount: u32) {
        self.hp = self.hp.saturating_sub(amount);
    }

    pub fn set_dead(&mut self) {
        self.hp = 0;
    }
}

/// Anything that can stand on a [`Board`](crate::engine::Board).
///
/// The engine only ever reads and writes the wrapped [`Robot`]; whatever else
/// the occupant owns (an actor channel, for instance) travels with it.
pub trait Occupant {
    fn robot(&self) -> &Robot;
    fn robot_mut(&mut self) -> &mut Robot;
}

impl Occupant for Robot {
    fn robot(&self) -> &Robot {
        self
    }

    fn robot_mut(&mut self) -> &mut Robot {
        self
    }
}

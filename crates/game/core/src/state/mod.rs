//! Identities, grid coordinates, and per-combatant game state.
//!
//! The engine mutates [`Robot`] values only while resolving a turn or placing
//! a newcomer; everything else reads them through [`RobotInfo`] snapshots.
mod common;
mod robot;

pub use common::{PlayerId, Position, RobotId};
pub use robot::{Occupant, Robot, RobotInfo};

//! Deterministic arena rules shared by the runtime and offline tools.
//!
//! `arena-core` defines the canonical rules (actions, board, map, damage) and
//! exposes pure APIs: no processes, no clocks, randomness injected by the
//! caller. All board mutation flows through [`engine::ArenaState`].
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod observer;
pub mod state;

pub use action::Action;
pub use config::{DamageRange, DamageRangeError, DamageTable};
pub use engine::{ArenaState, Board, PlacementError, TurnOutcome};
pub use env::{ArenaMap, MapDimensions, MapError, TileKind};
pub use observer::{NoopObserver, Observer, TurnView};
pub use state::{Occupant, PlayerId, Position, Robot, RobotId, RobotInfo};

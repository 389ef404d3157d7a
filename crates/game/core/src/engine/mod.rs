//! Turn resolution.
//!
//! [`ArenaState`] is the authoritative reducer for the board. A turn takes the
//! gathered actions of every live combatant and produces exactly one next
//! state, in four phases:
//!
//! 1. movement, repeated to a fixed point (see [`movement`])
//! 2. combat against the post-movement board (see [`combat`])
//! 3. cleanup of every combatant whose health reached zero
//! 4. turn counter increment and [`Observer::on_turn_end`]
//!
//! Randomness is injected per call so callers decide between seeded and
//! entropy-backed generators.
mod board;
mod combat;
mod movement;

pub use board::Board;

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use rand::Rng;

use crate::action::Action;
use crate::config::DamageTable;
use crate::env::ArenaMap;
use crate::observer::{Observer, TurnView};
use crate::state::{Occupant, Position, RobotId, RobotInfo};
use movement::Contender;

/// Returned when an occupant is placed on a cell it may not stand on.
///
/// The rejected occupant is handed back so the caller keeps ownership.
#[derive(thiserror::Error)]
#[error("cannot place a robot on {position}: not a walkable cell")]
pub struct PlacementError<O> {
    pub position: Position,
    pub occupant: O,
}

impl<O> fmt::Debug for PlacementError<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlacementError")
            .field("position", &self.position)
            .finish_non_exhaustive()
    }
}

/// Result of one resolved turn.
#[derive(Debug)]
pub struct TurnOutcome<O> {
    /// Index of the resolved turn.
    pub turn: u64,
    /// Movement passes needed to reach the fixed point.
    pub passes: usize,
    /// Occupants removed during cleanup, each exactly once.
    pub dead: Vec<O>,
    /// Occupants still on the board.
    pub remaining: usize,
}

impl<O> TurnOutcome<O> {
    pub fn has_survivors(&self) -> bool {
        self.remaining > 0
    }
}

/// Map, damage table, board and turn counter of one match.
#[derive(Debug)]
pub struct ArenaState<O> {
    map: ArenaMap,
    damage: DamageTable,
    board: Board<O>,
    turn: u64,
}

impl<O: Occupant> ArenaState<O> {
    pub fn new(map: ArenaMap, damage: DamageTable) -> Self {
        Self {
            map,
            damage,
            board: Board::new(),
            turn: 0,
        }
    }

    pub fn map(&self) -> &ArenaMap {
        &self.map
    }

    pub fn damage(&self) -> &DamageTable {
        &self.damage
    }

    pub fn board(&self) -> &Board<O> {
        &self.board
    }

    /// Number of completed turns.
    pub fn turn(&self) -> u64 {
        self.turn
    }

    pub fn len(&self) -> usize {
        self.board.len()
    }

    pub fn is_empty(&self) -> bool {
        self.board.is_empty()
    }

    pub fn robots(&self) -> Vec<RobotInfo> {
        self.board.robots()
    }

    /// Places `occupant` on a uniformly drawn spawn tile.
    ///
    /// Whoever already stands there is eliminated unconditionally and
    /// returned so the caller can tear it down.
    pub fn spawn<R, Ob>(&mut self, occupant: O, rng: &mut R, observer: &mut Ob) -> Option<O>
    where
        R: Rng + ?Sized,
        Ob: Observer + ?Sized,
    {
        let at = self.map.random_spawn(rng);
        self.occupy(at, occupant, observer)
    }

    /// Places `occupant` on a specific walkable cell, evicting any occupant.
    pub fn place_at<Ob>(
        &mut self,
        occupant: O,
        at: Position,
        observer: &mut Ob,
    ) -> Result<Option<O>, PlacementError<O>>
    where
        Ob: Observer + ?Sized,
    {
        if !self.map.is_walkable(at) {
            return Err(PlacementError {
                position: at,
                occupant,
            });
        }
        Ok(self.occupy(at, occupant, observer))
    }

    fn occupy<Ob>(&mut self, at: Position, occupant: O, observer: &mut Ob) -> Option<O>
    where
        Ob: Observer + ?Sized,
    {
        let evicted = self.board.remove(at).map(|mut previous| {
            previous.robot_mut().set_dead();
            if let Some(info) = previous.robot().info() {
                observer.on_kill(&info);
            }
            previous
        });

        self.board.insert(at, occupant);
        if let Some(info) = self.board.get(at).and_then(|o| o.robot().info()) {
            observer.on_spawn(&info);
        }
        evicted
    }

    /// Resolves one turn from the gathered actions.
    ///
    /// Occupants without an entry in `actions` guard. Combat runs in ascending
    /// robot-id order so that identical inputs and RNG streams always yield
    /// identical results.
    pub fn resolve_turn<R, Ob>(
        &mut self,
        mut actions: HashMap<RobotId, Action>,
        rng: &mut R,
        observer: &mut Ob,
    ) -> TurnOutcome<O>
    where
        R: Rng + ?Sized,
        Ob: Observer + ?Sized,
    {
        let mut contenders: Vec<Contender<O>> = self
            .board
            .take_all()
            .into_iter()
            .map(|(origin, occupant)| Contender {
                origin,
                action: actions
                    .remove(&occupant.robot().robot_id())
                    .unwrap_or_default(),
                occupant,
            })
            .collect();
        contenders.sort_by_key(|contender| contender.occupant.robot().robot_id());

        movement::cancel_unreachable(&mut contenders, &self.map);
        let passes = movement::settle(&mut contenders, self.damage.collision, rng);

        let mut order = Vec::with_capacity(contenders.len());
        let mut settled = BTreeMap::new();
        for contender in contenders {
            let destination = contender.destination();
            if contender.action.is_move()
                && let Some(info) = contender.occupant.robot().info()
            {
                observer.on_move(&info, destination);
            }
            order.push(destination);
            settled.insert(destination, contender.action);
            self.board.insert(destination, contender.occupant);
        }

        combat::resolve(
            &mut self.board,
            &order,
            &settled,
            &self.damage,
            rng,
            observer,
        );

        let dead = self.remove_dead(observer);

        let turn = self.turn;
        self.turn += 1;
        observer.on_turn_end(&TurnView {
            turn,
            map: &self.map,
            robots: self.board.robots(),
        });

        TurnOutcome {
            turn,
            passes,
            dead,
            remaining: self.board.len(),
        }
    }

    /// Removes every occupant, reporting each as killed.
    pub fn clear<Ob>(&mut self, observer: &mut Ob) -> Vec<O>
    where
        Ob: Observer + ?Sized,
    {
        self.board
            .take_all()
            .into_iter()
            .map(|(_, mut occupant)| {
                occupant.robot_mut().set_dead();
                if let Some(info) = occupant.robot().info() {
                    observer.on_kill(&info);
                }
                occupant
            })
            .collect()
    }

    fn remove_dead<Ob>(&mut self, observer: &mut Ob) -> Vec<O>
    where
        Ob: Observer + ?Sized,
    {
        let fallen: Vec<Position> = self
            .board
            .iter()
            .filter(|(_, occupant)| !occupant.robot().is_alive())
            .map(|(at, _)| at)
            .collect();

        fallen
            .into_iter()
            .filter_map(|at| self.board.remove(at))
            .inspect(|occupant| {
                if let Some(info) = occupant.robot().info() {
                    observer.on_kill(&info);
                }
            })
            .collect()
    }
}

use std::collections::BTreeMap;

use crate::state::{Occupant, Position, RobotId, RobotInfo};

/// Live occupants keyed by cell. At most one occupant per cell, always.
///
/// The key is the source of truth for location: inserting an occupant writes
/// the key back into its [`Robot`](crate::Robot).
#[derive(Debug)]
pub struct Board<O> {
    cells: BTreeMap<Position, O>,
}

impl<O> Default for Board<O> {
    fn default() -> Self {
        Self {
            cells: BTreeMap::new(),
        }
    }
}

impl<O: Occupant> Board<O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, at: Position) -> Option<&O> {
        self.cells.get(&at)
    }

    pub fn is_occupied(&self, at: Position) -> bool {
        self.cells.contains_key(&at)
    }

    /// Occupants in ascending position order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &O)> {
        self.cells.iter().map(|(at, occupant)| (*at, occupant))
    }

    pub fn find(&self, robot_id: RobotId) -> Option<&O> {
        self.cells
            .values()
            .find(|occupant| occupant.robot().robot_id() == robot_id)
    }

    /// Public info of every occupant, in ascending position order.
    pub fn robots(&self) -> Vec<RobotInfo> {
        self.cells
            .values()
            .filter_map(|occupant| occupant.robot().info())
            .collect()
    }

    pub(crate) fn get_mut(&mut self, at: Position) -> Option<&mut O> {
        self.cells.get_mut(&at)
    }

    /// Puts `occupant` on `at`, returning whoever stood there before.
    pub(crate) fn insert(&mut self, at: Position, mut occupant: O) -> Option<O> {
        occupant.robot_mut().set_location(at);
        self.cells.insert(at, occupant)
    }

    pub(crate) fn remove(&mut self, at: Position) -> Option<O> {
        self.cells.remove(&at)
    }

    /// Empties the board, yielding `(cell, occupant)` pairs in position order.
    pub(crate) fn take_all(&mut self) -> Vec<(Position, O)> {
        std::mem::take(&mut self.cells).into_iter().collect()
    }
}

//! Fixed-point movement resolution.
//!
//! Every pass groups combatants by intended destination. Any cell claimed by
//! more than one combatant is a collision: movers in the group are cancelled
//! (falling back to their own, unique, origin) and the group takes collision
//! damage. Each colliding pass cancels at least one mover, since two
//! stationary combatants never share a cell, so the loop ends after at most
//! `movers + 1` passes.
use std::collections::BTreeMap;

use rand::Rng;

use crate::action::Action;
use crate::config::DamageRange;
use crate::env::ArenaMap;
use crate::state::{Occupant, PlayerId, Position};

/// One combatant taken off the board for the duration of a turn.
#[derive(Debug)]
pub(crate) struct Contender<O> {
    pub origin: Position,
    pub action: Action,
    pub occupant: O,
}

impl<O: Occupant> Contender<O> {
    pub fn destination(&self) -> Position {
        self.action.destination(self.origin)
    }

    fn owner(&self) -> PlayerId {
        self.occupant.robot().player_id()
    }
}

/// Cancels moves that leave the map or enter a blocked cell. No damage.
pub(crate) fn cancel_unreachable<O: Occupant>(contenders: &mut [Contender<O>], map: &ArenaMap) {
    for contender in contenders {
        if let Action::Move(target) = contender.action
            && !map.is_walkable(target)
        {
            contender.action = Action::Cancelled;
        }
    }
}

/// Runs collision passes until none collide. Returns the number of passes.
pub(crate) fn settle<O, R>(
    contenders: &mut [Contender<O>],
    collision: DamageRange,
    rng: &mut R,
) -> usize
where
    O: Occupant,
    R: Rng + ?Sized,
{
    let mut passes = 0;
    loop {
        passes += 1;

        let mut claims: BTreeMap<Position, Vec<usize>> = BTreeMap::new();
        for (index, contender) in contenders.iter().enumerate() {
            claims
                .entry(contender.destination())
                .or_default()
                .push(index);
        }

        let mut collided = false;
        for group in claims.values().filter(|group| group.len() > 1) {
            collided = true;

            let owner = contenders[group[0]].owner();
            let friendly = group.iter().all(|&index| contenders[index].owner() == owner);

            for &index in group {
                let contender = &mut contenders[index];
                if contender.action.is_move() {
                    contender.action = Action::Cancelled;
                }
                // Guarding grants full immunity to collisions.
                if friendly || contender.action.is_guard() {
                    continue;
                }
                let amount = collision.roll(rng);
                contender.occupant.robot_mut().take_damage(amount);
            }
        }

        if !collided {
            return passes;
        }
    }
}

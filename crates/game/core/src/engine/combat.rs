//! Attack and suicide resolution against the post-movement board.
use std::collections::BTreeMap;

use rand::Rng;

use super::board::Board;
use crate::action::Action;
use crate::config::{DamageRange, DamageTable};
use crate::observer::Observer;
use crate::state::{Occupant, PlayerId, Position};

/// Resolves combat for the occupants at `order`, in that order.
///
/// `actions` maps each post-movement cell to the action its occupant took
/// this turn; it decides who is guarding.
pub(crate) fn resolve<O, R, Ob>(
    board: &mut Board<O>,
    order: &[Position],
    actions: &BTreeMap<Position, Action>,
    damage: &DamageTable,
    rng: &mut R,
    observer: &mut Ob,
) where
    O: Occupant,
    R: Rng + ?Sized,
    Ob: Observer + ?Sized,
{
    for &at in order {
        let Some(action) = actions.get(&at).copied() else {
            continue;
        };
        let Some(actor) = board.get(at).and_then(|occupant| occupant.robot().info()) else {
            continue;
        };

        match action {
            Action::Attack(target) => {
                strike(board, actions, actor.player_id, target, damage.attack, rng);
                observer.on_attack(&actor, target);
            }
            Action::Suicide => {
                for target in at.neighbors() {
                    strike(board, actions, actor.player_id, target, damage.suicide, rng);
                }
                if let Some(occupant) = board.get_mut(at) {
                    occupant.robot_mut().set_dead();
                    if let Some(info) = occupant.robot().info() {
                        observer.on_suicide(&info);
                    }
                }
            }
            Action::Move(_) | Action::Guard | Action::Cancelled => {}
        }
    }
}

/// Damages the occupant of `target` unless it is empty or friendly.
/// Guarding victims take half, rounded down. Returns the damage dealt.
fn strike<O, R>(
    board: &mut Board<O>,
    actions: &BTreeMap<Position, Action>,
    attacker: PlayerId,
    target: Position,
    range: DamageRange,
    rng: &mut R,
) -> Option<u32>
where
    O: Occupant,
    R: Rng + ?Sized,
{
    let victim = board.get_mut(target)?;
    if victim.robot().player_id() == attacker {
        return None;
    }

    let mut amount = range.roll(rng);
    if actions.get(&target).is_some_and(Action::is_guard) {
        amount /= 2;
    }
    victim.robot_mut().take_damage(amount);
    Some(amount)
}

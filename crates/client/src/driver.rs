//! Match loop: spawn schedule, turn limit and final standings.
use std::collections::BTreeMap;
use std::time::Duration;

use arena_core::{PlayerId, RobotInfo};
use arena_runtime::{ActorCommand, Arena};

/// When and how many robots enter, and how long the match lasts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub turns: u64,
    /// Turns between spawn waves; 0 disables spawning after the start.
    pub spawn_every: u64,
    /// Robots launched per player in every wave.
    pub spawn_batch: usize,
    pub turn_delay: Duration,
}

impl Schedule {
    /// Whether a spawn wave precedes `turn`. The first turn always gets one.
    pub fn spawns_before(&self, turn: u64) -> bool {
        turn == 0 || (self.spawn_every > 0 && turn % self.spawn_every == 0)
    }
}

/// Plays the match and returns the number of survivors per player, counted
/// before the arena is closed.
pub async fn run(
    arena: &mut Arena,
    players: &[ActorCommand],
    schedule: &Schedule,
) -> BTreeMap<PlayerId, usize> {
    while arena.turn() < schedule.turns {
        if schedule.spawns_before(arena.turn()) {
            spawn_wave(arena, players, schedule.spawn_batch).await;
        }

        let report = arena.step().await;
        tracing::debug!(
            turn = report.turn,
            passes = report.passes,
            fallen = report.fallen.len(),
            remaining = report.remaining,
            "turn resolved"
        );

        if !schedule.turn_delay.is_zero() {
            tokio::time::sleep(schedule.turn_delay).await;
        }
    }

    let survivors = standings(players.len(), &arena.robots());
    arena.close();
    survivors
}

/// Launches `batch` robots for every player, interleaving players.
async fn spawn_wave(arena: &mut Arena, players: &[ActorCommand], batch: usize) {
    for _ in 0..batch {
        for (player, command) in (1..).map(PlayerId).zip(players) {
            match arena.launch(command, player).await {
                Ok(robot) => tracing::debug!(%robot, %player, "robot launched"),
                Err(err) => tracing::warn!(%player, error = %err, "robot failed to launch"),
            }
        }
    }
}

/// Survivors per player id `1..=players`, zero included.
pub fn standings(players: usize, robots: &[RobotInfo]) -> BTreeMap<PlayerId, usize> {
    let mut counts: BTreeMap<PlayerId, usize> = (1..=players as u32)
        .map(|id| (PlayerId(id), 0))
        .collect();
    for robot in robots {
        *counts.entry(robot.player_id).or_default() += 1;
    }
    counts
}

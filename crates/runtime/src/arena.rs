//! Async arena: gathers actions from actor processes and feeds them to the
//! resolver.
//!
//! [`Arena`] owns an [`ArenaState`] of [`Combatant`]s. Each [`Arena::step`]
//! asks every combatant for its action concurrently, waits for all of them
//! (each bounded by its own reply timeout), then resolves the turn in one
//! synchronous call. The board is never touched while requests are in
//! flight.
use std::collections::HashMap;

use arena_core::{
    Action, ArenaMap, ArenaState, NoopObserver, Observer, PlacementError, PlayerId, Position,
    RobotId, RobotInfo,
};
use futures::future::join_all;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::channel::ActorCommand;
use crate::combatant::Combatant;
use crate::config::ArenaConfig;
use crate::error::{Result, RuntimeError};

/// What happened during one [`Arena::step`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    /// Index of the resolved turn.
    pub turn: u64,
    /// Movement passes needed to settle collisions.
    pub passes: usize,
    /// Robots removed during cleanup. Their actors have been killed.
    pub fallen: Vec<RobotId>,
    /// Robots still on the board.
    pub remaining: usize,
}

impl StepReport {
    pub fn has_survivors(&self) -> bool {
        self.remaining > 0
    }
}

/// A running match.
pub struct Arena {
    config: ArenaConfig,
    state: ArenaState<Combatant>,
    observer: Box<dyn Observer + Send>,
    rng: StdRng,
}

impl Arena {
    pub fn builder() -> ArenaBuilder {
        ArenaBuilder::new()
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    pub fn map(&self) -> &ArenaMap {
        self.state.map()
    }

    /// Number of completed turns.
    pub fn turn(&self) -> u64 {
        self.state.turn()
    }

    pub fn len(&self) -> usize {
        self.state.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Public info of every live robot.
    pub fn robots(&self) -> Vec<RobotInfo> {
        self.state.robots()
    }

    pub fn combatant(&self, robot_id: RobotId) -> Option<&Combatant> {
        self.state.board().find(robot_id)
    }

    /// Starts `command` as a new robot for `player` and spawns it.
    pub async fn launch(&mut self, command: &ActorCommand, player: PlayerId) -> Result<RobotId> {
        let combatant = Combatant::launch(
            command,
            player,
            self.config.starting_hp,
            self.config.reply_timeout,
        )?;
        Ok(self.add(combatant).await)
    }

    /// Puts `combatant` on a random spawn tile, killing whoever stood there,
    /// and sends it the map size.
    pub async fn add(&mut self, combatant: Combatant) -> RobotId {
        let robot_id = combatant.robot_id();
        if let Some(evicted) = self
            .state
            .spawn(combatant, &mut self.rng, &mut self.observer)
        {
            Self::bury(evicted);
        }
        self.announce(robot_id).await;
        robot_id
    }

    /// Puts `combatant` on a specific cell, killing whoever stood there.
    ///
    /// A combatant that cannot be placed is killed.
    pub async fn add_at(&mut self, combatant: Combatant, at: Position) -> Result<RobotId> {
        let robot_id = combatant.robot_id();
        match self.state.place_at(combatant, at, &mut self.observer) {
            Ok(evicted) => {
                if let Some(evicted) = evicted {
                    Self::bury(evicted);
                }
            }
            Err(PlacementError { position, occupant }) => {
                Self::bury(occupant);
                return Err(RuntimeError::Placement(position));
            }
        }
        self.announce(robot_id).await;
        Ok(robot_id)
    }

    /// Plays one turn.
    pub async fn step(&mut self) -> StepReport {
        let turn = self.state.turn();
        let robots = self.state.robots();

        let requests = self.state.board().iter().map(|(_, combatant)| {
            let robots = &robots;
            async move { (combatant.robot_id(), combatant.step(turn, robots).await) }
        });
        let actions: HashMap<RobotId, Action> = join_all(requests).await.into_iter().collect();
        tracing::debug!(turn, gathered = actions.len(), "actions gathered");

        let outcome = self
            .state
            .resolve_turn(actions, &mut self.rng, &mut self.observer);

        let fallen = outcome
            .dead
            .into_iter()
            .map(|combatant| {
                let robot_id = combatant.robot_id();
                Self::bury(combatant);
                robot_id
            })
            .collect();

        StepReport {
            turn: outcome.turn,
            passes: outcome.passes,
            fallen,
            remaining: outcome.remaining,
        }
    }

    /// Kills every remaining robot and empties the board.
    pub fn close(&mut self) {
        let removed = self.state.clear(&mut self.observer);
        tracing::info!(turn = self.state.turn(), removed = removed.len(), "arena closed");
        removed.into_iter().for_each(Self::bury);
    }

    async fn announce(&self, robot_id: RobotId) {
        if let Some(combatant) = self.state.board().find(robot_id) {
            combatant.setup(self.state.map().dimensions()).await;
        }
    }

    fn bury(mut combatant: Combatant) {
        combatant.kill();
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("config", &self.config)
            .field("turn", &self.state.turn())
            .field("robots", &self.state.len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Arena`].
pub struct ArenaBuilder {
    config: ArenaConfig,
    map: Option<ArenaMap>,
    observer: Option<Box<dyn Observer + Send>>,
    seed: Option<u64>,
}

impl ArenaBuilder {
    fn new() -> Self {
        Self {
            config: ArenaConfig::default(),
            map: None,
            observer: None,
            seed: None,
        }
    }

    /// Override arena configuration
    pub fn config(mut self, config: ArenaConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `map` instead of the ring generated from the configured size
    pub fn map(mut self, map: ArenaMap) -> Self {
        self.map = Some(map);
        self
    }

    pub fn observer(mut self, observer: impl Observer + Send + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Seed the RNG, overriding any seed in the configuration
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<Arena> {
        let map = match self.map {
            Some(map) => map,
            None => self.config.map()?,
        };
        let rng = match self.seed.or(self.config.seed) {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        tracing::info!(
            width = map.width(),
            height = map.height(),
            spawns = map.spawn_points().len(),
            "arena ready"
        );

        Ok(Arena {
            state: ArenaState::new(map, self.config.damage),
            observer: self.observer.unwrap_or_else(|| Box::new(NoopObserver)),
            rng,
            config: self.config,
        })
    }
}

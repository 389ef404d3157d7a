//! A robot on the board together with the actor process that drives it.
use std::collections::HashSet;
use std::fmt;
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::Duration;

use arena_core::{Action, MapDimensions, Occupant, PlayerId, Robot, RobotId, RobotInfo};
use rand::Rng;
use serde_json::json;

use crate::channel::{ActorChannel, ActorCommand, ChannelFailure};
use crate::error::{Result, RuntimeError};
use crate::protocol::{WorldInfo, WorldSnapshot, parse_action};

static ISSUED_IDS: LazyLock<Mutex<HashSet<u32>>> = LazyLock::new(Mutex::default);

/// Draws a random robot id never handed out before by this process.
pub fn next_robot_id() -> RobotId {
    let mut issued = ISSUED_IDS.lock().unwrap_or_else(PoisonError::into_inner);
    draw_unique_id(&mut issued, &mut rand::thread_rng())
}

fn draw_unique_id<R: Rng + ?Sized>(issued: &mut HashSet<u32>, rng: &mut R) -> RobotId {
    loop {
        let candidate = rng.r#gen::<u32>();
        if issued.insert(candidate) {
            return RobotId(candidate);
        }
    }
}

/// One robot and the channel to its actor. The channel lives exactly as long
/// as the combatant.
pub struct Combatant {
    robot: Robot,
    channel: ActorChannel,
    reply_timeout: Duration,
}

impl Combatant {
    pub fn new(channel: ActorChannel, player: PlayerId, hp: u32, reply_timeout: Duration) -> Self {
        Self {
            robot: Robot::new(next_robot_id(), player, hp),
            channel,
            reply_timeout,
        }
    }

    /// Starts the actor process for a new robot owned by `player`.
    pub fn launch(
        command: &ActorCommand,
        player: PlayerId,
        hp: u32,
        reply_timeout: Duration,
    ) -> Result<Self> {
        let channel = ActorChannel::launch(command).map_err(|source| RuntimeError::Launch {
            command: command.to_string(),
            source,
        })?;
        Ok(Self::new(channel, player, hp, reply_timeout))
    }

    pub fn robot_id(&self) -> RobotId {
        self.robot.robot_id()
    }

    pub fn channel(&self) -> &ActorChannel {
        &self.channel
    }

    /// Tells the actor the map size. Fire and forget.
    pub async fn setup(&self, dimensions: MapDimensions) {
        if let Err(failure) = self.channel.notify(&WorldInfo::from(dimensions)).await {
            tracing::debug!(robot = %self.robot_id(), %failure, "setup not delivered");
        }
    }

    /// Asks the actor for this turn's action.
    ///
    /// Anything but a valid, adjacent action, including silence, is `Guard`.
    pub async fn step(&self, turn: u64, robots: &[RobotInfo]) -> Action {
        let Some(me) = self.robot.info() else {
            return Action::Guard;
        };
        let snapshot = WorldSnapshot {
            robots: robots.to_vec(),
            turn,
            me,
        };

        let reply = self
            .channel
            .send(&snapshot, true, self.reply_timeout, json!(["guard"]))
            .await;

        match parse_action(&reply, me.location) {
            Ok(action) => action,
            Err(err) => {
                tracing::debug!(robot = %me.robot_id, turn, %reply, error = %err, "rejected action");
                Action::Guard
            }
        }
    }

    /// Sets health to zero and kills the actor. Safe to call more than once.
    pub fn kill(&mut self) {
        self.robot.set_dead();
        self.channel.kill(ChannelFailure::Killed);
    }
}

impl Occupant for Combatant {
    fn robot(&self) -> &Robot {
        &self.robot
    }

    fn robot_mut(&mut self) -> &mut Robot {
        &mut self.robot
    }
}

impl fmt::Debug for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Combatant")
            .field("robot", &self.robot)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}

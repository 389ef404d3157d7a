//! Broadcast-backed observer.
use arena_core::{Observer, Position, RobotInfo, TurnView};
use tokio::sync::broadcast;

use super::types::ArenaEvent;

/// Observer that republishes every callback on a broadcast channel.
///
/// Publishing never blocks the resolver. Slow subscribers lag and lose the
/// oldest events; with no subscribers events are dropped.
#[derive(Debug, Clone)]
pub struct EventObserver {
    tx: broadcast::Sender<ArenaEvent>,
}

impl EventObserver {
    pub const DEFAULT_CAPACITY: usize = 256;

    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ArenaEvent> {
        self.tx.subscribe()
    }

    fn publish(&self, event: ArenaEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("no subscribers for arena event");
        }
    }
}

impl Default for EventObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for EventObserver {
    fn on_spawn(&mut self, robot: &RobotInfo) {
        self.publish(ArenaEvent::Spawn { robot: *robot });
    }

    fn on_kill(&mut self, robot: &RobotInfo) {
        self.publish(ArenaEvent::Kill { robot: *robot });
    }

    fn on_move(&mut self, robot: &RobotInfo, to: Position) {
        self.publish(ArenaEvent::Move { robot: *robot, to });
    }

    fn on_attack(&mut self, robot: &RobotInfo, target: Position) {
        self.publish(ArenaEvent::Attack {
            robot: *robot,
            target,
        });
    }

    fn on_suicide(&mut self, robot: &RobotInfo) {
        self.publish(ArenaEvent::Suicide { robot: *robot });
    }

    fn on_turn_end(&mut self, view: &TurnView<'_>) {
        self.publish(ArenaEvent::TurnEnd {
            turn: view.turn,
            robots: view.robots.clone(),
        });
    }
}

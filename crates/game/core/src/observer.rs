//! Side-channel notifications emitted while the engine mutates the board.
//!
//! Observers see every spawn, kill, move, attack and suicide as it happens,
//! plus a view of the board once a turn completes. They cannot influence
//! resolution: every callback receives copies or shared references only.
use crate::env::ArenaMap;
use crate::state::{Position, RobotInfo};

/// Board state handed to [`Observer::on_turn_end`].
#[derive(Clone, Debug)]
pub struct TurnView<'a> {
    /// Index of the turn that just completed (the first turn is 0).
    pub turn: u64,
    pub map: &'a ArenaMap,
    /// Survivors in ascending position order.
    pub robots: Vec<RobotInfo>,
}

/// Fixed capability interface for simulation events.
///
/// Every method defaults to a no-op so implementers only override what they
/// care about.
pub trait Observer {
    fn on_spawn(&mut self, _robot: &RobotInfo) {}

    fn on_kill(&mut self, _robot: &RobotInfo) {}

    /// Called before the robot is relocated; `robot.location` is still the origin.
    fn on_move(&mut self, _robot: &RobotInfo, _to: Position) {}

    fn on_attack(&mut self, _robot: &RobotInfo, _target: Position) {}

    fn on_suicide(&mut self, _robot: &RobotInfo) {}

    fn on_turn_end(&mut self, _view: &TurnView<'_>) {}
}

/// Observer that ignores everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl Observer for NoopObserver {}

impl<O: Observer + ?Sized> Observer for &mut O {
    fn on_spawn(&mut self, robot: &RobotInfo) {
        (**self).on_spawn(robot);
    }

    fn on_kill(&mut self, robot: &RobotInfo) {
        (**self).on_kill(robot);
    }

    fn on_move(&mut self, robot: &RobotInfo, to: Position) {
        (**self).on_move(robot, to);
    }

    fn on_attack(&mut self, robot: &RobotInfo, target: Position) {
        (**self).on_attack(robot, target);
    }

    fn on_suicide(&mut self, robot: &RobotInfo) {
        (**self).on_suicide(robot);
    }

    fn on_turn_end(&mut self, view: &TurnView<'_>) {
        (**self).on_turn_end(view);
    }
}

impl<O: Observer + ?Sized> Observer for Box<O> {
    fn on_spawn(&mut self, robot: &RobotInfo) {
        (**self).on_spawn(robot);
    }

    fn on_kill(&mut self, robot: &RobotInfo) {
        (**self).on_kill(robot);
    }

    fn on_move(&mut self, robot: &RobotInfo, to: Position) {
        (**self).on_move(robot, to);
    }

    fn on_attack(&mut self, robot: &RobotInfo, target: Position) {
        (**self).on_attack(robot, target);
    }

    fn on_suicide(&mut self, robot: &RobotInfo) {
        (**self).on_suicide(robot);
    }

    fn on_turn_end(&mut self, view: &TurnView<'_>) {
        (**self).on_turn_end(view);
    }
}

/// Fan-out: forwards each event to every observer, in order.
impl<O: Observer> Observer for Vec<O> {
    fn on_spawn(&mut self, robot: &RobotInfo) {
        self.iter_mut().for_each(|o| o.on_spawn(robot));
    }

    fn on_kill(&mut self, robot: &RobotInfo) {
        self.iter_mut().for_each(|o| o.on_kill(robot));
    }

    fn on_move(&mut self, robot: &RobotInfo, to: Position) {
        self.iter_mut().for_each(|o| o.on_move(robot, to));
    }

    fn on_attack(&mut self, robot: &RobotInfo, target: Position) {
        self.iter_mut().for_each(|o| o.on_attack(robot, target));
    }

    fn on_suicide(&mut self, robot: &RobotInfo) {
        self.iter_mut().for_each(|o| o.on_suicide(robot));
    }

    fn on_turn_end(&mut self, view: &TurnView<'_>) {
        self.iter_mut().for_each(|o| o.on_turn_end(view));
    }
}

use arena_core::{Observer, Position, RobotInfo, TurnView};

/// Reports every callback as a `tracing` event under `arena::trace`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTracer;

impl Observer for LogTracer {
    fn on_spawn(&mut self, robot: &RobotInfo) {
        tracing::info!(
            target: "arena::trace",
            robot = %robot.robot_id,
            player = robot.player_id.0,
            at = %robot.location,
            "spawned"
        );
    }

    fn on_kill(&mut self, robot: &RobotInfo) {
        tracing::info!(
            target: "arena::trace",
            robot = %robot.robot_id,
            player = robot.player_id.0,
            at = %robot.location,
            "killed"
        );
    }

    fn on_move(&mut self, robot: &RobotInfo, to: Position) {
        tracing::debug!(
            target: "arena::trace",
            robot = %robot.robot_id,
            from = %robot.location,
            %to,
            "moving"
        );
    }

    fn on_attack(&mut self, robot: &RobotInfo, target: Position) {
        tracing::debug!(
            target: "arena::trace",
            robot = %robot.robot_id,
            from = %robot.location,
            %target,
            "attacking"
        );
    }

    fn on_suicide(&mut self, robot: &RobotInfo) {
        tracing::info!(
            target: "arena::trace",
            robot = %robot.robot_id,
            at = %robot.location,
            "self-destructed"
        );
    }

    fn on_turn_end(&mut self, view: &TurnView<'_>) {
        tracing::info!(
            target: "arena::trace",
            turn = view.turn,
            robots = view.robots.len(),
            "end of turn"
        );
    }
}

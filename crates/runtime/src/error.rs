//! Errors surfaced by the runtime API.
//!
//! Actor misbehaviour is not among them: timeouts and protocol violations
//! degrade to a default action and the actor's elimination, never to an error
//! returned from [`Arena::step`](crate::Arena::step).
use arena_core::{MapError, Position};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("failed to launch actor `{command}`")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("cannot place a robot on {0}: not a walkable cell")]
    Placement(Position),
}

//! Tokio runtime for arena matches played by external actor processes.
//!
//! This crate wires actor processes into the pure resolver from `arena-core`.
//! Consumers build an [`Arena`], launch robots into it, and call
//! [`Arena::step`] once per turn.
//!
//! Modules are organized by responsibility:
//! - [`channel`] owns actor processes and the line-JSON request/reply protocol
//! - [`protocol`] defines wire messages and validates actor replies
//! - [`combatant`] pairs an engine robot with its channel
//! - [`arena`] gathers actions concurrently and resolves turns
//! - [`events`] and [`tracers`] are ready-made observers
pub mod arena;
pub mod channel;
pub mod combatant;
pub mod config;
pub mod events;
pub mod protocol;
pub mod tracers;

mod error;

pub use arena::{Arena, ArenaBuilder, StepReport};
pub use channel::{ActorChannel, ActorCommand, ChannelFailure, MAX_LINE_BYTES};
pub use combatant::{Combatant, next_robot_id};
pub use config::ArenaConfig;
pub use error::{Result, RuntimeError};
pub use events::{ArenaEvent, EventObserver};
pub use protocol::{ActionError, WorldInfo, WorldSnapshot, parse_action};
pub use tracers::{LogTracer, MapTracer};

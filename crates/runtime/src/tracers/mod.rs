//! Human-readable observers.
mod log;
mod map;

pub use log::LogTracer;
pub use map::{MapTracer, render};

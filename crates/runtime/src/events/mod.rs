//! Arena events as data, for consumers outside the resolver.

mod bus;
mod types;

pub use bus::EventObserver;
pub use types::ArenaEvent;

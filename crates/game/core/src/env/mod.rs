//! Read-only arena layout.
//!
//! The map never changes once a match starts; the engine consults it for
//! walkability and spawn placement.
mod map;

pub use map::{ArenaMap, MapDimensions, MapError, TileKind};

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::state::Position;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map dimensions must be non-zero, got {width}x{height}")]
    EmptyDimensions { width: u32, height: u32 },

    #[error("tile {position} lies outside the {width}x{height} map")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    #[error("map has no spawn tiles")]
    NoSpawnTiles,
}

/// Static classification of a map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TileKind {
    Blocked,
    Spawn,
    Open,
}

impl TileKind {
    pub fn is_walkable(self) -> bool {
        !matches!(self, TileKind::Blocked)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MapDimensions {
    pub width: u32,
    pub height: u32,
}

impl MapDimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn contains(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && i64::from(position.x) < i64::from(self.width)
            && i64::from(position.y) < i64::from(self.height)
    }
}

/// Immutable arena layout.
///
/// Only non-open tiles are stored; every in-bounds cell without an entry is
/// [`TileKind::Open`]. A map always has at least one spawn tile.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaMap {
    dimensions: MapDimensions,
    tiles: HashMap<Position, TileKind>,
    spawns: Vec<Position>,
}

impl ArenaMap {
    pub const DEFAULT_SIZE: u32 = 19;

    /// Builds a map from explicit tiles. Cells not listed are open.
    pub fn new(
        width: u32,
        height: u32,
        tiles: impl IntoIterator<Item = (Position, TileKind)>,
    ) -> Result<Self, MapError> {
        if width == 0 || height == 0 {
            return Err(MapError::EmptyDimensions { width, height });
        }
        let dimensions = MapDimensions::new(width, height);

        let mut stored = HashMap::new();
        for (position, kind) in tiles {
            if !dimensions.contains(position) {
                return Err(MapError::OutOfBounds {
                    position,
                    width,
                    height,
                });
            }
            if kind == TileKind::Open {
                stored.remove(&position);
            } else {
                stored.insert(position, kind);
            }
        }

        let mut spawns: Vec<Position> = stored
            .iter()
            .filter(|(_, kind)| **kind == TileKind::Spawn)
            .map(|(position, _)| *position)
            .collect();
        if spawns.is_empty() {
            return Err(MapError::NoSpawnTiles);
        }
        spawns.sort();

        Ok(Self {
            dimensions,
            tiles: stored,
            spawns,
        })
    }

    /// Circular arena: an open disc ringed by spawn tiles, walls outside.
    ///
    /// ```text
    /// c = (w/2 - 0.5, h/2 - 0.5), r = min(cx, cy)
    /// d <  (r-1)^2         -> open
    /// (r-1)^2 <= d < r^2   -> spawn
    /// otherwise            -> blocked
    /// ```
    pub fn ring(width: u32, height: u32) -> Result<Self, MapError> {
        let cx = f64::from(width) / 2.0 - 0.5;
        let cy = f64::from(height) / 2.0 - 0.5;
        let radius = cx.min(cy);
        let inner = (radius - 1.0).powi(2);
        let outer = radius.powi(2);

        let mut tiles = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let dist = (f64::from(x) - cx).powi(2) + (f64::from(y) - cy).powi(2);
                let kind = if dist < inner {
                    TileKind::Open
                } else if dist < outer {
                    TileKind::Spawn
                } else {
                    TileKind::Blocked
                };
                tiles.push((Position::new(x as i32, y as i32), kind));
            }
        }
        Self::new(width, height, tiles)
    }

    pub fn dimensions(&self) -> MapDimensions {
        self.dimensions
    }

    pub fn width(&self) -> u32 {
        self.dimensions.width
    }

    pub fn height(&self) -> u32 {
        self.dimensions.height
    }

    /// Tile at `position`, or `None` when out of bounds.
    pub fn tile(&self, position: Position) -> Option<TileKind> {
        if !self.dimensions.contains(position) {
            return None;
        }
        Some(
            self.tiles
                .get(&position)
                .copied()
                .unwrap_or(TileKind::Open),
        )
    }

    pub fn is_walkable(&self, position: Position) -> bool {
        self.tile(position).is_some_and(TileKind::is_walkable)
    }

    /// Spawn tiles in ascending position order.
    pub fn spawn_points(&self) -> &[Position] {
        &self.spawns
    }

    /// Uniformly draws one spawn tile. Every call re-samples.
    pub fn random_spawn<R: Rng + ?Sized>(&self, rng: &mut R) -> Position {
        // `spawns` is non-empty by construction.
        *self.spawns.choose(rng).unwrap_or(&self.spawns[0])
    }
}

impl Default for ArenaMap {
    fn default() -> Self {
        Self::ring(Self::DEFAULT_SIZE, Self::DEFAULT_SIZE)
            .unwrap_or_else(|_| unreachable!("the default ring map always has spawn tiles"))
    }
}

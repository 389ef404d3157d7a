//! Damage tuning.
use std::fmt;
use std::str::FromStr;

use rand::Rng;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DamageRangeError {
    #[error("damage range is empty")]
    Empty,

    #[error("invalid damage value {0:?}")]
    InvalidValue(String),
}

/// Inclusive range a single damage event is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    min: u32,
    max: u32,
}

impl DamageRange {
    /// Bounds are reordered so that `min <= max`.
    pub const fn new(a: u32, b: u32) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    pub const fn fixed(value: u32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub const fn min(&self) -> u32 {
        self.min
    }

    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Uniform draw from `min..=max`.
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        rng.gen_range(self.min..=self.max)
    }
}

impl fmt::Display for DamageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.min == self.max {
            write!(f, "{}", self.min)
        } else {
            write!(f, "{}-{}", self.min, self.max)
        }
    }
}

/// Accepts `"N"` or `"MIN-MAX"`.
impl FromStr for DamageRange {
    type Err = DamageRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DamageRangeError::Empty);
        }
        let parse = |value: &str| {
            value
                .trim()
                .parse::<u32>()
                .map_err(|_| DamageRangeError::InvalidValue(value.trim().to_string()))
        };
        match s.split_once('-') {
            Some((low, high)) => Ok(Self::new(parse(low)?, parse(high)?)),
            None => Ok(Self::fixed(parse(s)?)),
        }
    }
}

/// Damage ranges for the three damage events a turn can produce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageTable {
    pub attack: DamageRange,
    pub collision: DamageRange,
    pub suicide: DamageRange,
}

impl DamageTable {
    pub const DEFAULT_ATTACK: DamageRange = DamageRange::new(8, 10);
    pub const DEFAULT_COLLISION: DamageRange = DamageRange::fixed(5);
    pub const DEFAULT_SUICIDE: DamageRange = DamageRange::fixed(15);

    pub const fn new(attack: DamageRange, collision: DamageRange, suicide: DamageRange) -> Self {
        Self {
            attack,
            collision,
            suicide,
        }
    }
}

impl Default for DamageTable {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_ATTACK,
            Self::DEFAULT_COLLISION,
            Self::DEFAULT_SUICIDE,
        )
    }
}

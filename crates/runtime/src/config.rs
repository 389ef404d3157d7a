//! Match configuration and its environment loader.
use std::env;
use std::str::FromStr;
use std::time::Duration;

use arena_core::{ArenaMap, DamageRange, DamageTable, MapError};

/// Everything the arena needs to know before the first robot is launched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    pub width: u32,
    pub height: u32,
    pub damage: DamageTable,
    /// How long a robot may take to answer a turn request.
    pub reply_timeout: Duration,
    pub starting_hp: u32,
    /// Fixes damage rolls and spawn draws when set.
    pub seed: Option<u64>,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: ArenaMap::DEFAULT_SIZE,
            height: ArenaMap::DEFAULT_SIZE,
            damage: DamageTable::default(),
            reply_timeout: Self::DEFAULT_REPLY_TIMEOUT,
            starting_hp: Self::DEFAULT_STARTING_HP,
            seed: None,
        }
    }
}

impl ArenaConfig {
    pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_millis(300);
    pub const DEFAULT_STARTING_HP: u32 = 50;

    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `ARENA_WIDTH`, `ARENA_HEIGHT` - Map size (default: 19x19)
    /// - `ARENA_ATTACK_DAMAGE` - `N` or `MIN-MAX` (default: 8-10)
    /// - `ARENA_COLLISION_DAMAGE` - `N` or `MIN-MAX` (default: 5)
    /// - `ARENA_SUICIDE_DAMAGE` - `N` or `MIN-MAX` (default: 15)
    /// - `ARENA_REPLY_TIMEOUT_MS` - Per-turn reply timeout (default: 300)
    /// - `ARENA_STARTING_HP` - Health of new robots (default: 50)
    /// - `ARENA_SEED` - RNG seed (default: entropy)
    ///
    /// Unset or unparsable variables keep their defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env), reading from `lookup` instead.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(width) = parse::<u32>(lookup("ARENA_WIDTH")) {
            config.width = width;
        }
        if let Some(height) = parse::<u32>(lookup("ARENA_HEIGHT")) {
            config.height = height;
        }

        if let Some(range) = parse::<DamageRange>(lookup("ARENA_ATTACK_DAMAGE")) {
            config.damage.attack = range;
        }
        if let Some(range) = parse::<DamageRange>(lookup("ARENA_COLLISION_DAMAGE")) {
            config.damage.collision = range;
        }
        if let Some(range) = parse::<DamageRange>(lookup("ARENA_SUICIDE_DAMAGE")) {
            config.damage.suicide = range;
        }

        if let Some(millis) = parse::<u64>(lookup("ARENA_REPLY_TIMEOUT_MS")) {
            config.reply_timeout = Duration::from_millis(millis);
        }
        if let Some(hp) = parse::<u32>(lookup("ARENA_STARTING_HP")) {
            config.starting_hp = hp.max(1);
        }

        config.seed = parse::<u64>(lookup("ARENA_SEED"));

        config
    }

    /// The standard ring map at the configured size.
    pub fn map(&self) -> Result<ArenaMap, MapError> {
        ArenaMap::ring(self.width, self.height)
    }
}

fn parse<T>(value: Option<String>) -> Option<T>
where
    T: FromStr,
{
    value?.trim().parse().ok()
}

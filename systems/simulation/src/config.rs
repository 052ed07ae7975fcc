use std::time::Duration;

use dungeon_crawler_core::{Stats, GRID_COLUMNS, GRID_ROWS, TILE_SIZE};
use glam::Vec2;
use serde::{Deserialize, Deserializer};
use thiserror::Error;

/// Errors reported while reading a simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed into a configuration.
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] toml::de::Error),
    /// The window cannot hold the level.
    #[error("window {width}x{height} is smaller than the level")]
    WindowTooSmall {
        /// Configured window width.
        width: f32,
        /// Configured window height.
        height: f32,
    },
    /// The window size is NaN or infinite.
    #[error("window {width}x{height} is not a finite size")]
    NonFiniteWindow {
        /// Configured window width.
        width: f32,
        /// Configured window height.
        height: f32,
    },
    /// The player would start dead or above its maximum health.
    #[error("player health {health} must lie in 1..={max_health}")]
    InvalidPlayerHealth {
        /// Configured starting health.
        health: u32,
        /// Configured maximum health.
        max_health: u32,
    },
}

/// Tunables for a simulation run, loadable from TOML.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Seed feeding every random generator of the run.
    pub seed: u64,
    /// Size of the window the level is centred in.
    pub window: WindowConfig,
    /// Player starting values.
    pub player: PlayerConfig,
    /// What every level starts with.
    pub population: PopulationConfig,
}

/// Size of the window the level is centred in.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowConfig {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

/// Player starting values.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerConfig {
    /// Stats the player spawns with; `speed` is in world units per second.
    ///
    /// Fields missing from a partial table keep their default player values.
    #[serde(deserialize_with = "deserialize_player_stats")]
    pub stats: Stats,
    /// Minimum time between two attacks, in milliseconds.
    pub attack_cooldown_ms: u64,
}

/// What every level starts with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PopulationConfig {
    /// Enemies spawned on load.
    pub enemies: usize,
    /// Gold piles spawned on load.
    pub gold: usize,
    /// Gems spawned on load.
    pub gems: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            window: WindowConfig::default(),
            player: PlayerConfig::default(),
            population: PopulationConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            stats: PlayerStats::default().into(),
            attack_cooldown_ms: 250,
        }
    }
}

/// Player stats table whose missing fields fall back to the player defaults.
#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PlayerStats {
    health: u32,
    max_health: u32,
    mana: u32,
    max_mana: u32,
    attack: u32,
    defense: u32,
    strength: u32,
    dexterity: u32,
    stamina: u32,
    speed: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            health: 100,
            max_health: 100,
            mana: 50,
            max_mana: 50,
            attack: 10,
            defense: 10,
            strength: 10,
            dexterity: 10,
            stamina: 10,
            speed: 200,
        }
    }
}

impl From<PlayerStats> for Stats {
    fn from(stats: PlayerStats) -> Self {
        Self {
            health: stats.health,
            max_health: stats.max_health,
            mana: stats.mana,
            max_mana: stats.max_mana,
            attack: stats.attack,
            defense: stats.defense,
            strength: stats.strength,
            dexterity: stats.dexterity,
            stamina: stats.stamina,
            speed: stats.speed,
        }
    }
}

fn deserialize_player_stats<'de, D>(deserializer: D) -> Result<Stats, D::Error>
where
    D: Deserializer<'de>,
{
    PlayerStats::deserialize(deserializer).map(Stats::from)
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            enemies: 6,
            gold: 5,
            gems: 3,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the configuration describes a playable run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let WindowConfig { width, height } = self.window;
        if !width.is_finite() || !height.is_finite() {
            return Err(ConfigError::NonFiniteWindow { width, height });
        }
        let level = level_size();
        if width < level.x || height < level.y {
            return Err(ConfigError::WindowTooSmall { width, height });
        }

        let Stats {
            health, max_health, ..
        } = self.player.stats;
        if health == 0 || health > max_health {
            return Err(ConfigError::InvalidPlayerHealth { health, max_health });
        }
        Ok(())
    }

    /// Grid origin that centres the level in the window.
    #[must_use]
    pub fn level_origin(&self) -> Vec2 {
        (Vec2::new(self.window.width, self.window.height) - level_size()) / 2.0
    }

    /// Window centre, the reference point for aiming.
    #[must_use]
    pub fn screen_center(&self) -> Vec2 {
        Vec2::new(self.window.width, self.window.height) / 2.0
    }

    /// Minimum time between two attacks.
    #[must_use]
    pub fn attack_cooldown(&self) -> Duration {
        Duration::from_millis(self.player.attack_cooldown_ms)
    }
}

fn level_size() -> Vec2 {
    Vec2::new(GRID_COLUMNS as f32, GRID_ROWS as f32) * TILE_SIZE
}

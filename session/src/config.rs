//! Serde-backed session configuration with stock defaults for every field.

use serde::{Deserialize, Serialize};
use tower_defense_core::{EnemyKind, Vector2D};
use tower_defense_system_spawning::{default_wave_table, WaveDefinition};
use tower_defense_world::{
    PathError, PathMap, Rules, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DEFAULT_STARTING_LIVES,
    DEFAULT_STARTING_MONEY, DEFAULT_TILE_SIZE, DEFAULT_VICTORY_WAVE, DEFAULT_WAYPOINTS,
};

/// Seed used for the wave shuffle when none is configured.
pub const DEFAULT_RNG_SEED: u64 = 0x7d0f_3c5a_91e2_4b68;

/// Everything needed to start a session.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Money granted at the start.
    pub starting_money: u32,
    /// Lives granted at the start.
    pub starting_lives: u32,
    /// Wave whose clearance wins the game.
    pub victory_wave: u32,
    /// Seed of the wave shuffle.
    pub rng_seed: u64,
    /// Play area and route.
    pub map: MapConfig,
    /// Custom wave table; the stock progression is used when absent.
    pub waves: Option<Vec<WaveConfig>>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            starting_money: DEFAULT_STARTING_MONEY,
            starting_lives: DEFAULT_STARTING_LIVES,
            victory_wave: DEFAULT_VICTORY_WAVE,
            rng_seed: DEFAULT_RNG_SEED,
            map: MapConfig::default(),
            waves: None,
        }
    }
}

impl SessionConfig {
    /// Economy and outcome rules for the world.
    #[must_use]
    pub fn rules(&self) -> Rules {
        Rules {
            starting_money: self.starting_money,
            starting_lives: self.starting_lives,
            victory_wave: self.victory_wave,
        }
    }

    /// Builds the route and placement grid described by [`SessionConfig::map`].
    pub fn path_map(&self) -> Result<PathMap, PathError> {
        PathMap::new(
            self.map.width,
            self.map.height,
            self.map.tile_size,
            self.map.waypoints.iter().copied().map(Vector2D::from).collect(),
        )
    }

    /// Resolves the wave table, degrading unknown enemy kinds to the basic kind.
    #[must_use]
    pub fn wave_table(&self) -> Vec<WaveDefinition> {
        let Some(waves) = &self.waves else {
            return default_wave_table();
        };

        waves
            .iter()
            .map(|wave| {
                let groups = wave
                    .enemies
                    .iter()
                    .map(|(name, count)| (EnemyKind::from_name_or_default(name), *count))
                    .collect();
                WaveDefinition::new(groups, wave.spawn_delay)
            })
            .collect()
    }
}

/// Play area dimensions and the enemy route.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Width of the play area in world units.
    pub width: u32,
    /// Height of the play area in world units.
    pub height: u32,
    /// Edge length of a placement tile.
    pub tile_size: u32,
    /// Route waypoints in travel order.
    pub waypoints: Vec<(f32, f32)>,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_MAP_WIDTH,
            height: DEFAULT_MAP_HEIGHT,
            tile_size: DEFAULT_TILE_SIZE,
            waypoints: DEFAULT_WAYPOINTS.to_vec(),
        }
    }
}

/// One entry of a custom wave table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Enemy kind names and counts, e.g. `[["basic", 10], ["fast", 2]]`.
    pub enemies: Vec<(String, u32)>,
    /// Ticks between two spawns.
    pub spawn_delay: u32,
}

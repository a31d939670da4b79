#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the tower defense engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Systems and the session submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what actually happened. Read-only views such as [`EnemyView`],
//! [`TowerView`] and [`GameSnapshot`] are the only way state leaves the world.

mod vector;

use std::{fmt, str::FromStr};

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use vector::Vector2D;

/// Collision radius shared by every enemy kind, in world units.
pub const ENEMY_RADIUS: f32 = 12.0;

/// Extra slack added to [`ENEMY_RADIUS`] when testing projectile hits.
pub const COLLISION_MARGIN: f32 = 25.0;

/// Distance a projectile may travel beyond the firing tower's range.
pub const PROJECTILE_RANGE_BONUS: f32 = 100.0;

/// Floor applied to a tower's cooldown when it is upgraded.
pub const MIN_UPGRADED_COOLDOWN_TICKS: u64 = 5;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Advances the simulation clock by one fixed tick.
    Tick,
    /// Places a new enemy of the provided kind at the first waypoint.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
    },
    /// Moves every enemy one tick along the path and settles escaped or dead enemies.
    AdvanceEnemies,
    /// Records the enemy a tower is currently aiming at.
    AcquireTarget {
        /// Tower whose aim is updated.
        tower: TowerId,
        /// Enemy selected by targeting, if any was in range.
        target: Option<EnemyId>,
    },
    /// Requests that a tower launch a projectile at the target's current position.
    FireProjectile {
        /// Tower that fires.
        tower: TowerId,
        /// Enemy whose position the projectile is aimed at.
        target: EnemyId,
    },
    /// Advances a tower's projectiles and resolves their collisions with enemies.
    ResolveProjectiles {
        /// Tower whose projectiles are advanced.
        tower: TowerId,
    },
    /// Records that a new wave started releasing enemies.
    BeginWave {
        /// One-based wave number.
        wave: u32,
        /// Number of enemies queued for the wave.
        enemy_count: u32,
    },
    /// Records that a wave finished spawning and the battlefield is clear.
    CompleteWave {
        /// One-based wave number.
        wave: u32,
    },
    /// Evaluates the victory condition at the end of a tick.
    EvaluateOutcome,
    /// Requests placement of a tower at a pixel position on the map.
    PlaceTower {
        /// Type of tower to construct.
        kind: TowerKind,
        /// Horizontal pixel coordinate of the request.
        x: i32,
        /// Vertical pixel coordinate of the request.
        y: i32,
    },
    /// Requests an upgrade of an existing tower.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Requests removal of an existing tower.
    RemoveTower {
        /// Tower to remove.
        tower: TowerId,
    },
    /// Flips the paused flag.
    TogglePause,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Tick counter after advancing.
        tick: u64,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of the enemy.
        kind: EnemyKind,
    },
    /// Reports that an enemy died and its bounty was paid out.
    EnemyKilled {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Money and score credited for the kill.
        reward: u32,
    },
    /// Reports that an enemy walked off the end of the path.
    EnemyEscaped {
        /// Identifier of the enemy that escaped.
        enemy: EnemyId,
        /// Lives left after the escape was charged.
        lives_remaining: u32,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Enemy that triggered the shot.
        target: EnemyId,
    },
    /// Reports that a projectile struck an enemy.
    ProjectileHit {
        /// Tower that owned the projectile.
        tower: TowerId,
        /// Enemy that was struck. Not necessarily the one that triggered the shot.
        enemy: EnemyId,
        /// Damage applied.
        damage: u32,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Type of tower that was placed.
        kind: TowerKind,
        /// Grid cell the tower occupies.
        cell: CellCoord,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Type of tower requested.
        kind: TowerKind,
        /// Horizontal pixel coordinate of the request.
        x: i32,
        /// Vertical pixel coordinate of the request.
        y: i32,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Tower that was upgraded.
        tower: TowerId,
        /// Money spent on the upgrade.
        cost: u32,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the upgrade failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was removed.
    TowerRemoved {
        /// Tower that was removed.
        tower: TowerId,
        /// Grid cell released by the removal.
        cell: CellCoord,
    },
    /// Reports that a removal request was rejected.
    TowerRemovalRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the removal failed.
        reason: RemovalError,
    },
    /// Announces that a wave started.
    WaveStarted {
        /// One-based wave number.
        wave: u32,
        /// Number of enemies queued for the wave.
        enemy_count: u32,
    },
    /// Announces that a wave was cleared.
    WaveCompleted {
        /// One-based wave number.
        wave: u32,
    },
    /// Announces a change of the paused flag.
    PauseToggled {
        /// Paused flag after the toggle.
        paused: bool,
    },
    /// Announces that all lives were lost.
    GameOver {
        /// Final score.
        score: u32,
    },
    /// Announces that the final wave was cleared.
    Victory {
        /// Final score.
        score: u32,
    },
}

/// Requests an external input collector may submit to a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputRequest {
    /// Place a tower at the provided pixel position.
    PlaceTower {
        /// Horizontal pixel coordinate.
        x: i32,
        /// Vertical pixel coordinate.
        y: i32,
        /// Kind of tower to place.
        kind: TowerKind,
    },
    /// Start the next wave.
    StartWave,
    /// Toggle the paused flag.
    PauseToggle,
    /// Upgrade an existing tower.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Remove an existing tower.
    RemoveTower {
        /// Tower to remove.
        tower: TowerId,
    },
}

/// Unique identifier assigned to an enemy.
///
/// Identifiers grow monotonically, so ascending order equals spawn order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single placement grid cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Placement state of a single grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    /// Free for construction.
    #[default]
    Empty,
    /// Lies under the enemy route; never placeable.
    Path,
    /// Holds a tower.
    Occupied,
}

/// Error raised when a kind name does not match any known kind.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown {category} kind '{name}'")]
pub struct UnknownKind {
    category: &'static str,
    name: String,
}

impl UnknownKind {
    /// The name that failed to parse.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

fn parse_or_default<K>(name: &str) -> K
where
    K: FromStr<Err = UnknownKind> + Default + fmt::Display,
{
    name.parse().unwrap_or_else(|error: UnknownKind| {
        let fallback = K::default();
        warn!("{error}, falling back to {fallback}");
        fallback
    })
}

/// Fixed attributes shared by all enemies of one kind.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Health at spawn.
    pub health: u32,
    /// Distance covered per tick, in world units.
    pub speed: f32,
    /// Money and score paid out on death.
    pub reward: u32,
}

/// Types of enemies that can walk the path.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Balanced enemy.
    #[default]
    Basic,
    /// Fragile but quick.
    Fast,
    /// Slow and sturdy.
    Strong,
    /// Very slow, very sturdy, rich bounty.
    Tank,
}

impl EnemyKind {
    /// Every enemy kind in declaration order.
    pub const ALL: [Self; 4] = [Self::Basic, Self::Fast, Self::Strong, Self::Tank];

    /// Returns the fixed attributes of the kind.
    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        match self {
            Self::Basic => EnemyStats {
                health: 100,
                speed: 1.5,
                reward: 10,
            },
            Self::Fast => EnemyStats {
                health: 50,
                speed: 3.0,
                reward: 15,
            },
            Self::Strong => EnemyStats {
                health: 200,
                speed: 1.0,
                reward: 25,
            },
            Self::Tank => EnemyStats {
                health: 500,
                speed: 0.8,
                reward: 50,
            },
        }
    }

    /// Canonical lowercase name used by configuration files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Fast => "fast",
            Self::Strong => "strong",
            Self::Tank => "tank",
        }
    }

    /// Parses a kind name, degrading to [`EnemyKind::Basic`] with a warning
    /// when unknown.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        parse_or_default(name)
    }
}

impl FromStr for EnemyKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnknownKind {
                category: "enemy",
                name: name.to_owned(),
            })
    }
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Fixed attributes shared by all freshly built towers of one kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerStats {
    /// Damage applied by each projectile.
    pub damage: u32,
    /// Detection radius in world units.
    pub range: u32,
    /// Minimum number of ticks between two shots.
    pub cooldown_ticks: u64,
    /// Construction price.
    pub cost: u32,
    /// Distance covered by a projectile per tick.
    pub projectile_speed: u32,
}

/// Types of towers that can be constructed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Cheap all-rounder.
    #[default]
    Basic,
    /// Long range, slow, heavy hits.
    Sniper,
    /// Short range, rapid fire.
    MachineGun,
    /// Very heavy, very slow shells.
    Cannon,
}

impl TowerKind {
    /// Every tower kind in declaration order.
    pub const ALL: [Self; 4] = [Self::Basic, Self::Sniper, Self::MachineGun, Self::Cannon];

    /// Returns the fixed attributes of the kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Basic => TowerStats {
                damage: 25,
                range: 80,
                cooldown_ticks: 30,
                cost: 50,
                projectile_speed: 5,
            },
            Self::Sniper => TowerStats {
                damage: 75,
                range: 150,
                cooldown_ticks: 60,
                cost: 100,
                projectile_speed: 10,
            },
            Self::MachineGun => TowerStats {
                damage: 10,
                range: 60,
                cooldown_ticks: 10,
                cost: 75,
                projectile_speed: 8,
            },
            Self::Cannon => TowerStats {
                damage: 100,
                range: 90,
                cooldown_ticks: 90,
                cost: 150,
                projectile_speed: 3,
            },
        }
    }

    /// Construction price of the kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        self.stats().cost
    }

    /// Canonical lowercase name used by configuration files and layouts.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Sniper => "sniper",
            Self::MachineGun => "machine_gun",
            Self::Cannon => "cannon",
        }
    }

    /// Parses a kind name, degrading to [`TowerKind::Basic`] with a warning
    /// when unknown.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        parse_or_default(name)
    }
}

impl FromStr for TowerKind {
    type Err = UnknownKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let normalized = name.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == normalized)
            .ok_or_else(|| UnknownKind {
                category: "tower",
                name: name.to_owned(),
            })
    }
}

impl fmt::Display for TowerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The simulation is paused.
    Paused,
    /// The session already ended.
    GameOver,
    /// The requested position lies outside the placement grid.
    OutOfBounds,
    /// The requested cell lies under the enemy path.
    OnPath,
    /// The requested cell already holds a tower.
    Occupied,
    /// The player cannot afford the tower.
    InsufficientFunds,
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeError {
    /// The simulation is paused.
    Paused,
    /// The session already ended.
    GameOver,
    /// No tower with the provided identifier exists.
    MissingTower,
    /// The player cannot afford the upgrade.
    InsufficientFunds,
}

/// Reasons a tower removal request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalError {
    /// The simulation is paused.
    Paused,
    /// The session already ended.
    GameOver,
    /// No tower with the provided identifier exists.
    MissingTower,
}

/// Reasons a wave start request may be rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WaveStartError {
    /// The previous wave is still active.
    AlreadyActive,
    /// The session already ended.
    GameOver,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Current position in world units.
    pub position: Vector2D,
    /// Index of the last waypoint reached; higher means further along the route.
    pub path_index: usize,
    /// Remaining health.
    pub health: u32,
    /// Health at spawn.
    pub max_health: u32,
    /// Whether the enemy is still alive.
    pub alive: bool,
    /// Whether the enemy walked off the end of the path.
    pub reached_end: bool,
}

impl EnemySnapshot {
    /// Reports whether the enemy is alive and still on the path.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.alive && !self.reached_end
    }
}

/// Read-only snapshot describing all enemies on the map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific enemy.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of enemies that are alive and still on the path.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.snapshots
            .iter()
            .filter(|snapshot| snapshot.is_active())
            .count()
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of an in-flight projectile.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSnapshot {
    /// Launch point.
    pub start: Vector2D,
    /// Current position.
    pub position: Vector2D,
    /// Displacement applied each tick.
    pub velocity: Vector2D,
    /// Damage applied on impact.
    pub damage: u32,
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Grid cell occupied by the tower.
    pub cell: CellCoord,
    /// Centre of the tower in world units.
    pub position: Vector2D,
    /// Damage applied by each projectile.
    pub damage: u32,
    /// Detection radius in world units.
    pub range: u32,
    /// Minimum number of ticks between two shots.
    pub cooldown_ticks: u64,
    /// Accumulated construction and upgrade price.
    pub cost: u32,
    /// Number of upgrades applied.
    pub level: u32,
    /// Tick of the last shot.
    pub last_attack_tick: u64,
    /// Enemy the tower aimed at during the last tick. Only valid while that
    /// enemy is still present in the accompanying [`EnemyView`].
    pub target: Option<EnemyId>,
    /// Projectiles currently in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
}

/// Read-only snapshot describing all towers placed on the map.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Looks up the snapshot of a specific tower.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Number of captured snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed by the targeting system.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will aim at the enemy.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Enemy position at selection time.
    pub enemy_position: Vector2D,
}

/// Cooldown state of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower described by the snapshot.
    pub tower: TowerId,
    /// Tick of the last shot.
    pub last_attack_tick: u64,
    /// Minimum number of ticks between two shots.
    pub cooldown_ticks: u64,
}

impl TowerCooldownSnapshot {
    /// Reports whether the tower may fire on `current_tick`.
    #[must_use]
    pub const fn is_ready(&self, current_tick: u64) -> bool {
        current_tick.saturating_sub(self.last_attack_tick) >= self.cooldown_ticks
    }
}

/// Read-only view of tower cooldowns.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Looks up the cooldown of a specific tower.
    #[must_use]
    pub fn get(&self, tower: TowerId) -> Option<&TowerCooldownSnapshot> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.tower)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Iterator over the captured cooldowns in tower order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }
}

/// Read-only view of the whole game, produced once per tick for renderers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Ticks simulated so far.
    pub tick: u64,
    /// Money available for construction.
    pub money: u32,
    /// Lives left.
    pub lives: u32,
    /// Accumulated score.
    pub score: u32,
    /// One-based number of the most recent wave, zero before the first.
    pub current_wave: u32,
    /// Whether a wave is currently active.
    pub wave_active: bool,
    /// Whether the simulation is paused.
    pub paused: bool,
    /// Whether all lives were lost.
    pub game_over: bool,
    /// Whether the final wave was cleared.
    pub victory: bool,
    /// Enemies on the map.
    pub enemies: EnemyView,
    /// Towers on the map, including their projectiles.
    pub towers: TowerView,
}

#[cfg(test)]
mod tests {
    use super::{
        EnemyId, EnemyKind, EnemySnapshot, EnemyView, TowerCooldownSnapshot, TowerId, TowerKind,
        Vector2D,
    };

    fn enemy(id: u32, alive: bool, reached_end: bool) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Basic,
            position: Vector2D::ZERO,
            path_index: 0,
            health: 100,
            max_health: 100,
            alive,
            reached_end,
        }
    }

    #[test]
    fn unknown_kind_names_degrade_to_basic() {
        assert_eq!(EnemyKind::from_name_or_default("dragon"), EnemyKind::Basic);
        assert_eq!(TowerKind::from_name_or_default("laser"), TowerKind::Basic);
        assert_eq!(EnemyKind::from_name_or_default("Tank"), EnemyKind::Tank);
        assert_eq!(
            TowerKind::from_name_or_default("machine-gun"),
            TowerKind::MachineGun
        );
    }

    #[test]
    fn strict_parse_reports_unknown_name() {
        let error = "laser".parse::<TowerKind>().expect_err("laser is not a tower");
        assert_eq!(error.name(), "laser");
        assert_eq!(error.to_string(), "unknown tower kind 'laser'");
    }

    #[test]
    fn kind_names_round_trip_through_from_str() {
        for kind in EnemyKind::ALL {
            assert_eq!(kind.name().parse::<EnemyKind>(), Ok(kind));
        }
        for kind in TowerKind::ALL {
            assert_eq!(kind.to_string().parse::<TowerKind>(), Ok(kind));
        }
    }

    #[test]
    fn basic_tower_stats_match_balance_table() {
        let stats = TowerKind::Basic.stats();
        assert_eq!(stats.damage, 25);
        assert_eq!(stats.range, 80);
        assert_eq!(stats.cooldown_ticks, 30);
        assert_eq!(stats.cost, 50);
    }

    #[test]
    fn enemy_view_sorts_and_counts_active() {
        let view = EnemyView::from_snapshots(vec![
            enemy(3, true, false),
            enemy(1, false, false),
            enemy(2, true, true),
            enemy(0, true, false),
        ]);

        let ids: Vec<u32> = view.iter().map(|snapshot| snapshot.id.get()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert_eq!(view.active_count(), 2);
        assert!(view.get(EnemyId::new(2)).is_some());
        assert!(view.get(EnemyId::new(9)).is_none());
    }

    #[test]
    fn cooldown_readiness_uses_elapsed_ticks() {
        let snapshot = TowerCooldownSnapshot {
            tower: TowerId::new(1),
            last_attack_tick: 0,
            cooldown_ticks: 30,
        };
        assert!(!snapshot.is_ready(29));
        assert!(snapshot.is_ready(30));
    }

    #[test]
    fn tower_kind_serde_contract_survives_bincode() {
        let bytes = bincode::serialize(&TowerKind::MachineGun).expect("serialize");
        let restored: TowerKind = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(restored, TowerKind::MachineGun);
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the tower defense engine.
//!
//! The world owns every entity, the economy, and the outcome flags. It is
//! mutated exclusively through [`apply`] and read through the [`query`]
//! module.

mod enemies;
mod path_map;
mod towers;

use log::{debug, info};
use tower_defense_core::{
    CellCoord, Command, EnemyId, Event, PlacementError, RemovalError, TowerId, TowerKind,
    UpgradeError, Vector2D,
};

pub use enemies::Enemy;
pub use path_map::{PathError, PathMap};
pub use towers::{Projectile, ProjectileImpact, Tower};

use towers::TowerRegistry;

/// Money available when a session starts.
pub const DEFAULT_STARTING_MONEY: u32 = 200;

/// Lives available when a session starts.
pub const DEFAULT_STARTING_LIVES: u32 = 20;

/// Wave number whose clearance wins the game.
pub const DEFAULT_VICTORY_WAVE: u32 = 10;

/// Width of the default play area in world units.
pub const DEFAULT_MAP_WIDTH: u32 = 1000;

/// Height of the default play area in world units.
pub const DEFAULT_MAP_HEIGHT: u32 = 800;

/// Edge length of a placement tile in world units.
pub const DEFAULT_TILE_SIZE: u32 = 40;

/// Waypoints of the default route.
pub const DEFAULT_WAYPOINTS: [(f32, f32); 10] = [
    (50.0, 100.0),
    (200.0, 100.0),
    (200.0, 300.0),
    (400.0, 300.0),
    (400.0, 150.0),
    (600.0, 150.0),
    (600.0, 400.0),
    (800.0, 400.0),
    (800.0, 200.0),
    (950.0, 200.0),
];

/// Economy and outcome rules enforced by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rules {
    /// Money granted at the start.
    pub starting_money: u32,
    /// Lives granted at the start.
    pub starting_lives: u32,
    /// Wave whose clearance triggers victory.
    pub victory_wave: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            starting_money: DEFAULT_STARTING_MONEY,
            starting_lives: DEFAULT_STARTING_LIVES,
            victory_wave: DEFAULT_VICTORY_WAVE,
        }
    }
}

/// Represents the authoritative tower defense world state.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    path_map: PathMap,
    enemies: Vec<Enemy>,
    next_enemy_id: EnemyId,
    towers: TowerRegistry,
    money: u32,
    lives: u32,
    score: u32,
    tick: u64,
    current_wave: u32,
    wave_active: bool,
    paused: bool,
    game_over: bool,
    victory: bool,
}

impl World {
    /// Creates a world on `path_map` with the economy described by `rules`.
    #[must_use]
    pub fn new(path_map: PathMap, rules: Rules) -> Self {
        Self {
            rules,
            path_map,
            enemies: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            towers: TowerRegistry::new(),
            money: rules.starting_money,
            lives: rules.starting_lives,
            score: 0,
            tick: 0,
            current_wave: 0,
            wave_active: false,
            paused: false,
            game_over: false,
            victory: false,
        }
    }

    fn is_halted(&self) -> bool {
        self.paused || self.game_over || self.victory
    }

    fn is_finished(&self) -> bool {
        self.game_over || self.victory
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        id
    }

    fn active_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|enemy| enemy.is_active()).count()
    }

    fn settle_enemies(&mut self, out_events: &mut Vec<Event>) {
        let mut settled = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.is_active() {
                true
            } else {
                settled.push((enemy.id(), enemy.reached_end(), enemy.reward()));
                false
            }
        });

        for (enemy, escaped, reward) in settled {
            if escaped {
                self.lives = self.lives.saturating_sub(1);
                out_events.push(Event::EnemyEscaped {
                    enemy,
                    lives_remaining: self.lives,
                });
                if self.lives == 0 && !self.game_over {
                    self.game_over = true;
                    info!("all lives lost, final score {}", self.score);
                    out_events.push(Event::GameOver { score: self.score });
                }
            } else {
                self.money = self.money.saturating_add(reward);
                self.score = self.score.saturating_add(reward);
                out_events.push(Event::EnemyKilled { enemy, reward });
            }
        }
    }

    fn place_tower(
        &mut self,
        kind: TowerKind,
        x: i32,
        y: i32,
    ) -> Result<(TowerId, CellCoord), PlacementError> {
        if self.is_finished() {
            return Err(PlacementError::GameOver);
        }
        if self.paused {
            return Err(PlacementError::Paused);
        }

        let cell = self.path_map.placement_cell(x, y)?;
        let cost = kind.cost();
        if self.money < cost {
            return Err(PlacementError::InsufficientFunds);
        }

        let position = self.path_map.cell_center(cell);
        let tower = self.towers.insert(kind, cell, position);
        let _ = self.path_map.place_tower(x, y);
        self.money -= cost;
        Ok((tower, cell))
    }

    fn upgrade_tower(&mut self, tower: TowerId) -> Result<u32, UpgradeError> {
        if self.is_finished() {
            return Err(UpgradeError::GameOver);
        }
        if self.paused {
            return Err(UpgradeError::Paused);
        }

        let Some(state) = self.towers.get_mut(tower) else {
            return Err(UpgradeError::MissingTower);
        };
        let cost = state.upgrade_cost();
        if self.money < cost {
            return Err(UpgradeError::InsufficientFunds);
        }

        state.upgrade();
        self.money -= cost;
        Ok(cost)
    }

    fn remove_tower(&mut self, tower: TowerId) -> Result<CellCoord, RemovalError> {
        if self.is_finished() {
            return Err(RemovalError::GameOver);
        }
        if self.paused {
            return Err(RemovalError::Paused);
        }

        let removed = self.towers.remove(tower).ok_or(RemovalError::MissingTower)?;
        let center = removed.position();
        let _ = self
            .path_map
            .remove_tower(center.x() as i32, center.y() as i32);
        Ok(removed.cell())
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Tick => {
            if world.is_halted() {
                return;
            }
            world.tick = world.tick.saturating_add(1);
            out_events.push(Event::TimeAdvanced { tick: world.tick });
        }
        Command::SpawnEnemy { kind } => {
            let enemy = world.allocate_enemy_id();
            world
                .enemies
                .push(Enemy::spawn(enemy, kind, world.path_map.waypoints()));
            out_events.push(Event::EnemySpawned { enemy, kind });
        }
        Command::AdvanceEnemies => {
            let waypoints = world.path_map.waypoints();
            for enemy in world.enemies.iter_mut() {
                enemy.advance(waypoints);
            }
            world.settle_enemies(out_events);
        }
        Command::AcquireTarget { tower, target } => {
            if let Some(state) = world.towers.get_mut(tower) {
                state.acquire(target);
            }
        }
        Command::FireProjectile { tower, target } => {
            let Some(target_position) = world
                .enemies
                .iter()
                .find(|enemy| enemy.id() == target && enemy.is_active())
                .map(Enemy::position)
            else {
                return;
            };
            let tick = world.tick;
            if let Some(state) = world.towers.get_mut(tower) {
                if state.attack(target_position, tick) {
                    out_events.push(Event::ProjectileFired { tower, target });
                }
            }
        }
        Command::ResolveProjectiles { tower } => {
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };
            let mut impacts = Vec::new();
            state.resolve_projectiles(&mut world.enemies, &mut impacts);
            for impact in impacts {
                out_events.push(Event::ProjectileHit {
                    tower,
                    enemy: impact.enemy,
                    damage: impact.damage,
                });
            }
        }
        Command::BeginWave { wave, enemy_count } => {
            world.current_wave = wave;
            world.wave_active = true;
            info!("wave {wave} started with {enemy_count} enemies");
            out_events.push(Event::WaveStarted { wave, enemy_count });
        }
        Command::CompleteWave { wave } => {
            world.wave_active = false;
            info!("wave {wave} cleared at tick {}", world.tick);
            out_events.push(Event::WaveCompleted { wave });
        }
        Command::EvaluateOutcome => {
            if world.is_finished()
                || world.wave_active
                || world.current_wave < world.rules.victory_wave
                || world.active_enemy_count() > 0
            {
                return;
            }
            world.victory = true;
            info!("victory after wave {}, final score {}", world.current_wave, world.score);
            out_events.push(Event::Victory { score: world.score });
        }
        Command::PlaceTower { kind, x, y } => match world.place_tower(kind, x, y) {
            Ok((tower, cell)) => {
                debug!("placed {kind} tower {} at {cell:?}", tower.get());
                out_events.push(Event::TowerPlaced { tower, kind, cell });
            }
            Err(reason) => {
                debug!("rejected {kind} tower at ({x}, {y}): {reason:?}");
                out_events.push(Event::TowerPlacementRejected { kind, x, y, reason });
            }
        },
        Command::UpgradeTower { tower } => match world.upgrade_tower(tower) {
            Ok(cost) => out_events.push(Event::TowerUpgraded { tower, cost }),
            Err(reason) => out_events.push(Event::TowerUpgradeRejected { tower, reason }),
        },
        Command::RemoveTower { tower } => match world.remove_tower(tower) {
            Ok(cell) => out_events.push(Event::TowerRemoved { tower, cell }),
            Err(reason) => out_events.push(Event::TowerRemovalRejected { tower, reason }),
        },
        Command::TogglePause => {
            world.paused = !world.paused;
            out_events.push(Event::PauseToggled {
                paused: world.paused,
            });
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tower_defense_core::{
        EnemyView, GameSnapshot, TowerCooldownView, TowerId, TowerSnapshot, TowerView,
    };

    use super::{PathMap, Rules, World};

    /// Provides read-only access to the route and placement grid.
    #[must_use]
    pub fn path_map(world: &World) -> &PathMap {
        &world.path_map
    }

    /// Economy and outcome rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> Rules {
        world.rules
    }

    /// Ticks simulated so far.
    #[must_use]
    pub fn tick(world: &World) -> u64 {
        world.tick
    }

    /// Money available for construction.
    #[must_use]
    pub fn money(world: &World) -> u32 {
        world.money
    }

    /// Lives left.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Accumulated score.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Whether the simulation is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Whether all lives were lost.
    #[must_use]
    pub fn is_game_over(world: &World) -> bool {
        world.game_over
    }

    /// Whether the final wave was cleared.
    #[must_use]
    pub fn is_victory(world: &World) -> bool {
        world.victory
    }

    /// Enemies that are alive and still on the path.
    #[must_use]
    pub fn active_enemy_count(world: &World) -> usize {
        world.active_enemy_count()
    }

    /// Captures a read-only view of the enemies on the map.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the towers on the map.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures the state of a single tower.
    #[must_use]
    pub fn tower(world: &World, tower: TowerId) -> Option<TowerSnapshot> {
        world.towers.get(tower).map(|state| state.snapshot())
    }

    /// Identifiers of every tower in placement order.
    #[must_use]
    pub fn tower_ids(world: &World) -> Vec<TowerId> {
        world.towers.iter().map(|tower| tower.id()).collect()
    }

    /// Captures the cooldown state of every tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.cooldown_snapshot())
                .collect(),
        )
    }

    /// Captures the whole game in one immutable value.
    #[must_use]
    pub fn snapshot(world: &World) -> GameSnapshot {
        GameSnapshot {
            tick: world.tick,
            money: world.money,
            lives: world.lives,
            score: world.score,
            current_wave: world.current_wave,
            wave_active: world.wave_active,
            paused: world.paused,
            game_over: world.game_over,
            victory: world.victory,
            enemies: enemy_view(world),
            towers: tower_view(world),
        }
    }
}

/// Builds the stock map used when no custom layout is configured.
pub fn default_path_map() -> Result<PathMap, PathError> {
    PathMap::new(
        DEFAULT_MAP_WIDTH,
        DEFAULT_MAP_HEIGHT,
        DEFAULT_TILE_SIZE,
        DEFAULT_WAYPOINTS.iter().copied().map(Vector2D::from).collect(),
    )
}

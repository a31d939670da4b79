#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session orchestrator that drives the world and the pure systems through
//! one fixed tick at a time.
//!
//! Within a tick the session applies work in a fixed order: the wave
//! scheduler releases at most one enemy, enemies advance and settle, every
//! tower in placement order re-targets, fires and resolves its projectiles,
//! and finally the victory condition is evaluated. Towers therefore always
//! react to post-movement positions.

mod config;

use log::{debug, info};
use thiserror::Error;
use tower_defense_core::{
    CellCoord, Command, Event, GameSnapshot, InputRequest, PlacementError, RemovalError, TowerId,
    TowerKind, UpgradeError, WaveStartError,
};
use tower_defense_system_builder::{Builder, PlacementPreview};
use tower_defense_system_spawning::{Config as SpawningConfig, WaveManager};
use tower_defense_system_tower_combat::TowerCombat;
use tower_defense_system_tower_targeting::TowerTargeting;
use tower_defense_world::{self as world, query, PathError, World};

pub use config::{MapConfig, SessionConfig, WaveConfig, DEFAULT_RNG_SEED};

/// Errors raised while assembling a session from configuration.
#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    /// The configured map could not be built.
    #[error("invalid map: {0}")]
    Map(#[from] PathError),
    /// The configured wave table lists no waves.
    #[error("wave table must list at least one wave")]
    EmptyWaveTable,
}

/// A running game: authoritative world plus the systems that drive it.
#[derive(Debug)]
pub struct GameSession {
    world: World,
    waves: WaveManager,
    targeting: TowerTargeting,
    combat: TowerCombat,
    builder: Builder,
    commands: Vec<Command>,
}

impl GameSession {
    /// Builds a session from the provided configuration.
    pub fn new(config: &SessionConfig) -> Result<Self, SessionError> {
        let path_map = config.path_map()?;
        let table = config.wave_table();
        if table.is_empty() {
            return Err(SessionError::EmptyWaveTable);
        }

        let world = World::new(path_map, config.rules());
        info!(
            "tower defense session ready: {} waves configured, seed {:#x}",
            table.len(),
            config.rng_seed
        );

        Ok(Self {
            world,
            waves: WaveManager::new(SpawningConfig::new(table, config.rng_seed)),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            builder: Builder::new(),
            commands: Vec::new(),
        })
    }

    /// Advances the simulation by one tick, appending every resulting event.
    ///
    /// Returns `false` without touching any state when the session is paused
    /// or already finished.
    pub fn tick(&mut self, out_events: &mut Vec<Event>) -> bool {
        let mark = out_events.len();
        world::apply(&mut self.world, Command::Tick, out_events);
        if !out_events[mark..]
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return false;
        }

        let active = query::active_enemy_count(&self.world);
        self.waves
            .handle(&out_events[mark..], active, &mut self.commands);
        self.flush(out_events);

        world::apply(&mut self.world, Command::AdvanceEnemies, out_events);

        for tower in query::tower_ids(&self.world) {
            self.engage(tower, out_events);
        }

        world::apply(&mut self.world, Command::EvaluateOutcome, out_events);
        true
    }

    /// Routes an external input request to the system responsible for it.
    pub fn handle(&mut self, request: InputRequest, out_events: &mut Vec<Event>) {
        if request == InputRequest::StartWave {
            if let Err(reason) = self.start_next_wave(out_events) {
                debug!("wave start rejected: {reason:?}");
            }
            return;
        }

        self.builder.handle(request, &mut self.commands);
        self.flush(out_events);
    }

    /// Attempts to place a tower of `kind` at pixel position (`x`, `y`).
    pub fn try_place_tower(
        &mut self,
        kind: TowerKind,
        x: i32,
        y: i32,
        out_events: &mut Vec<Event>,
    ) -> Result<TowerId, PlacementError> {
        let mark = out_events.len();
        self.handle(InputRequest::PlaceTower { x, y, kind }, out_events);
        out_events[mark..]
            .iter()
            .find_map(|event| match event {
                Event::TowerPlaced { tower, .. } => Some(Ok(*tower)),
                Event::TowerPlacementRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(PlacementError::GameOver))
    }

    /// Attempts to upgrade a tower, returning the price paid.
    pub fn upgrade_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<u32, UpgradeError> {
        let mark = out_events.len();
        self.handle(InputRequest::UpgradeTower { tower }, out_events);
        out_events[mark..]
            .iter()
            .find_map(|event| match event {
                Event::TowerUpgraded { cost, .. } => Some(Ok(*cost)),
                Event::TowerUpgradeRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(UpgradeError::MissingTower))
    }

    /// Attempts to remove a tower, returning the cell it released.
    pub fn remove_tower(
        &mut self,
        tower: TowerId,
        out_events: &mut Vec<Event>,
    ) -> Result<CellCoord, RemovalError> {
        let mark = out_events.len();
        self.handle(InputRequest::RemoveTower { tower }, out_events);
        out_events[mark..]
            .iter()
            .find_map(|event| match event {
                Event::TowerRemoved { cell, .. } => Some(Ok(*cell)),
                Event::TowerRemovalRejected { reason, .. } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(RemovalError::MissingTower))
    }

    /// Starts the next wave, returning its one-based number.
    pub fn start_next_wave(&mut self, out_events: &mut Vec<Event>) -> Result<u32, WaveStartError> {
        if query::is_game_over(&self.world) || query::is_victory(&self.world) {
            return Err(WaveStartError::GameOver);
        }

        let wave = self.waves.start_next_wave(&mut self.commands)?;
        self.flush(out_events);
        Ok(wave)
    }

    /// Flips the paused flag and returns its new value.
    pub fn toggle_pause(&mut self, out_events: &mut Vec<Event>) -> bool {
        self.handle(InputRequest::PauseToggle, out_events);
        query::is_paused(&self.world)
    }

    /// Describes what placing `kind` at the cursor would do right now.
    #[must_use]
    pub fn preview(&self, kind: TowerKind, x: i32, y: i32) -> PlacementPreview {
        let path_map = query::path_map(&self.world);
        self.builder.preview(
            kind,
            x,
            y,
            path_map.tile_size(),
            query::money(&self.world),
            |x, y| path_map.placement_cell(x, y),
        )
    }

    /// Captures the read-only render snapshot of the current state.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        query::snapshot(&self.world)
    }

    /// Authoritative world, for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Wave scheduler, for queries.
    #[must_use]
    pub fn wave_manager(&self) -> &WaveManager {
        &self.waves
    }

    fn engage(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(snapshot) = query::tower(&self.world, tower) else {
            return;
        };

        let enemies = query::enemy_view(&self.world);
        let target = self.targeting.handle(&snapshot, &enemies);
        self.commands.push(Command::AcquireTarget {
            tower,
            target: target.map(|target| target.enemy),
        });

        if let Some(target) = target {
            let cooldowns = query::tower_cooldowns(&self.world);
            self.combat.handle(
                &cooldowns,
                &[target],
                query::tick(&self.world),
                &mut self.commands,
            );
        }

        self.commands.push(Command::ResolveProjectiles { tower });
        self.flush(out_events);
    }

    fn flush(&mut self, out_events: &mut Vec<Event>) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, out_events);
        }
    }
}

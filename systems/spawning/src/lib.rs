#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting enemy spawn commands.

use log::debug;
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tower_defense_core::{Command, EnemyKind, Event, WaveStartError};

/// Spawn delay never drops below this many ticks for scaled waves.
pub const MIN_SCALED_SPAWN_DELAY_TICKS: u32 = 20;

/// Reduction applied to the last table entry's delay once the table runs out.
pub const SCALED_SPAWN_DELAY_REDUCTION: u32 = 5;

/// Composition and cadence of a single wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaveDefinition {
    groups: Vec<(EnemyKind, u32)>,
    spawn_delay_ticks: u32,
}

impl WaveDefinition {
    /// Creates a wave releasing `groups` with `spawn_delay_ticks` between spawns.
    #[must_use]
    pub fn new(groups: Vec<(EnemyKind, u32)>, spawn_delay_ticks: u32) -> Self {
        Self {
            groups,
            spawn_delay_ticks,
        }
    }

    /// Enemy kinds and how many of each the wave releases.
    #[must_use]
    pub fn groups(&self) -> &[(EnemyKind, u32)] {
        &self.groups
    }

    /// Ticks between two consecutive spawns.
    #[must_use]
    pub const fn spawn_delay_ticks(&self) -> u32 {
        self.spawn_delay_ticks
    }

    /// Total number of enemies in the wave.
    #[must_use]
    pub fn enemy_count(&self) -> u32 {
        self.groups
            .iter()
            .fold(0_u32, |total, (_, count)| total.saturating_add(*count))
    }

    fn scaled_past_table(&self, extra_waves: u32) -> Self {
        let groups = self
            .groups
            .iter()
            .map(|(kind, count)| {
                let scaled = u64::from(*count) * (5 + u64::from(extra_waves)) / 5;
                (*kind, u32::try_from(scaled).unwrap_or(u32::MAX))
            })
            .collect();
        let spawn_delay_ticks = self
            .spawn_delay_ticks
            .saturating_sub(SCALED_SPAWN_DELAY_REDUCTION)
            .max(MIN_SCALED_SPAWN_DELAY_TICKS);
        Self {
            groups,
            spawn_delay_ticks,
        }
    }
}

/// Stock progression of six waves; later waves scale the last entry.
#[must_use]
pub fn default_wave_table() -> Vec<WaveDefinition> {
    use EnemyKind::{Basic, Fast, Strong, Tank};

    vec![
        WaveDefinition::new(vec![(Basic, 10)], 60),
        WaveDefinition::new(vec![(Basic, 8), (Fast, 2)], 50),
        WaveDefinition::new(vec![(Basic, 10), (Fast, 3), (Strong, 1)], 45),
        WaveDefinition::new(vec![(Basic, 15), (Fast, 5), (Strong, 2)], 40),
        WaveDefinition::new(vec![(Basic, 12), (Fast, 8), (Strong, 3), (Tank, 1)], 35),
        WaveDefinition::new(vec![(Basic, 20), (Fast, 10), (Strong, 5), (Tank, 2)], 30),
    ]
}

/// Configuration parameters required to construct the wave manager.
#[derive(Clone, Debug)]
pub struct Config {
    waves: Vec<WaveDefinition>,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration from an explicit wave table and shuffle seed.
    #[must_use]
    pub fn new(waves: Vec<WaveDefinition>, rng_seed: u64) -> Self {
        Self { waves, rng_seed }
    }

    /// Creates a configuration using [`default_wave_table`].
    #[must_use]
    pub fn with_default_waves(rng_seed: u64) -> Self {
        Self::new(default_wave_table(), rng_seed)
    }
}

/// Pure system that releases queued enemies one at a time on a fixed cadence.
#[derive(Debug)]
pub struct WaveManager {
    waves: Vec<WaveDefinition>,
    rng: ChaCha8Rng,
    current_wave: u32,
    queue: Vec<EnemyKind>,
    spawned: usize,
    spawn_timer: u32,
    spawn_delay: u32,
    wave_active: bool,
    wave_complete: bool,
}

impl WaveManager {
    /// Creates a new wave manager using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            waves: config.waves,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            current_wave: 0,
            queue: Vec::new(),
            spawned: 0,
            spawn_timer: 0,
            spawn_delay: 0,
            wave_active: false,
            wave_complete: false,
        }
    }

    /// Resolves the composition of a one-based wave number.
    ///
    /// Waves past the table reuse the last entry with every count scaled by
    /// `1 + 0.2 * extra` (truncated) and the delay reduced once.
    #[must_use]
    pub fn composition(&self, wave: u32) -> WaveDefinition {
        let Some(last) = self.waves.last() else {
            return WaveDefinition::new(Vec::new(), MIN_SCALED_SPAWN_DELAY_TICKS);
        };
        let table_len = u32::try_from(self.waves.len()).unwrap_or(u32::MAX);
        if wave > table_len {
            return last.scaled_past_table(wave - table_len);
        }
        let index = usize::try_from(wave.saturating_sub(1)).unwrap_or(0);
        self.waves.get(index).unwrap_or(last).clone()
    }

    /// Starts the next wave and emits the matching [`Command::BeginWave`].
    ///
    /// Rejected without any state change while a wave is still active.
    pub fn start_next_wave(&mut self, out: &mut Vec<Command>) -> Result<u32, WaveStartError> {
        if self.wave_active {
            return Err(WaveStartError::AlreadyActive);
        }

        self.current_wave += 1;
        let definition = self.composition(self.current_wave);

        self.queue.clear();
        for (kind, count) in definition.groups() {
            for _ in 0..*count {
                self.queue.push(*kind);
            }
        }
        self.queue.shuffle(&mut self.rng);

        self.spawned = 0;
        self.spawn_timer = 0;
        self.spawn_delay = definition.spawn_delay_ticks();
        self.wave_active = true;
        self.wave_complete = false;

        let enemy_count = u32::try_from(self.queue.len()).unwrap_or(u32::MAX);
        out.push(Command::BeginWave {
            wave: self.current_wave,
            enemy_count,
        });
        Ok(self.current_wave)
    }

    /// Consumes world events and emits at most one spawn per elapsed tick.
    ///
    /// `active_enemies` is the number of enemies that are alive and still on
    /// the path. Once the queue is exhausted the wave only completes when that
    /// number drops to zero.
    pub fn handle(&mut self, events: &[Event], active_enemies: usize, out: &mut Vec<Command>) {
        let elapsed = events
            .iter()
            .filter(|event| matches!(event, Event::TimeAdvanced { .. }))
            .count();

        for _ in 0..elapsed {
            self.step(active_enemies, out);
        }
    }

    fn step(&mut self, active_enemies: usize, out: &mut Vec<Command>) {
        if !self.wave_active {
            return;
        }

        if let Some(kind) = self.queue.get(self.spawned).copied() {
            self.spawn_timer += 1;
            if self.spawn_timer >= self.spawn_delay {
                debug!(
                    "wave {} releases {kind} ({} of {})",
                    self.current_wave,
                    self.spawned + 1,
                    self.queue.len()
                );
                out.push(Command::SpawnEnemy { kind });
                self.spawned += 1;
                self.spawn_timer = 0;
            }
        } else if active_enemies == 0 {
            self.wave_active = false;
            self.wave_complete = true;
            out.push(Command::CompleteWave {
                wave: self.current_wave,
            });
        }
    }

    /// Whether a wave is currently releasing enemies or waiting for the field to clear.
    #[must_use]
    pub const fn is_wave_active(&self) -> bool {
        self.wave_active
    }

    /// Whether the most recent wave finished.
    #[must_use]
    pub const fn is_wave_complete(&self) -> bool {
        self.wave_complete
    }

    /// One-based number of the most recent wave, zero before the first.
    #[must_use]
    pub const fn current_wave(&self) -> u32 {
        self.current_wave
    }

    /// Number of enemies released from the current queue.
    #[must_use]
    pub const fn spawned_count(&self) -> usize {
        self.spawned
    }

    /// Shuffled spawn order of the current wave.
    #[must_use]
    pub fn spawn_queue(&self) -> &[EnemyKind] {
        &self.queue
    }
}

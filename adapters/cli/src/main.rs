#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives a headless tower defense session.
//!
//! The binary owns the clock: it ticks the session a fixed number of times,
//! optionally starts waves as soon as the previous one clears, and reports
//! the economy periodically through the log.

mod config;
mod layout_transfer;

use std::{fs, path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use thiserror::Error;
use tower_defense_core::{Event, TowerKind};
use tower_defense_session::{GameSession, SessionConfig};
use tower_defense_world::query;

use crate::{config::load_config, layout_transfer::TowerLayout};

/// Headless tower defense simulation.
#[derive(Debug, Parser)]
#[command(name = "tower-defense", version, about)]
struct CliArgs {
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Seed of the wave shuffle; overrides the configuration file.
    #[arg(long)]
    seed: Option<u64>,
    /// TOML file describing economy, map and waves.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Tower to place before the first tick, e.g. `sniper@260,140`.
    #[arg(long = "tower", value_name = "KIND@X,Y")]
    towers: Vec<TowerPlacement>,
    /// Layout string produced by `--export-layout` to place before the first tick.
    #[arg(long, value_name = "LAYOUT")]
    layout: Option<String>,
    /// Start the next wave as soon as the previous one clears.
    #[arg(long)]
    auto_waves: bool,
    /// Ticks between two status reports; zero disables them.
    #[arg(long, default_value_t = 300)]
    report_every: u64,
    /// Print the final tower layout as a transferable string.
    #[arg(long)]
    export_layout: bool,
    /// Write the final game snapshot as JSON to the provided path.
    #[arg(long, value_name = "PATH")]
    snapshot_out: Option<PathBuf>,
}

/// Tower placement requested on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct TowerPlacement {
    kind: TowerKind,
    x: i32,
    y: i32,
}

#[derive(Debug, Error)]
enum TowerPlacementError {
    #[error("expected KIND@X,Y but got '{0}'")]
    Malformed(String),
}

impl FromStr for TowerPlacement {
    type Err = TowerPlacementError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let malformed = || TowerPlacementError::Malformed(value.to_owned());
        let (kind, position) = value.split_once('@').ok_or_else(malformed)?;
        let (x, y) = position.split_once(',').ok_or_else(malformed)?;
        Ok(Self {
            kind: TowerKind::from_name_or_default(kind),
            x: x.trim().parse().map_err(|_| malformed())?,
            y: y.trim().parse().map_err(|_| malformed())?,
        })
    }
}

/// Entry point for the tower defense command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    run(CliArgs::parse())
}

fn run(args: CliArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => SessionConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.rng_seed = seed;
    }

    let mut session = GameSession::new(&config).context("failed to start session")?;
    let mut events = Vec::new();

    let mut placements = args.towers.clone();
    if let Some(layout) = &args.layout {
        let layout = TowerLayout::decode(layout).context("failed to import tower layout")?;
        placements.extend(layout.towers.into_iter().map(|tower| TowerPlacement {
            kind: tower.kind,
            x: tower.x,
            y: tower.y,
        }));
    }
    for placement in placements {
        match session.try_place_tower(placement.kind, placement.x, placement.y, &mut events) {
            Ok(tower) => info!(
                "placed {} tower {} at ({}, {})",
                placement.kind,
                tower.get(),
                placement.x,
                placement.y
            ),
            Err(reason) => warn!(
                "could not place {} tower at ({}, {}): {reason:?}",
                placement.kind, placement.x, placement.y
            ),
        }
    }

    if let Err(reason) = session.start_next_wave(&mut events) {
        warn!("first wave did not start: {reason:?}");
    }

    for _ in 0..args.ticks {
        events.clear();
        if !session.tick(&mut events) {
            break;
        }

        let tick = query::tick(session.world());
        if args.report_every > 0 && tick % args.report_every == 0 {
            report(&session, tick);
        }

        let cleared = events
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. }));
        if args.auto_waves && cleared {
            if let Err(reason) = session.start_next_wave(&mut events) {
                warn!("next wave did not start: {reason:?}");
            }
        }
    }

    let snapshot = session.snapshot();
    let outcome = if snapshot.victory {
        "victory"
    } else if snapshot.game_over {
        "defeat"
    } else {
        "unfinished"
    };
    info!(
        "{outcome} at tick {}: final score {}, wave {}, {} lives left",
        snapshot.tick, snapshot.score, snapshot.current_wave, snapshot.lives
    );

    if args.export_layout {
        let encoded = TowerLayout::from_view(&snapshot.towers)
            .encode()
            .context("failed to export tower layout")?;
        println!("{encoded}");
    }

    if let Some(path) = &args.snapshot_out {
        let json =
            serde_json::to_string_pretty(&snapshot).context("failed to serialize game snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write game snapshot to {}", path.display()))?;
    }

    Ok(())
}

fn report(session: &GameSession, tick: u64) {
    let world = session.world();
    info!(
        "tick {tick}: wave {}, money {}, lives {}, {} enemies, {} towers",
        session.wave_manager().current_wave(),
        query::money(world),
        query::lives(world),
        query::enemy_view(world).len(),
        query::tower_ids(world).len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tower_flags_parse_kind_and_position() {
        assert_eq!(
            "machine-gun@140, 180".parse::<TowerPlacement>().expect("valid placement"),
            TowerPlacement {
                kind: TowerKind::MachineGun,
                x: 140,
                y: 180,
            }
        );
    }

    #[test]
    fn malformed_tower_flags_are_rejected() {
        assert!(matches!(
            "basic140,180".parse::<TowerPlacement>(),
            Err(TowerPlacementError::Malformed(_))
        ));
        assert!(matches!(
            "basic@140".parse::<TowerPlacement>(),
            Err(TowerPlacementError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_tower_flag_kind_degrades_to_basic() {
        assert_eq!(
            "laser@1,2".parse::<TowerPlacement>().expect("kind falls back"),
            TowerPlacement {
                kind: TowerKind::Basic,
                x: 1,
                y: 2,
            }
        );
    }

    #[test]
    fn flags_map_onto_arguments() {
        let args = CliArgs::try_parse_from([
            "tower-defense",
            "--ticks",
            "120",
            "--seed",
            "9",
            "--tower",
            "basic@140,180",
            "--tower",
            "sniper@260,140",
            "--auto-waves",
        ])
        .expect("flags parse");

        assert_eq!(args.ticks, 120);
        assert_eq!(args.seed, Some(9));
        assert_eq!(args.towers.len(), 2);
        assert!(args.auto_waves);
        assert_eq!(args.report_every, 300);
        assert!(!args.export_layout);
    }

    #[test]
    fn short_run_completes() {
        let args = CliArgs::try_parse_from([
            "tower-defense",
            "--ticks",
            "90",
            "--tower",
            "basic@140,180",
            "--report-every",
            "30",
        ])
        .expect("flags parse");

        run(args).expect("run succeeds");
    }
}

use proptest::prelude::*;
use tower_defense_core::{
    CellCoord, EnemyKind, Event, PlacementError, RemovalError, TowerKind, UpgradeError,
    WaveStartError,
};
use tower_defense_session::{GameSession, MapConfig, SessionConfig, SessionError, WaveConfig};
use tower_defense_world::query;

fn session(config: &SessionConfig) -> GameSession {
    GameSession::new(config).expect("configuration is valid")
}

fn single_wave(kind: &str, count: u32, spawn_delay: u32) -> Option<Vec<WaveConfig>> {
    Some(vec![WaveConfig {
        enemies: vec![(kind.to_owned(), count)],
        spawn_delay,
    }])
}

/// Short straight route an unopposed basic enemy walks in under a hundred ticks.
fn short_route() -> MapConfig {
    MapConfig {
        width: 400,
        height: 400,
        tile_size: 40,
        waypoints: vec![(20.0, 20.0), (100.0, 20.0)],
    }
}

fn run_until<F>(session: &mut GameSession, limit: u32, mut done: F) -> Vec<Event>
where
    F: FnMut(&GameSession, &[Event]) -> bool,
{
    let mut log = Vec::new();
    for _ in 0..limit {
        let mut events = Vec::new();
        let _ = session.tick(&mut events);
        let finished = done(session, &events);
        log.extend(events);
        if finished {
            break;
        }
    }
    log
}

#[test]
fn basic_tower_kills_a_lingering_basic_enemy_within_four_cycles() {
    // The diagonal route never leaves the tower's reach and leaves its cell free.
    let config = SessionConfig {
        map: MapConfig {
            width: 400,
            height: 400,
            tile_size: 40,
            waypoints: vec![
                (75.0, 75.0),
                (125.0, 125.0),
                (75.0, 75.0),
                (125.0, 125.0),
                (75.0, 75.0),
            ],
        },
        waves: single_wave("basic", 1, 1),
        ..SessionConfig::default()
    };
    let mut session = session(&config);
    let mut events = Vec::new();

    let tower = session
        .try_place_tower(TowerKind::Basic, 100, 100, &mut events)
        .expect("cell (2, 2) is free");
    assert_eq!(query::money(session.world()), 150);
    assert_eq!(session.start_next_wave(&mut events), Ok(1));

    let log = run_until(&mut session, 120, |_, _| false);
    assert_eq!(query::tick(session.world()), 120);

    let fired: Vec<u64> = {
        let mut tick = 0;
        let mut fired = Vec::new();
        for event in &log {
            match event {
                Event::TimeAdvanced { tick: now } => tick = *now,
                Event::ProjectileFired { tower: shooter, .. } if *shooter == tower => {
                    fired.push(tick)
                }
                _ => {}
            }
        }
        fired
    };
    assert_eq!(fired, vec![30, 60, 90, 120]);

    let hits = log
        .iter()
        .filter(|event| matches!(event, Event::ProjectileHit { damage: 25, .. }))
        .count();
    assert_eq!(hits, 4);

    let snapshot = session.snapshot();
    let enemy = snapshot.enemies.iter().next().expect("the corpse is settled next tick");
    assert!(!enemy.alive);
    assert_eq!(enemy.health, 0);

    let mut events = Vec::new();
    assert!(session.tick(&mut events));
    assert!(events.contains(&Event::EnemyKilled {
        enemy: enemy.id,
        reward: 10,
    }));
    assert_eq!(query::money(session.world()), 160);
    assert_eq!(query::score(session.world()), 10);
    assert_eq!(query::lives(session.world()), 20);
}

#[test]
fn economy_is_conserved_over_the_first_wave() {
    let mut session = session(&SessionConfig::default());
    let mut events = Vec::new();
    let before_money = query::money(session.world());
    let before_lives = query::lives(session.world());

    let mut spent = 0;
    for (kind, x, y) in [
        (TowerKind::Basic, 140, 180),
        (TowerKind::Basic, 260, 140),
        (TowerKind::Basic, 20, 20),
    ] {
        if session.try_place_tower(kind, x, y, &mut events).is_ok() {
            spent += kind.cost();
        }
    }
    assert_eq!(spent, 150);
    assert_eq!(session.start_next_wave(&mut events), Ok(1));

    let log = run_until(&mut session, 5_000, |_, events| {
        events
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { wave: 1 }))
    });
    assert!(session.wave_manager().is_wave_complete());

    let rewards: u32 = log
        .iter()
        .filter_map(|event| match event {
            Event::EnemyKilled { reward, .. } => Some(*reward),
            _ => None,
        })
        .sum();
    let escapes = log
        .iter()
        .filter(|event| matches!(event, Event::EnemyEscaped { .. }))
        .count() as u32;

    assert_eq!(
        query::money(session.world()),
        before_money - spent + rewards
    );
    assert_eq!(query::lives(session.world()), before_lives - escapes);
    assert_eq!(query::score(session.world()), rewards);
}

#[test]
fn wave_completes_only_after_every_spawn_and_a_clear_field() {
    let mut session = session(&SessionConfig::default());
    let mut events = Vec::new();
    assert_eq!(session.start_next_wave(&mut events), Ok(1));
    let expected = session.wave_manager().spawn_queue().len();
    assert_eq!(expected, 10);

    let mut spawned = 0;
    let mut completed = false;
    for _ in 0..5_000 {
        let mut events = Vec::new();
        let _ = session.tick(&mut events);
        spawned += events
            .iter()
            .filter(|event| matches!(event, Event::EnemySpawned { .. }))
            .count();

        if events.contains(&Event::WaveCompleted { wave: 1 }) {
            assert_eq!(spawned, expected);
            assert_eq!(session.snapshot().enemies.active_count(), 0);
            completed = true;
            break;
        }
        assert!(!session.wave_manager().is_wave_complete());
    }

    assert!(completed, "wave one never completed");
    assert_eq!(session.wave_manager().spawned_count(), expected);
}

#[test]
fn second_wave_request_is_rejected_while_active() {
    let mut session = session(&SessionConfig::default());
    let mut events = Vec::new();

    assert_eq!(session.start_next_wave(&mut events), Ok(1));
    assert_eq!(
        session.start_next_wave(&mut events),
        Err(WaveStartError::AlreadyActive)
    );
    assert_eq!(session.wave_manager().current_wave(), 1);
    let started = events
        .iter()
        .filter(|event| matches!(event, Event::WaveStarted { .. }))
        .count();
    assert_eq!(started, 1);
}

#[test]
fn paused_session_ignores_ticks_and_construction() {
    let mut session = session(&SessionConfig::default());
    let mut events = Vec::new();
    assert_eq!(session.start_next_wave(&mut events), Ok(1));
    let _ = run_until(&mut session, 90, |_, _| false);

    assert!(session.toggle_pause(&mut events));
    let frozen = session.snapshot();

    let mut events = Vec::new();
    assert!(!session.tick(&mut events));
    assert!(events.is_empty());
    assert_eq!(session.snapshot(), frozen);
    assert_eq!(
        session.try_place_tower(TowerKind::Basic, 140, 180, &mut events),
        Err(PlacementError::Paused)
    );
    assert_eq!(query::money(session.world()), 200);

    assert!(!session.toggle_pause(&mut events));
    assert!(session.tick(&mut events));
    assert_eq!(query::tick(session.world()), frozen.tick + 1);
}

#[test]
fn upgrade_and_removal_flow_through_the_session() {
    let mut session = session(&SessionConfig::default());
    let mut events = Vec::new();

    let tower = session
        .try_place_tower(TowerKind::Basic, 140, 180, &mut events)
        .expect("free cell");
    assert_eq!(session.upgrade_tower(tower, &mut events), Ok(25));
    assert_eq!(query::money(session.world()), 125);

    let upgraded = query::tower(session.world(), tower).expect("tower exists");
    assert_eq!(upgraded.damage, 37);
    assert_eq!(upgraded.range, 88);
    assert_eq!(upgraded.cooldown_ticks, 24);
    assert_eq!(upgraded.level, 1);

    assert_eq!(
        session.remove_tower(tower, &mut events),
        Ok(CellCoord::new(3, 4))
    );
    assert_eq!(
        session.upgrade_tower(tower, &mut events),
        Err(UpgradeError::MissingTower)
    );
    assert_eq!(
        session.remove_tower(tower, &mut events),
        Err(RemovalError::MissingTower)
    );
    assert!(session
        .try_place_tower(TowerKind::Sniper, 140, 180, &mut events)
        .is_ok());
    assert_eq!(query::money(session.world()), 25);
}

#[test]
fn preview_reflects_cell_and_funds() {
    let mut session = session(&SessionConfig::default());

    let free = session.preview(TowerKind::Cannon, 141, 181);
    assert_eq!(free.cell, Some(CellCoord::new(3, 4)));
    assert!(free.is_valid());

    let on_path = session.preview(TowerKind::Basic, 120, 100);
    assert_eq!(on_path.rejection, Some(PlacementError::OnPath));
    assert!(!on_path.is_valid());

    let mut events = Vec::new();
    let _ = session
        .try_place_tower(TowerKind::Cannon, 141, 181, &mut events)
        .expect("affordable");
    let poor = session.preview(TowerKind::Sniper, 20, 20);
    assert!(poor.placeable);
    assert!(!poor.affordable);

    let occupied = session.preview(TowerKind::Basic, 150, 170);
    assert_eq!(occupied.rejection, Some(PlacementError::Occupied));
}

#[test]
fn losing_every_life_ends_the_game_once() {
    let config = SessionConfig {
        starting_lives: 2,
        map: short_route(),
        waves: single_wave("fast", 3, 1),
        ..SessionConfig::default()
    };
    let mut session = session(&config);
    let mut events = Vec::new();
    assert_eq!(session.start_next_wave(&mut events), Ok(1));

    let log = run_until(&mut session, 500, |session, _| {
        query::is_game_over(session.world())
    });

    let game_overs = log
        .iter()
        .filter(|event| matches!(event, Event::GameOver { score: 0 }))
        .count();
    assert_eq!(game_overs, 1);
    assert_eq!(query::lives(session.world()), 0);

    let mut events = Vec::new();
    assert!(!session.tick(&mut events));
    assert!(events.is_empty());
    assert_eq!(
        session.start_next_wave(&mut events),
        Err(WaveStartError::GameOver)
    );
    assert_eq!(
        session.try_place_tower(TowerKind::Basic, 220, 220, &mut events),
        Err(PlacementError::GameOver)
    );
}

#[test]
fn clearing_the_final_wave_wins_and_halts_the_clock() {
    let config = SessionConfig {
        victory_wave: 1,
        map: short_route(),
        waves: single_wave("basic", 1, 1),
        ..SessionConfig::default()
    };
    let mut session = session(&config);
    let mut events = Vec::new();
    assert_eq!(session.start_next_wave(&mut events), Ok(1));

    let log = run_until(&mut session, 500, |session, _| {
        query::is_victory(session.world())
    });

    assert!(log.contains(&Event::WaveCompleted { wave: 1 }));
    assert!(log.contains(&Event::Victory { score: 0 }));
    assert_eq!(query::lives(session.world()), 19);

    let frozen = query::tick(session.world());
    let mut events = Vec::new();
    assert!(!session.tick(&mut events));
    assert_eq!(query::tick(session.world()), frozen);
    assert_eq!(
        session.start_next_wave(&mut events),
        Err(WaveStartError::GameOver)
    );
}

#[test]
fn unknown_configured_enemy_kind_spawns_basic() {
    let config = SessionConfig {
        map: short_route(),
        waves: single_wave("dragon", 1, 1),
        ..SessionConfig::default()
    };
    let mut session = session(&config);
    let mut events = Vec::new();
    assert_eq!(session.start_next_wave(&mut events), Ok(1));
    assert!(session.tick(&mut events));

    assert!(events.iter().any(|event| matches!(
        event,
        Event::EnemySpawned {
            kind: EnemyKind::Basic,
            ..
        }
    )));
}

#[test]
fn invalid_configuration_is_rejected() {
    let empty = SessionConfig {
        waves: Some(Vec::new()),
        ..SessionConfig::default()
    };
    assert_eq!(
        GameSession::new(&empty).unwrap_err(),
        SessionError::EmptyWaveTable
    );

    let degenerate = SessionConfig {
        map: MapConfig {
            tile_size: 0,
            ..MapConfig::default()
        },
        ..SessionConfig::default()
    };
    assert!(matches!(
        GameSession::new(&degenerate),
        Err(SessionError::Map(_))
    ));
}

proptest! {
    #[test]
    fn placement_never_overspends(
        requests in prop::collection::vec((0usize..4, 0i32..1000, 0i32..800), 1..24)
    ) {
        let mut session = session(&SessionConfig::default());
        let mut events = Vec::new();

        for (kind, x, y) in requests {
            let kind = TowerKind::ALL[kind];
            let before = query::money(session.world());
            match session.try_place_tower(kind, x, y, &mut events) {
                Ok(_) => prop_assert_eq!(query::money(session.world()), before - kind.cost()),
                Err(_) => prop_assert_eq!(query::money(session.world()), before),
            }
        }

        let spent: u32 = session.snapshot().towers.iter().map(|tower| tower.cost).sum();
        prop_assert_eq!(query::money(session.world()) + spent, 200);
    }
}

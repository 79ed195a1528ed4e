use std::time::Duration;

use rampart_defence_core::{Command, EnemyKind, Event, Gold, SessionPhase, WaveNumber};
use rampart_defence_system_wave_scheduling::{Config, WaveScheduling};
use rampart_defence_world::{self as world, query, scaffold, World};

/// Feeds world events to the scheduler and applies the commands it emits
/// until the exchange quiesces.
fn pump(
    world: &mut World,
    scheduler: &mut WaveScheduling,
    seed_events: Vec<Event>,
    log: &mut Vec<Event>,
) {
    let mut pending = seed_events;
    while !pending.is_empty() {
        log.extend(pending.iter().cloned());
        let mut commands = Vec::new();
        scheduler.handle(&pending, &mut commands);
        pending = Vec::new();
        for command in commands {
            world::apply(world, command, &mut pending);
        }
    }
}

fn run_first_wave(seed: u64) -> (World, Vec<Event>) {
    let mut world = World::new();
    scaffold::set_health(&mut world, 100);
    let mut scheduler = WaveScheduling::new(Config::new(seed));
    let mut log = Vec::new();

    let mut events = Vec::new();
    world::apply(&mut world, Command::StartWave, &mut events);
    pump(&mut world, &mut scheduler, events, &mut log);

    for _ in 0..2_000 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        pump(&mut world, &mut scheduler, events, &mut log);
        if log
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. }))
        {
            break;
        }
    }

    (world, log)
}

#[test]
fn the_first_wave_spawns_its_committed_pool_exactly_once() {
    let (_, log) = run_first_wave(0x5eed);

    let spawned: Vec<_> = log
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { kind, summoned, .. } => Some((*kind, *summoned)),
            _ => None,
        })
        .collect();

    assert_eq!(spawned.len(), 10, "wave 1 commits exactly ten enemies");
    assert!(spawned.iter().all(|(_, summoned)| !summoned));
    assert!(spawned
        .iter()
        .all(|(kind, _)| matches!(kind, EnemyKind::Fast | EnemyKind::Tank)));
}

#[test]
fn the_wave_completes_only_after_every_enemy_resolves() {
    let (world, log) = run_first_wave(0x5eed);

    let completed_at = log
        .iter()
        .position(|event| matches!(event, Event::WaveCompleted { .. }))
        .expect("wave completes");
    let resolved_before = log[..completed_at]
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::EnemyDied { .. } | Event::EnemyLeaked { .. }
            )
        })
        .count();
    assert_eq!(resolved_before, 10, "completion waits for the whole pool");

    let completions = log
        .iter()
        .filter(|event| matches!(event, Event::WaveCompleted { .. }))
        .count();
    assert_eq!(completions, 1, "the wave completes exactly once");

    assert_eq!(query::session_phase(&world), SessionPhase::ReportOpen);
    // Ten leaks award nothing; only the flat wave bonus lands.
    assert_eq!(query::hud(&world).gold, Gold::new(140));
}

#[test]
fn replaying_the_same_seed_reproduces_the_event_log() {
    let (_, first) = run_first_wave(0xd00d);
    let (_, second) = run_first_wave(0xd00d);
    assert_eq!(first, second, "replay diverged between runs");
}

#[test]
fn different_seeds_may_reorder_the_wave_composition() {
    let kinds = |log: &[Event]| -> Vec<EnemyKind> {
        log.iter()
            .filter_map(|event| match event {
                Event::EnemySpawned { kind, .. } => Some(*kind),
                _ => None,
            })
            .collect()
    };
    let (_, first) = run_first_wave(1);
    let (_, second) = run_first_wave(2);
    // Both runs spawn ten enemies; the picks themselves are seed-dependent.
    assert_eq!(kinds(&first).len(), 10);
    assert_eq!(kinds(&second).len(), 10);
}

#[test]
fn boss_waves_spawn_a_single_reinforced_enemy() {
    let mut world = World::new();
    scaffold::set_health(&mut world, 100);
    scaffold::begin_wave_at(&mut world, WaveNumber::new(5));
    let mut scheduler = WaveScheduling::new(Config::new(7));
    let mut log = Vec::new();

    pump(
        &mut world,
        &mut scheduler,
        vec![Event::WaveStarted {
            wave: WaveNumber::new(5),
            is_boss: true,
            gold: Gold::new(120),
        }],
        &mut log,
    );

    for _ in 0..2_000 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        pump(&mut world, &mut scheduler, events, &mut log);
        if log
            .iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. }))
        {
            break;
        }
    }

    let spawned: Vec<_> = log
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(spawned, vec![EnemyKind::Boss]);
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::BossSpawned { .. })));
    assert!(log
        .iter()
        .any(|event| matches!(event, Event::WaveCompleted { .. })));
}

#[test]
fn a_game_over_disarms_the_scheduler() {
    let mut world = World::new();
    scaffold::set_health(&mut world, 1);
    let mut scheduler = WaveScheduling::new(Config::new(3));
    let mut log = Vec::new();

    let mut events = Vec::new();
    world::apply(&mut world, Command::StartWave, &mut events);
    pump(&mut world, &mut scheduler, events, &mut log);

    for _ in 0..2_000 {
        let mut events = Vec::new();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(250),
            },
            &mut events,
        );
        pump(&mut world, &mut scheduler, events, &mut log);
        if log.iter().any(|event| matches!(event, Event::GameOver { .. })) {
            break;
        }
    }

    assert!(log.iter().any(|event| matches!(event, Event::GameOver { .. })));
    assert!(
        !log.iter()
            .any(|event| matches!(event, Event::WaveCompleted { .. })),
        "a terminated session never completes its wave",
    );
    assert_eq!(query::session_phase(&world), SessionPhase::GameOver);
}

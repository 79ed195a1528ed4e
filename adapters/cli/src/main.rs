#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives headless Rampart Defence sessions.
//!
//! Runs the full engine loop (world, wave scheduling, targeting, analytics)
//! without a renderer, building towers with a simple greedy strategy and
//! printing each finalized wave report as a transfer string. The same binary
//! decodes transfer strings back into readable JSON.

use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rampart_defence_core::{
    Command, Event, SessionPhase, TowerArchetype, MAX_TOWER_LEVEL,
};
use rampart_defence_system_analytics::Analytics;
use rampart_defence_system_targeting::Targeting;
use rampart_defence_system_wave_scheduling::{Config, WaveScheduling};
use rampart_defence_world::{self as world, query, World};

mod report_transfer;

/// Gold the strategy banks before it starts buying upgrades.
const UPGRADE_RESERVE: u64 = 250;

/// Hard ceiling on simulated frames before the session is declared stalled.
const MAX_FRAMES: u64 = 400_000;

/// Headless Rampart Defence session driver.
#[derive(Debug, Parser)]
#[command(name = "rampart-defence", about = "Runs headless Rampart Defence sessions")]
struct Args {
    /// Number of waves to simulate before exiting.
    #[arg(long, default_value_t = 3)]
    waves: u32,

    /// Seed for deterministic wave composition.
    #[arg(long, default_value_t = 0x5eed_cafe)]
    seed: u64,

    /// Simulated frame length in milliseconds.
    #[arg(long, default_value_t = 50)]
    frame_ms: u64,

    /// Times the speed multiplier is cycled before the first wave (0-2).
    #[arg(long, default_value_t = 0)]
    speed_steps: u8,

    /// Decode a report transfer string and pretty-print it instead of
    /// simulating.
    #[arg(long)]
    decode: Option<String>,
}

/// Entry point for the Rampart Defence command-line interface.
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if let Some(transfer) = &args.decode {
        let report = report_transfer::decode(transfer).context("invalid transfer string")?;
        let pretty =
            serde_json::to_string_pretty(&report).context("report serialization failed")?;
        println!("{pretty}");
        return Ok(());
    }

    run_session(&args)
}

fn run_session(args: &Args) -> anyhow::Result<()> {
    let mut world = World::new();
    println!("{}", query::welcome_banner(&world));

    let mut scheduler = WaveScheduling::new(Config::new(args.seed));
    let mut targeting = Targeting::new();
    let mut analytics = Analytics::new();

    let mut pending = Vec::new();
    for _ in 0..args.speed_steps.min(2) {
        world::apply(&mut world, Command::CycleSpeed, &mut pending);
    }
    world::apply(&mut world, Command::ToggleAutoStart, &mut pending);
    world::apply(&mut world, Command::StartWave, &mut pending);

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let mut reports_printed = 0u32;
    let mut frames = 0u64;

    while reports_printed < args.waves {
        pump(
            &mut world,
            &mut scheduler,
            &mut targeting,
            &mut analytics,
            std::mem::take(&mut pending),
            &mut reports_printed,
        );

        if query::session_phase(&world) == SessionPhase::GameOver {
            let hud = query::hud(&world);
            info!(wave = hud.wave.get(), "session ended before the target wave");
            break;
        }
        if reports_printed >= args.waves {
            break;
        }

        for command in plan_construction(&world) {
            world::apply(&mut world, command, &mut pending);
        }
        world::apply(&mut world, Command::Tick { dt: frame }, &mut pending);

        frames += 1;
        if frames > MAX_FRAMES {
            bail!("session stalled after {frames} frames");
        }
    }

    let hud = query::hud(&world);
    info!(
        waves = reports_printed,
        health = hud.health,
        gold = hud.gold.get(),
        "session finished"
    );
    Ok(())
}

/// Feeds world events to every system and applies the commands they emit
/// until the exchange quiesces.
fn pump(
    world: &mut World,
    scheduler: &mut WaveScheduling,
    targeting: &mut Targeting,
    analytics: &mut Analytics,
    seed_events: Vec<Event>,
    reports_printed: &mut u32,
) {
    let mut pending = seed_events;
    while !pending.is_empty() {
        let mut commands = Vec::new();
        scheduler.handle(&pending, &mut commands);

        let mut published = Vec::new();
        analytics.handle(&pending, &mut published);
        for event in published {
            if let Event::ReportPublished { report } = event {
                println!("{}", report_transfer::encode(&report));
                info!(
                    wave = report.wave,
                    leaks = report.leaks,
                    kills = report.kills.total,
                    net = report.gold.net,
                    "wave cleared"
                );
                *reports_printed += 1;
                commands.push(Command::CloseReport);
            }
        }

        targeting.handle(
            query::session_phase(world),
            &query::tower_view(world),
            &query::enemy_view(world),
            &mut commands,
        );

        pending = Vec::new();
        for command in commands {
            world::apply(world, command, &mut pending);
        }
    }
}

/// Greedy build order: fill every slot, cycling through the archetypes, then
/// sink surplus gold into upgrades.
fn plan_construction(world: &World) -> Vec<Command> {
    let hud = query::hud(world);
    let slots = query::slot_view(world);

    if let Some(free) = slots.iter().find(|slot| slot.occupant.is_none()) {
        let occupied = slots.iter().filter(|slot| slot.occupant.is_some()).count();
        let archetype = TowerArchetype::ALL[occupied % TowerArchetype::ALL.len()];
        if hud.gold.get() >= archetype.cost().get() {
            return vec![Command::PlaceTower {
                archetype,
                slot: free.id,
            }];
        }
        return Vec::new();
    }

    if hud.gold.get() >= UPGRADE_RESERVE {
        if let Some(tower) = query::tower_view(world)
            .into_vec()
            .into_iter()
            .find(|tower| tower.level < MAX_TOWER_LEVEL)
        {
            return vec![
                Command::SelectTower {
                    position: tower.position,
                },
                Command::UpgradeSelected,
            ];
        }
    }

    Vec::new()
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduling system.
//!
//! Drives the `Idle -> Spawning -> Draining -> Complete` wave lifecycle as a
//! pure system: it consumes world events, meters out timed
//! [`Command::SpawnEnemy`] requests for both spawn pools, and emits a single
//! [`Command::CompleteWave`] once every committed enemy has been spawned and
//! no enemy remains alive. Enemy-kind picks come from a SplitMix64 stream
//! seeded per wave, so replaying a session reproduces every wave exactly.

use std::time::Duration;

use rampart_defence_core::{Command, EnemyKind, Event, WaveComposition, WaveNumber};
use sha2::{Digest, Sha256};

const BOSS_SPAWN_INTERVAL: Duration = Duration::from_millis(1_400);
const NORMAL_SPAWN_INTERVAL: Duration = Duration::from_millis(600);
const EXTRA_POOL_INTERVAL_FACTOR: f64 = 0.60;
const EXTRA_POOL_INTERVAL_FLOOR_MS: u64 = 140;

/// Wave index from which summoners join the spawn pools.
const SUMMONER_WAVE: u32 = 15;
/// Percentage chance of a summoner pick once they are in the pool.
const SUMMONER_CHANCE: u64 = 12;
/// Percentage chance of a tank pick in the tank/fast split.
const TANK_CHANCE: u64 = 30;

/// Configuration parameters required to construct the scheduling system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    global_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided session seed.
    #[must_use]
    pub const fn new(global_seed: u64) -> Self {
        Self { global_seed }
    }
}

/// Pure system that deterministically schedules wave spawns and completion.
#[derive(Debug)]
pub struct WaveScheduling {
    global_seed: u64,
    phase: Phase,
    elapsed: Duration,
    pending_base: u32,
    pending_extra: u32,
    next_base_at: Duration,
    next_extra_at: Duration,
    base_interval: Duration,
    extra_interval: Duration,
    is_boss: bool,
    summoner_pool_open: bool,
    alive: u32,
    rng: SplitMix64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    Idle,
    Spawning,
    Draining,
}

impl WaveScheduling {
    /// Creates a new scheduling system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            global_seed: config.global_seed,
            phase: Phase::Idle,
            elapsed: Duration::ZERO,
            pending_base: 0,
            pending_extra: 0,
            next_base_at: Duration::ZERO,
            next_extra_at: Duration::ZERO,
            base_interval: NORMAL_SPAWN_INTERVAL,
            extra_interval: NORMAL_SPAWN_INTERVAL,
            is_boss: false,
            summoner_pool_open: false,
            alive: 0,
            rng: SplitMix64::new(0),
        }
    }

    /// Consumes world events and queues spawn and completion commands.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::WaveStarted { wave, .. } => self.arm_wave(*wave),
                Event::TimeAdvanced { dt } => self.advance(*dt, out),
                Event::EnemySpawned { summoned: true, .. } => {
                    self.alive = self.alive.saturating_add(1);
                }
                Event::EnemyDied { .. } | Event::EnemyLeaked { .. } => {
                    self.alive = self.alive.saturating_sub(1);
                    self.try_complete(out);
                }
                Event::GameOver { .. } | Event::SessionReset => self.disarm(),
                _ => {}
            }
        }
    }

    fn arm_wave(&mut self, wave: WaveNumber) {
        let composition = WaveComposition::for_wave(wave);
        self.phase = Phase::Spawning;
        self.elapsed = Duration::ZERO;
        self.pending_base = composition.base_count();
        self.pending_extra = composition.extra_count();
        self.is_boss = composition.is_boss();
        self.base_interval = if composition.is_boss() {
            BOSS_SPAWN_INTERVAL
        } else {
            NORMAL_SPAWN_INTERVAL
        };
        self.extra_interval = extra_interval(self.base_interval);
        self.summoner_pool_open = wave.get() >= SUMMONER_WAVE;
        self.next_base_at = Duration::ZERO;
        self.next_extra_at = self.extra_interval;
        self.alive = 0;
        self.rng = SplitMix64::new(derive_wave_seed(self.global_seed, wave));
    }

    fn disarm(&mut self) {
        self.phase = Phase::Idle;
        self.pending_base = 0;
        self.pending_extra = 0;
        self.alive = 0;
        self.elapsed = Duration::ZERO;
    }

    fn advance(&mut self, dt: Duration, out: &mut Vec<Command>) {
        if self.phase != Phase::Spawning {
            return;
        }

        self.elapsed = self.elapsed.saturating_add(dt);

        while self.pending_base > 0 && self.next_base_at <= self.elapsed {
            let kind = if self.is_boss {
                EnemyKind::Boss
            } else {
                self.pick_kind()
            };
            out.push(Command::SpawnEnemy { kind });
            self.alive = self.alive.saturating_add(1);
            self.pending_base -= 1;
            self.next_base_at = self.next_base_at.saturating_add(self.base_interval);
        }

        while self.pending_extra > 0 && self.next_extra_at <= self.elapsed {
            let kind = self.pick_kind();
            out.push(Command::SpawnEnemy { kind });
            self.alive = self.alive.saturating_add(1);
            self.pending_extra -= 1;
            self.next_extra_at = self.next_extra_at.saturating_add(self.extra_interval);
        }

        if self.pending_base == 0 && self.pending_extra == 0 {
            self.phase = Phase::Draining;
            self.try_complete(out);
        }
    }

    fn try_complete(&mut self, out: &mut Vec<Command>) {
        if self.phase == Phase::Draining && self.alive == 0 {
            self.phase = Phase::Idle;
            out.push(Command::CompleteWave);
        }
    }

    fn pick_kind(&mut self) -> EnemyKind {
        if self.summoner_pool_open && self.rng.next_percent() < SUMMONER_CHANCE {
            return EnemyKind::Summoner;
        }
        if self.rng.next_percent() < TANK_CHANCE {
            EnemyKind::Tank
        } else {
            EnemyKind::Fast
        }
    }
}

/// Interval between spawns from the accelerated extra pool.
fn extra_interval(base: Duration) -> Duration {
    let scaled = (base.as_millis() as f64 * EXTRA_POOL_INTERVAL_FACTOR) as u64;
    Duration::from_millis(scaled.max(EXTRA_POOL_INTERVAL_FLOOR_MS))
}

fn derive_wave_seed(global_seed: u64, wave: WaveNumber) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(wave.get().to_le_bytes());
    let digest = hasher.finalize();
    let bytes: [u8; 8] = digest[0..8].try_into().expect("sha256 digest slice length");
    u64::from_le_bytes(bytes)
}

#[derive(Debug)]
struct SplitMix64 {
    state: u64,
}

impl SplitMix64 {
    fn new(seed: u64) -> Self {
        let seed = if seed == 0 { 0x9e37_79b9_7f4a_7c15 } else { seed };
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9e37_79b9_7f4a_7c15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    fn next_percent(&mut self) -> u64 {
        self.next_u64() % 100
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_defence_core::Gold;

    fn started(wave: u32) -> Event {
        let wave = WaveNumber::new(wave);
        Event::WaveStarted {
            wave,
            is_boss: wave.is_boss_wave(),
            gold: Gold::new(120),
        }
    }

    fn advanced(millis: u64) -> Event {
        Event::TimeAdvanced {
            dt: Duration::from_millis(millis),
        }
    }

    fn spawn_kinds(commands: &[Command]) -> Vec<EnemyKind> {
        commands
            .iter()
            .filter_map(|command| match command {
                Command::SpawnEnemy { kind } => Some(*kind),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn a_large_step_drains_the_base_pool_without_duplicates() {
        let mut system = WaveScheduling::new(Config::new(1));
        let mut out = Vec::new();
        system.handle(&[started(1), advanced(60_000)], &mut out);

        let kinds = spawn_kinds(&out);
        assert_eq!(kinds.len(), 10);
        assert!(kinds
            .iter()
            .all(|kind| matches!(kind, EnemyKind::Fast | EnemyKind::Tank)));
        assert!(!out.contains(&Command::CompleteWave));
    }

    #[test]
    fn waves_before_fifteen_never_pick_summoners() {
        for wave in [1, 7, 14] {
            let mut system = WaveScheduling::new(Config::new(99));
            let mut out = Vec::new();
            system.handle(&[started(wave), advanced(120_000)], &mut out);
            assert!(spawn_kinds(&out)
                .iter()
                .all(|kind| *kind != EnemyKind::Summoner));
        }
    }

    #[test]
    fn boss_waves_schedule_exactly_one_boss() {
        let mut system = WaveScheduling::new(Config::new(5));
        let mut out = Vec::new();
        system.handle(&[started(10), advanced(10_000)], &mut out);
        assert_eq!(spawn_kinds(&out), vec![EnemyKind::Boss]);
    }

    #[test]
    fn completion_waits_for_the_field_to_clear() {
        let mut system = WaveScheduling::new(Config::new(1));
        let mut out = Vec::new();
        system.handle(&[started(1), advanced(60_000)], &mut out);
        assert_eq!(spawn_kinds(&out).len(), 10);

        let death = Event::EnemyDied {
            enemy: rampart_defence_core::EnemyId::new(0),
            kind: EnemyKind::Fast,
            reward: Gold::new(5),
            source: rampart_defence_core::TowerArchetype::Archer,
        };

        out.clear();
        for _ in 0..9 {
            system.handle(std::slice::from_ref(&death), &mut out);
        }
        assert!(out.is_empty(), "nine deaths leave one enemy alive");

        system.handle(std::slice::from_ref(&death), &mut out);
        assert_eq!(out, vec![Command::CompleteWave]);

        out.clear();
        system.handle(std::slice::from_ref(&death), &mut out);
        assert!(out.is_empty(), "completion is emitted exactly once");
    }

    #[test]
    fn summoned_children_extend_the_wave() {
        let mut system = WaveScheduling::new(Config::new(1));
        let mut out = Vec::new();
        system.handle(&[started(1), advanced(60_000)], &mut out);

        let child = Event::EnemySpawned {
            enemy: rampart_defence_core::EnemyId::new(50),
            kind: EnemyKind::Fast,
            summoned: true,
        };
        let death = Event::EnemyDied {
            enemy: rampart_defence_core::EnemyId::new(0),
            kind: EnemyKind::Fast,
            reward: Gold::new(5),
            source: rampart_defence_core::TowerArchetype::Archer,
        };

        out.clear();
        system.handle(std::slice::from_ref(&child), &mut out);
        for _ in 0..10 {
            system.handle(std::slice::from_ref(&death), &mut out);
        }
        assert!(out.is_empty(), "the child still holds the wave open");

        system.handle(std::slice::from_ref(&death), &mut out);
        assert_eq!(out, vec![Command::CompleteWave]);
    }

    #[test]
    fn identical_seeds_reproduce_identical_picks() {
        let run = |seed: u64| -> Vec<EnemyKind> {
            let mut system = WaveScheduling::new(Config::new(seed));
            let mut out = Vec::new();
            system.handle(&[started(16), advanced(120_000)], &mut out);
            spawn_kinds(&out)
        };
        assert_eq!(run(42), run(42));
    }

    #[test]
    fn the_extra_pool_interval_is_floored() {
        assert_eq!(
            extra_interval(Duration::from_millis(600)),
            Duration::from_millis(360)
        );
        assert_eq!(
            extra_interval(Duration::from_millis(100)),
            Duration::from_millis(EXTRA_POOL_INTERVAL_FLOOR_MS)
        );
    }
}

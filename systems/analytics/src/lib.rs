#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic per-wave statistics recording.
//!
//! Folds the world's event feed into one [`WaveStats`] accumulator per wave,
//! finalizes it into an immutable [`WaveReport`] the moment the wave
//! completes, and republishes the record as [`Event::ReportPublished`] for
//! the report overlay. The accumulator is discarded afterwards; only the
//! last finalized report is retained.

use std::time::Duration;

use rampart_defence_core::{
    ArchetypeDamage, ArchetypeKills, BossReport, DamageReport, EnemyKind, Event, GoldReport,
    KillReport, SummonerReport, TowerArchetype, WaveNumber, WaveReport,
};

/// Pure system that aggregates one report record per wave.
#[derive(Debug, Default)]
pub struct Analytics {
    last_report: Option<WaveReport>,
    active: Option<WaveStats>,
}

impl Analytics {
    /// Creates a new analytics system with no recorded waves.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the most recently finalized wave report, if any.
    #[must_use]
    pub fn last_report(&self) -> Option<&WaveReport> {
        self.last_report.as_ref()
    }

    /// Consumes world events and republishes finalized wave reports.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Event>) {
        for event in events {
            match event {
                Event::WaveStarted { wave, gold, .. } => {
                    self.active = Some(WaveStats::begin(*wave, gold.get()));
                }
                Event::SessionReset => {
                    self.active = None;
                    self.last_report = None;
                }
                Event::GameOver { .. } => self.active = None,
                Event::WaveCompleted { bonus, .. } => {
                    if let Some(mut stats) = self.active.take() {
                        stats.gold_bonus = bonus.get();
                        let report = stats.finalize();
                        self.last_report = Some(report.clone());
                        out.push(Event::ReportPublished { report });
                    }
                }
                other => {
                    if let Some(stats) = self.active.as_mut() {
                        stats.observe(other);
                    }
                }
            }
        }
    }
}

/// Mutable per-wave counters, created at wave start and finalized at clear.
#[derive(Debug)]
struct WaveStats {
    wave: WaveNumber,
    elapsed: Duration,
    gold_start: u64,
    gold_kills: u64,
    gold_bonus: u64,
    spent: i64,
    leaks: u32,
    damage: ArchetypeDamage,
    kills: ArchetypeKills,
    boss: Option<BossStats>,
    summoner_spawned: u32,
    summoned_children: u32,
}

#[derive(Debug)]
struct BossStats {
    spawned_at: Duration,
    downed_at: Option<Duration>,
    armor_start: f64,
    armor_absorbed: f64,
    broken: bool,
}

impl WaveStats {
    fn begin(wave: WaveNumber, gold_start: u64) -> Self {
        Self {
            wave,
            elapsed: Duration::ZERO,
            gold_start,
            gold_kills: 0,
            gold_bonus: 0,
            spent: 0,
            leaks: 0,
            damage: ArchetypeDamage::default(),
            kills: ArchetypeKills::default(),
            boss: None,
            summoner_spawned: 0,
            summoned_children: 0,
        }
    }

    fn observe(&mut self, event: &Event) {
        match event {
            Event::TimeAdvanced { dt } => {
                self.elapsed = self.elapsed.saturating_add(*dt);
            }
            Event::EnemySpawned { kind, summoned, .. } => {
                if *summoned {
                    self.summoned_children += 1;
                } else if *kind == EnemyKind::Summoner {
                    self.summoner_spawned += 1;
                }
            }
            Event::BossSpawned { armor, .. } => {
                self.boss = Some(BossStats {
                    spawned_at: self.elapsed,
                    downed_at: None,
                    armor_start: f64::from(*armor),
                    armor_absorbed: 0.0,
                    broken: false,
                });
            }
            Event::DamageDealt {
                source, amount, absorbed, ..
            } => {
                self.credit_damage(*source, f64::from(*amount));
                if let Some(boss) = self.boss.as_mut() {
                    boss.armor_absorbed += f64::from(*absorbed);
                }
            }
            Event::BossArmorBroken { .. } => {
                if let Some(boss) = self.boss.as_mut() {
                    boss.broken = true;
                }
            }
            Event::EnemyDied {
                kind, reward, source, ..
            } => {
                self.gold_kills += reward.get();
                self.credit_kill(*source);
                if *kind == EnemyKind::Boss {
                    if let Some(boss) = self.boss.as_mut() {
                        boss.downed_at = Some(self.elapsed);
                    }
                }
            }
            Event::EnemyLeaked { kind, .. } => {
                self.leaks += 1;
                if *kind == EnemyKind::Boss {
                    if let Some(boss) = self.boss.as_mut() {
                        boss.downed_at = Some(self.elapsed);
                    }
                }
            }
            Event::TowerPlaced { cost, .. } | Event::TowerUpgraded { cost, .. } => {
                self.spent += cost.get() as i64;
            }
            Event::TowerSold { refund, .. } => {
                self.spent -= refund.get() as i64;
            }
            _ => {}
        }
    }

    fn credit_damage(&mut self, source: TowerArchetype, amount: f64) {
        match source {
            TowerArchetype::Archer => self.damage.archer += amount,
            TowerArchetype::Cannon => self.damage.cannon += amount,
            TowerArchetype::Mage => self.damage.mage += amount,
        }
    }

    fn credit_kill(&mut self, source: TowerArchetype) {
        match source {
            TowerArchetype::Archer => self.kills.archer += 1,
            TowerArchetype::Cannon => self.kills.cannon += 1,
            TowerArchetype::Mage => self.kills.mage += 1,
        }
    }

    fn finalize(self) -> WaveReport {
        let damage_total = self.damage.archer + self.damage.cannon + self.damage.mage;
        let kill_total = self.kills.archer + self.kills.cannon + self.kills.mage;
        let net = self.gold_kills as i64 + self.gold_bonus as i64 - self.spent;
        WaveReport {
            wave: self.wave.get(),
            duration_seconds: self.elapsed.as_secs_f64(),
            gold: GoldReport {
                start: self.gold_start,
                kills: self.gold_kills,
                bonus: self.gold_bonus,
                spent: self.spent,
                net,
            },
            leaks: self.leaks,
            damage: DamageReport {
                total: damage_total,
                per_archetype: self.damage,
            },
            kills: KillReport {
                total: kill_total,
                per_archetype: self.kills,
            },
            boss: self.boss.map(|boss| {
                let downed_at = boss.downed_at.unwrap_or(self.elapsed);
                BossReport {
                    spawn_time_ms: boss.spawned_at.as_secs_f64() * 1_000.0,
                    time_to_kill_seconds: downed_at
                        .saturating_sub(boss.spawned_at)
                        .as_secs_f64(),
                    armor_start: boss.armor_start,
                    armor_end: (boss.armor_start - boss.armor_absorbed).max(0.0),
                    broken: boss.broken,
                }
            }),
            summoner: SummonerReport {
                spawned: self.summoner_spawned,
                summoned_children: self.summoned_children,
            },
        }
    }
}

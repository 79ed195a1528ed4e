#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rampart Defence.
//!
//! The world owns every entity collection and all session counters. Adapters
//! and systems mutate it exclusively through [`apply`], which executes one
//! [`Command`] deterministically and appends the resulting [`Event`] values
//! to the caller's buffer. Read access goes through the [`query`] module,
//! which hands out immutable snapshots captured after a step completes.

use std::time::Duration;

use rampart_defence_core::{
    Command, CommandError, EnemyId, EnemyKind, Event, GameSpeed, Gold, PlacementError,
    ProjectileId, TowerArchetype, TowerId, Viewport, WaveComposition, WaveNumber, WorldPoint,
    MAX_TOWER_LEVEL, STARTING_HEALTH, WELCOME_BANNER,
};
use rampart_defence_system_status::StatusState;

mod combat;
mod economy;
mod factory;
mod layout;
mod towers;

pub use layout::Layout;

use economy::Ledger;
use towers::TowerRegistry;

/// Window within which a second sell action confirms the sale.
const SELL_CONFIRM_WINDOW: Duration = Duration::from_millis(1_600);

/// Radius within which a pointer selects an occupied slot, before scaling.
const SELECT_RADIUS: f32 = 36.0;

/// Travel budget granted to projectiles as a multiple of the firing range.
const PROJECTILE_TRAVEL_MARGIN: f32 = 1.6;

/// Health deducted from the player for every leaked enemy.
const LEAK_HEALTH_COST: u32 = 1;

/// Viewport assumed until the presentation layer reports a real one.
const DEFAULT_VIEWPORT: Viewport = Viewport::new(960.0, 640.0);

/// Represents the authoritative Rampart Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    pub(crate) layout: Layout,
    pub(crate) slots: Vec<Slot>,
    pub(crate) clock: Duration,
    pub(crate) speed: GameSpeed,
    pub(crate) report_open: bool,
    pub(crate) game_over: bool,
    pub(crate) auto_start: bool,
    pub(crate) health: u32,
    pub(crate) ledger: Ledger,
    pub(crate) wave: WaveNumber,
    pub(crate) wave_active: bool,
    pub(crate) wave_total: u32,
    pub(crate) wave_resolved: u32,
    pub(crate) enemies: Vec<Enemy>,
    pub(crate) towers: TowerRegistry,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) selected: Option<TowerId>,
    pub(crate) next_enemy_id: u32,
    pub(crate) next_projectile_id: u32,
}

impl World {
    /// Creates a new Rampart Defence world ready for simulation.
    #[must_use]
    pub fn new() -> Self {
        let layout = Layout::for_viewport(DEFAULT_VIEWPORT);
        let slots = layout
            .slot_positions()
            .iter()
            .map(|&position| Slot {
                position,
                occupant: None,
            })
            .collect();
        Self {
            banner: WELCOME_BANNER,
            layout,
            slots,
            clock: Duration::ZERO,
            speed: GameSpeed::Normal,
            report_open: false,
            game_over: false,
            auto_start: false,
            health: STARTING_HEALTH,
            ledger: Ledger::new(),
            wave: WaveNumber::default(),
            wave_active: false,
            wave_total: 0,
            wave_resolved: 0,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            selected: None,
            next_enemy_id: 0,
            next_projectile_id: 0,
        }
    }

    fn reset(&mut self) {
        self.clock = Duration::ZERO;
        self.speed = GameSpeed::Normal;
        self.report_open = false;
        self.game_over = false;
        self.auto_start = false;
        self.health = STARTING_HEALTH;
        self.ledger = Ledger::new();
        self.wave = WaveNumber::default();
        self.wave_active = false;
        self.wave_total = 0;
        self.wave_resolved = 0;
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.selected = None;
        self.next_enemy_id = 0;
        self.next_projectile_id = 0;
        for slot in &mut self.slots {
            slot.occupant = None;
        }
    }

    fn begin_next_wave(&mut self, out_events: &mut Vec<Event>) {
        self.wave = self.wave.next();
        let composition = WaveComposition::for_wave(self.wave);
        self.wave_active = true;
        self.wave_total = composition.total();
        self.wave_resolved = 0;
        out_events.push(Event::WaveStarted {
            wave: self.wave,
            is_boss: composition.is_boss(),
            gold: self.ledger.balance(),
        });
    }

    fn spawn_wave_enemy(&mut self, kind: EnemyKind, out_events: &mut Vec<Event>) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let enemy = factory::build_enemy(id, kind, self.wave, self.layout.spawn_point(), self.clock, false);
        let armor = enemy.armor.as_ref().map_or(0.0, |armor| armor.hp);
        self.enemies.push(enemy);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            summoned: false,
        });
        if kind == EnemyKind::Boss {
            out_events.push(Event::BossSpawned { enemy: id, armor });
        }
    }

    fn spawn_summoned_child(
        &mut self,
        origin: WorldPoint,
        path_index: usize,
        distance: f32,
        out_events: &mut Vec<Event>,
    ) {
        let id = EnemyId::new(self.next_enemy_id);
        self.next_enemy_id = self.next_enemy_id.wrapping_add(1);
        let mut enemy = factory::build_enemy(id, EnemyKind::Fast, self.wave, origin, self.clock, true);
        enemy.path_index = path_index;
        enemy.distance = distance;
        self.enemies.push(enemy);
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind: EnemyKind::Fast,
            summoned: true,
        });
    }

    /// Removes a dead enemy, crediting its reward and attributing the kill.
    pub(crate) fn settle_enemy_death(
        &mut self,
        id: EnemyId,
        source: TowerArchetype,
        out_events: &mut Vec<Event>,
    ) {
        let Some(index) = self.enemies.iter().position(|enemy| enemy.id == id) else {
            return;
        };
        let enemy = self.enemies.remove(index);
        self.ledger.credit(enemy.reward);
        if !enemy.summoned {
            self.wave_resolved = self.wave_resolved.saturating_add(1);
        }
        out_events.push(Event::EnemyDied {
            enemy: enemy.id,
            kind: enemy.kind,
            reward: enemy.reward,
            source,
        });
    }

    fn settle_leak(&mut self, id: EnemyId, out_events: &mut Vec<Event>) {
        let Some(index) = self.enemies.iter().position(|enemy| enemy.id == id) else {
            return;
        };
        let enemy = self.enemies.remove(index);
        self.health = self.health.saturating_sub(LEAK_HEALTH_COST);
        if !enemy.summoned {
            self.wave_resolved = self.wave_resolved.saturating_add(1);
        }
        out_events.push(Event::EnemyLeaked {
            enemy: enemy.id,
            kind: enemy.kind,
            health_remaining: self.health,
        });
        if self.health == 0 && !self.game_over {
            self.game_over = true;
            out_events.push(Event::GameOver { wave: self.wave });
        }
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.game_over || self.report_open {
            return;
        }

        let scaled = dt * self.speed.multiplier();
        let begin = self.clock;
        self.clock = begin.saturating_add(scaled);
        out_events.push(Event::TimeAdvanced { dt: scaled });

        self.tick_statuses(begin, scaled, out_events);
        self.move_enemies(scaled, out_events);
        self.drive_summoners(out_events);
        self.cool_towers(scaled);
        combat::advance_projectiles(self, scaled, out_events);
    }

    fn tick_statuses(&mut self, begin: Duration, dt: Duration, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let mut burn_deaths = Vec::new();
        for enemy in &mut self.enemies {
            let burn = enemy.status.burn_tick(begin, dt);
            // Intact boss armor blocks burn ticks outright; the damage is
            // computed but neither applied nor attributed.
            if burn > 0.0 && !enemy.has_live_armor() {
                enemy.hp -= burn;
                out_events.push(Event::DamageDealt {
                    enemy: enemy.id,
                    source: TowerArchetype::Mage,
                    amount: burn,
                    absorbed: 0.0,
                });
                if enemy.hp <= 0.0 {
                    burn_deaths.push(enemy.id);
                }
            }
            enemy.status.expire(now);
        }
        for id in burn_deaths {
            self.settle_enemy_death(id, TowerArchetype::Mage, out_events);
        }
    }

    fn move_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let waypoints: Vec<WorldPoint> = self.layout.waypoints().to_vec();
        let now = self.clock;
        let mut leaked = Vec::new();

        for enemy in &mut self.enemies {
            let factor = enemy.status.speed_factor(now);
            let mut budget = enemy.speed * factor * dt.as_secs_f32();
            while budget > 0.0 {
                let Some(&target) = waypoints.get(enemy.path_index) else {
                    leaked.push(enemy.id);
                    break;
                };
                let gap = enemy.position.distance_to(target);
                if gap <= budget {
                    enemy.position = target;
                    enemy.distance += gap;
                    budget -= gap;
                    enemy.path_index += 1;
                    if enemy.path_index >= waypoints.len() {
                        leaked.push(enemy.id);
                        break;
                    }
                } else {
                    enemy.position = enemy.position.stepped_toward(target, budget);
                    enemy.distance += budget;
                    budget = 0.0;
                }
            }
        }

        for id in leaked {
            self.settle_leak(id, out_events);
        }
    }

    fn drive_summoners(&mut self, out_events: &mut Vec<Event>) {
        let now = self.clock;
        let mut requests = Vec::new();
        for enemy in &mut self.enemies {
            let Some(interval) = enemy.kind.summon_interval() else {
                continue;
            };
            if let Some(deadline) = enemy.next_summon_at {
                if deadline <= now {
                    requests.push((enemy.position, enemy.path_index, enemy.distance));
                    enemy.next_summon_at = Some(deadline.saturating_add(interval));
                }
            }
        }
        for (origin, path_index, distance) in requests {
            self.spawn_summoned_child(origin, path_index, distance, out_events);
        }
    }

    fn cool_towers(&mut self, dt: Duration) {
        for tower in self.towers.iter_mut() {
            tower.cooldown = tower.cooldown.saturating_sub(dt);
        }
    }

    fn reconfigure_viewport(&mut self, viewport: Viewport, out_events: &mut Vec<Event>) {
        let previous = self.layout.viewport();
        self.layout = Layout::for_viewport(viewport);
        let scale = self.layout.scale();

        let positions: Vec<WorldPoint> = self.layout.slot_positions().to_vec();
        for (slot, position) in self.slots.iter_mut().zip(positions) {
            slot.position = position;
        }

        for tower in self.towers.iter_mut() {
            if let Some(slot) = self.slots.get(tower.slot.get() as usize) {
                tower.position = slot.position;
            }
            tower.restat(scale);
        }

        // Entities in flight keep their relative placement across the resize.
        let ratio_x = viewport.width() / previous.width();
        let ratio_y = viewport.height() / previous.height();
        for enemy in &mut self.enemies {
            enemy.position = WorldPoint::new(enemy.position.x() * ratio_x, enemy.position.y() * ratio_y);
        }
        for projectile in &mut self.projectiles {
            projectile.position =
                WorldPoint::new(projectile.position.x() * ratio_x, projectile.position.y() * ratio_y);
        }

        out_events.push(Event::ViewportChanged { viewport, scale });
    }

    fn reject_when_over(&self, out_events: &mut Vec<Event>) -> bool {
        if self.game_over {
            out_events.push(Event::CommandRejected {
                reason: CommandError::SessionOver,
            });
            return true;
        }
        false
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureViewport { viewport } => {
            world.reconfigure_viewport(viewport, out_events);
        }
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::StartWave => {
            if world.reject_when_over(out_events) {
                return;
            }
            if world.wave_active || world.report_open {
                out_events.push(Event::CommandRejected {
                    reason: CommandError::WaveAlreadyActive,
                });
                return;
            }
            world.begin_next_wave(out_events);
        }
        Command::SpawnEnemy { kind } => {
            if world.game_over || !world.wave_active {
                return;
            }
            world.spawn_wave_enemy(kind, out_events);
        }
        Command::CompleteWave => {
            if world.game_over || !world.wave_active || !world.enemies.is_empty() {
                return;
            }
            let bonus = economy::wave_bonus(world.wave);
            world.ledger.credit(bonus);
            world.wave_active = false;
            world.report_open = true;
            out_events.push(Event::WaveCompleted {
                wave: world.wave,
                bonus,
            });
        }
        Command::FireProjectile { tower, target } => {
            if world.game_over || world.report_open {
                return;
            }
            let Some((archetype, position, stats)) = world
                .towers
                .get(tower)
                .filter(|state| state.ready())
                .map(|state| (state.archetype, state.position, state.stats))
            else {
                return;
            };
            let Some(aim) = world
                .enemies
                .iter()
                .find(|enemy| enemy.id == target)
                .map(|enemy| enemy.position)
            else {
                return;
            };
            if aim.distance_to(position) > stats.range {
                return;
            }

            let id = ProjectileId::new(world.next_projectile_id);
            world.next_projectile_id = world.next_projectile_id.wrapping_add(1);
            let mut projectile = Projectile {
                id,
                position,
                heading: (1.0, 0.0),
                speed: stats.projectile_speed,
                damage: stats.damage,
                area: stats.area,
                source: archetype,
                applies_weaken: archetype.applies_weaken(),
                applies_burn: archetype.applies_burn(),
                target: Some(target),
                traveled: 0.0,
                max_travel: stats.range * PROJECTILE_TRAVEL_MARGIN,
            };
            projectile.aim_at(aim);
            world.projectiles.push(projectile);

            if let Some(state) = world.towers.get_mut(tower) {
                state.cooldown = state.stats.fire_interval;
            }
            out_events.push(Event::ProjectileFired {
                projectile: id,
                tower,
                archetype,
            });
        }
        Command::PlaceTower { archetype, slot } => {
            if world.reject_when_over(out_events) {
                return;
            }
            let Some(state) = world.slots.get(slot.get() as usize) else {
                out_events.push(Event::TowerPlacementRejected {
                    archetype,
                    slot,
                    reason: PlacementError::UnknownSlot,
                });
                return;
            };
            if state.occupant.is_some() {
                out_events.push(Event::TowerPlacementRejected {
                    archetype,
                    slot,
                    reason: PlacementError::SlotOccupied,
                });
                return;
            }
            let position = state.position;
            if !world.ledger.try_debit(archetype.cost()) {
                out_events.push(Event::TowerPlacementRejected {
                    archetype,
                    slot,
                    reason: PlacementError::InsufficientGold,
                });
                return;
            }
            let id = world
                .towers
                .insert(archetype, slot, position, world.layout.scale());
            if let Some(state) = world.slots.get_mut(slot.get() as usize) {
                state.occupant = Some(id);
            }
            out_events.push(Event::TowerPlaced {
                tower: id,
                archetype,
                slot,
                cost: archetype.cost(),
            });
        }
        Command::SelectTower { position } => {
            if world.reject_when_over(out_events) {
                return;
            }
            let radius = SELECT_RADIUS * world.layout.scale().factor();
            let mut best: Option<(f32, TowerId)> = None;
            for slot in &world.slots {
                let Some(tower) = slot.occupant else {
                    continue;
                };
                let distance = slot.position.distance_to(position);
                if distance > radius {
                    continue;
                }
                match best {
                    Some((closest, _)) if distance >= closest => {}
                    _ => best = Some((distance, tower)),
                }
            }
            world.selected = best.map(|(_, id)| id);
        }
        Command::ToggleTargetMode => {
            if world.reject_when_over(out_events) {
                return;
            }
            let Some(id) = world.selected else {
                out_events.push(Event::CommandRejected {
                    reason: CommandError::NoSelection,
                });
                return;
            };
            if let Some(tower) = world.towers.get_mut(id) {
                tower.target_mode = tower.target_mode.toggled();
                out_events.push(Event::TargetModeChanged {
                    tower: id,
                    mode: tower.target_mode,
                });
            }
        }
        Command::UpgradeSelected => {
            if world.reject_when_over(out_events) {
                return;
            }
            let Some(id) = world.selected else {
                out_events.push(Event::CommandRejected {
                    reason: CommandError::NoSelection,
                });
                return;
            };
            let Some((archetype, level)) = world
                .towers
                .get(id)
                .map(|tower| (tower.archetype, tower.level))
            else {
                world.selected = None;
                out_events.push(Event::CommandRejected {
                    reason: CommandError::NoSelection,
                });
                return;
            };
            if level >= MAX_TOWER_LEVEL {
                out_events.push(Event::CommandRejected {
                    reason: CommandError::TowerAtMaxLevel,
                });
                return;
            }
            let cost = economy::upgrade_cost(archetype, level);
            if !world.ledger.try_debit(cost) {
                out_events.push(Event::CommandRejected {
                    reason: CommandError::InsufficientGold,
                });
                return;
            }
            let scale = world.layout.scale();
            if let Some(tower) = world.towers.get_mut(id) {
                tower.level += 1;
                tower.spent = tower.spent.saturating_add(cost);
                tower.restat(scale);
                out_events.push(Event::TowerUpgraded {
                    tower: id,
                    level: tower.level,
                    cost,
                });
            }
        }
        Command::SellSelected => {
            if world.reject_when_over(out_events) {
                return;
            }
            let Some(id) = world.selected else {
                out_events.push(Event::CommandRejected {
                    reason: CommandError::NoSelection,
                });
                return;
            };
            let now = world.clock;
            let armed = world
                .towers
                .get(id)
                .and_then(|tower| tower.sell_armed_until)
                .is_some_and(|deadline| now < deadline);
            if armed {
                if let Some(state) = world.towers.remove(id) {
                    let refund = economy::sell_refund(state.spent);
                    world.ledger.credit(refund);
                    if let Some(slot) = world.slots.get_mut(state.slot.get() as usize) {
                        slot.occupant = None;
                    }
                    world.selected = None;
                    out_events.push(Event::TowerSold {
                        tower: id,
                        slot: state.slot,
                        refund,
                    });
                }
            } else if let Some(tower) = world.towers.get_mut(id) {
                tower.sell_armed_until = Some(now.saturating_add(SELL_CONFIRM_WINDOW));
                out_events.push(Event::TowerSellArmed { tower: id });
            } else {
                world.selected = None;
                out_events.push(Event::CommandRejected {
                    reason: CommandError::NoSelection,
                });
            }
        }
        Command::ToggleAutoStart => {
            if world.reject_when_over(out_events) {
                return;
            }
            world.auto_start = !world.auto_start;
            out_events.push(Event::AutoStartToggled {
                enabled: world.auto_start,
            });
        }
        Command::CycleSpeed => {
            if world.reject_when_over(out_events) {
                return;
            }
            world.speed = world.speed.cycled();
            out_events.push(Event::SpeedChanged { speed: world.speed });
        }
        Command::CloseReport => {
            if !world.report_open {
                return;
            }
            world.report_open = false;
            out_events.push(Event::ReportClosed);
            if world.auto_start && !world.game_over {
                world.begin_next_wave(out_events);
            }
        }
        Command::Restart => {
            world.reset();
            out_events.push(Event::SessionReset);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{economy, Layout, World};
    use rampart_defence_core::{
        ArmorSnapshot, EnemySnapshot, EnemyView, GameSpeed, HudView, ProjectileSnapshot,
        SessionPhase, SlotId, SlotSnapshot, TowerId, TowerInspector, TowerSnapshot, TowerView,
        UpgradeQuote, WaveProgress, MAX_TOWER_LEVEL,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Lifecycle phase the session is currently in.
    #[must_use]
    pub fn session_phase(world: &World) -> SessionPhase {
        if world.game_over {
            SessionPhase::GameOver
        } else if world.report_open {
            SessionPhase::ReportOpen
        } else {
            SessionPhase::Playing
        }
    }

    /// Captures the HUD fields surfaced by the presentation layer.
    #[must_use]
    pub fn hud(world: &World) -> HudView {
        let progress = if world.report_open {
            WaveProgress::ReportOpen
        } else if world.wave_active {
            WaveProgress::Active {
                killed: world.wave_resolved,
                total: world.wave_total,
            }
        } else {
            WaveProgress::Idle
        };
        HudView {
            health: world.health,
            gold: world.ledger.balance(),
            wave: world.wave,
            progress,
        }
    }

    /// Captures a read-only view of the live enemies.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let now = world.clock;
        let snapshots = world
            .enemies
            .iter()
            .map(|enemy| EnemySnapshot {
                id: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
                hp: enemy.hp,
                max_hp: enemy.max_hp,
                armor: enemy.armor.as_ref().map(|armor| ArmorSnapshot {
                    hp: armor.hp,
                    max: armor.max,
                    broken: armor.broken,
                }),
                distance: enemy.distance,
                slowed: enemy.status.is_slowed(now),
                weakened: enemy.status.is_weakened(now),
                burning: enemy.status.is_burning(now),
            })
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        let snapshots = world
            .towers
            .iter()
            .map(|tower| TowerSnapshot {
                id: tower.id,
                archetype: tower.archetype,
                slot: tower.slot,
                position: tower.position,
                level: tower.level,
                damage: tower.stats.damage,
                range: tower.stats.range,
                area: tower.stats.area,
                ready: tower.ready(),
                target_mode: tower.target_mode,
            })
            .collect();
        TowerView::from_snapshots(snapshots)
    }

    /// Captures the projectiles currently in flight for rendering.
    #[must_use]
    pub fn projectile_view(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| ProjectileSnapshot {
                id: projectile.id,
                position: projectile.position,
                archetype: projectile.source,
            })
            .collect()
    }

    /// Captures every placement slot and its occupancy.
    #[must_use]
    pub fn slot_view(world: &World) -> Vec<SlotSnapshot> {
        world
            .slots
            .iter()
            .enumerate()
            .map(|(index, slot)| SlotSnapshot {
                id: SlotId::new(index as u32),
                position: slot.position,
                occupant: slot.occupant,
            })
            .collect()
    }

    /// Provides read-only access to the level geometry.
    #[must_use]
    pub fn layout(world: &World) -> &Layout {
        &world.layout
    }

    /// Identifier of the currently selected tower, if any.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerId> {
        world.selected
    }

    /// Inspector fields for the selected tower, if any.
    #[must_use]
    pub fn tower_inspector(world: &World) -> Option<TowerInspector> {
        let id = world.selected?;
        let tower = world.towers.get(id)?;
        let upgrade = if tower.level >= MAX_TOWER_LEVEL {
            UpgradeQuote::Maxed
        } else {
            UpgradeQuote::Available {
                cost: economy::upgrade_cost(tower.archetype, tower.level),
            }
        };
        Some(TowerInspector {
            tower: id,
            level: tower.level,
            upgrade,
            sell_value: economy::sell_refund(tower.spent),
            target_mode: tower.target_mode,
        })
    }

    /// Active global speed setting.
    #[must_use]
    pub fn game_speed(world: &World) -> GameSpeed {
        world.speed
    }

    /// Whether the next wave starts automatically after a report closes.
    #[must_use]
    pub fn auto_start_enabled(world: &World) -> bool {
        world.auto_start
    }

    /// Simulation clock accumulated across every scaled step.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}

/// Test and tooling hooks that bypass the command surface.
#[cfg(any(test, feature = "wave_scaffolding"))]
pub mod scaffold {
    use super::World;
    use rampart_defence_core::{Gold, WaveComposition, WaveNumber};

    /// Forces the session into an active wave with the provided index.
    pub fn begin_wave_at(world: &mut World, wave: WaveNumber) {
        world.wave = wave;
        world.wave_active = true;
        let composition = WaveComposition::for_wave(wave);
        world.wave_total = composition.total();
        world.wave_resolved = 0;
    }

    /// Replaces the ledger balance outright.
    pub fn set_gold(world: &mut World, amount: Gold) {
        world.ledger.force_balance(amount);
    }

    /// Replaces the player health outright.
    pub fn set_health(world: &mut World, health: u32) {
        world.health = health;
    }
}

/// Tower placement slot tracked by the world.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Slot {
    pub(crate) position: WorldPoint,
    pub(crate) occupant: Option<TowerId>,
}

/// Secondary hit-point pool carried by sufficiently advanced bosses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Armor {
    pub(crate) hp: f32,
    pub(crate) max: f32,
    pub(crate) broken: bool,
}

/// Live enemy tracked by the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: WorldPoint,
    pub(crate) hp: f32,
    pub(crate) max_hp: f32,
    pub(crate) armor: Option<Armor>,
    pub(crate) speed: f32,
    pub(crate) path_index: usize,
    pub(crate) distance: f32,
    pub(crate) reward: Gold,
    pub(crate) status: StatusState,
    pub(crate) summoned: bool,
    pub(crate) next_summon_at: Option<Duration>,
}

impl Enemy {
    /// Reports whether an unbroken armor pool still absorbs damage.
    pub(crate) fn has_live_armor(&self) -> bool {
        matches!(&self.armor, Some(armor) if armor.hp > 0.0)
    }
}

/// Projectile in flight tracked by the world.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: WorldPoint,
    pub(crate) heading: (f32, f32),
    pub(crate) speed: f32,
    pub(crate) damage: f32,
    pub(crate) area: f32,
    pub(crate) source: TowerArchetype,
    pub(crate) applies_weaken: bool,
    pub(crate) applies_burn: bool,
    pub(crate) target: Option<EnemyId>,
    pub(crate) traveled: f32,
    pub(crate) max_travel: f32,
}

impl Projectile {
    /// Points the heading at the provided position, keeping it unit-length.
    pub(crate) fn aim_at(&mut self, target: WorldPoint) {
        let dx = target.x() - self.position.x();
        let dy = target.y() - self.position.y();
        let length = (dx * dx + dy * dy).sqrt();
        if length > f32::EPSILON {
            self.heading = (dx / length, dy / length);
        }
    }

    /// Position after advancing the provided distance along the heading.
    pub(crate) fn advanced(&self, distance: f32) -> WorldPoint {
        WorldPoint::new(
            self.position.x() + self.heading.0 * distance,
            self.position.y() + self.heading.1 * distance,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_defence_core::{
        HudView, SessionPhase, SlotId, TargetMode, UpgradeQuote, WaveProgress,
    };

    fn tick(world: &mut World, millis: u64) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::Tick {
                dt: Duration::from_millis(millis),
            },
            &mut events,
        );
        events
    }

    fn place(world: &mut World, archetype: TowerArchetype, slot: u32) -> Vec<Event> {
        let mut events = Vec::new();
        apply(
            world,
            Command::PlaceTower {
                archetype,
                slot: SlotId::new(slot),
            },
            &mut events,
        );
        events
    }

    fn select_slot(world: &mut World, slot: u32) {
        let position = world.slots[slot as usize].position;
        let mut events = Vec::new();
        apply(world, Command::SelectTower { position }, &mut events);
    }

    #[test]
    fn fresh_session_matches_documented_initial_state() {
        let world = World::new();
        let hud = query::hud(&world);
        assert_eq!(
            hud,
            HudView {
                health: STARTING_HEALTH,
                gold: Gold::new(120),
                wave: WaveNumber::new(0),
                progress: WaveProgress::Idle,
            }
        );
        assert_eq!(query::session_phase(&world), SessionPhase::Playing);
        assert!(query::enemy_view(&world).is_empty());
    }

    #[test]
    fn placement_with_insufficient_gold_mutates_nothing() {
        let mut world = World::new();
        scaffold::set_gold(&mut world, Gold::new(25));

        let events = place(&mut world, TowerArchetype::Archer, 2);

        assert_eq!(
            events,
            vec![Event::TowerPlacementRejected {
                archetype: TowerArchetype::Archer,
                slot: SlotId::new(2),
                reason: PlacementError::InsufficientGold,
            }]
        );
        assert_eq!(query::hud(&world).gold, Gold::new(25));
        assert!(world.slots[2].occupant.is_none());
    }

    #[test]
    fn placement_into_an_occupied_slot_is_rejected() {
        let mut world = World::new();
        let _ = place(&mut world, TowerArchetype::Archer, 0);
        let events = place(&mut world, TowerArchetype::Mage, 0);

        assert!(matches!(
            events.as_slice(),
            [Event::TowerPlacementRejected {
                reason: PlacementError::SlotOccupied,
                ..
            }]
        ));
        assert_eq!(query::hud(&world).gold, Gold::new(120 - 30));
    }

    #[test]
    fn selling_requires_a_confirming_action_within_the_window() {
        let mut world = World::new();
        scaffold::set_gold(&mut world, Gold::new(100));
        let _ = place(&mut world, TowerArchetype::Archer, 1);
        select_slot(&mut world, 1);

        // Bring cumulative spending to a round figure for the refund check.
        scaffold::set_gold(&mut world, Gold::new(0));
        if let Some(id) = query::selected_tower(&world) {
            if let Some(tower) = world.towers.get_mut(id) {
                tower.spent = Gold::new(100);
            }
        }

        let mut events = Vec::new();
        apply(&mut world, Command::SellSelected, &mut events);
        assert!(matches!(events.as_slice(), [Event::TowerSellArmed { .. }]));
        assert!(world.slots[1].occupant.is_some());

        let _ = tick(&mut world, 800);
        events.clear();
        apply(&mut world, Command::SellSelected, &mut events);
        assert!(matches!(
            events.as_slice(),
            [Event::TowerSold {
                refund,
                ..
            }] if *refund == Gold::new(60)
        ));
        assert_eq!(query::hud(&world).gold, Gold::new(60));
        assert!(world.slots[1].occupant.is_none());
        assert!(query::selected_tower(&world).is_none());
    }

    #[test]
    fn a_sell_action_after_the_window_rearms_instead_of_executing() {
        let mut world = World::new();
        let _ = place(&mut world, TowerArchetype::Archer, 1);
        select_slot(&mut world, 1);

        let mut events = Vec::new();
        apply(&mut world, Command::SellSelected, &mut events);
        assert!(matches!(events.as_slice(), [Event::TowerSellArmed { .. }]));

        let _ = tick(&mut world, 1_700);
        events.clear();
        apply(&mut world, Command::SellSelected, &mut events);
        assert!(matches!(events.as_slice(), [Event::TowerSellArmed { .. }]));
        assert!(world.slots[1].occupant.is_some());
    }

    #[test]
    fn upgrades_stop_at_the_maximum_level() {
        let mut world = World::new();
        scaffold::set_gold(&mut world, Gold::new(10_000));
        let _ = place(&mut world, TowerArchetype::Archer, 0);
        select_slot(&mut world, 0);

        for _ in 1..MAX_TOWER_LEVEL {
            let mut events = Vec::new();
            apply(&mut world, Command::UpgradeSelected, &mut events);
            assert!(matches!(events.as_slice(), [Event::TowerUpgraded { .. }]));
        }

        let gold_before = query::hud(&world).gold;
        let mut events = Vec::new();
        apply(&mut world, Command::UpgradeSelected, &mut events);
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: CommandError::TowerAtMaxLevel,
            }]
        );
        assert_eq!(query::hud(&world).gold, gold_before);

        let inspector = query::tower_inspector(&world).expect("selection active");
        assert_eq!(inspector.level, MAX_TOWER_LEVEL);
        assert_eq!(inspector.upgrade, UpgradeQuote::Maxed);
    }

    #[test]
    fn restart_restores_the_initial_session_state() {
        let mut world = World::new();
        let _ = place(&mut world, TowerArchetype::Cannon, 3);
        let mut events = Vec::new();
        apply(&mut world, Command::StartWave, &mut events);
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Tank,
            },
            &mut events,
        );
        apply(&mut world, Command::CycleSpeed, &mut events);
        let _ = tick(&mut world, 500);

        events.clear();
        apply(&mut world, Command::Restart, &mut events);
        assert_eq!(events, vec![Event::SessionReset]);

        let fresh = World::new();
        assert_eq!(query::hud(&world), query::hud(&fresh));
        assert!(query::enemy_view(&world).is_empty());
        assert!(query::projectile_view(&world).is_empty());
        assert!(query::tower_view(&world).into_vec().is_empty());
        assert_eq!(query::game_speed(&world), GameSpeed::Normal);
        assert_eq!(query::clock(&world), Duration::ZERO);
        assert!(world.slots.iter().all(|slot| slot.occupant.is_none()));
    }

    #[test]
    fn resize_preserves_occupancy_and_rescales_from_base_values() {
        let mut world = World::new();
        let _ = place(&mut world, TowerArchetype::Archer, 4);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::ConfigureViewport {
                viewport: Viewport::new(1_536.0, 1_024.0),
            },
            &mut events,
        );
        apply(
            &mut world,
            Command::ConfigureViewport {
                viewport: Viewport::new(1_536.0, 1_024.0),
            },
            &mut events,
        );

        let towers = query::tower_view(&world).into_vec();
        assert_eq!(towers.len(), 1);
        let tower = towers[0];
        assert_eq!(tower.slot, SlotId::new(4));
        assert_eq!(world.slots[4].occupant, Some(tower.id));
        assert_eq!(tower.position, world.slots[4].position);

        // 1536/960 = 1024/640 = 1.6; applying the resize twice must not
        // compound the scale.
        assert!((tower.range - 110.0 * 1.6).abs() < 1e-3);
    }

    #[test]
    fn leaks_deduct_health_and_terminate_the_session_at_zero() {
        let mut world = World::new();
        scaffold::begin_wave_at(&mut world, WaveNumber::new(1));
        scaffold::set_health(&mut world, 1);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Fast,
            },
            &mut events,
        );

        // March the enemy across the whole path.
        let mut saw_leak = false;
        let mut saw_game_over = false;
        for _ in 0..600 {
            let events = tick(&mut world, 100);
            for event in &events {
                match event {
                    Event::EnemyLeaked {
                        health_remaining, ..
                    } => {
                        saw_leak = true;
                        assert_eq!(*health_remaining, 0);
                    }
                    Event::GameOver { .. } => saw_game_over = true,
                    _ => {}
                }
            }
            if saw_game_over {
                break;
            }
        }

        assert!(saw_leak, "enemy should leak off the path end");
        assert!(saw_game_over, "leak at one health ends the session");
        assert_eq!(query::session_phase(&world), SessionPhase::GameOver);

        // Terminal state: the step is a no-op and commands are refused.
        let events = tick(&mut world, 100);
        assert!(events.is_empty());
        let mut events = Vec::new();
        apply(&mut world, Command::StartWave, &mut events);
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: CommandError::SessionOver,
            }]
        );
    }

    #[test]
    fn the_open_report_pauses_the_step_without_ending_the_session() {
        let mut world = World::new();
        scaffold::begin_wave_at(&mut world, WaveNumber::new(1));

        let mut events = Vec::new();
        apply(&mut world, Command::CompleteWave, &mut events);
        assert!(matches!(
            events.as_slice(),
            [Event::WaveCompleted { bonus, .. }] if *bonus == Gold::new(20)
        ));
        assert_eq!(query::session_phase(&world), SessionPhase::ReportOpen);
        assert_eq!(query::hud(&world).progress, WaveProgress::ReportOpen);

        let paused = tick(&mut world, 250);
        assert!(paused.is_empty());
        assert_eq!(query::clock(&world), Duration::ZERO);

        events.clear();
        apply(&mut world, Command::CloseReport, &mut events);
        assert_eq!(events, vec![Event::ReportClosed]);
        let resumed = tick(&mut world, 250);
        assert!(!resumed.is_empty());
    }

    #[test]
    fn closing_the_report_with_auto_start_begins_the_next_wave() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::ToggleAutoStart, &mut events);
        scaffold::begin_wave_at(&mut world, WaveNumber::new(2));
        apply(&mut world, Command::CompleteWave, &mut events);

        events.clear();
        apply(&mut world, Command::CloseReport, &mut events);
        assert!(matches!(
            events.as_slice(),
            [
                Event::ReportClosed,
                Event::WaveStarted { wave, .. },
            ] if wave.get() == 3
        ));
    }

    #[test]
    fn the_speed_multiplier_compresses_simulated_time() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::CycleSpeed, &mut events);
        assert_eq!(query::game_speed(&world), GameSpeed::Double);

        let events = tick(&mut world, 1_000);
        assert!(matches!(
            events.first(),
            Some(Event::TimeAdvanced { dt }) if *dt == Duration::from_secs(2)
        ));
        assert_eq!(query::clock(&world), Duration::from_secs(2));
    }

    #[test]
    fn firing_creates_a_projectile_and_resets_the_cooldown() {
        let mut world = World::new();
        scaffold::begin_wave_at(&mut world, WaveNumber::new(1));
        let _ = place(&mut world, TowerArchetype::Archer, 0);

        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Tank,
            },
            &mut events,
        );

        // Put the enemy inside range of the tower.
        let tower_position = world.towers.iter().next().expect("tower placed").position;
        world.enemies[0].position = tower_position;

        let tower_id = query::tower_view(&world).into_vec()[0].id;
        let enemy_id = world.enemies[0].id;

        events.clear();
        apply(
            &mut world,
            Command::FireProjectile {
                tower: tower_id,
                target: enemy_id,
            },
            &mut events,
        );
        assert!(matches!(events.as_slice(), [Event::ProjectileFired { .. }]));
        assert_eq!(query::projectile_view(&world).len(), 1);

        // A second fire request before the cooldown elapses is ignored.
        events.clear();
        apply(
            &mut world,
            Command::FireProjectile {
                tower: tower_id,
                target: enemy_id,
            },
            &mut events,
        );
        assert!(events.is_empty());
    }

    #[test]
    fn splash_impacts_damage_every_enemy_in_the_area() {
        let mut world = World::new();
        scaffold::begin_wave_at(&mut world, WaveNumber::new(1));
        let mut events = Vec::new();
        for _ in 0..3 {
            apply(
                &mut world,
                Command::SpawnEnemy {
                    kind: EnemyKind::Tank,
                },
                &mut events,
            );
        }

        // Park the projectile on top of the cluster; one substep triggers it.
        let cluster = world.enemies[0].position;
        world.projectiles.push(Projectile {
            id: ProjectileId::new(0),
            position: cluster,
            heading: (1.0, 0.0),
            speed: 1.0,
            damage: 10.0,
            area: TowerArchetype::Cannon.base_area(),
            source: TowerArchetype::Cannon,
            applies_weaken: false,
            applies_burn: false,
            target: None,
            traveled: 0.0,
            max_travel: 100.0,
        });

        let events = tick(&mut world, 16);
        let damaged = events
            .iter()
            .filter(|event| matches!(event, Event::DamageDealt { .. }))
            .count();
        assert_eq!(damaged, 3);
        assert!(world
            .enemies
            .iter()
            .all(|enemy| (enemy.max_hp - enemy.hp - 10.0).abs() < 1e-3));
    }

    #[test]
    fn intact_boss_armor_blocks_burn_ticks() {
        let mut world = World::new();
        scaffold::begin_wave_at(&mut world, WaveNumber::new(20));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Boss,
            },
            &mut events,
        );

        let max_hp = world.enemies[0].max_hp;
        let now = world.clock;
        world.enemies[0].status.apply_burn(max_hp, now);

        let events = tick(&mut world, 500);
        assert!(events
            .iter()
            .all(|event| !matches!(event, Event::DamageDealt { .. })));
        assert!((world.enemies[0].hp - max_hp).abs() < f32::EPSILON);

        // Once the armor is broken the same burn starts reducing hit points.
        if let Some(armor) = world.enemies[0].armor.as_mut() {
            armor.hp = 0.0;
            armor.broken = true;
        }
        let now = world.clock;
        world.enemies[0].status.apply_burn(max_hp, now);
        let events = tick(&mut world, 500);
        assert!(events
            .iter()
            .any(|event| matches!(event, Event::DamageDealt { source: TowerArchetype::Mage, .. })));
        assert!(world.enemies[0].hp < max_hp);
    }

    #[test]
    fn summoners_produce_children_on_their_deadline() {
        let mut world = World::new();
        scaffold::begin_wave_at(&mut world, WaveNumber::new(16));
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Summoner,
            },
            &mut events,
        );

        let mut summoned = 0;
        for _ in 0..40 {
            let events = tick(&mut world, 100);
            summoned += events
                .iter()
                .filter(|event| matches!(event, Event::EnemySpawned { summoned: true, .. }))
                .count();
        }
        assert_eq!(summoned, 1, "one child after 3.5 simulated seconds");
    }

    #[test]
    fn toggling_target_mode_requires_a_selection() {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(&mut world, Command::ToggleTargetMode, &mut events);
        assert_eq!(
            events,
            vec![Event::CommandRejected {
                reason: CommandError::NoSelection,
            }]
        );

        let _ = place(&mut world, TowerArchetype::Mage, 5);
        select_slot(&mut world, 5);
        events.clear();
        apply(&mut world, Command::ToggleTargetMode, &mut events);
        assert!(matches!(
            events.as_slice(),
            [Event::TargetModeChanged {
                mode: TargetMode::Strongest,
                ..
            }]
        ));
    }
}

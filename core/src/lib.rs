#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Rampart Defence.";

/// Highest level a tower can reach through upgrades.
pub const MAX_TOWER_LEVEL: u8 = 5;

/// Player health granted at the start of every session.
pub const STARTING_HEALTH: u32 = 10;

/// Gold granted at the start of every session.
pub const STARTING_GOLD: u64 = 120;

/// Wave index from which kill rewards and wave bonuses grow geometrically.
pub const REWARD_GROWTH_WAVE: u32 = 20;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Reconfigures the level layout for the provided viewport dimensions.
    ConfigureViewport {
        /// Viewport the presentation layer is currently rendering into.
        viewport: Viewport,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of real time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Begins the next wave if the session is idle.
    StartWave,
    /// Requests that the factory spawn a wave enemy of the provided kind.
    SpawnEnemy {
        /// Archetype of the enemy entering the path.
        kind: EnemyKind,
    },
    /// Declares the active wave finished once its pools are exhausted.
    CompleteWave,
    /// Requests that a tower launch a projectile at the provided enemy.
    FireProjectile {
        /// Tower attempting to fire.
        tower: TowerId,
        /// Enemy the projectile is aimed at.
        target: EnemyId,
    },
    /// Requests placement of a tower into the provided slot.
    PlaceTower {
        /// Archetype of tower to construct.
        archetype: TowerArchetype,
        /// Slot that should receive the tower.
        slot: SlotId,
    },
    /// Selects the tower nearest the provided position, or clears selection.
    SelectTower {
        /// Position reported by the pointing device in world units.
        position: WorldPoint,
    },
    /// Toggles the selected tower between its targeting priorities.
    ToggleTargetMode,
    /// Upgrades the selected tower if gold and level permit.
    UpgradeSelected,
    /// Arms or confirms the sale of the selected tower.
    SellSelected,
    /// Flips whether the next wave starts automatically after a report.
    ToggleAutoStart,
    /// Advances the global speed multiplier to its next setting.
    CycleSpeed,
    /// Dismisses the end-of-wave report and resumes the session.
    CloseReport,
    /// Resets the session to its initial state.
    Restart,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced by scaled time.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the layout was recomputed for a new viewport.
    ViewportChanged {
        /// Viewport the layout now matches.
        viewport: Viewport,
        /// Range-scale factor derived from the viewport.
        scale: RangeScale,
    },
    /// Announces that a wave began spawning.
    WaveStarted {
        /// One-based index of the wave that started.
        wave: WaveNumber,
        /// Whether the wave consists of a single boss.
        is_boss: bool,
        /// Gold held by the player when the wave began.
        gold: Gold,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the spawned enemy.
        kind: EnemyKind,
        /// Whether a live summoner produced the enemy mid-wave.
        summoned: bool,
    },
    /// Reports the armor pool a freshly spawned boss carries.
    BossSpawned {
        /// Identifier of the boss enemy.
        enemy: EnemyId,
        /// Armor hit points at spawn; zero while the armor curve is inactive.
        armor: f32,
    },
    /// Confirms that an enemy died and its reward was credited.
    EnemyDied {
        /// Identifier of the enemy that died.
        enemy: EnemyId,
        /// Archetype of the enemy that died.
        kind: EnemyKind,
        /// Gold credited for the kill.
        reward: Gold,
        /// Tower archetype credited with the kill.
        source: TowerArchetype,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Identifier of the enemy that leaked.
        enemy: EnemyId,
        /// Archetype of the enemy that leaked.
        kind: EnemyKind,
        /// Player health remaining after the leak was deducted.
        health_remaining: u32,
    },
    /// Attributes routed damage to a tower archetype for reporting.
    DamageDealt {
        /// Enemy that received the damage.
        enemy: EnemyId,
        /// Archetype credited with the damage.
        source: TowerArchetype,
        /// Total routed damage, including any portion absorbed by armor.
        amount: f32,
        /// Portion of the damage absorbed by a boss armor pool.
        absorbed: f32,
    },
    /// Announces that a boss armor pool was permanently depleted.
    BossArmorBroken {
        /// Identifier of the boss whose armor broke.
        enemy: EnemyId,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Archetype of the firing tower.
        archetype: TowerArchetype,
    },
    /// Reports a projectile impact for the presentation layer.
    ProjectileImpact {
        /// Identifier of the projectile that impacted.
        projectile: ProjectileId,
        /// Position of the impact in world units.
        position: WorldPoint,
    },
    /// Confirms that a tower was placed into a slot.
    TowerPlaced {
        /// Identifier assigned to the tower by the world.
        tower: TowerId,
        /// Archetype of the placed tower.
        archetype: TowerArchetype,
        /// Slot that received the tower.
        slot: SlotId,
        /// Gold debited for the purchase.
        cost: Gold,
    },
    /// Reports that a tower placement request was rejected.
    TowerPlacementRejected {
        /// Archetype requested for placement.
        archetype: TowerArchetype,
        /// Slot provided in the placement request.
        slot: SlotId,
        /// Specific reason the placement failed.
        reason: PlacementError,
    },
    /// Confirms that a tower advanced one upgrade level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level the tower now holds.
        level: u8,
        /// Gold debited for the upgrade.
        cost: Gold,
    },
    /// Announces that a sell request armed a tower for confirmation.
    TowerSellArmed {
        /// Identifier of the armed tower.
        tower: TowerId,
    },
    /// Confirms that a tower was sold and its slot freed.
    TowerSold {
        /// Identifier of the tower that was removed.
        tower: TowerId,
        /// Slot the tower previously occupied.
        slot: SlotId,
        /// Gold refunded to the player.
        refund: Gold,
    },
    /// Announces that the selected tower switched targeting priority.
    TargetModeChanged {
        /// Identifier of the affected tower.
        tower: TowerId,
        /// Priority that became active.
        mode: TargetMode,
    },
    /// Reports that a command was rejected without side effects.
    CommandRejected {
        /// Specific reason the command was refused.
        reason: CommandError,
    },
    /// Announces that the global speed multiplier changed.
    SpeedChanged {
        /// Speed setting that became active.
        speed: GameSpeed,
    },
    /// Announces that automatic wave starting was toggled.
    AutoStartToggled {
        /// Whether waves now start automatically after a report closes.
        enabled: bool,
    },
    /// Announces that every enemy from the active wave was resolved.
    WaveCompleted {
        /// One-based index of the completed wave.
        wave: WaveNumber,
        /// Gold credited as the wave-clear bonus.
        bonus: Gold,
    },
    /// Publishes the finalized report for the completed wave.
    ReportPublished {
        /// Immutable record handed to the report overlay.
        report: WaveReport,
    },
    /// Confirms that the end-of-wave report was dismissed.
    ReportClosed,
    /// Announces that player health reached zero.
    GameOver {
        /// Wave that was active when the session ended.
        wave: WaveNumber,
    },
    /// Confirms that the session was reset to its initial state.
    SessionReset,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Zero-based index of a tower placement slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotId(u32);

impl SlotId {
    /// Creates a new slot identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the slot identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// One-based wave index; zero denotes a session before its first wave.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct WaveNumber(u32);

impl WaveNumber {
    /// Creates a new wave number wrapper.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the underlying wave index.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the wave number that follows this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Reports whether this wave spawns a single reinforced boss.
    #[must_use]
    pub const fn is_boss_wave(&self) -> bool {
        self.0 > 0 && self.0 % 5 == 0
    }

    /// Ordinal of the boss this wave corresponds to, counted from one.
    #[must_use]
    pub const fn boss_index(&self) -> u32 {
        let index = self.0 / 5;
        if index == 0 {
            1
        } else {
            index
        }
    }
}

/// Whole-unit gold quantity held by the player or moved by the ledger.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
pub struct Gold(u64);

impl Gold {
    /// Creates a new gold quantity.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Retrieves the underlying whole-unit amount.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Adds the provided amount, saturating at the numeric maximum.
    #[must_use]
    pub const fn saturating_add(self, other: Gold) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts the provided amount, returning `None` when funds fall short.
    #[must_use]
    pub fn checked_sub(self, other: Gold) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }
}

/// Closed set of enemy archetypes the factory can instantiate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Quick, fragile runner; immune to slowing effects.
    Fast,
    /// Slow, durable bruiser.
    Tank,
    /// Mid-line enemy that periodically summons children while alive.
    Summoner,
    /// Reinforced wave finisher; carries an armor pool on later waves.
    Boss,
}

impl EnemyKind {
    /// Hit points before wave scaling is applied.
    #[must_use]
    pub const fn base_hp(self) -> f32 {
        match self {
            Self::Fast => 30.0,
            Self::Tank => 80.0,
            Self::Summoner => 55.0,
            Self::Boss => 2_200.0,
        }
    }

    /// Movement speed along the path in world units per second.
    #[must_use]
    pub const fn base_speed(self) -> f32 {
        match self {
            Self::Fast => 70.0,
            Self::Tank => 38.0,
            Self::Summoner => 30.0,
            Self::Boss => 26.0,
        }
    }

    /// Collision size in world units.
    #[must_use]
    pub const fn size(self) -> f32 {
        match self {
            Self::Fast => 10.0,
            Self::Tank => 14.0,
            Self::Summoner => 12.0,
            Self::Boss => 20.0,
        }
    }

    /// Kill reward before wave scaling; bosses always pay this flat amount.
    #[must_use]
    pub const fn base_reward(self) -> u64 {
        match self {
            Self::Fast => 5,
            Self::Tank => 8,
            Self::Summoner => 12,
            Self::Boss => 100,
        }
    }

    /// Reports whether slowing effects are a no-op for this archetype.
    #[must_use]
    pub const fn is_slow_immune(self) -> bool {
        matches!(self, Self::Fast)
    }

    /// Interval between summon events for archetypes that summon.
    #[must_use]
    pub const fn summon_interval(self) -> Option<Duration> {
        match self {
            Self::Summoner => Some(Duration::from_millis(3_500)),
            _ => None,
        }
    }
}

/// Closed set of tower archetypes available for placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerArchetype {
    /// Precision single-target tower; unimpeded by boss armor.
    Archer,
    /// Splash tower whose impacts damage an area.
    Cannon,
    /// Magic tower that weakens, burns, and slows the enemies it hits.
    Mage,
}

impl TowerArchetype {
    /// Every placeable archetype in deterministic order.
    pub const ALL: [TowerArchetype; 3] = [Self::Archer, Self::Cannon, Self::Mage];

    /// Gold debited when the tower is placed.
    #[must_use]
    pub const fn cost(self) -> Gold {
        match self {
            Self::Archer => Gold::new(30),
            Self::Cannon => Gold::new(50),
            Self::Mage => Gold::new(60),
        }
    }

    /// Projectile damage at level one.
    #[must_use]
    pub const fn base_damage(self) -> f32 {
        match self {
            Self::Archer => 6.0,
            Self::Cannon => 14.0,
            Self::Mage => 9.0,
        }
    }

    /// Targeting range at level one, before viewport rescaling.
    #[must_use]
    pub const fn base_range(self) -> f32 {
        match self {
            Self::Archer => 110.0,
            Self::Cannon => 130.0,
            Self::Mage => 120.0,
        }
    }

    /// Impact area radius at level one; zero means single-target.
    #[must_use]
    pub const fn base_area(self) -> f32 {
        match self {
            Self::Cannon => 46.0,
            Self::Archer | Self::Mage => 0.0,
        }
    }

    /// Interval between shots at level one.
    #[must_use]
    pub const fn base_fire_interval(self) -> Duration {
        match self {
            Self::Archer => Duration::from_millis(700),
            Self::Cannon => Duration::from_millis(1_400),
            Self::Mage => Duration::from_millis(1_000),
        }
    }

    /// Projectile travel speed at level one, before viewport rescaling.
    #[must_use]
    pub const fn base_projectile_speed(self) -> f32 {
        match self {
            Self::Archer => 320.0,
            Self::Cannon => 260.0,
            Self::Mage => 300.0,
        }
    }

    /// Base amount fed into the geometric upgrade cost curve.
    #[must_use]
    pub const fn upgrade_base_cost(self) -> u64 {
        match self {
            Self::Archer => 25,
            Self::Cannon => 40,
            Self::Mage => 50,
        }
    }

    /// Per-level stat multipliers applied by each upgrade.
    #[must_use]
    pub const fn upgrade_profile(self) -> UpgradeProfile {
        match self {
            Self::Archer => UpgradeProfile {
                damage: 1.35,
                range: 1.08,
                area: 1.10,
                interval: 0.92,
                projectile_speed: 1.05,
            },
            Self::Cannon => UpgradeProfile {
                damage: 1.40,
                range: 1.06,
                area: 1.12,
                interval: 0.94,
                projectile_speed: 1.04,
            },
            Self::Mage => UpgradeProfile {
                damage: 1.32,
                range: 1.07,
                area: 1.10,
                interval: 0.90,
                projectile_speed: 1.05,
            },
        }
    }

    /// Multiplier applied to this archetype's damage while boss armor holds.
    ///
    /// Armor resists splash and magic damage but not precision fire.
    #[must_use]
    pub const fn armor_multiplier(self) -> f32 {
        match self {
            Self::Archer => 1.0,
            Self::Cannon | Self::Mage => 0.20,
        }
    }

    /// Reports whether projectiles from this archetype weaken their victims.
    #[must_use]
    pub const fn applies_weaken(self) -> bool {
        matches!(self, Self::Mage)
    }

    /// Reports whether projectiles from this archetype ignite their victims.
    #[must_use]
    pub const fn applies_burn(self) -> bool {
        matches!(self, Self::Mage)
    }

    /// Reports whether projectiles from this archetype slow their victims.
    #[must_use]
    pub const fn applies_slow(self) -> bool {
        matches!(self, Self::Mage)
    }

    /// Lower-case label used by reports and transfer strings.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Archer => "archer",
            Self::Cannon => "cannon",
            Self::Mage => "mage",
        }
    }
}

/// Per-level multiplier vector applied by tower upgrades.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpgradeProfile {
    /// Multiplier applied to projectile damage per level.
    pub damage: f32,
    /// Multiplier applied to the base range per level.
    pub range: f32,
    /// Multiplier applied to the base area radius per level.
    pub area: f32,
    /// Multiplier applied to the fire interval per level; below one.
    pub interval: f32,
    /// Multiplier applied to the base projectile speed per level.
    pub projectile_speed: f32,
}

/// Targeting priorities a tower can toggle between.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetMode {
    /// Prefer the in-range enemy with the greatest path distance traveled.
    First,
    /// Prefer the in-range enemy with the greatest current hit points.
    Strongest,
}

impl TargetMode {
    /// Returns the other targeting priority.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::First => Self::Strongest,
            Self::Strongest => Self::First,
        }
    }
}

/// Global simulation speed settings cycled by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameSpeed {
    /// Real-time simulation.
    Normal,
    /// Simulated time passes twice as fast as real time.
    Double,
    /// Simulated time passes four times as fast as real time.
    Quadruple,
}

impl GameSpeed {
    /// Factor applied to the frame delta before the step runs.
    #[must_use]
    pub const fn multiplier(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::Double => 2,
            Self::Quadruple => 4,
        }
    }

    /// Returns the next speed setting in the 1x / 2x / 4x cycle.
    #[must_use]
    pub const fn cycled(self) -> Self {
        match self {
            Self::Normal => Self::Double,
            Self::Double => Self::Quadruple,
            Self::Quadruple => Self::Normal,
        }
    }
}

/// Lifecycle phase the session is currently in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// The simulation advances normally.
    Playing,
    /// The end-of-wave report is open; the step is a paused no-op.
    ReportOpen,
    /// Player health reached zero; only restart is accepted.
    GameOver,
}

/// Position or direction expressed in continuous world units.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WorldPoint {
    x: f32,
    y: f32,
}

impl WorldPoint {
    /// Creates a new point from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Horizontal component of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Vertical component of the point.
    #[must_use]
    pub const fn y(&self) -> f32 {
        self.y
    }

    /// Euclidean distance to the other point.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Returns the point advanced toward `target` by at most `distance`.
    ///
    /// Arrives exactly at the target when the remaining gap is shorter than
    /// the requested step.
    #[must_use]
    pub fn stepped_toward(self, target: WorldPoint, distance: f32) -> WorldPoint {
        let gap = self.distance_to(target);
        if gap <= distance || gap <= f32::EPSILON {
            return target;
        }
        let ratio = distance / gap;
        WorldPoint::new(self.x + (target.x - self.x) * ratio, self.y + (target.y - self.y) * ratio)
    }
}

/// Dimensions of the viewport the presentation layer renders into.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    width: f32,
    height: f32,
}

impl Viewport {
    /// Creates a new viewport description.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width of the viewport in world units.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height of the viewport in world units.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }
}

/// Reference viewport width against which range scaling is computed.
pub const REFERENCE_VIEWPORT_WIDTH: f32 = 960.0;

/// Reference viewport height against which range scaling is computed.
pub const REFERENCE_VIEWPORT_HEIGHT: f32 = 640.0;

/// Viewport-derived multiplier applied to spatial tower statistics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeScale(f32);

impl RangeScale {
    /// Neutral scale matching the reference viewport.
    pub const IDENTITY: RangeScale = RangeScale(1.0);

    /// Derives the clamped scale factor for the provided viewport.
    #[must_use]
    pub fn from_viewport(viewport: Viewport) -> Self {
        let width_ratio = viewport.width() / REFERENCE_VIEWPORT_WIDTH;
        let height_ratio = viewport.height() / REFERENCE_VIEWPORT_HEIGHT;
        Self(width_ratio.min(height_ratio).clamp(0.8, 1.6))
    }

    /// Retrieves the scale factor.
    #[must_use]
    pub const fn factor(&self) -> f32 {
        self.0
    }
}

/// Number of enemies a wave commits to spawning, split by pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveComposition {
    base_count: u32,
    extra_count: u32,
    is_boss: bool,
}

const BASE_POOL_START: f64 = 10.0;
const BASE_POOL_GROWTH: f64 = 1.15;
const BASE_POOL_CAP: u32 = 60;
const EXTRA_POOL_WAVE: u32 = 30;
const EXTRA_POOL_CAP: u32 = 20;

impl WaveComposition {
    /// Computes the spawn commitment for the provided wave.
    #[must_use]
    pub fn for_wave(wave: WaveNumber) -> Self {
        let index = wave.get();
        if index == 0 {
            return Self {
                base_count: 0,
                extra_count: 0,
                is_boss: false,
            };
        }

        if wave.is_boss_wave() {
            return Self {
                base_count: 1,
                extra_count: 0,
                is_boss: true,
            };
        }

        let grown = (BASE_POOL_START * BASE_POOL_GROWTH.powi(index as i32 - 1)).ceil();
        let base_count = (grown as u32).min(BASE_POOL_CAP);

        let extra_count = if index >= EXTRA_POOL_WAVE {
            let grown = (5.0 + f64::from(index - EXTRA_POOL_WAVE) * 0.75).floor();
            (grown as u32).min(EXTRA_POOL_CAP)
        } else {
            0
        };

        Self {
            base_count,
            extra_count,
            is_boss: false,
        }
    }

    /// Enemies committed to the primary spawn pool.
    #[must_use]
    pub const fn base_count(&self) -> u32 {
        self.base_count
    }

    /// Enemies committed to the accelerated late-game pool.
    #[must_use]
    pub const fn extra_count(&self) -> u32 {
        self.extra_count
    }

    /// Whether the wave consists of a single boss.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        self.is_boss
    }

    /// Total enemies the wave commits to spawning.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.base_count + self.extra_count
    }
}

/// Reasons a tower placement request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlacementError {
    /// The requested slot already holds a tower.
    SlotOccupied,
    /// The player cannot afford the archetype's cost.
    InsufficientGold,
    /// No slot with the provided identifier exists in the layout.
    UnknownSlot,
}

/// Reasons a player command may be refused without side effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandError {
    /// The command requires a selected tower and none is selected.
    NoSelection,
    /// The selected tower already reached the maximum level.
    TowerAtMaxLevel,
    /// The player cannot afford the requested operation.
    InsufficientGold,
    /// A wave is already spawning or draining.
    WaveAlreadyActive,
    /// The session ended; only restart is accepted.
    SessionOver,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current position along the path in world units.
    pub position: WorldPoint,
    /// Current hit points.
    pub hp: f32,
    /// Hit points the enemy spawned with.
    pub max_hp: f32,
    /// Armor pool state for bosses that carry one.
    pub armor: Option<ArmorSnapshot>,
    /// Total distance traveled along the path in world units.
    pub distance: f32,
    /// Whether a slowing effect is currently active.
    pub slowed: bool,
    /// Whether a weakening effect is currently active.
    pub weakened: bool,
    /// Whether a burning effect is currently active.
    pub burning: bool,
}

/// Armor pool state captured for boss snapshots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmorSnapshot {
    /// Armor hit points remaining.
    pub hp: f32,
    /// Armor hit points the pool started with.
    pub max: f32,
    /// Whether the pool was permanently depleted.
    pub broken: bool,
}

/// Read-only snapshot describing all live enemies.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of live enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view captured no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Archetype of the tower.
    pub archetype: TowerArchetype,
    /// Slot the tower occupies.
    pub slot: SlotId,
    /// Position of the tower in world units.
    pub position: WorldPoint,
    /// Upgrade level, starting at one.
    pub level: u8,
    /// Derived projectile damage.
    pub damage: f32,
    /// Derived targeting range in world units.
    pub range: f32,
    /// Derived impact area radius; zero means single-target.
    pub area: f32,
    /// Whether the cooldown elapsed and the tower may fire.
    pub ready: bool,
    /// Active targeting priority.
    pub target_mode: TargetMode,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile used for rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier assigned to the projectile.
    pub id: ProjectileId,
    /// Current position in world units.
    pub position: WorldPoint,
    /// Archetype of the tower that fired the projectile.
    pub archetype: TowerArchetype,
}

/// Immutable representation of a placement slot used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SlotSnapshot {
    /// Identifier of the slot.
    pub id: SlotId,
    /// Position of the slot in world units.
    pub position: WorldPoint,
    /// Tower occupying the slot, if any.
    pub occupant: Option<TowerId>,
}

/// Wave progress indicator surfaced on the HUD.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaveProgress {
    /// No wave is active; the session awaits a start command.
    Idle,
    /// A wave is active with the provided resolution progress.
    Active {
        /// Wave enemies killed or leaked so far.
        killed: u32,
        /// Wave enemies the composition committed to spawning.
        total: u32,
    },
    /// The end-of-wave report is open and the simulation is paused.
    ReportOpen,
}

/// Live HUD fields read by the presentation layer after each step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HudView {
    /// Player health remaining.
    pub health: u32,
    /// Gold balance, already floored to whole units.
    pub gold: Gold,
    /// Wave counter; the most recently started wave.
    pub wave: WaveNumber,
    /// Progress of the active wave.
    pub progress: WaveProgress,
}

/// Cost quote for the next upgrade of an inspected tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpgradeQuote {
    /// Another level is available at the quoted cost.
    Available {
        /// Gold the upgrade would debit.
        cost: Gold,
    },
    /// The tower already reached the maximum level.
    Maxed,
}

/// Per-tower inspector fields surfaced while a tower is selected.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerInspector {
    /// Identifier of the inspected tower.
    pub tower: TowerId,
    /// Upgrade level, starting at one.
    pub level: u8,
    /// Quote for the next upgrade.
    pub upgrade: UpgradeQuote,
    /// Gold refunded if the sale is confirmed.
    pub sell_value: Gold,
    /// Active targeting priority.
    pub target_mode: TargetMode,
}

/// Finalized end-of-wave report consumed by the presentation layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaveReport {
    /// One-based index of the reported wave.
    pub wave: u32,
    /// Simulated duration of the wave in seconds.
    pub duration_seconds: f64,
    /// Gold ledger movements observed during the wave.
    pub gold: GoldReport,
    /// Enemies that reached the end of the path.
    pub leaks: u32,
    /// Damage attribution totals.
    pub damage: DamageReport,
    /// Kill attribution totals.
    pub kills: KillReport,
    /// Boss engagement record; absent on non-boss waves.
    pub boss: Option<BossReport>,
    /// Summoner activity observed during the wave.
    pub summoner: SummonerReport,
}

/// Gold movements aggregated over a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoldReport {
    /// Balance when the wave started.
    pub start: u64,
    /// Gold credited by kill rewards.
    pub kills: u64,
    /// Gold credited by the wave-clear bonus.
    pub bonus: u64,
    /// Gold spent on purchases and upgrades, net of sell refunds.
    pub spent: i64,
    /// Net change across the wave.
    pub net: i64,
}

/// Floating-point totals partitioned by tower archetype.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeDamage {
    /// Damage attributed to archer towers.
    pub archer: f64,
    /// Damage attributed to cannon towers.
    pub cannon: f64,
    /// Damage attributed to mage towers, including burn ticks.
    pub mage: f64,
}

/// Damage attribution aggregated over a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageReport {
    /// Total damage routed into enemies, armor absorption included.
    pub total: f64,
    /// Damage partitioned by firing archetype.
    pub per_archetype: ArchetypeDamage,
}

/// Kill counts partitioned by tower archetype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchetypeKills {
    /// Kills attributed to archer towers.
    pub archer: u32,
    /// Kills attributed to cannon towers.
    pub cannon: u32,
    /// Kills attributed to mage towers, including burn kills.
    pub mage: u32,
}

/// Kill attribution aggregated over a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KillReport {
    /// Total enemies killed during the wave.
    pub total: u32,
    /// Kills partitioned by firing archetype.
    pub per_archetype: ArchetypeKills,
}

/// Boss engagement record captured on boss waves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossReport {
    /// Simulated milliseconds into the wave when the boss spawned.
    pub spawn_time_ms: f64,
    /// Simulated seconds between the boss spawning and leaving the field.
    pub time_to_kill_seconds: f64,
    /// Armor hit points the boss spawned with.
    pub armor_start: f64,
    /// Armor hit points remaining when the boss left the field.
    pub armor_end: f64,
    /// Whether the armor pool was permanently depleted.
    pub broken: bool,
}

/// Summoner activity captured over a single wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummonerReport {
    /// Summoners spawned from the wave pools.
    pub spawned: u32,
    /// Children produced by live summoners.
    pub summoned_children: u32,
}

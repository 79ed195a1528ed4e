//! Authoritative tower state management and derived statistics.

use std::collections::BTreeMap;
use std::time::Duration;

use rampart_defence_core::{Gold, RangeScale, SlotId, TargetMode, TowerArchetype, TowerId, WorldPoint};

/// Statistics derived from an archetype's base values.
///
/// Always recomputed from the base value, the cumulative level multipliers,
/// and the current range scale so resizes and upgrades never compound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct TowerStats {
    pub(crate) damage: f32,
    pub(crate) range: f32,
    pub(crate) area: f32,
    pub(crate) fire_interval: Duration,
    pub(crate) projectile_speed: f32,
}

impl TowerStats {
    /// Derives the stats a tower holds at the provided level and scale.
    pub(crate) fn derive(archetype: TowerArchetype, level: u8, scale: RangeScale) -> Self {
        let profile = archetype.upgrade_profile();
        let steps = i32::from(level.saturating_sub(1));
        let factor = scale.factor();
        Self {
            damage: archetype.base_damage() * profile.damage.powi(steps),
            range: archetype.base_range() * profile.range.powi(steps) * factor,
            area: archetype.base_area() * profile.area.powi(steps) * factor,
            fire_interval: archetype
                .base_fire_interval()
                .mul_f32(profile.interval.powi(steps)),
            projectile_speed: archetype.base_projectile_speed()
                * profile.projectile_speed.powi(steps)
                * factor,
        }
    }
}

/// Mutable state of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    pub(crate) id: TowerId,
    pub(crate) archetype: TowerArchetype,
    pub(crate) slot: SlotId,
    pub(crate) position: WorldPoint,
    pub(crate) level: u8,
    pub(crate) stats: TowerStats,
    pub(crate) cooldown: Duration,
    pub(crate) target_mode: TargetMode,
    pub(crate) spent: Gold,
    pub(crate) sell_armed_until: Option<Duration>,
}

impl TowerState {
    /// Recomputes the derived stats from base values at the provided scale.
    pub(crate) fn restat(&mut self, scale: RangeScale) {
        self.stats = TowerStats::derive(self.archetype, self.level, scale);
    }

    /// Reports whether the cooldown elapsed and the tower may fire.
    pub(crate) fn ready(&self) -> bool {
        self.cooldown.is_zero()
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug, Default)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: u32,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a freshly purchased tower and returns its identifier.
    pub(crate) fn insert(
        &mut self,
        archetype: TowerArchetype,
        slot: SlotId,
        position: WorldPoint,
        scale: RangeScale,
    ) -> TowerId {
        let id = TowerId::new(self.next_tower_id);
        self.next_tower_id = self.next_tower_id.wrapping_add(1);
        let state = TowerState {
            id,
            archetype,
            slot,
            position,
            level: 1,
            stats: TowerStats::derive(archetype, 1, scale),
            cooldown: Duration::ZERO,
            target_mode: TargetMode::First,
            spent: archetype.cost(),
            sell_armed_until: None,
        };
        let _ = self.entries.insert(id, state);
        id
    }

    /// Retrieves a tower by identifier.
    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    /// Retrieves a tower for mutation by identifier.
    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Removes a tower, returning its final state.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    /// Iterator over towers in ascending identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    /// Mutable iterator over towers in ascending identifier order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    /// Removes every tower and resets identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = 0;
    }
}

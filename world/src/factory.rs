//! Enemy construction with wave-dependent stat scaling.

use std::time::Duration;

use rampart_defence_core::{EnemyId, EnemyKind, Gold, WaveNumber, WorldPoint};
use rampart_defence_system_status::StatusState;

use crate::{Armor, Enemy};

const NORMAL_HP_GROWTH: f64 = 1.12;
const BOSS_HP_DISCOUNT: f64 = 0.70;
const BOSS_HP_GROWTH: f64 = 1.10;
const BOSS_ARMOR_BASE: f64 = 1_420.0;
const BOSS_ARMOR_GROWTH: f64 = 1.14;
const BOSS_ARMOR_FIRST_INDEX: u32 = 4;
const REWARD_GROWTH: f64 = 1.05;

/// Builds a fully scaled enemy entering the path at the provided origin.
pub(crate) fn build_enemy(
    id: EnemyId,
    kind: EnemyKind,
    wave: WaveNumber,
    origin: WorldPoint,
    clock: Duration,
    summoned: bool,
) -> Enemy {
    let hp = scaled_hp(kind, wave);
    Enemy {
        id,
        kind,
        position: origin,
        hp,
        max_hp: hp,
        armor: boss_armor(kind, wave),
        speed: kind.base_speed(),
        path_index: 1,
        distance: 0.0,
        reward: kill_reward(kind, wave),
        status: StatusState::new(),
        summoned,
        next_summon_at: kind
            .summon_interval()
            .map(|interval| clock.saturating_add(interval)),
    }
}

/// Hit points for the provided kind on the provided wave.
pub(crate) fn scaled_hp(kind: EnemyKind, wave: WaveNumber) -> f32 {
    let base = f64::from(kind.base_hp());
    let scaled = match kind {
        EnemyKind::Boss => {
            base * BOSS_HP_DISCOUNT * BOSS_HP_GROWTH.powi(wave.boss_index() as i32 - 1)
        }
        _ => base * NORMAL_HP_GROWTH.powi(wave.get().max(1) as i32 - 1),
    };
    scaled as f32
}

/// Armor pool carried by bosses once the armor curve activates.
pub(crate) fn boss_armor(kind: EnemyKind, wave: WaveNumber) -> Option<Armor> {
    if kind != EnemyKind::Boss {
        return None;
    }
    let boss_index = wave.boss_index();
    if boss_index < BOSS_ARMOR_FIRST_INDEX {
        return None;
    }
    let max = (BOSS_ARMOR_BASE * BOSS_ARMOR_GROWTH.powi(boss_index as i32 - 1)) as f32;
    Some(Armor {
        hp: max,
        max,
        broken: false,
    })
}

/// Gold credited when an enemy of the provided kind dies on the wave.
///
/// Bosses always award their flat bonus; other kinds grow geometrically past
/// the reward-growth wave.
pub(crate) fn kill_reward(kind: EnemyKind, wave: WaveNumber) -> Gold {
    let base = kind.base_reward();
    if kind == EnemyKind::Boss {
        return Gold::new(base);
    }
    let index = wave.get();
    if index <= rampart_defence_core::REWARD_GROWTH_WAVE {
        return Gold::new(base);
    }
    let grown = (base as f64 * REWARD_GROWTH.powi((index - rampart_defence_core::REWARD_GROWTH_WAVE) as i32))
        .floor();
    Gold::new(grown as u64)
}

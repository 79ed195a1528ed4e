#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Time-bounded status modifiers applied to enemies by projectile impacts.
//!
//! The authoritative world owns one [`StatusState`] per enemy and consults it
//! during the tick. Every deadline is expressed on the simulation clock, so
//! effects expire deterministically regardless of frame cadence or the global
//! speed multiplier.

use std::time::Duration;

use rampart_defence_core::EnemyKind;

/// Multiplicative speed factor while a slow effect is active.
pub const SLOW_FACTOR: f32 = 0.55;

/// Window a slow effect stays active after application.
pub const SLOW_DURATION: Duration = Duration::from_millis(2_000);

/// Multiplier applied to incoming damage while a weaken effect is active.
pub const WEAKEN_FACTOR: f32 = 1.30;

/// Window a weaken effect stays active after application.
pub const WEAKEN_DURATION: Duration = Duration::from_millis(3_000);

/// Window a burn effect stays active after application.
pub const BURN_DURATION: Duration = Duration::from_millis(3_000);

/// Fraction of an enemy's maximum hit points a full burn window consumes.
pub const BURN_FRACTION: f32 = 0.03;

/// Mutable status timers carried by a single enemy.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusState {
    slow: Option<SlowEffect>,
    weaken_until: Option<Duration>,
    burn: Option<BurnEffect>,
}

#[derive(Clone, Copy, Debug)]
struct SlowEffect {
    factor: f32,
    until: Duration,
}

#[derive(Clone, Copy, Debug)]
struct BurnEffect {
    until: Duration,
    damage_per_second: f32,
}

impl StatusState {
    /// Creates a status record with no active effects.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a slow effect, overwriting any active window.
    ///
    /// Slow-immune archetypes ignore the application entirely.
    pub fn apply_slow(&mut self, kind: EnemyKind, now: Duration) {
        if kind.is_slow_immune() {
            return;
        }
        self.slow = Some(SlowEffect {
            factor: SLOW_FACTOR,
            until: now.saturating_add(SLOW_DURATION),
        });
    }

    /// Applies a weaken effect; reapplication extends the window, never stacks.
    pub fn apply_weaken(&mut self, now: Duration) {
        self.weaken_until = Some(now.saturating_add(WEAKEN_DURATION));
    }

    /// Applies a burn effect, fixing the damage rate from the enemy's maximum
    /// hit points. Reapplication resets both window and rate.
    pub fn apply_burn(&mut self, max_hp: f32, now: Duration) {
        let damage_per_second = max_hp * BURN_FRACTION / BURN_DURATION.as_secs_f32();
        self.burn = Some(BurnEffect {
            until: now.saturating_add(BURN_DURATION),
            damage_per_second,
        });
    }

    /// Speed factor the enemy moves with at the provided instant.
    #[must_use]
    pub fn speed_factor(&self, now: Duration) -> f32 {
        match self.slow {
            Some(effect) if effect.until > now => effect.factor,
            _ => 1.0,
        }
    }

    /// Multiplier applied to damage routed into the enemy at the instant.
    #[must_use]
    pub fn damage_factor(&self, now: Duration) -> f32 {
        if self.is_weakened(now) {
            WEAKEN_FACTOR
        } else {
            1.0
        }
    }

    /// Burn damage accrued over the step `[now, now + dt]`.
    ///
    /// The final partial step is clipped to the remaining window so a full,
    /// unrefreshed burn consumes exactly its committed total.
    #[must_use]
    pub fn burn_tick(&self, now: Duration, dt: Duration) -> f32 {
        let Some(burn) = self.burn else {
            return 0.0;
        };
        if burn.until <= now {
            return 0.0;
        }
        let remaining = burn.until.saturating_sub(now);
        let window = dt.min(remaining);
        burn.damage_per_second * window.as_secs_f32()
    }

    /// Clears every effect whose window elapsed by the provided instant.
    pub fn expire(&mut self, now: Duration) {
        if matches!(self.slow, Some(effect) if effect.until <= now) {
            self.slow = None;
        }
        if matches!(self.weaken_until, Some(until) if until <= now) {
            self.weaken_until = None;
        }
        if matches!(self.burn, Some(effect) if effect.until <= now) {
            self.burn = None;
        }
    }

    /// Reports whether a slow effect is active at the provided instant.
    #[must_use]
    pub fn is_slowed(&self, now: Duration) -> bool {
        matches!(self.slow, Some(effect) if effect.until > now)
    }

    /// Reports whether a weaken effect is active at the provided instant.
    #[must_use]
    pub fn is_weakened(&self, now: Duration) -> bool {
        matches!(self.weaken_until, Some(until) if until > now)
    }

    /// Reports whether a burn effect is active at the provided instant.
    #[must_use]
    pub fn is_burning(&self, now: Duration) -> bool {
        matches!(self.burn, Some(effect) if effect.until > now)
    }
}

//! Gold ledger and the growth curves attached to economy mutations.

use rampart_defence_core::{Gold, TowerArchetype, WaveNumber, REWARD_GROWTH_WAVE, STARTING_GOLD};

const WAVE_BONUS_BASE: f64 = 20.0;
const WAVE_BONUS_GROWTH: f64 = 1.05;
const UPGRADE_COST_GROWTH: f64 = 1.55;
const SELL_REFUND_NUMERATOR: u64 = 6;
const SELL_REFUND_DENOMINATOR: u64 = 10;

/// Sole owner of the player's gold balance.
///
/// Gold only moves through the typed operations below: kill rewards, wave
/// bonuses, purchases, upgrades, and sell refunds.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Ledger {
    gold: Gold,
}

impl Ledger {
    /// Creates a ledger holding the session's starting balance.
    pub(crate) fn new() -> Self {
        Self {
            gold: Gold::new(STARTING_GOLD),
        }
    }

    /// Current balance in whole units.
    pub(crate) fn balance(&self) -> Gold {
        self.gold
    }

    /// Credits the provided amount to the balance.
    pub(crate) fn credit(&mut self, amount: Gold) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Replaces the balance outright; reserved for test scaffolding.
    #[cfg(any(test, feature = "wave_scaffolding"))]
    pub(crate) fn force_balance(&mut self, amount: Gold) {
        self.gold = amount;
    }

    /// Debits the provided amount, refusing the whole operation on shortfall.
    pub(crate) fn try_debit(&mut self, amount: Gold) -> bool {
        match self.gold.checked_sub(amount) {
            Some(remaining) => {
                self.gold = remaining;
                true
            }
            None => false,
        }
    }
}

/// Gold credited once every enemy of the provided wave has been resolved.
pub(crate) fn wave_bonus(wave: WaveNumber) -> Gold {
    let index = wave.get();
    if index <= REWARD_GROWTH_WAVE {
        return Gold::new(WAVE_BONUS_BASE as u64);
    }
    let grown = (WAVE_BONUS_BASE * WAVE_BONUS_GROWTH.powi((index - REWARD_GROWTH_WAVE) as i32)).floor();
    Gold::new(grown as u64)
}

/// Cost of upgrading a tower currently sitting at the provided level.
pub(crate) fn upgrade_cost(archetype: TowerArchetype, level: u8) -> Gold {
    let base = archetype.upgrade_base_cost() as f64;
    let cost = (base * UPGRADE_COST_GROWTH.powi(i32::from(level) - 1)).ceil();
    Gold::new(cost as u64)
}

/// Refund paid when a tower sale is confirmed.
pub(crate) fn sell_refund(spent: Gold) -> Gold {
    Gold::new(spent.get() * SELL_REFUND_NUMERATOR / SELL_REFUND_DENOMINATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_starts_with_the_session_balance() {
        let ledger = Ledger::new();
        assert_eq!(ledger.balance(), Gold::new(STARTING_GOLD));
    }

    #[test]
    fn debit_refuses_overdrafts_without_mutation() {
        let mut ledger = Ledger::new();
        assert!(!ledger.try_debit(Gold::new(STARTING_GOLD + 1)));
        assert_eq!(ledger.balance(), Gold::new(STARTING_GOLD));

        assert!(ledger.try_debit(Gold::new(120)));
        assert_eq!(ledger.balance(), Gold::new(0));
    }

    #[test]
    fn wave_bonus_is_flat_until_the_growth_wave() {
        assert_eq!(wave_bonus(WaveNumber::new(1)), Gold::new(20));
        assert_eq!(wave_bonus(WaveNumber::new(20)), Gold::new(20));
    }

    #[test]
    fn wave_bonus_grows_with_the_kill_reward_curve() {
        let bonus = wave_bonus(WaveNumber::new(30));
        let expected = (20.0 * 1.05_f64.powi(10)).floor() as u64;
        assert_eq!(bonus, Gold::new(expected));
    }

    #[test]
    fn upgrade_cost_follows_the_geometric_curve() {
        assert_eq!(upgrade_cost(TowerArchetype::Archer, 1), Gold::new(25));
        let level_three = (25.0 * 1.55_f64.powi(2)).ceil() as u64;
        assert_eq!(upgrade_cost(TowerArchetype::Archer, 3), Gold::new(level_three));
    }

    #[test]
    fn sell_refund_floors_to_sixty_percent() {
        assert_eq!(sell_refund(Gold::new(100)), Gold::new(60));
        assert_eq!(sell_refund(Gold::new(101)), Gold::new(60));
        assert_eq!(sell_refund(Gold::new(0)), Gold::new(0));
    }
}

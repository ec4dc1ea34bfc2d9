use bevy_ecs::prelude::*;

use crate::protocol::NetId;

// ============================================================================
// Vitals
// ============================================================================

/// Health pool plus the terminal-state bookkeeping every damageable entity shares.
///
/// `dying` is one-way: once set, no further damage or healing is processed. The killer and
/// whether the killing blow was a headshot are recorded for score accounting.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    pub headshot_multiplier: f32,
    pub dying: bool,
    pub killer: Option<NetId>,
    pub headshot_kill: bool,
}

/// What a single damage call did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DamageOutcome {
    pub applied: f32,
    pub killed: bool,
}

impl Vitals {
    #[must_use]
    pub const fn new(max_health: f32, headshot_multiplier: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            headshot_multiplier,
            dying: false,
            killer: None,
            headshot_kill: false,
        }
    }

    #[must_use]
    pub fn fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            self.health / self.max_health
        }
    }

    // Negative, zero or NaN amounts and hits on a dying target are ignored.
    pub fn apply_damage(&mut self, amount: f32, attacker: Option<NetId>, is_headshot: bool) -> DamageOutcome {
        if amount.is_nan() || amount <= 0.0 || self.dying {
            return DamageOutcome::default();
        }

        let amount = if is_headshot {
            amount * self.headshot_multiplier
        } else {
            amount
        };

        let before = self.health;
        self.health = (self.health - amount).clamp(0.0, self.max_health);

        let killed = self.health <= 0.0;
        if killed {
            self.dying = true;
            self.killer = attacker;
            self.headshot_kill = is_headshot;
        }

        DamageOutcome {
            applied: before - self.health,
            killed,
        }
    }

    // Returns the amount actually restored.
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount.is_nan() || amount <= 0.0 || self.dying {
            return 0.0;
        }
        let before = self.health;
        self.health = (self.health + amount).clamp(0.0, self.max_health);
        self.health - before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn damage_is_clamped_to_range() {
        for (health, amount, headshot) in [(50.0, 10.0, false), (50.0, 30.0, true), (5.0, 100.0, false), (80.0, 0.5, true)] {
            let mut v = Vitals::new(80.0, 2.0);
            v.health = health;
            v.apply_damage(amount, None, headshot);
            let expected = (health - amount * if headshot { 2.0 } else { 1.0 }).clamp(0.0, 80.0);
            assert!((v.health - expected).abs() < 1e-5, "health {health} amount {amount}");
        }
    }

    #[test]
    fn damage_after_death_is_a_no_op() {
        let mut v = Vitals::new(30.0, 2.0);
        let first = v.apply_damage(40.0, Some(NetId(7)), false);
        assert!(first.killed);
        let second = v.apply_damage(40.0, Some(NetId(8)), true);
        assert_eq!(second, DamageOutcome::default());
        assert_eq!(v.killer, Some(NetId(7)));
        assert!(!v.headshot_kill);
    }

    #[test]
    fn headshot_kill_records_killer() {
        let mut v = Vitals::new(30.0, 2.0);
        let outcome = v.apply_damage(20.0, Some(NetId(1)), true);
        assert!(outcome.killed);
        assert_eq!(v.health, 0.0);
        assert!(v.dying);
        assert!(v.headshot_kill);
        assert_eq!(outcome.applied, 30.0);
    }

    #[test]
    fn negative_amounts_are_ignored() {
        let mut v = Vitals::new(30.0, 2.0);
        v.apply_damage(-5.0, None, false);
        v.apply_damage(f32::NAN, None, false);
        assert_eq!(v.health, 30.0);
        assert_eq!(v.heal(-3.0), 0.0);
    }

    #[test]
    fn heal_caps_at_max() {
        let mut v = Vitals::new(30.0, 1.0);
        v.apply_damage(10.0, None, false);
        assert_eq!(v.heal(25.0), 10.0);
        assert_eq!(v.health, 30.0);
    }
}

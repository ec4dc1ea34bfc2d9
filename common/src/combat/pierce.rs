use std::collections::HashSet;

use crate::{constants::PHYSICS_EPSILON, protocol::NetId};

// Ids a single projectile has already damaged. Guarantees at most one hit per target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HitLedger(HashSet<NetId>);

impl HitLedger {
    #[must_use]
    pub fn contains(&self, id: NetId) -> bool {
        self.0.contains(&id)
    }

    // Returns false if the id was already recorded.
    pub fn record(&mut self, id: NetId) -> bool {
        self.0.insert(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PierceVerdict {
    Continue,
    Stop,
}

// Pierce accounting for one projectile. A multiplier of exactly 1 means piercing is off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pierce {
    pub max_targets: u32,
    pub damage_multiplier: f32,
    pub count: u32,
}

impl Pierce {
    pub const NONE: Self = Self {
        max_targets: 1,
        damage_multiplier: 1.0,
        count: 0,
    };

    #[must_use]
    pub const fn new(max_targets: u32, damage_multiplier: f32) -> Self {
        Self {
            max_targets,
            damage_multiplier,
            count: 0,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.max_targets > 1 && (self.damage_multiplier - 1.0).abs() > PHYSICS_EPSILON
    }

    // Record a hit that has just been applied at `*damage`. Scales the damage for the next
    // target when the projectile carries on.
    pub fn register_hit(&mut self, damage: &mut f32) -> PierceVerdict {
        self.count += 1;
        if !self.enabled() || self.count >= self.max_targets {
            return PierceVerdict::Stop;
        }
        *damage *= self.damage_multiplier;
        PierceVerdict::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_target_pierce_halves_each_hit() {
        let mut pierce = Pierce::new(3, 0.5);
        let mut ledger = HitLedger::default();
        let mut damage = 40.0;
        let mut applied = Vec::new();

        for id in [NetId(1), NetId(2), NetId(2), NetId(3)] {
            if !ledger.record(id) {
                continue;
            }
            applied.push(damage);
            if pierce.register_hit(&mut damage) == PierceVerdict::Stop {
                break;
            }
        }

        assert_eq!(applied, vec![40.0, 20.0, 10.0]);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn unit_multiplier_disables_pierce() {
        let mut pierce = Pierce::new(5, 1.0);
        let mut damage = 10.0;
        assert_eq!(pierce.register_hit(&mut damage), PierceVerdict::Stop);
        assert_eq!(damage, 10.0);
    }

    #[test]
    fn default_pierce_stops_on_first_hit() {
        let mut pierce = Pierce::NONE;
        let mut damage = 10.0;
        assert_eq!(pierce.register_hit(&mut damage), PierceVerdict::Stop);
    }
}

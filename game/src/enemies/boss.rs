use common::{combat::directional_knockback, components::Facing, geometry::Aabb};

use super::{
    EnemyStats,
    attack::{Strike, frontal_rect},
};
use crate::constants::{
    BOSS_BUMP_DAMAGE_MULTIPLIER, BOSS_BUMP_FORWARD, BOSS_BUMP_LIFT, BOSS_BUMP_RANGE, BOSS_STRIKE_FORWARD,
    BOSS_STRIKE_LIFT, BOSS_SUMMON_INTERVAL_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossAttack {
    // Frontal swing at medium range.
    Strike,
    // Body check at close range: weaker, but throws the target hard.
    Bump,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BossBrain {
    pub current: Option<BossAttack>,
    pub last_summon_ms: u64,
}

impl BossBrain {
    #[must_use]
    pub const fn new(now_ms: u64) -> Self {
        Self {
            current: None,
            last_summon_ms: now_ms,
        }
    }

    #[must_use]
    pub fn choose_attack(distance_x: f32, strike_range: f32) -> Option<BossAttack> {
        if distance_x <= BOSS_BUMP_RANGE {
            Some(BossAttack::Bump)
        } else if distance_x <= strike_range {
            Some(BossAttack::Strike)
        } else {
            None
        }
    }

    pub fn summon_due(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_summon_ms) < BOSS_SUMMON_INTERVAL_MS {
            return false;
        }
        self.last_summon_ms = now_ms;
        true
    }
}

#[must_use]
pub fn boss_strike(attack: BossAttack, rect: &Aabb, facing: Facing, stats: &EnemyStats) -> Strike {
    match attack {
        BossAttack::Strike => Strike {
            rect: frontal_rect(rect, facing, stats.attack_range),
            damage: stats.damage,
            knockback: directional_knockback(facing.sign(), BOSS_STRIKE_FORWARD, BOSS_STRIKE_LIFT),
        },
        BossAttack::Bump => Strike {
            rect: frontal_rect(rect, facing, BOSS_BUMP_RANGE).inflated(0.0, rect.h * 0.2),
            damage: stats.damage * BOSS_BUMP_DAMAGE_MULTIPLIER,
            knockback: directional_knockback(facing.sign(), BOSS_BUMP_FORWARD, BOSS_BUMP_LIFT),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::EnemyKind;

    #[test]
    fn distance_bands_pick_one_attack() {
        let range = EnemyKind::Boss.stats().attack_range;
        assert_eq!(BossBrain::choose_attack(40.0, range), Some(BossAttack::Bump));
        assert_eq!(BossBrain::choose_attack(BOSS_BUMP_RANGE + 1.0, range), Some(BossAttack::Strike));
        assert_eq!(BossBrain::choose_attack(range + 1.0, range), None);
    }

    #[test]
    fn bump_hits_softer_but_throws_harder() {
        let stats = EnemyKind::Boss.stats();
        let rect = Aabb::new(0.0, 0.0, stats.width, stats.height);
        let strike = boss_strike(BossAttack::Strike, &rect, Facing::Right, &stats);
        let bump = boss_strike(BossAttack::Bump, &rect, Facing::Right, &stats);

        assert!(bump.damage < strike.damage);
        assert!(bump.knockback.x > strike.knockback.x);
        assert!(bump.knockback.y < strike.knockback.y);
    }

    #[test]
    fn summons_on_interval() {
        let mut brain = BossBrain::new(0);
        assert!(!brain.summon_due(BOSS_SUMMON_INTERVAL_MS - 1));
        assert!(brain.summon_due(BOSS_SUMMON_INTERVAL_MS));
        assert!(!brain.summon_due(BOSS_SUMMON_INTERVAL_MS + 1));
    }
}

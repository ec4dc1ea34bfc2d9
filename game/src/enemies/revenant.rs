use rand::Rng;

use super::{EnemyKind, EnemyStats, state::Enemy};
use crate::constants::REVENANT_HEALTH_SCALE;

// A weaker enemy rising where an eligible one finished fading out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RisenSpec {
    pub kind: EnemyKind,
    pub stats: EnemyStats,
    pub center_x: f32,
}

// Rolled once at finalization. The risen enemy is never eligible itself.
pub fn roll_revenant(enemy: &Enemy, center_x: f32, rng: &mut impl Rng) -> Option<RisenSpec> {
    let chance = enemy.stats.revenant_chance;
    if !enemy.revive_eligible || chance <= 0.0 || !rng.random_bool(chance.min(1.0)) {
        return None;
    }

    let mut stats = EnemyKind::Walker.stats();
    stats.health *= REVENANT_HEALTH_SCALE;
    stats.damage *= REVENANT_HEALTH_SCALE;
    stats.revenant_chance = 0.0;
    Some(RisenSpec {
        kind: EnemyKind::Walker,
        stats,
        center_x,
    })
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn certain_roll_rises_once() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut stats = EnemyKind::Ghoul.stats();
        stats.revenant_chance = 1.0;
        let ghoul = Enemy::new(EnemyKind::Ghoul, stats, 100.0, 0);

        let risen = roll_revenant(&ghoul, 100.0, &mut rng).expect("rises");
        assert_eq!(risen.kind, EnemyKind::Walker);
        assert!(risen.stats.health < EnemyKind::Walker.stats().health);

        let walker = Enemy::new(risen.kind, risen.stats, 100.0, 0);
        assert!(!walker.revive_eligible);
        assert!(roll_revenant(&walker, 100.0, &mut rng).is_none());
    }

    #[test]
    fn ineligible_ghoul_stays_down() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut stats = EnemyKind::Ghoul.stats();
        stats.revenant_chance = 1.0;
        let mut ghoul = Enemy::new(EnemyKind::Ghoul, stats, 100.0, 0);
        ghoul.revive_eligible = false;
        assert!(roll_revenant(&ghoul, 100.0, &mut rng).is_none());
    }
}

use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::{
    combat::{HitLedger, radial_knockback, splash_falloff},
    constants::EXPLOSION_ANIMATION_MS,
    geometry::Aabb,
    protocol::NetId,
    weapons::ExplosionStats,
};

// A single explosion. Damage is resolved on the first tick it exists; the entity then
// lingers for the animation.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Blast {
    pub owner: NetId,
    pub center: Vec2,
    pub damage: f32,
    pub stats: ExplosionStats,
    pub started_ms: u64,
    pub hit_targets: HitLedger,
    pub resolved: bool,
}

impl Blast {
    #[must_use]
    pub fn new(owner: NetId, center: Vec2, damage: f32, stats: ExplosionStats, now_ms: u64) -> Self {
        Self {
            owner,
            center,
            damage,
            stats,
            started_ms: now_ms,
            hit_targets: HitLedger::default(),
            resolved: false,
        }
    }

    #[must_use]
    pub fn reaches(&self, target: &Aabb) -> bool {
        self.center.distance(target.center()) < self.stats.max_radius
    }

    #[must_use]
    pub fn damage_for(&self, target: &Aabb) -> f32 {
        let distance = self.center.distance(target.center());
        splash_falloff(self.damage, distance, self.stats.min_radius, self.stats.max_radius)
    }

    #[must_use]
    pub fn knockback_for(&self, target: &Aabb) -> Vec2 {
        radial_knockback(self.center, target.center(), self.stats.knockback, self.stats.max_radius)
    }

    #[must_use]
    pub fn finished(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) >= EXPLOSION_ANIMATION_MS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blast() -> Blast {
        Blast::new(
            NetId(1),
            Vec2::ZERO,
            100.0,
            ExplosionStats {
                min_radius: 20.0,
                max_radius: 120.0,
                knockback: 10.0,
            },
            0,
        )
    }

    #[test]
    fn splash_damage_falls_off_with_distance() {
        let blast = blast();
        let at = |x: f32| Aabb::from_center(Vec2::new(x, 0.0), 10.0, 10.0);

        assert_eq!(blast.damage_for(&at(10.0)), 100.0);
        assert!((blast.damage_for(&at(70.0)) - 50.0).abs() < 1e-4);
        assert_eq!(blast.damage_for(&at(130.0)), 0.0);
        assert!(!blast.reaches(&at(130.0)));
    }

    #[test]
    fn knockback_pushes_outward() {
        let blast = blast();
        let push = blast.knockback_for(&Aabb::from_center(Vec2::new(-30.0, 0.0), 10.0, 10.0));
        assert!(push.x < 0.0);
        assert!(!blast.finished(EXPLOSION_ANIMATION_MS - 1));
        assert!(blast.finished(EXPLOSION_ANIMATION_MS));
    }
}

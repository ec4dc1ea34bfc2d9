use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::{
    collision::helpers::direction_from_angle,
    combat::{HitLedger, Pierce, PierceVerdict, range_falloff},
    constants::{BULLET_LENGTH, BULLET_THICKNESS, EXPLOSION_ANIMATION_MS},
    geometry::Aabb,
    protocol::{BulletFrame, NetId},
    weapons::{BulletKind, ExplosionStats, WeaponKind, WeaponStats},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletState {
    Flying,
    Exploding { since_ms: u64 },
    Spent,
}

// Result of a bullet meeting a target it has not hit before.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletStrike {
    pub damage: f32,
    pub verdict: PierceVerdict,
}

// A straight-line traveler. The rect is the bullet's tail hitbox; each tick the whole
// segment it crossed is swept against targets so fast rounds cannot skip over them.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Bullet {
    pub owner: NetId,
    pub weapon: WeaponKind,
    pub kind: BulletKind,
    pub rect: Aabb,
    pub angle: f32,
    pub speed: f32,
    pub damage: f32,       // after pierce scaling, before range falloff
    pub total_damage: f32, // reference for falloff
    pub min_range: f32,
    pub max_range: f32,
    pub traveled: f32,
    pub pierce: Pierce,
    pub hit_targets: HitLedger,
    pub explosion: Option<ExplosionStats>,
    pub state: BulletState,
}

impl Bullet {
    #[must_use]
    pub fn fired(owner: NetId, stats: &WeaponStats, muzzle: Vec2, angle: f32) -> Self {
        Self {
            owner,
            weapon: stats.kind,
            kind: stats.bullet_kind,
            rect: Aabb::from_center(muzzle, BULLET_LENGTH, BULLET_THICKNESS),
            angle,
            speed: stats.bullet_speed,
            damage: stats.damage,
            total_damage: stats.damage,
            min_range: stats.min_range,
            max_range: stats.max_range,
            traveled: 0.0,
            pierce: Pierce::new(stats.max_pierce_targets, stats.pierce_damage_multiplier),
            hit_targets: HitLedger::default(),
            explosion: stats.explosion,
            state: BulletState::Flying,
        }
    }

    // Rebuild a bullet owned by the other peer from its wire frame. Range, pierce and
    // explosion data come from the firing weapon's stat block, so the authority resolves the
    // mirror exactly like a round of its own. None for unknown tags.
    #[must_use]
    pub fn mirrored(frame: &BulletFrame) -> Option<Self> {
        let kind = BulletKind::from_tag(frame.kind_tag)?;
        let stats = WeaponKind::from_tag(frame.weapon_tag)?.stats();
        let mut bullet = Self::fired(frame.owner, &stats, frame.rect.center(), frame.angle);
        bullet.kind = kind;
        bullet.rect = frame.rect;
        bullet.speed = frame.speed;
        bullet.damage = frame.damage;
        bullet.traveled = frame.traveled;
        Some(bullet)
    }

    // Follow the owner's view of the flight. Damage stays local: pierce scaling is applied
    // by whoever resolves the hits.
    pub fn follow(&mut self, frame: &BulletFrame) {
        self.rect = frame.rect;
        self.angle = frame.angle;
        self.speed = frame.speed;
        self.traveled = frame.traveled;
    }

    #[must_use]
    pub fn direction(&self) -> Vec2 {
        direction_from_angle(self.angle)
    }

    #[must_use]
    pub fn is_flying(&self) -> bool {
        self.state == BulletState::Flying
    }

    // Damage this bullet would deliver right now.
    #[must_use]
    pub fn delivered_damage(&self) -> f32 {
        range_falloff(self.damage, self.traveled, self.min_range, self.max_range)
    }

    // Move one tick forward. Returns the segment the bullet's center swept.
    pub fn advance(&mut self, dt: f32) -> (Vec2, Vec2) {
        let from = self.rect.center();
        let step = self.speed * dt;
        self.rect.translate(self.direction() * step);
        self.traveled += step;
        (from, self.rect.center())
    }

    #[must_use]
    pub fn range_exhausted(&self) -> bool {
        self.traveled >= self.max_range
    }

    // Apply at most one hit per target. None when the target was already struck.
    pub fn strike(&mut self, target: NetId, now_ms: u64) -> Option<BulletStrike> {
        if !self.is_flying() || !self.hit_targets.record(target) {
            return None;
        }
        let damage = self.delivered_damage();
        let verdict = self.pierce.register_hit(&mut self.damage);
        if verdict == PierceVerdict::Stop {
            self.terminate(now_ms);
        }
        Some(BulletStrike { damage, verdict })
    }

    // End of flight: explosive rounds burst, everything else is simply spent.
    pub fn terminate(&mut self, now_ms: u64) {
        if !self.is_flying() {
            return;
        }
        self.state = if self.explosion.is_some() {
            BulletState::Exploding { since_ms: now_ms }
        } else {
            BulletState::Spent
        };
    }

    #[must_use]
    pub fn ready_to_despawn(&self, now_ms: u64) -> bool {
        match self.state {
            BulletState::Flying => false,
            BulletState::Exploding { since_ms } => now_ms.saturating_sub(since_ms) >= EXPLOSION_ANIMATION_MS,
            BulletState::Spent => true,
        }
    }

    #[must_use]
    pub fn frame(&self, id: NetId) -> BulletFrame {
        BulletFrame {
            id,
            owner: self.owner,
            angle: self.angle,
            rect: self.rect,
            speed: self.speed,
            damage: self.damage,
            traveled: self.traveled,
            kind_tag: self.kind.tag(),
            weapon_tag: self.weapon.tag(),
        }
    }
}

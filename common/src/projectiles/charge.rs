use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::{
    collision::{Axis, Contact, Obstacle, apply_gravity, resolve_axis_collision},
    components::Body,
    constants::{CHARGE_BOUNCE_RETENTION, CHARGE_GROUND_FRICTION, CHARGE_REST_SPEED, CHARGE_SIZE},
    geometry::Aabb,
    protocol::NetId,
    weapons::{BurnStats, ExplosionStats, Release, ThrowableStats},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeState {
    Flying,
    Resting,
    Detonated,
}

// What a charge turns into when it goes off.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detonation {
    Blast {
        center: Vec2,
        damage: f32,
        stats: ExplosionStats,
    },
    Burn {
        ground: Vec2,
        stats: BurnStats,
    },
}

impl Detonation {
    // What a throwable leaves behind at `at`: a blast centered there, or a fire standing on it.
    #[must_use]
    pub fn of_throwable(stats: &ThrowableStats, at: Vec2) -> Option<Self> {
        if let Some(burn) = stats.burn {
            return Some(Self::Burn { ground: at, stats: burn });
        }
        stats.explosion.map(|explosion| Self::Blast {
            center: at,
            damage: stats.damage,
            stats: explosion,
        })
    }

    #[must_use]
    pub const fn at(&self) -> Vec2 {
        match self {
            Self::Blast { center, .. } => *center,
            Self::Burn { ground, .. } => *ground,
        }
    }
}

// A thrown grenade or molotov. Moves under gravity and bounces off geometry.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Charge {
    pub owner: NetId,
    pub stats: ThrowableStats,
    pub fuse_deadline_ms: u64,
    pub state: ChargeState,
    pub bounces: u32,
}

impl Charge {
    #[must_use]
    pub fn thrown(owner: NetId, release: &Release, now_ms: u64) -> Self {
        Self {
            owner,
            stats: release.stats,
            fuse_deadline_ms: now_ms + release.fuse_remaining_ms,
            state: ChargeState::Flying,
            bounces: 0,
        }
    }

    #[must_use]
    pub fn body(hand: Vec2, velocity: Vec2) -> Body {
        let mut body = Body::new(Aabb::from_center(hand, CHARGE_SIZE, CHARGE_SIZE));
        body.velocity = velocity;
        body
    }

    #[must_use]
    pub fn fuse_expired(&self, now_ms: u64) -> bool {
        now_ms >= self.fuse_deadline_ms
    }

    // One tick of flight. Returns the first contact made this tick, if any.
    pub fn step(&mut self, body: &mut Body, obstacles: &[Obstacle], dt: f32) -> Option<Contact> {
        if self.state != ChargeState::Flying {
            return None;
        }

        let incoming = body.velocity;
        body.rect.translate(Vec2::new(incoming.x * dt, 0.0));
        let side = resolve_axis_collision(body, obstacles, Axis::Horizontal);
        if side.is_some() {
            body.velocity.x = -incoming.x * CHARGE_BOUNCE_RETENTION;
            self.bounces += 1;
        }

        apply_gravity(body, dt);
        let falling = body.velocity.y;
        let vertical = resolve_axis_collision(body, obstacles, Axis::Vertical);
        match vertical {
            Some(Contact::Floor) => {
                self.bounces += 1;
                body.velocity.x *= CHARGE_GROUND_FRICTION;
                let rebound = -falling * CHARGE_BOUNCE_RETENTION;
                if rebound.abs() < CHARGE_REST_SPEED {
                    body.velocity.y = 0.0;
                    body.acceleration.y = 0.0;
                    body.grounded = true;
                    if body.velocity.x.abs() < CHARGE_REST_SPEED {
                        body.velocity.x = 0.0;
                        self.state = ChargeState::Resting;
                    }
                } else {
                    body.velocity.y = rebound;
                }
            }
            Some(Contact::Ceiling) => {
                self.bounces += 1;
                body.velocity.y = -falling * CHARGE_BOUNCE_RETENTION;
            }
            _ => {}
        }

        side.or(vertical)
    }

    // Whether this charge should go off now given what happened this tick.
    #[must_use]
    pub fn should_detonate(&self, contact: Option<Contact>, now_ms: u64) -> bool {
        if self.state == ChargeState::Detonated {
            return false;
        }
        (self.stats.shatter_on_impact && contact.is_some()) || self.fuse_expired(now_ms)
    }

    pub fn detonate(&mut self, body: &Body) -> Option<Detonation> {
        if self.state == ChargeState::Detonated {
            return None;
        }
        self.state = ChargeState::Detonated;

        let at = if self.stats.burn.is_some() {
            Vec2::new(body.rect.center().x, body.rect.bottom())
        } else {
            body.center()
        };
        Detonation::of_throwable(&self.stats, at)
    }
}

use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use common::{geometry::Aabb, projectiles::Detonation, protocol::NetId, weapons::ThrowableKind};

use crate::enemies::{Enemy, EnemyKind, Strike};

// ============================================================================
// Bevy Messages
// ============================================================================

// An enemy attack reached its hit frame.
#[derive(Message, Debug, Clone)]
pub struct EnemyAttack {
    pub attacker: NetId,
    pub strike: Strike,
}

// A melee weapon reached its hit frame.
#[derive(Message, Debug, Clone)]
pub struct MeleeSwing {
    pub owner: NetId,
    pub rect: Aabb,
    pub damage: f32,
    pub knockback: f32,
}

// `thrown` names the grenade or molotov behind it; rounds from a launcher leave it empty.
#[derive(Message, Debug, Clone)]
pub struct DetonationRequested {
    pub owner: NetId,
    pub detonation: Detonation,
    pub thrown: Option<ThrowableKind>,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct ShotFired {
    pub shooter: NetId,
    pub rounds: u32,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct BulletHit {
    pub shooter: NetId,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct HelmetBroke {
    pub at: Vec2,
}

// An enemy finished fading out. Fired exactly once per enemy.
#[derive(Message, Debug, Clone)]
pub struct EnemyFinalized {
    pub id: NetId,
    pub kind: EnemyKind,
    pub killer: Option<NetId>,
    pub headshot: bool,
    pub center_x: f32,
    pub enemy: Enemy,
}

#[derive(Message, Debug, Clone, Copy)]
pub struct BossSummonDue {
    pub count: u32,
}

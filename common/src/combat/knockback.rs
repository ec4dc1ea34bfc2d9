use bevy_math::Vec2;

use crate::constants::PHYSICS_EPSILON;

// Push away from a blast center, scaled down linearly to nothing at `radius`.
// Targets sitting exactly on the center are pushed straight up.
#[must_use]
pub fn radial_knockback(center: Vec2, target: Vec2, strength: f32, radius: f32) -> Vec2 {
    let offset = target - center;
    let distance = offset.length();
    if radius <= 0.0 || distance >= radius {
        return Vec2::ZERO;
    }
    let falloff = 1.0 - distance / radius;
    let dir = if distance < PHYSICS_EPSILON {
        Vec2::NEG_Y
    } else {
        offset / distance
    };
    dir * strength * falloff
}

// Strike knockback along the attacker's facing: `forward` horizontally, `lift` upward.
#[must_use]
pub fn directional_knockback(facing_sign: f32, forward: f32, lift: f32) -> Vec2 {
    Vec2::new(facing_sign * forward, -lift)
}

use bevy_math::Vec2;

use common::{components::Facing, geometry::Aabb};

// A transient hit rectangle built on an attack's hit frame. Every player overlapping it
// takes the damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Strike {
    pub rect: Aabb,
    pub damage: f32,
    pub knockback: Vec2,
}

// Rectangle reaching `reach` past the attacker's center on its facing side, covering the
// middle band of its height.
#[must_use]
pub fn frontal_rect(body: &Aabb, facing: Facing, reach: f32) -> Aabb {
    let center = body.center();
    let width = reach + body.w / 2.0;
    let x = match facing {
        Facing::Right => center.x,
        Facing::Left => center.x - width,
    };
    Aabb::new(x, body.y + body.h * 0.2, width, body.h * 0.6)
}

use bevy_math::Vec2;

use crate::{components::Body, constants::GRAVITY, geometry::Aabb};

// ============================================================================
// Obstacles
// ============================================================================

// Static or kinematic geometry bodies collide against. Kinematic obstacles carry their
// own previous rect so the approach direction is judged against where they were too.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub rect: Aabb,
    pub previous_rect: Aabb,
}

impl Obstacle {
    #[must_use]
    pub const fn fixed(rect: Aabb) -> Self {
        Self {
            rect,
            previous_rect: rect,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

// Which face of the body struck an obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    Left,
    Right,
    Floor,
    Ceiling,
}

// ============================================================================
// Integration
// ============================================================================

// Semi-implicit Euler fall step. The acceleration term used for the position update is the
// one left over from the previous tick; the new acceleration is stored for the next one.
pub fn apply_gravity(body: &mut Body, dt: f32) {
    body.velocity.y += GRAVITY * dt * body.gravity_scale;
    body.rect.y += 0.5f32.mul_add(body.acceleration.y, body.velocity.y) * dt;
    body.acceleration.y = GRAVITY * body.gravity_scale;
}

// Damped horizontal integration: `drive` is the walking acceleration (speed * facing),
// `friction` is negative and scales against the current velocity.
pub fn integrate_horizontal(body: &mut Body, drive: f32, friction: f32, dt: f32) {
    body.acceleration.x = body.velocity.x.mul_add(friction, drive);
    body.velocity.x += body.acceleration.x * dt;
    body.rect.x += (0.5 * body.acceleration.x * dt).mul_add(dt, body.velocity.x * dt);
}

// Knockback is a velocity change, not a displacement; it stacks with whatever integration
// runs later in the same tick.
pub fn apply_knockback(body: &mut Body, delta: Vec2) {
    body.velocity += delta;
}

// ============================================================================
// Collision Resolution
// ============================================================================

// Resolve overlaps along one axis with a hard clamp and a zeroed velocity component.
// The approach side is classified from the previous-tick rects: a body that was already
// overlapping an obstacle when the tick started matches neither rule and is left alone.
pub fn resolve_axis_collision(body: &mut Body, obstacles: &[Obstacle], axis: Axis) -> Option<Contact> {
    let mut contact = None;

    for obstacle in obstacles {
        if !body.rect.overlaps(&obstacle.rect) {
            continue;
        }

        match axis {
            Axis::Horizontal => {
                if body.rect.right() >= obstacle.rect.left()
                    && body.previous_rect.right() <= obstacle.previous_rect.left()
                {
                    body.rect.set_right(obstacle.rect.left());
                    body.velocity.x = 0.0;
                    contact = Some(Contact::Right);
                } else if body.rect.left() <= obstacle.rect.right()
                    && body.previous_rect.left() >= obstacle.previous_rect.right()
                {
                    body.rect.set_left(obstacle.rect.right());
                    body.velocity.x = 0.0;
                    contact = Some(Contact::Left);
                }
            }
            Axis::Vertical => {
                if body.rect.bottom() >= obstacle.rect.top()
                    && body.previous_rect.bottom() <= obstacle.previous_rect.top()
                {
                    body.rect.set_bottom(obstacle.rect.top());
                    body.velocity.y = 0.0;
                    contact = Some(Contact::Floor);
                } else if body.rect.top() <= obstacle.rect.bottom()
                    && body.previous_rect.top() >= obstacle.previous_rect.bottom()
                {
                    body.rect.set_top(obstacle.rect.bottom());
                    body.velocity.y = 0.0;
                    contact = Some(Contact::Ceiling);
                }
            }
        }
    }

    contact
}

use bevy_math::Vec2;

use crate::constants::PHYSICS_EPSILON;

// Compute the intersection interval of a ray with a slab (used in ray-AABB tests)
#[must_use]
pub fn sweep_slab_interval(
    local_coord: f32,
    ray_dir: f32,
    half_extent: f32,
    t_min: f32,
    t_max: f32,
) -> Option<(f32, f32)> {
    if ray_dir.abs() > PHYSICS_EPSILON {
        let t1 = (-half_extent - local_coord) / ray_dir;
        let t2 = (half_extent - local_coord) / ray_dir;
        let new_min = t_min.max(t1.min(t2));
        let new_max = t_max.min(t1.max(t2));
        if new_min <= new_max {
            Some((new_min, new_max))
        } else {
            None
        }
    } else if local_coord.abs() > half_extent {
        None
    } else {
        Some((t_min, t_max))
    }
}

// Unit direction for an aim angle in radians (0 = right, positive = clockwise since y points down).
#[must_use]
pub fn direction_from_angle(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

// Aim angle from one point toward another.
#[must_use]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

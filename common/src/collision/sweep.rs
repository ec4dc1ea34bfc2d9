use bevy_math::Vec2;

use super::helpers::sweep_slab_interval;
use crate::geometry::Aabb;

/// Result of a segment sweep: entry time along the segment in [0, 1] and the entry point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sweep {
    pub t: f32,
    pub point: Vec2,
}

// Sweep a thick segment (a bullet's tail hitbox from last tick's position to this tick's)
// against a rectangle. Returns the earliest contact, or `None` if the segment never touches it.
// A segment that starts inside the rectangle reports t = 0.
#[must_use]
pub fn sweep_segment_vs_aabb(from: Vec2, to: Vec2, rect: &Aabb, thickness: f32) -> Option<Sweep> {
    let half = thickness / 2.0;
    let center = rect.center();
    let half_x = rect.w / 2.0 + half;
    let half_y = rect.h / 2.0 + half;

    let dir = to - from;
    let local = from - center;

    let (t_min, t_max) = sweep_slab_interval(local.x, dir.x, half_x, 0.0, 1.0)?;
    let (t_min, t_max) = sweep_slab_interval(local.y, dir.y, half_y, t_min, t_max)?;

    if t_min > t_max || t_max < 0.0 || t_min > 1.0 {
        return None;
    }

    let t = t_min.clamp(0.0, 1.0);
    Some(Sweep {
        t,
        point: from + dir * t,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fast_segment_does_not_tunnel_through_thin_target() {
        // 200 units per tick across a 10-unit wide target
        let rect = Aabb::new(100.0, 0.0, 10.0, 50.0);
        let hit = sweep_segment_vs_aabb(Vec2::new(0.0, 25.0), Vec2::new(200.0, 25.0), &rect, 2.0);
        let hit = hit.expect("segment crosses the rect");
        assert!((hit.point.x - 99.0).abs() < 1e-3);
    }

    #[test]
    fn segment_passing_above_misses() {
        let rect = Aabb::new(100.0, 0.0, 10.0, 50.0);
        assert!(sweep_segment_vs_aabb(Vec2::new(0.0, -20.0), Vec2::new(200.0, -20.0), &rect, 2.0).is_none());
    }

    #[test]
    fn segment_stopping_short_misses() {
        let rect = Aabb::new(100.0, 0.0, 10.0, 50.0);
        assert!(sweep_segment_vs_aabb(Vec2::new(0.0, 25.0), Vec2::new(90.0, 25.0), &rect, 2.0).is_none());
    }
}

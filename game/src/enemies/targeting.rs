use bevy_math::Vec2;

use common::{geometry::Aabb, protocol::NetId};

// A player as enemies see it this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetView {
    pub id: NetId,
    pub rect: Aabb,
}

// Closest target by distance between rect centers.
#[must_use]
pub fn nearest_target(center: Vec2, targets: &[TargetView]) -> Option<&TargetView> {
    targets.iter().min_by(|a, b| {
        let da = center.distance_squared(a.rect.center());
        let db = center.distance_squared(b.rect.center());
        da.total_cmp(&db)
    })
}

// In reach horizontally, and the target's feet are below our head so nothing is attacked
// through a floor.
#[must_use]
pub fn in_attack_reach(attacker: &Aabb, attack_range: f32, target: &Aabb) -> bool {
    (target.center().x - attacker.center().x).abs() <= attack_range && target.bottom() > attacker.top()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(id: u32, x: f32, y: f32) -> TargetView {
        TargetView {
            id: NetId(id),
            rect: Aabb::new(x, y, 40.0, 90.0),
        }
    }

    #[test]
    fn picks_closest_player() {
        let targets = [view(1, 900.0, 600.0), view(2, 300.0, 600.0)];
        let nearest = nearest_target(Vec2::new(400.0, 650.0), &targets).map(|t| t.id);
        assert_eq!(nearest, Some(NetId(2)));
        assert!(nearest_target(Vec2::ZERO, &[]).is_none());
    }

    #[test]
    fn reach_needs_feet_below_head() {
        let enemy = Aabb::new(100.0, 600.0, 50.0, 100.0);
        let beside = Aabb::new(150.0, 610.0, 40.0, 90.0);
        let above = Aabb::new(150.0, 400.0, 40.0, 90.0);
        let far = Aabb::new(400.0, 610.0, 40.0, 90.0);

        assert!(in_attack_reach(&enemy, 45.0, &beside));
        assert!(!in_attack_reach(&enemy, 45.0, &above));
        assert!(!in_attack_reach(&enemy, 45.0, &far));
    }
}

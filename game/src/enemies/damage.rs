use bevy_math::Vec2;

use common::{
    collision::{Sweep, sweep_segment_vs_aabb},
    combat::Vitals,
    geometry::Aabb,
    protocol::NetId,
};

use super::{
    body_rect, head_rect,
    state::{Enemy, Special},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitZone {
    Head,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HitReport {
    pub applied: f32,
    pub killed: bool,
    pub armor_absorbed: bool,
    pub helmet_broke: bool,
}

// Which sub-hitbox a swept segment enters first.
#[must_use]
pub fn zone_for_segment(from: Vec2, to: Vec2, thickness: f32, rect: &Aabb, enemy: &Enemy) -> Option<(HitZone, Sweep)> {
    let head = sweep_segment_vs_aabb(from, to, &head_rect(rect, &enemy.stats), thickness);
    let body = sweep_segment_vs_aabb(from, to, &body_rect(rect, &enemy.stats), thickness);
    match (head, body) {
        (Some(h), Some(b)) if b.t < h.t => Some((HitZone::Body, b)),
        (Some(h), _) => Some((HitZone::Head, h)),
        (None, Some(b)) => Some((HitZone::Body, b)),
        (None, None) => None,
    }
}

// Zone a contact attack lands on: the head when the reach rectangle's vertical center sits
// inside the head strip, the body otherwise.
#[must_use]
pub fn zone_for_reach(reach: &Aabb, rect: &Aabb, enemy: &Enemy) -> HitZone {
    let head = head_rect(rect, &enemy.stats);
    let y = reach.center().y;
    if y >= head.top() && y < head.bottom() {
        HitZone::Head
    } else {
        HitZone::Body
    }
}

// Route one hit through armor and into health. Headshots against an intact helmet only
// wear the helmet down; body shots skip the helmet but are scaled down.
pub fn route_hit(
    enemy: &mut Enemy,
    vitals: &mut Vitals,
    amount: f32,
    attacker: Option<NetId>,
    zone: HitZone,
    now_ms: u64,
) -> HitReport {
    if vitals.dying || enemy.is_dying() {
        return HitReport::default();
    }

    if let (Special::Armored(helmet), HitZone::Head) = (&mut enemy.special, zone)
        && helmet.intact()
    {
        let before = helmet.health;
        let broke = helmet.absorb(amount, now_ms);
        return HitReport {
            applied: before - helmet.health,
            killed: false,
            armor_absorbed: true,
            helmet_broke: broke,
        };
    }

    let outcome = match zone {
        HitZone::Head => vitals.apply_damage(amount, attacker, true),
        HitZone::Body => vitals.apply_damage(amount * enemy.stats.body_damage_multiplier, attacker, false),
    };
    if outcome.killed {
        enemy.mark_dying(now_ms);
    }
    HitReport {
        applied: outcome.applied,
        killed: outcome.killed,
        armor_absorbed: false,
        helmet_broke: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enemies::EnemyKind;

    fn spawn(kind: EnemyKind) -> (Enemy, Vitals) {
        let stats = kind.stats();
        (
            Enemy::new(kind, stats, 0.0, 0),
            Vitals::new(stats.health, stats.headshot_multiplier),
        )
    }

    #[test]
    fn headshot_kill_marks_dying_and_records_killer() {
        let (mut enemy, mut vitals) = spawn(EnemyKind::Walker);
        vitals.health = 30.0;
        let report = route_hit(&mut enemy, &mut vitals, 20.0, Some(NetId(7)), HitZone::Head, 50);

        assert!(report.killed);
        assert_eq!(vitals.health, 0.0);
        assert_eq!(vitals.killer, Some(NetId(7)));
        assert!(vitals.headshot_kill);
        assert_eq!(enemy.dying_since, Some(50));

        let again = route_hit(&mut enemy, &mut vitals, 20.0, Some(NetId(8)), HitZone::Head, 60);
        assert_eq!(again, HitReport::default());
        assert_eq!(vitals.killer, Some(NetId(7)));
    }

    #[test]
    fn helmet_soaks_headshots_and_body_shots_are_scaled() {
        let (mut enemy, mut vitals) = spawn(EnemyKind::Helmeted);
        let full = vitals.health;

        let body = route_hit(&mut enemy, &mut vitals, 25.0, None, HitZone::Body, 0);
        assert!((body.applied - 5.0).abs() < 1e-4);
        assert!((vitals.health - (full - 5.0)).abs() < 1e-4);
        assert_eq!(enemy.helmet().map(|h| h.health), Some(50.0));

        let head = route_hit(&mut enemy, &mut vitals, 50.0, None, HitZone::Head, 10);
        assert!(head.armor_absorbed && head.helmet_broke);
        assert_eq!(enemy.helmet().map(|h| h.health), Some(0.0));
        assert!((vitals.health - (full - 5.0)).abs() < 1e-4);

        // Helmet gone: headshots reach health with the multiplier.
        let next = route_hit(&mut enemy, &mut vitals, 10.0, None, HitZone::Head, 20);
        assert!(!next.helmet_broke);
        assert!((next.applied - 10.0 * enemy.stats.headshot_multiplier).abs() < 1e-4);
    }

    #[test]
    fn reach_centered_on_the_head_strip_is_a_headshot() {
        let (enemy, _) = spawn(EnemyKind::Helmeted);
        let rect = Aabb::new(100.0, 100.0, enemy.stats.width, enemy.stats.height);

        let high = Aabb::new(80.0, 100.0, 70.0, 20.0);
        let low = Aabb::new(80.0, 150.0, 70.0, 60.0);
        assert_eq!(zone_for_reach(&high, &rect, &enemy), HitZone::Head);
        assert_eq!(zone_for_reach(&low, &rect, &enemy), HitZone::Body);
    }

    #[test]
    fn segment_entering_from_above_hits_head_first() {
        let (enemy, _) = spawn(EnemyKind::Walker);
        let rect = Aabb::new(100.0, 100.0, enemy.stats.width, enemy.stats.height);

        let high = zone_for_segment(Vec2::new(0.0, 110.0), Vec2::new(300.0, 110.0), 4.0, &rect, &enemy);
        let low = zone_for_segment(Vec2::new(0.0, 180.0), Vec2::new(300.0, 180.0), 4.0, &rect, &enemy);
        let miss = zone_for_segment(Vec2::new(0.0, 20.0), Vec2::new(300.0, 20.0), 4.0, &rect, &enemy);

        assert_eq!(high.map(|(z, _)| z), Some(HitZone::Head));
        assert_eq!(low.map(|(z, _)| z), Some(HitZone::Body));
        assert!(miss.is_none());
    }
}

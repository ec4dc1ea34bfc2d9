pub mod armor;
pub mod attack;
pub mod boss;
pub mod damage;
pub mod flyer;
pub mod revenant;
pub mod state;
pub mod targeting;

pub use armor::{DroppedHelmet, Helmet};
pub use attack::Strike;
pub use boss::{BossAttack, BossBrain};
pub use damage::{HitReport, HitZone, route_hit, zone_for_reach};
pub use flyer::{Flight, FlightPhase};
pub use revenant::{RisenSpec, roll_revenant};
pub use state::{Enemy, EnemyState, Special, TickContext, build_strike, think};
pub use targeting::{TargetView, in_attack_reach, nearest_target};

use serde::{Deserialize, Serialize};

use common::geometry::Aabb;

// ============================================================================
// Archetypes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    Walker,
    Runner,
    Brute,
    Helmeted,
    Bat,
    Ghoul,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub width: f32,
    pub height: f32,
    pub head_height: f32, // top strip of the rect that counts as head
    pub health: f32,
    pub movement_speed: f32,
    pub damage: f32,
    pub attack_range: f32,
    pub kill_score: u32,
    pub headshot_multiplier: f32,
    pub headshot_score_multiplier: f32,
    pub attack_hit_ms: u64,   // hit frame, measured from attack start
    pub attack_cycle_ms: u64, // full attack animation
    pub body_damage_multiplier: f32,
    pub helmet_health: Option<f32>,
    pub flying: bool,
    pub revenant_chance: f64,
}

impl EnemyKind {
    pub const ALL: [Self; 7] = [
        Self::Walker,
        Self::Runner,
        Self::Brute,
        Self::Helmeted,
        Self::Bat,
        Self::Ghoul,
        Self::Boss,
    ];

    #[must_use]
    pub const fn tag(self) -> u8 {
        match self {
            Self::Walker => 0,
            Self::Runner => 1,
            Self::Brute => 2,
            Self::Helmeted => 3,
            Self::Bat => 4,
            Self::Ghoul => 5,
            Self::Boss => 6,
        }
    }

    #[must_use]
    pub const fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Walker),
            1 => Some(Self::Runner),
            2 => Some(Self::Brute),
            3 => Some(Self::Helmeted),
            4 => Some(Self::Bat),
            5 => Some(Self::Ghoul),
            6 => Some(Self::Boss),
            _ => None,
        }
    }

    #[must_use]
    pub const fn stats(self) -> EnemyStats {
        let walker = EnemyStats {
            width: 50.0,
            height: 100.0,
            head_height: 28.0,
            health: 60.0,
            movement_speed: 0.25,
            damage: 10.0,
            attack_range: 45.0,
            kill_score: 10,
            headshot_multiplier: 2.0,
            headshot_score_multiplier: 1.5,
            attack_hit_ms: 400,
            attack_cycle_ms: 900,
            body_damage_multiplier: 1.0,
            helmet_health: None,
            flying: false,
            revenant_chance: 0.0,
        };

        match self {
            Self::Walker => walker,
            Self::Runner => EnemyStats {
                width: 45.0,
                height: 95.0,
                head_height: 26.0,
                health: 40.0,
                movement_speed: 0.5,
                damage: 8.0,
                attack_range: 40.0,
                kill_score: 15,
                attack_hit_ms: 250,
                attack_cycle_ms: 600,
                ..walker
            },
            Self::Brute => EnemyStats {
                width: 70.0,
                height: 130.0,
                head_height: 32.0,
                health: 220.0,
                movement_speed: 0.18,
                damage: 25.0,
                attack_range: 60.0,
                kill_score: 40,
                headshot_multiplier: 1.5,
                attack_hit_ms: 600,
                attack_cycle_ms: 1300,
                ..walker
            },
            Self::Helmeted => EnemyStats {
                health: 90.0,
                damage: 12.0,
                kill_score: 30,
                headshot_multiplier: 2.5,
                headshot_score_multiplier: 2.0,
                body_damage_multiplier: 0.2,
                helmet_health: Some(50.0),
                ..walker
            },
            Self::Bat => EnemyStats {
                width: 50.0,
                height: 36.0,
                head_height: 14.0,
                health: 25.0,
                movement_speed: 3.0, // direct flight speed, not a walking drive
                damage: 6.0,
                attack_range: 30.0,
                kill_score: 20,
                attack_hit_ms: 0,
                attack_cycle_ms: 300,
                flying: true,
                ..walker
            },
            Self::Ghoul => EnemyStats {
                health: 70.0,
                movement_speed: 0.3,
                damage: 12.0,
                kill_score: 25,
                revenant_chance: 0.35,
                ..walker
            },
            Self::Boss => EnemyStats {
                width: 120.0,
                height: 180.0,
                head_height: 45.0,
                health: 2500.0,
                movement_speed: 0.2,
                damage: 35.0,
                attack_range: 220.0,
                kill_score: 500,
                headshot_multiplier: 1.5,
                headshot_score_multiplier: 1.2,
                attack_hit_ms: 700,
                attack_cycle_ms: 1500,
                ..walker
            },
        }
    }
}

// ============================================================================
// Hitboxes
// ============================================================================

#[must_use]
pub fn head_rect(rect: &Aabb, stats: &EnemyStats) -> Aabb {
    Aabb::new(rect.x, rect.y, rect.w, stats.head_height.min(rect.h))
}

#[must_use]
pub fn body_rect(rect: &Aabb, stats: &EnemyStats) -> Aabb {
    let head = stats.head_height.min(rect.h);
    Aabb::new(rect.x, rect.y + head, rect.w, rect.h - head)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip_and_unknown_is_none() {
        for kind in EnemyKind::ALL {
            assert_eq!(EnemyKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(EnemyKind::from_tag(77), None);
    }

    #[test]
    fn head_and_body_split_the_rect() {
        let stats = EnemyKind::Walker.stats();
        let rect = Aabb::new(100.0, 600.0, stats.width, stats.height);
        let head = head_rect(&rect, &stats);
        let body = body_rect(&rect, &stats);
        assert_eq!(head.bottom(), body.top());
        assert_eq!(body.bottom(), rect.bottom());
    }
}

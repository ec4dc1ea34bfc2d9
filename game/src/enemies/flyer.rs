use bevy_math::Vec2;
use rand::Rng;

use common::components::Body;

use super::{EnemyStats, attack::Strike, state::EnemyState, state::TickContext, targeting::TargetView};
use crate::constants::{
    FLYER_DIVE_CHANCE, FLYER_DIVE_DISTANCE, FLYER_DIVE_ROLL_MS, FLYER_DIVE_SPEED, FLYER_HOVER_BAND, FLYER_RISE_SPEED,
};

// ============================================================================
// Flight State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightPhase {
    Hovering,
    Diving { target_y: f32 },
    Rising,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flight {
    pub phase: FlightPhase,
    pub home_x: f32,
    pub hover_y: f32,
    pub patrol_sign: f32,
    pub last_roll_ms: u64,
}

impl Flight {
    #[must_use]
    pub const fn new(home_x: f32, hover_y: f32, now_ms: u64) -> Self {
        Self {
            phase: FlightPhase::Hovering,
            home_x,
            hover_y,
            patrol_sign: 1.0,
            last_roll_ms: now_ms,
        }
    }
}

// One tick of the hover / dive / rise cycle. The flyer moves itself horizontally; its
// vertical velocity is integrated by the physics pass.
pub fn fly(
    flight: &mut Flight,
    state: &mut EnemyState,
    stats: &EnemyStats,
    body: &mut Body,
    target: &TargetView,
    ctx: &TickContext,
    rng: &mut impl Rng,
) -> Option<Strike> {
    let center = body.center();
    let target_center = target.rect.center();
    let dx = target_center.x - center.x;
    let mut strike = None;

    if let EnemyState::Attacking { started_ms, .. } = *state
        && ctx.now_ms.saturating_sub(started_ms) >= stats.attack_cycle_ms
    {
        *state = EnemyState::Running;
    }

    match flight.phase {
        FlightPhase::Hovering => {
            body.velocity.y = 0.0;
            if dx.abs() > FLYER_DIVE_DISTANCE {
                // Out of range: the patrol band follows us toward the target.
                body.velocity.x = stats.movement_speed * dx.signum();
                flight.home_x = center.x;
            } else {
                if center.x > flight.home_x + FLYER_HOVER_BAND {
                    flight.patrol_sign = -1.0;
                } else if center.x < flight.home_x - FLYER_HOVER_BAND {
                    flight.patrol_sign = 1.0;
                }
                let next_x = center.x + stats.movement_speed * flight.patrol_sign * ctx.dt;
                if (next_x - target_center.x).abs() > FLYER_DIVE_DISTANCE {
                    flight.patrol_sign = -flight.patrol_sign;
                }
                body.velocity.x = stats.movement_speed * 0.6 * flight.patrol_sign;

                if ctx.now_ms.saturating_sub(flight.last_roll_ms) >= FLYER_DIVE_ROLL_MS {
                    flight.last_roll_ms = ctx.now_ms;
                    if rng.random_bool(FLYER_DIVE_CHANCE) {
                        flight.phase = FlightPhase::Diving {
                            target_y: target_center.y,
                        };
                    }
                }
            }
            if !matches!(state, EnemyState::Attacking { .. }) {
                *state = EnemyState::Running;
            }
        }
        FlightPhase::Diving { target_y } => {
            body.velocity.x = stats.movement_speed * 0.5 * dx.signum();
            body.velocity.y = FLYER_DIVE_SPEED;

            let reach = body.rect.inflated(stats.attack_range, stats.attack_range / 2.0);
            if reach.overlaps(&target.rect) {
                strike = Some(Strike {
                    rect: reach,
                    damage: stats.damage,
                    knockback: Vec2::ZERO,
                });
                *state = EnemyState::Attacking {
                    started_ms: ctx.now_ms,
                    hit_done: true,
                };
                flight.phase = FlightPhase::Rising;
            } else if center.y >= target_y {
                flight.phase = FlightPhase::Rising;
            }
        }
        FlightPhase::Rising => {
            body.velocity.x = 0.0;
            body.velocity.y = -FLYER_RISE_SPEED;
            if body.rect.y <= flight.hover_y {
                body.rect.y = flight.hover_y;
                body.velocity.y = 0.0;
                flight.phase = FlightPhase::Hovering;
                flight.last_roll_ms = ctx.now_ms;
            }
        }
    }

    body.acceleration.x = 0.0;
    body.rect.x += body.velocity.x * ctx.dt;
    strike
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::enemies::EnemyKind;
    use common::{constants::GROUND_Y, geometry::Aabb, protocol::NetId};

    fn setup(x: f32) -> (Flight, EnemyState, EnemyStats, Body) {
        let stats = EnemyKind::Bat.stats();
        let body = Body::floating(Aabb::new(x - stats.width / 2.0, 260.0, stats.width, stats.height));
        (Flight::new(x, 260.0, 0), EnemyState::Idle, stats, body)
    }

    fn target(x: f32) -> TargetView {
        TargetView {
            id: NetId(1),
            rect: Aabb::new(x - 20.0, GROUND_Y - 90.0, 40.0, 90.0),
        }
    }

    #[test]
    fn chases_when_far_from_target() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut flight, mut state, stats, mut body) = setup(200.0);
        let ctx = TickContext {
            now_ms: 0,
            dt: 1.0,
            targets: &[],
        };
        fly(&mut flight, &mut state, &stats, &mut body, &target(1200.0), &ctx, &mut rng);
        assert_eq!(flight.phase, FlightPhase::Hovering);
        assert!(body.velocity.x > 0.0);
    }

    #[test]
    fn dive_ends_in_rise_and_returns_to_hover() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut flight, mut state, stats, mut body) = setup(500.0);
        let far_side = target(500.0 + FLYER_DIVE_DISTANCE - 1.0);
        flight.phase = FlightPhase::Diving { target_y: 300.0 };
        body.rect.y = 300.0;

        let ctx = TickContext {
            now_ms: 0,
            dt: 1.0,
            targets: &[],
        };
        let strike = fly(&mut flight, &mut state, &stats, &mut body, &far_side, &ctx, &mut rng);
        assert!(strike.is_none());
        assert_eq!(flight.phase, FlightPhase::Rising);

        for _ in 0..100 {
            fly(&mut flight, &mut state, &stats, &mut body, &far_side, &ctx, &mut rng);
            body.rect.y += body.velocity.y;
            if flight.phase == FlightPhase::Hovering {
                break;
            }
        }
        assert_eq!(flight.phase, FlightPhase::Hovering);
        assert_eq!(body.rect.y, 260.0);
    }

    #[test]
    fn dive_into_reach_strikes() {
        let mut rng = StdRng::seed_from_u64(3);
        let (mut flight, mut state, stats, mut body) = setup(500.0);
        let below = target(510.0);
        flight.phase = FlightPhase::Diving { target_y: below.rect.center().y };
        body.rect.y = below.rect.y - stats.height;

        let ctx = TickContext {
            now_ms: 40,
            dt: 1.0,
            targets: &[],
        };
        let strike = fly(&mut flight, &mut state, &stats, &mut body, &below, &ctx, &mut rng);
        assert!(strike.is_some());
        assert_eq!(flight.phase, FlightPhase::Rising);
        assert!(matches!(state, EnemyState::Attacking { .. }));
    }
}

use bevy_ecs::prelude::*;
use rand::Rng;

use common::{
    collision::integrate_horizontal,
    combat::directional_knockback,
    components::{Body, Facing},
    constants::{FRICTION, GROUND_Y},
    geometry::Aabb,
    protocol::NetId,
};

use super::{
    EnemyKind, EnemyStats,
    armor::Helmet,
    attack::{Strike, frontal_rect},
    boss::{self, BossBrain},
    flyer::{self, Flight},
    targeting::{TargetView, in_attack_reach, nearest_target},
};
use crate::constants::{ENEMY_FADE_OUT_MS, ENEMY_STRIKE_FORWARD, ENEMY_STRIKE_LIFT, FLYER_HOVER_Y};

// ============================================================================
// Enemy State
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Running,
    Attacking { started_ms: u64, hit_done: bool },
}

// Archetype-specific state carried next to the shared machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Special {
    None,
    Armored(Helmet),
    Flyer(Flight),
    Boss(BossBrain),
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub stats: EnemyStats,
    pub state: EnemyState,
    pub special: Special,
    pub dying_since: Option<u64>,
    pub finalized: bool,
    pub revive_eligible: bool,
    pub target: Option<NetId>,
}

impl Enemy {
    #[must_use]
    pub fn new(kind: EnemyKind, stats: EnemyStats, home_x: f32, now_ms: u64) -> Self {
        let special = match kind {
            EnemyKind::Helmeted => stats.helmet_health.map_or(Special::None, |hp| Special::Armored(Helmet::new(hp))),
            EnemyKind::Bat => Special::Flyer(Flight::new(home_x, FLYER_HOVER_Y, now_ms)),
            EnemyKind::Boss => Special::Boss(BossBrain::new(now_ms)),
            _ => Special::None,
        };
        Self {
            kind,
            stats,
            state: EnemyState::Idle,
            special,
            dying_since: None,
            finalized: false,
            revive_eligible: stats.revenant_chance > 0.0,
            target: None,
        }
    }

    // Body placed with its center at `center_x`: standing on the ground, or at hover height
    // for flyers.
    #[must_use]
    pub fn body_at(&self, center_x: f32) -> Body {
        let x = center_x - self.stats.width / 2.0;
        if self.stats.flying {
            Body::floating(Aabb::new(x, FLYER_HOVER_Y, self.stats.width, self.stats.height))
        } else {
            Body::new(Aabb::new(x, GROUND_Y - self.stats.height, self.stats.width, self.stats.height))
        }
    }

    #[must_use]
    pub fn is_dying(&self) -> bool {
        self.dying_since.is_some()
    }

    #[must_use]
    pub fn is_attacking(&self) -> bool {
        matches!(self.state, EnemyState::Attacking { .. })
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == EnemyState::Running
    }

    // Entry into dying is one-way.
    pub fn mark_dying(&mut self, now_ms: u64) {
        if self.dying_since.is_none() {
            self.dying_since = Some(now_ms);
            self.state = EnemyState::Idle;
        }
    }

    #[must_use]
    pub fn fade_elapsed(&self, now_ms: u64) -> Option<u64> {
        self.dying_since.map(|since| now_ms.saturating_sub(since))
    }

    // Only reaches 0 once the full fade-out has run.
    #[must_use]
    pub fn fade_alpha(&self, now_ms: u64) -> u8 {
        let Some(elapsed) = self.fade_elapsed(now_ms) else {
            return 255;
        };
        let remaining = 1.0 - elapsed.min(ENEMY_FADE_OUT_MS) as f32 / ENEMY_FADE_OUT_MS as f32;
        (255.0 * remaining).ceil() as u8
    }

    // True exactly once: on the first poll after the fade-out has fully run.
    pub fn take_finalization(&mut self, now_ms: u64) -> bool {
        if self.finalized || self.fade_elapsed(now_ms).is_none_or(|elapsed| elapsed < ENEMY_FADE_OUT_MS) {
            return false;
        }
        self.finalized = true;
        true
    }

    #[must_use]
    pub fn helmet(&self) -> Option<&Helmet> {
        match &self.special {
            Special::Armored(helmet) => Some(helmet),
            _ => None,
        }
    }
}

// ============================================================================
// Per-Tick Behavior
// ============================================================================

pub struct TickContext<'a> {
    pub now_ms: u64,
    pub dt: f32,
    pub targets: &'a [TargetView],
}

// Advance one enemy by one tick. Returns a strike when an attack reaches its hit frame.
pub fn think(
    enemy: &mut Enemy,
    body: &mut Body,
    facing: &mut Facing,
    ctx: &TickContext,
    rng: &mut impl Rng,
) -> Option<Strike> {
    if enemy.is_dying() {
        if enemy.stats.flying {
            body.gravity_scale = 1.0;
            body.velocity.x = 0.0;
        } else {
            integrate_horizontal(body, 0.0, FRICTION, ctx.dt);
        }
        return None;
    }

    if enemy.helmet().is_some_and(|h| h.is_breaking(ctx.now_ms)) {
        enemy.state = EnemyState::Idle;
        integrate_horizontal(body, 0.0, FRICTION, ctx.dt);
        return None;
    }

    let Some(target) = nearest_target(body.center(), ctx.targets).copied() else {
        enemy.target = None;
        if !enemy.is_attacking() {
            enemy.state = EnemyState::Idle;
        }
        if !enemy.stats.flying {
            integrate_horizontal(body, 0.0, FRICTION, ctx.dt);
        }
        return None;
    };
    enemy.target = Some(target.id);

    // Turn only when the side actually changes, and never mid-swing.
    if !enemy.is_attacking()
        && let Some(toward) = Facing::toward(target.rect.center().x - body.center().x)
        && toward != *facing
    {
        *facing = toward;
    }

    let stats = enemy.stats;
    if let Special::Flyer(flight) = &mut enemy.special {
        return flyer::fly(flight, &mut enemy.state, &stats, body, &target, ctx, rng);
    }
    ground_step(enemy, body, *facing, &target, ctx)
}

fn ground_step(enemy: &mut Enemy, body: &mut Body, facing: Facing, target: &TargetView, ctx: &TickContext) -> Option<Strike> {
    if let EnemyState::Attacking { started_ms, hit_done } = enemy.state {
        let elapsed = ctx.now_ms.saturating_sub(started_ms);
        let mut strike = None;
        if !hit_done && elapsed >= enemy.stats.attack_hit_ms {
            enemy.state = EnemyState::Attacking {
                started_ms,
                hit_done: true,
            };
            strike = Some(build_strike(enemy, &body.rect, facing));
        }
        if elapsed >= enemy.stats.attack_cycle_ms {
            enemy.state = EnemyState::Idle;
            if let Special::Boss(brain) = &mut enemy.special {
                brain.current = None;
            }
        }
        integrate_horizontal(body, 0.0, FRICTION, ctx.dt);
        return strike;
    }

    let dx = (target.rect.center().x - body.center().x).abs();
    let engage = in_attack_reach(&body.rect, enemy.stats.attack_range, &target.rect);
    let engage = match &mut enemy.special {
        Special::Boss(brain) if engage => {
            brain.current = BossBrain::choose_attack(dx, enemy.stats.attack_range);
            brain.current.is_some()
        }
        _ => engage,
    };

    if engage {
        enemy.state = EnemyState::Attacking {
            started_ms: ctx.now_ms,
            hit_done: false,
        };
        integrate_horizontal(body, 0.0, FRICTION, ctx.dt);
    } else {
        enemy.state = EnemyState::Running;
        integrate_horizontal(body, enemy.stats.movement_speed * facing.sign(), FRICTION, ctx.dt);
    }
    None
}

#[must_use]
pub fn build_strike(enemy: &Enemy, rect: &Aabb, facing: Facing) -> Strike {
    if let Special::Boss(brain) = &enemy.special
        && let Some(attack) = brain.current
    {
        return boss::boss_strike(attack, rect, facing, &enemy.stats);
    }
    Strike {
        rect: frontal_rect(rect, facing, enemy.stats.attack_range),
        damage: enemy.stats.damage,
        knockback: directional_knockback(facing.sign(), ENEMY_STRIKE_FORWARD, ENEMY_STRIKE_LIFT),
    }
}

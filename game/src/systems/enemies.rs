use bevy_ecs::prelude::*;
use bevy_math::Vec2;
use bevy_time::Time;
use tracing::{debug, trace};

use common::{
    collision::apply_knockback,
    combat::Vitals,
    components::{Body, Facing},
    geometry::Aabb,
    markers::{EnemyMarker, Mirrored, PlayerMarker},
    protocol::NetId,
};

use super::{now_ms, tick_dt};
use crate::{
    components::Player,
    constants::{BOSS_SUMMON_COUNT, DROPPED_HELMET_SIZE},
    enemies::{
        DroppedHelmet, Enemy, EnemyKind, EnemyState, EnemyStats, Special, TargetView, TickContext, build_strike,
        route_hit, think, zone_for_reach,
    },
    messages::{BossSummonDue, EnemyAttack, EnemyFinalized, HelmetBroke, MeleeSwing},
    resources::{EnemyMap, NetIds, SimRng},
};

// ============================================================================
// Enemy Spawning
// ============================================================================

pub fn spawn_enemy(
    commands: &mut Commands,
    ids: &mut NetIds,
    enemies: &mut EnemyMap,
    kind: EnemyKind,
    stats: EnemyStats,
    center_x: f32,
    now_ms: u64,
) -> NetId {
    let id = ids.allocate();
    let enemy = Enemy::new(kind, stats, center_x, now_ms);
    let body = enemy.body_at(center_x);
    let entity = commands
        .spawn((
            EnemyMarker,
            id,
            Vitals::new(stats.health, stats.headshot_multiplier),
            body,
            Facing::Left,
            enemy,
        ))
        .id();
    enemies.0.insert(id, entity);
    debug!("spawned {:?} {:?} at x={:.0} ({:.0} hp)", kind, id, center_x, stats.health);
    id
}

// ============================================================================
// Enemy AI System
// ============================================================================

pub fn enemy_ai_system(
    time: Res<Time>,
    mut rng: ResMut<SimRng>,
    players: Query<(&NetId, &Body, &Player), (With<PlayerMarker>, Without<EnemyMarker>)>,
    mut enemies: Query<(&NetId, &mut Enemy, &mut Body, &mut Facing), (With<EnemyMarker>, Without<Mirrored>)>,
    mut attacks: MessageWriter<EnemyAttack>,
    mut summons: MessageWriter<BossSummonDue>,
) {
    let now = now_ms(&time);
    let targets: Vec<TargetView> = players
        .iter()
        .filter(|(_, _, player)| !player.downed)
        .map(|(id, body, _)| TargetView { id: *id, rect: body.rect })
        .collect();
    let ctx = TickContext {
        now_ms: now,
        dt: tick_dt(&time),
        targets: &targets,
    };

    for (id, mut enemy, mut body, mut facing) in &mut enemies {
        if let Some(strike) = think(&mut enemy, &mut body, &mut facing, &ctx, &mut rng.0) {
            trace!("{:?} strikes", id);
            attacks.write(EnemyAttack { attacker: *id, strike });
        }

        let dying = enemy.is_dying();
        if let Special::Boss(brain) = &mut enemy.special
            && !dying
            && brain.summon_due(now)
        {
            debug!("boss {:?} summons", id);
            summons.write(BossSummonDue {
                count: BOSS_SUMMON_COUNT,
            });
        }
    }
}

// A guest never runs enemy AI. It replays the attack timing of mirrored enemies so strikes
// land on its own player.
pub fn mirrored_enemy_strike_system(
    time: Res<Time>,
    mut enemies: Query<(&NetId, &mut Enemy, &Body, &Facing), (With<EnemyMarker>, With<Mirrored>)>,
    mut attacks: MessageWriter<EnemyAttack>,
) {
    let now = now_ms(&time);

    for (id, mut enemy, body, facing) in &mut enemies {
        let EnemyState::Attacking { started_ms, hit_done } = enemy.state else {
            continue;
        };
        if hit_done || enemy.is_dying() || now.saturating_sub(started_ms) < enemy.stats.attack_hit_ms {
            continue;
        }
        enemy.state = EnemyState::Attacking {
            started_ms,
            hit_done: true,
        };
        attacks.write(EnemyAttack {
            attacker: *id,
            strike: build_strike(&enemy, &body.rect, *facing),
        });
    }
}

// ============================================================================
// Melee Hit System
// ============================================================================

pub fn melee_hit_system(
    time: Res<Time>,
    mut swings: MessageReader<MeleeSwing>,
    mut enemies: Query<(&mut Enemy, &mut Vitals, &mut Body), With<EnemyMarker>>,
) {
    let now = now_ms(&time);

    for swing in swings.read() {
        // A swing can catch every enemy in reach.
        for (mut enemy, mut vitals, mut body) in &mut enemies {
            if enemy.is_dying() || !swing.rect.overlaps(&body.rect) {
                continue;
            }
            let zone = zone_for_reach(&swing.rect, &body.rect, &enemy);
            let report = route_hit(&mut enemy, &mut vitals, swing.damage, Some(swing.owner), zone, now);
            apply_knockback(&mut body, Vec2::new(swing.knockback, 0.0));
            trace!("melee hit for {:.1}", report.applied);
        }
    }
}

// ============================================================================
// Enemy Lifecycle
// ============================================================================

// Remove enemies whose fade-out has finished and hand them to wave accounting.
pub fn enemy_lifecycle_system(
    mut commands: Commands,
    time: Res<Time>,
    mut enemy_map: ResMut<EnemyMap>,
    mut enemies: Query<(Entity, &NetId, &mut Enemy, &Body, &Vitals), (With<EnemyMarker>, Without<Mirrored>)>,
    mut finalized: MessageWriter<EnemyFinalized>,
) {
    let now = now_ms(&time);

    for (entity, id, mut enemy, body, vitals) in &mut enemies {
        if !enemy.take_finalization(now) {
            continue;
        }
        finalized.write(EnemyFinalized {
            id: *id,
            kind: enemy.kind,
            killer: vitals.killer,
            headshot: vitals.headshot_kill,
            center_x: body.center().x,
            enemy: enemy.clone(),
        });
        enemy_map.0.remove(id);
        commands.entity(entity).despawn();
    }
}

pub fn helmet_drop_system(mut commands: Commands, time: Res<Time>, mut broken: MessageReader<HelmetBroke>) {
    let now = now_ms(&time);

    for helmet in broken.read() {
        let mut body = Body::new(Aabb::from_center(helmet.at, DROPPED_HELMET_SIZE, DROPPED_HELMET_SIZE));
        body.velocity = Vec2::new(0.0, -4.0);
        commands.spawn((DroppedHelmet { dropped_ms: now }, body));
    }
}

pub fn dropped_helmet_fade_system(
    mut commands: Commands,
    time: Res<Time>,
    helmets: Query<(Entity, &DroppedHelmet)>,
) {
    let now = now_ms(&time);

    for (entity, helmet) in &helmets {
        if helmet.faded(now) {
            commands.entity(entity).despawn();
        }
    }
}

use bevy_ecs::prelude::*;
use bevy_time::Time;
use tracing::{debug, trace};

use common::{
    collision::{apply_knockback, sweep_segment_vs_aabb},
    combat::Vitals,
    components::Body,
    constants::BULLET_THICKNESS,
    markers::{BulletMarker, EnemyMarker, Mirrored},
    projectiles::{Blast, Bullet, BulletState, BurnZone, Detonation},
    protocol::NetId,
};

use super::{now_ms, tick_dt};
use crate::{
    enemies::{Enemy, HitZone, damage::zone_for_segment, head_rect, route_hit},
    messages::{BulletHit, DetonationRequested, HelmetBroke},
    resources::{BulletMap, MapLayout, PeerRole},
};

// ============================================================================
// Bullet System
// ============================================================================

// Move every bullet along its line, resolve what it crossed this tick, and clear out spent
// rounds. Only the authority applies damage; a guest's bullets are moved for display and
// their hits are resolved by the host from the mirrored copy.
pub fn bullet_system(
    mut commands: Commands,
    time: Res<Time>,
    role: Res<PeerRole>,
    map: Res<MapLayout>,
    mut bullet_map: ResMut<BulletMap>,
    mut bullets: Query<(Entity, &NetId, &mut Bullet, Has<Mirrored>), With<BulletMarker>>,
    mut enemies: Query<(&NetId, &mut Enemy, &mut Vitals, &Body), With<EnemyMarker>>,
    mut hits: MessageWriter<BulletHit>,
    mut detonations: MessageWriter<DetonationRequested>,
    mut helmets: MessageWriter<HelmetBroke>,
) {
    let now = now_ms(&time);
    let dt = tick_dt(&time);

    for (entity, id, mut bullet, mirrored) in &mut bullets {
        if !bullet.is_flying() {
            if bullet.ready_to_despawn(now) {
                bullet_map.remove(*id);
                if mirrored {
                    bullet_map.retired.insert(*id);
                }
                commands.entity(entity).despawn();
            }
            continue;
        }

        let (from, to) = bullet.advance(dt);

        // Nearest wall crossing bounds how far along the segment targets can be hit.
        let wall = map
            .obstacles
            .iter()
            .filter_map(|obstacle| sweep_segment_vs_aabb(from, to, &obstacle.rect, BULLET_THICKNESS))
            .min_by(|a, b| a.t.total_cmp(&b.t));
        let wall_t = wall.map_or(f32::INFINITY, |sweep| sweep.t);

        if role.is_authority() {
            let mut crossed: Vec<_> = enemies
                .iter()
                .filter(|(_, enemy, _, _)| !enemy.is_dying())
                .filter_map(|(target, enemy, _, body)| {
                    zone_for_segment(from, to, BULLET_THICKNESS, &body.rect, enemy)
                        .filter(|(_, sweep)| sweep.t <= wall_t)
                        .map(|(zone, sweep)| (*target, zone, sweep.t))
                })
                .collect();
            crossed.sort_by(|a, b| a.2.total_cmp(&b.2));

            for (target, zone, _) in crossed {
                let Some(strike) = bullet.strike(target, now) else {
                    continue;
                };
                let Some((_, mut enemy, mut vitals, body)) = enemies.iter_mut().find(|(candidate, ..)| **candidate == target)
                else {
                    continue;
                };
                let report = route_hit(&mut enemy, &mut vitals, strike.damage, Some(bullet.owner), zone, now);
                hits.write(BulletHit { shooter: bullet.owner });
                if report.helmet_broke {
                    helmets.write(HelmetBroke {
                        at: head_rect(&body.rect, &enemy.stats).center(),
                    });
                }
                trace!("{:?} hit {:?} ({:?}) for {:.1}", id, target, zone, report.applied);
                if !bullet.is_flying() {
                    break;
                }
            }
        }

        if bullet.is_flying() {
            if let Some(sweep) = wall {
                bullet.rect.set_center(sweep.point);
                bullet.terminate(now);
            } else if !map.in_bounds(&bullet.rect) {
                bullet.state = BulletState::Spent;
            } else if bullet.range_exhausted() {
                bullet.terminate(now);
            }
        }

        // Explosive rounds burst wherever they stopped.
        if let (BulletState::Exploding { since_ms }, Some(stats)) = (bullet.state, bullet.explosion)
            && since_ms == now
        {
            debug!("{:?} exploded", id);
            detonations.write(DetonationRequested {
                owner: bullet.owner,
                detonation: Detonation::Blast {
                    center: bullet.rect.center(),
                    damage: bullet.total_damage,
                    stats,
                },
                thrown: None,
            });
        }
    }
}

// ============================================================================
// Detonation, Blast and Burn Systems
// ============================================================================

pub fn detonation_system(
    mut commands: Commands,
    time: Res<Time>,
    mut detonations: MessageReader<DetonationRequested>,
) {
    let now = now_ms(&time);

    for request in detonations.read() {
        match request.detonation {
            Detonation::Blast { center, damage, stats } => {
                commands.spawn(Blast::new(request.owner, center, damage, stats, now));
            }
            Detonation::Burn { ground, stats } => {
                commands.spawn(BurnZone::new(request.owner, ground, stats, now));
            }
        }
    }
}

// Splash damage lands once, on the first tick the blast exists. Splash and fire have no
// aim point, so they always land on the body and a helmet never soaks them.
pub fn blast_system(
    mut commands: Commands,
    time: Res<Time>,
    role: Res<PeerRole>,
    mut blasts: Query<(Entity, &mut Blast)>,
    mut enemies: Query<(&NetId, &mut Enemy, &mut Vitals, &mut Body), With<EnemyMarker>>,
) {
    let now = now_ms(&time);

    for (entity, mut blast) in &mut blasts {
        if !blast.resolved {
            blast.resolved = true;
            if role.is_authority() {
                for (id, mut enemy, mut vitals, mut body) in &mut enemies {
                    if enemy.is_dying() || !blast.reaches(&body.rect) || !blast.hit_targets.record(*id) {
                        continue;
                    }
                    let damage = blast.damage_for(&body.rect);
                    route_hit(&mut enemy, &mut vitals, damage, Some(blast.owner), HitZone::Body, now);
                    let push = blast.knockback_for(&body.rect);
                    apply_knockback(&mut body, push);
                }
                debug!("blast hit {} enemies", blast.hit_targets.len());
            }
        }
        if blast.finished(now) {
            commands.entity(entity).despawn();
        }
    }
}

pub fn burn_system(
    mut commands: Commands,
    time: Res<Time>,
    role: Res<PeerRole>,
    mut zones: Query<(Entity, &mut BurnZone)>,
    mut enemies: Query<(&mut Enemy, &mut Vitals, &Body), With<EnemyMarker>>,
) {
    let now = now_ms(&time);

    for (entity, mut zone) in &mut zones {
        if zone.expired(now) {
            commands.entity(entity).despawn();
            continue;
        }
        if !zone.pulse(now) || !role.is_authority() {
            continue;
        }
        for (mut enemy, mut vitals, body) in &mut enemies {
            if !enemy.is_dying() && zone.rect.overlaps(&body.rect) {
                route_hit(
                    &mut enemy,
                    &mut vitals,
                    zone.stats.damage_per_tick,
                    Some(zone.owner),
                    HitZone::Body,
                    now,
                );
            }
        }
    }
}

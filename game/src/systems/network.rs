use bevy_ecs::prelude::*;
use bevy_math::Vec2;
use bevy_time::Time;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, trace, warn};

use common::{
    combat::Vitals,
    components::{Body, Facing},
    constants::PLAYER_MAX_HEALTH,
    geometry::Aabb,
    markers::{BulletMarker, EnemyMarker, Mirrored, PlayerMarker},
    net::{plan_reconcile, sync_health},
    projectiles::{Bullet, Detonation},
    protocol::{
        DetonationFrame, EnemyFrame, NetId, PeerSnapshot, PlayerFrame, SwingFrame, decode_snapshot, encode_snapshot,
    },
    weapons::ThrowableKind,
};

use super::now_ms;
use crate::{
    components::Player,
    constants::SNAPSHOT_EVERY_TICKS,
    enemies::{Enemy, EnemyKind, EnemyState},
    messages::{DetonationRequested, MeleeSwing},
    resources::{
        BulletMap, EnemyMap, PeerInbox, PeerLink, PeerOutbox, PeerRole, PlayerMap, TickCount, WaveProgress,
    },
    waves::WaveResult,
};

// ============================================================================
// Receive
// ============================================================================

// Decode everything the other peer sent since last tick. Undecodable payloads are dropped.
pub fn network_receive_system(link: Option<ResMut<PeerLink>>, mut inbox: ResMut<PeerInbox>) {
    inbox.0.clear();
    let Some(mut link) = link else {
        return;
    };

    loop {
        match link.try_recv() {
            Ok(bytes) => match decode_snapshot(&bytes) {
                Ok(snapshot) => inbox.0.push(snapshot),
                Err(err) => warn!("dropping undecodable snapshot ({} bytes): {err:#}", bytes.len()),
            },
            Err(TryRecvError::Empty) => break,
            Err(TryRecvError::Disconnected) => {
                debug!("peer link closed");
                break;
            }
        }
    }
}

fn apply_body(body: &mut Body, rect: Aabb, velocity: Vec2, acceleration: Vec2) {
    body.rect = rect;
    body.velocity = velocity;
    body.acceleration = acceleration;
}

// ============================================================================
// Mirror Players
// ============================================================================

pub fn mirror_players_system(
    mut commands: Commands,
    inbox: Res<PeerInbox>,
    mut player_map: ResMut<PlayerMap>,
    mut players: Query<(&mut Player, &mut Body, &mut Facing, &mut Vitals), (With<PlayerMarker>, With<Mirrored>)>,
) {
    for snapshot in &inbox.0 {
        let frame = &snapshot.player;
        let Some(&entity) = player_map.0.get(&frame.id) else {
            let entity = commands.spawn(mirrored_player(frame)).id();
            player_map.0.insert(frame.id, entity);
            info!("peer player {:?} joined as slot {}", frame.id, frame.slot.0);
            continue;
        };

        // Local players are never overwritten by the peer.
        let Ok((mut player, mut body, mut facing, mut vitals)) = players.get_mut(entity) else {
            continue;
        };
        apply_body(&mut body, frame.rect, frame.velocity.into(), frame.acceleration.into());
        body.previous_rect = frame.previous_rect;
        player.aim_angle = frame.aim_angle;
        player.flags = frame.flags;
        *facing = aim_facing(frame.aim_angle);
        sync_health(&mut vitals, frame.health, frame.health <= 0.0);
        player.downed = vitals.dying;
    }
}

fn mirrored_player(frame: &PlayerFrame) -> impl Bundle {
    let mut body = Body::new(frame.rect);
    body.previous_rect = frame.previous_rect;
    body.velocity = frame.velocity.into();
    body.acceleration = frame.acceleration.into();

    let mut vitals = Vitals::new(PLAYER_MAX_HEALTH, 1.0);
    sync_health(&mut vitals, frame.health, frame.health <= 0.0);

    let mut player = Player::new(frame.slot);
    player.aim_angle = frame.aim_angle;
    player.flags = frame.flags;
    player.downed = vitals.dying;

    (PlayerMarker, Mirrored, frame.id, player, body, aim_facing(frame.aim_angle), vitals)
}

// Players always face where they aim.
fn aim_facing(aim_angle: f32) -> Facing {
    if aim_angle.cos() < 0.0 { Facing::Left } else { Facing::Right }
}

// ============================================================================
// Mirror Bullets
// ============================================================================

// Bullets the peer owns. Ids absent from the peer's list are gone on its side too.
pub fn mirror_bullets_system(
    mut commands: Commands,
    inbox: Res<PeerInbox>,
    mut bullet_map: ResMut<BulletMap>,
    mut bullets: Query<&mut Bullet, (With<BulletMarker>, With<Mirrored>)>,
) {
    for snapshot in &inbox.0 {
        // Spawns queued by an earlier snapshot this tick are already mapped, so a repeated
        // id becomes an update (skipped until the entity exists) rather than a second copy.
        let local = bullet_map.mirrored();
        let plan = plan_reconcile(&local, &snapshot.bullets, |frame| frame.id, |_| true);

        for (entity, frame) in plan.update {
            if let Ok(mut bullet) = bullets.get_mut(entity)
                && bullet.is_flying()
            {
                bullet.follow(frame);
            }
        }
        for frame in plan.spawn {
            if bullet_map.retired.contains(&frame.id) {
                continue;
            }
            let Some(bullet) = Bullet::mirrored(frame) else {
                debug!(
                    "skipping bullet {:?} with unknown tags {}/{}",
                    frame.id, frame.kind_tag, frame.weapon_tag
                );
                continue;
            };
            let entity = commands.spawn((BulletMarker, Mirrored, frame.id, bullet)).id();
            bullet_map.entities.insert(frame.id, entity);
            bullet_map.peer.insert(frame.id);
        }
        for (id, entity) in plan.despawn {
            bullet_map.remove(id);
            commands.entity(entity).despawn();
        }

        // Retired ids the peer has stopped sending can be forgotten.
        let live: Vec<NetId> = snapshot.bullets.iter().map(|frame| frame.id).collect();
        bullet_map.retired.retain(|id| live.contains(id));
    }
}

// ============================================================================
// Mirror Enemies (guest)
// ============================================================================

pub fn mirror_enemies_system(
    mut commands: Commands,
    time: Res<Time>,
    inbox: Res<PeerInbox>,
    mut enemy_map: ResMut<EnemyMap>,
    mut enemies: Query<(&mut Enemy, &mut Body, &mut Facing, &mut Vitals), (With<EnemyMarker>, With<Mirrored>)>,
) {
    let now = now_ms(&time);

    for snapshot in &inbox.0 {
        let Some(frames) = &snapshot.enemies else {
            continue;
        };
        let plan = plan_reconcile(&enemy_map.0, frames, |frame| frame.id, |_| true);

        for (entity, frame) in plan.update {
            if let Ok((mut enemy, mut body, mut facing, mut vitals)) = enemies.get_mut(entity) {
                update_enemy(&mut enemy, &mut body, &mut facing, &mut vitals, frame, now);
            }
        }
        for frame in plan.spawn {
            let Some(kind) = EnemyKind::from_tag(frame.kind_tag) else {
                debug!("skipping enemy {:?} with unknown kind tag {}", frame.id, frame.kind_tag);
                continue;
            };
            let stats = kind.stats();
            let mut enemy = Enemy::new(kind, stats, frame.rect.center().x, now);
            let mut body = enemy.body_at(frame.rect.center().x);
            let mut facing = Facing::from_i8(frame.direction);
            let mut vitals = Vitals::new(stats.health.max(frame.health), stats.headshot_multiplier);
            update_enemy(&mut enemy, &mut body, &mut facing, &mut vitals, frame, now);

            let entity = commands
                .spawn((EnemyMarker, Mirrored, frame.id, enemy, body, facing, vitals))
                .id();
            enemy_map.0.insert(frame.id, entity);
        }
        for (id, entity) in plan.despawn {
            enemy_map.0.remove(&id);
            commands.entity(entity).despawn();
        }
    }
}

fn update_enemy(enemy: &mut Enemy, body: &mut Body, facing: &mut Facing, vitals: &mut Vitals, frame: &EnemyFrame, now: u64) {
    apply_body(body, frame.rect, frame.velocity.into(), frame.acceleration.into());
    body.grounded = frame.grounded;
    *facing = Facing::from_i8(frame.direction);
    sync_health(vitals, frame.health, frame.dying);

    if frame.dying {
        enemy.mark_dying(now);
        return;
    }
    enemy.state = match (frame.attacking, enemy.state) {
        (true, state @ EnemyState::Attacking { .. }) => state,
        (true, _) => EnemyState::Attacking {
            started_ms: now,
            hit_done: false,
        },
        (false, _) if frame.running => EnemyState::Running,
        (false, _) => EnemyState::Idle,
    };
}

// The host settles every wave; a guest folds its own slot's payout into its player.
pub fn mirror_wave_results_system(
    inbox: Res<PeerInbox>,
    mut progress: ResMut<WaveProgress>,
    mut players: Query<&mut Player, (With<PlayerMarker>, Without<Mirrored>)>,
) {
    for snapshot in &inbox.0 {
        for frame in &snapshot.wave_results {
            let result = WaveResult::from_frame(frame);
            for mut player in players.iter_mut().filter(|player| player.slot == frame.slot) {
                player.score += result.score;
                player.money += result.money;
            }
            info!(
                "wave {} result for slot {}: {} score, {} money, {} of {} shots hit",
                frame.wave_index + 1,
                frame.slot.0,
                result.score,
                result.money,
                result.bullets_hit,
                result.bullets_fired
            );
            progress.received.push(frame.clone());
        }
    }
}

// ============================================================================
// Peer Attacks
// ============================================================================

// Queue the guest's melee swings and thrown charges for the host. Launcher rounds are not
// forwarded: the host already flies them as mirrored bullets.
pub fn forward_attacks_system(
    mut outbox: ResMut<PeerOutbox>,
    mut swings: MessageReader<MeleeSwing>,
    mut detonations: MessageReader<DetonationRequested>,
) {
    for swing in swings.read() {
        outbox.swings.push(SwingFrame {
            owner: swing.owner,
            rect: swing.rect,
            damage: swing.damage,
            knockback: swing.knockback,
        });
    }
    for request in detonations.read() {
        let Some(kind) = request.thrown else {
            continue;
        };
        outbox.detonations.push(DetonationFrame {
            owner: request.owner,
            throwable_tag: kind.tag(),
            at: request.detonation.at().into(),
        });
    }
}

// Replay the guest's attacks on the host so they resolve like the host's own.
pub fn peer_attacks_system(
    inbox: Res<PeerInbox>,
    mut swings: MessageWriter<MeleeSwing>,
    mut detonations: MessageWriter<DetonationRequested>,
) {
    for snapshot in &inbox.0 {
        for frame in &snapshot.swings {
            swings.write(MeleeSwing {
                owner: frame.owner,
                rect: frame.rect,
                damage: frame.damage,
                knockback: frame.knockback,
            });
        }
        for frame in &snapshot.detonations {
            let Some(kind) = ThrowableKind::from_tag(frame.throwable_tag) else {
                debug!("skipping detonation with unknown throwable tag {}", frame.throwable_tag);
                continue;
            };
            if let Some(detonation) = Detonation::of_throwable(&kind.stats(), frame.at.into()) {
                trace!("{:?} from {:?} went off", kind, frame.owner);
                detonations.write(DetonationRequested {
                    owner: frame.owner,
                    detonation,
                    thrown: Some(kind),
                });
            }
        }
    }
}

// ============================================================================
// Send
// ============================================================================

pub fn network_send_system(
    mut tick: ResMut<TickCount>,
    role: Res<PeerRole>,
    link: Option<Res<PeerLink>>,
    mut progress: ResMut<WaveProgress>,
    mut outbox: ResMut<PeerOutbox>,
    players: Query<(&NetId, &Player, &Body, &Vitals), (With<PlayerMarker>, Without<Mirrored>)>,
    bullets: Query<(&NetId, &Bullet), (With<BulletMarker>, Without<Mirrored>)>,
    enemies: Query<(&NetId, &Enemy, &Body, &Facing, &Vitals), (With<EnemyMarker>, Without<Mirrored>)>,
) {
    tick.0 += 1;
    let Some(link) = link.filter(|_| *role != PeerRole::Solo) else {
        progress.outbox.clear();
        outbox.swings.clear();
        outbox.detonations.clear();
        return;
    };
    if tick.0 % SNAPSHOT_EVERY_TICKS != 0 {
        return;
    }
    let Some((id, player, body, vitals)) = players.iter().next() else {
        return;
    };

    let host = *role == PeerRole::Host;
    let snapshot = PeerSnapshot {
        tick: tick.0,
        player: PlayerFrame {
            id: *id,
            slot: player.slot,
            rect: body.rect,
            previous_rect: body.previous_rect,
            velocity: body.velocity.into(),
            acceleration: body.acceleration.into(),
            health: vitals.health,
            aim_angle: player.aim_angle,
            flags: player.flags,
        },
        bullets: bullets
            .iter()
            .filter(|(_, bullet)| bullet.is_flying())
            .map(|(id, bullet)| bullet.frame(*id))
            .collect(),
        enemies: host.then(|| enemies.iter().map(enemy_frame).collect()),
        wave_results: if host {
            std::mem::take(&mut progress.outbox)
        } else {
            Vec::new()
        },
        swings: std::mem::take(&mut outbox.swings),
        detonations: std::mem::take(&mut outbox.detonations),
    };

    match encode_snapshot(&snapshot) {
        Ok(bytes) => {
            trace!("sending tick {} ({} bytes)", snapshot.tick, bytes.len());
            if !link.send(bytes) {
                debug!("peer link closed, snapshot dropped");
            }
        }
        Err(err) => warn!("failed to encode snapshot: {err:#}"),
    }
}

fn enemy_frame((id, enemy, body, facing, vitals): (&NetId, &Enemy, &Body, &Facing, &Vitals)) -> EnemyFrame {
    EnemyFrame {
        id: *id,
        kind_tag: enemy.kind.tag(),
        rect: body.rect,
        health: vitals.health,
        velocity: body.velocity.into(),
        acceleration: body.acceleration.into(),
        direction: facing.as_i8(),
        running: enemy.is_running(),
        attacking: enemy.is_attacking(),
        grounded: body.grounded,
        dying: enemy.is_dying(),
    }
}

use bevy_ecs::prelude::*;
use bevy_tasks::{AsyncComputeTaskPool, TaskPool, block_on};
use bevy_time::Time;
use std::collections::HashMap;
use tracing::{debug, info, warn};

use common::{
    components::Body,
    markers::PlayerMarker,
    protocol::{NetId, PlayerSlot},
};

use super::{enemies::spawn_enemy, now_ms};
use crate::{
    components::Player,
    constants::MIN_SPAWN_DISTANCE,
    enemies::{EnemyKind, roll_revenant},
    messages::{BossSummonDue, BulletHit, EnemyFinalized, ShotFired},
    resources::{EnemyAssets, EnemyMap, MapLayout, NetIds, SimRng, SimSettings, WaveProgress},
    waves::{WaveDirector, jitter_stats, sample_spawn_x},
};

// ============================================================================
// Wave Director System
// ============================================================================

// Queue the next wave and kick off its asset preload.
fn begin_next_wave(progress: &mut WaveProgress, assets: &EnemyAssets) {
    let index = progress.next_index;
    let template = progress.book.wave(index);
    let kinds: Vec<EnemyKind> = template.enemies.iter().map(|e| e.kind).collect();

    let provider = assets.0.clone();
    let pool = AsyncComputeTaskPool::get_or_init(TaskPool::default);
    progress.preload = Some(pool.spawn(async move { provider.preload(&kinds) }));
    progress.current = Some(WaveDirector::new(index, template));
    progress.next_index += 1;
    info!("wave {} queued", index + 1);
}

pub fn wave_director_system(
    mut commands: Commands,
    time: Res<Time>,
    settings: Res<SimSettings>,
    assets: Res<EnemyAssets>,
    map: Res<MapLayout>,
    mut progress: ResMut<WaveProgress>,
    mut rng: ResMut<SimRng>,
    mut ids: ResMut<NetIds>,
    mut enemy_map: ResMut<EnemyMap>,
    mut players: Query<(&mut Player, &Body), With<PlayerMarker>>,
    mut summons: MessageReader<BossSummonDue>,
) {
    let now = now_ms(&time);
    let progress = &mut *progress;
    if progress.run_over {
        return;
    }

    if !players.is_empty() && players.iter().all(|(player, _)| player.downed) {
        info!("all players down after {} waves", progress.history.len());
        progress.run_over = true;
        return;
    }

    if progress.current.is_none() {
        if settings.wave_limit.is_some_and(|limit| progress.next_index >= limit) {
            info!("finished all {} waves", progress.history.len());
            progress.run_over = true;
            return;
        }
        begin_next_wave(progress, &assets);
    }

    // Hold the wave until its assets are in.
    if let Some(task) = progress.preload.take() {
        if !task.is_finished() {
            progress.preload = Some(task);
            return;
        }
        if let Err(err) = block_on(task) {
            warn!("enemy asset preload failed: {err:#}");
        }
        if let Some(director) = progress.current.as_mut() {
            director.start();
        }
    }

    let Some(director) = progress.current.as_mut() else {
        return;
    };

    let players_x: Vec<f32> = players
        .iter()
        .filter(|(player, _)| !player.downed)
        .map(|(_, body)| body.center().x)
        .collect();

    let mut orders = director.update(now, &mut rng.0);
    for summon in summons.read() {
        orders.extend(director.summon(summon.count, &mut rng.0));
    }

    for order in orders {
        let base = order.kind.stats();
        let Some(center_x) = sample_spawn_x(map.width, base.width, &players_x, MIN_SPAWN_DISTANCE, &mut rng.0) else {
            warn!("no room to spawn {:?}, retrying later", order.kind);
            if order.boss {
                director.requeue_boss();
            } else {
                director.return_to_pool(order.kind);
            }
            continue;
        };
        let stats = if order.boss {
            base
        } else {
            jitter_stats(&base, &mut rng.0)
        };
        let id = spawn_enemy(&mut commands, &mut ids, &mut enemy_map, order.kind, stats, center_x, now);
        director.on_spawned(order.kind, id, order.boss);
    }

    if director.is_finished() {
        let results = director.settle();
        let index = director.index;
        for (mut player, _) in &mut players {
            if let Some(result) = results.get(usize::from(player.slot.0)) {
                player.score += result.score;
                player.money += result.money;
            }
        }
        for (slot, result) in results.iter().enumerate() {
            progress.outbox.push(result.frame(index, PlayerSlot(slot as u8)));
        }
        info!(
            "wave {} paid out {} / {} money, accuracy {:.0}%",
            index + 1,
            results[0].money,
            results[1].money,
            results[0].accuracy() * 100.0
        );
        progress.history.push(results);
        progress.current = None;
    }
}

// ============================================================================
// Wave Accounting System
// ============================================================================

// Kill credit, shot statistics and revenant rises for the running wave.
pub fn wave_accounting_system(
    mut commands: Commands,
    time: Res<Time>,
    mut progress: ResMut<WaveProgress>,
    mut rng: ResMut<SimRng>,
    mut ids: ResMut<NetIds>,
    mut enemy_map: ResMut<EnemyMap>,
    players: Query<(&NetId, &Player), With<PlayerMarker>>,
    mut finalized: MessageReader<EnemyFinalized>,
    mut shots: MessageReader<ShotFired>,
    mut hits: MessageReader<BulletHit>,
) {
    let now = now_ms(&time);
    let slots: HashMap<NetId, PlayerSlot> = players.iter().map(|(id, player)| (*id, player.slot)).collect();
    let Some(director) = progress.current.as_mut() else {
        return;
    };

    for shot in shots.read() {
        if let Some(result) = slots.get(&shot.shooter).and_then(|slot| director.result_mut(*slot)) {
            result.bullets_fired += shot.rounds;
        }
    }
    for hit in hits.read() {
        if let Some(result) = slots.get(&hit.shooter).and_then(|slot| director.result_mut(*slot)) {
            result.bullets_hit += 1;
        }
    }

    for event in finalized.read() {
        director.on_removed(event.kind, event.id);

        let credited = event.killer.and_then(|killer| slots.get(&killer)).copied();
        if let Some(result) = credited.and_then(|slot| director.result_mut(slot)) {
            let stats = &event.enemy.stats;
            result.credit_kill(stats.kill_score, event.headshot, stats.headshot_score_multiplier);
        }
        debug!(
            "{:?} {:?} removed ({} killed, {} alive)",
            event.kind, event.id, director.killed, director.alive
        );

        if let Some(risen) = roll_revenant(&event.enemy, event.center_x, &mut rng.0) {
            info!("{:?} rises again as {:?}", event.id, risen.kind);
            director.on_risen();
            let id = spawn_enemy(
                &mut commands,
                &mut ids,
                &mut enemy_map,
                risen.kind,
                risen.stats,
                risen.center_x,
                now,
            );
            director.on_spawned(risen.kind, id, false);
        }
    }
}

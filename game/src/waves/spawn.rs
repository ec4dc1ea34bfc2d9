use rand::Rng;

use crate::{
    constants::{JITTER_DAMAGE, JITTER_HEALTH, JITTER_SPEED},
    enemies::EnemyStats,
};

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}

fn jitter(value: f32, fraction: f32, rng: &mut impl Rng) -> f32 {
    round2(value * (1.0 + rng.random_range(-fraction..=fraction)))
}

// Independent per-spawn variation of health, speed and damage.
pub fn jitter_stats(base: &EnemyStats, rng: &mut impl Rng) -> EnemyStats {
    EnemyStats {
        health: jitter(base.health, JITTER_HEALTH, rng),
        movement_speed: jitter(base.movement_speed, JITTER_SPEED, rng),
        damage: jitter(base.damage, JITTER_DAMAGE, rng),
        ..*base
    }
}

// Sample a spawn center x uniformly across the map, at least `min_distance` from every player
// center. Checks first that such a position exists at all, then resamples until one is found.
pub fn sample_spawn_x(
    map_width: f32,
    enemy_width: f32,
    players_x: &[f32],
    min_distance: f32,
    rng: &mut impl Rng,
) -> Option<f32> {
    let lo = enemy_width / 2.0;
    let hi = map_width - enemy_width / 2.0;
    if hi < lo {
        return None;
    }

    // Merge the forbidden bands and see whether any of [lo, hi] survives.
    let mut bands: Vec<(f32, f32)> = players_x
        .iter()
        .map(|x| (x - min_distance, x + min_distance))
        .collect();
    bands.sort_by(|a, b| a.0.total_cmp(&b.0));
    let mut free = 0.0;
    let mut cursor = lo;
    for (start, end) in bands {
        if start > cursor {
            free += start.min(hi) - cursor;
        }
        cursor = cursor.max(end);
        if cursor >= hi {
            break;
        }
    }
    if cursor < hi {
        free += hi - cursor;
    }
    if free <= 0.0 {
        return None;
    }

    loop {
        let x = rng.random_range(lo..=hi);
        if players_x.iter().all(|p| (x - p).abs() >= min_distance) {
            return Some(x);
        }
    }
}

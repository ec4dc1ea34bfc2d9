use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{constants::BOSS_WAVE_EVERY, enemies::EnemyKind};

// ============================================================================
// Wave Templates
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    pub count: u32,
    pub spawn_chance_multiplier: f32,
    pub max_alive: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveTemplate {
    pub enemies: Vec<EnemyTemplate>,
    pub spawn_timer_ms: u64,
    pub timed_spawn_count: u32,
    pub money_multiplier: f32,
    #[serde(default)]
    pub boss: bool,
}

impl WaveTemplate {
    // Enemies the wave must clear. Unknown for boss waves until the boss is down.
    #[must_use]
    pub fn total_enemies(&self) -> Option<u32> {
        if self.boss {
            None
        } else {
            Some(self.enemies.iter().map(|e| e.count).sum())
        }
    }

    // Templates the spawn pool draws from (everything except the boss itself).
    #[must_use]
    pub fn pool_templates(&self) -> Vec<EnemyTemplate> {
        self.enemies.iter().copied().filter(|e| e.kind != EnemyKind::Boss).collect()
    }
}

const fn template(kind: EnemyKind, count: u32, spawn_chance_multiplier: f32, max_alive: u32) -> EnemyTemplate {
    EnemyTemplate {
        kind,
        count,
        spawn_chance_multiplier,
        max_alive,
    }
}

// ============================================================================
// Wave Book
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveBook {
    pub waves: Vec<WaveTemplate>,
}

impl Default for WaveBook {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WaveBook {
    #[must_use]
    pub fn builtin() -> Self {
        use EnemyKind::*;

        let wave = |enemies: Vec<EnemyTemplate>, spawn_timer_ms, timed_spawn_count, money_multiplier, boss| WaveTemplate {
            enemies,
            spawn_timer_ms,
            timed_spawn_count,
            money_multiplier,
            boss,
        };

        Self {
            waves: vec![
                wave(vec![template(Walker, 8, 1.0, 4)], 2500, 2, 1.0, false),
                wave(
                    vec![template(Walker, 10, 1.0, 5), template(Runner, 4, 0.6, 2)],
                    2200,
                    2,
                    1.1,
                    false,
                ),
                wave(
                    vec![
                        template(Walker, 10, 1.0, 5),
                        template(Bat, 5, 0.5, 2),
                        template(Helmeted, 3, 0.4, 2),
                    ],
                    2000,
                    3,
                    1.2,
                    false,
                ),
                wave(
                    vec![
                        template(Runner, 8, 1.0, 4),
                        template(Ghoul, 6, 0.7, 3),
                        template(Brute, 2, 0.3, 1),
                        template(Bat, 4, 0.5, 2),
                    ],
                    1800,
                    3,
                    1.3,
                    false,
                ),
                wave(
                    vec![
                        template(Boss, 1, 0.0, 1),
                        template(Walker, 30, 1.0, 4),
                        template(Runner, 12, 0.6, 2),
                    ],
                    0,
                    0,
                    2.0,
                    true,
                ),
            ],
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let book: Self = serde_json::from_str(json).context("Failed to parse wave book")?;
        book.validate()?;
        Ok(book)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read wave book {}", path.display()))?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.waves.is_empty() {
            bail!("wave book has no waves");
        }
        for (index, wave) in self.waves.iter().enumerate() {
            let bosses = wave.enemies.iter().filter(|e| e.kind == EnemyKind::Boss).count();
            if wave.boss && bosses != 1 {
                bail!("boss wave {index} must list exactly one boss");
            }
            if !wave.boss && bosses != 0 {
                bail!("wave {index} lists a boss but is not a boss wave");
            }
            if !wave.boss && (wave.spawn_timer_ms == 0 || wave.timed_spawn_count == 0) {
                bail!("wave {index} never spawns anything");
            }
            if let Some(bad) = wave.enemies.iter().find(|e| e.max_alive == 0 && e.count > 0) {
                bail!("wave {index}: {:?} has a population cap of zero", bad.kind);
            }
            if wave.enemies.iter().any(|e| e.spawn_chance_multiplier < 0.0) {
                bail!("wave {index} has a negative spawn chance");
            }
        }
        Ok(())
    }

    // Template for a 0-based wave index. Past the end of the book the waves repeat with
    // larger counts, and every `BOSS_WAVE_EVERY`th wave is a boss wave.
    #[must_use]
    pub fn wave(&self, index: u32) -> WaveTemplate {
        let len = self.waves.len().max(1);
        let wants_boss = (index + 1) % BOSS_WAVE_EVERY == 0;
        let lap = index as usize / len;

        let pick = self
            .waves
            .iter()
            .cycle()
            .skip(index as usize % len)
            .take(len)
            .find(|w| w.boss == wants_boss)
            .or_else(|| self.waves.get(index as usize % len));
        let Some(base) = pick else {
            return WaveTemplate {
                enemies: Vec::new(),
                spawn_timer_ms: 1000,
                timed_spawn_count: 1,
                money_multiplier: 1.0,
                boss: false,
            };
        };

        let mut wave = base.clone();
        if lap > 0 {
            let scale = 1.0 + 0.25 * lap as f32;
            for enemy in wave.enemies.iter_mut().filter(|e| e.kind != EnemyKind::Boss) {
                enemy.count = (enemy.count as f32 * scale).round() as u32;
            }
            wave.money_multiplier *= scale;
        }
        wave
    }
}

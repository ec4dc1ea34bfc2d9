use rand::Rng;
use std::collections::HashMap;
use tracing::{debug, info};

use common::protocol::{NetId, PlayerSlot};

use super::{pool::SpawnPool, result::WaveResult, template::WaveTemplate};
use crate::{constants::WAVE_END_DELAY_MS, enemies::EnemyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    NotStarted,
    Started,
    Spawning,
    DelayedEnd { since_ms: u64 },
    Finished,
}

// One enemy the director wants placed this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnOrder {
    pub kind: EnemyKind,
    pub boss: bool,
}

// ============================================================================
// Wave Director
// ============================================================================

#[derive(Debug, Clone)]
pub struct WaveDirector {
    pub index: u32,
    pub template: WaveTemplate,
    pub pool: SpawnPool,
    pub phase: WavePhase,
    pub total_enemies: Option<u32>,
    pub spawned: u32,
    pub killed: u32,
    pub alive: u32,
    pub boss: Option<NetId>,
    pub boss_dead: bool,
    pub results: [WaveResult; 2],
    alive_by_kind: HashMap<EnemyKind, u32>,
    last_spawn_ms: Option<u64>,
    boss_requested: bool,
}

impl WaveDirector {
    #[must_use]
    pub fn new(index: u32, template: WaveTemplate) -> Self {
        Self {
            index,
            pool: SpawnPool::new(&template.pool_templates()),
            total_enemies: template.total_enemies(),
            template,
            phase: WavePhase::NotStarted,
            spawned: 0,
            killed: 0,
            alive: 0,
            boss: None,
            boss_dead: false,
            results: [WaveResult::default(); 2],
            alive_by_kind: HashMap::new(),
            last_spawn_ms: None,
            boss_requested: false,
        }
    }

    #[must_use]
    pub const fn is_boss_wave(&self) -> bool {
        self.template.boss
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.phase == WavePhase::Finished
    }

    #[must_use]
    pub fn alive_of(&self, kind: EnemyKind) -> u32 {
        self.alive_by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn start(&mut self) {
        if self.phase == WavePhase::NotStarted {
            info!("wave {} started ({} enemies)", self.index + 1, self.describe_total());
            self.phase = WavePhase::Started;
        }
    }

    fn describe_total(&self) -> String {
        self.total_enemies.map_or_else(|| "boss".to_string(), |t| t.to_string())
    }

    // Advance the wave by one tick. Returns what should be spawned now.
    pub fn update(&mut self, now_ms: u64, rng: &mut impl Rng) -> Vec<SpawnOrder> {
        match self.phase {
            WavePhase::NotStarted | WavePhase::Finished => Vec::new(),
            WavePhase::Started => {
                self.phase = WavePhase::Spawning;
                if self.is_boss_wave() && !self.boss_requested {
                    self.boss_requested = true;
                    return vec![SpawnOrder {
                        kind: EnemyKind::Boss,
                        boss: true,
                    }];
                }
                self.timed_spawns(now_ms, rng)
            }
            WavePhase::Spawning => {
                let orders = if self.is_boss_wave() {
                    Vec::new()
                } else {
                    self.timed_spawns(now_ms, rng)
                };
                if orders.is_empty() {
                    self.check_completion(now_ms);
                }
                orders
            }
            WavePhase::DelayedEnd { since_ms } => {
                if now_ms.saturating_sub(since_ms) >= WAVE_END_DELAY_MS {
                    self.phase = WavePhase::Finished;
                    info!(
                        "wave {} finished: {} killed of {}",
                        self.index + 1,
                        self.killed,
                        self.describe_total()
                    );
                }
                Vec::new()
            }
        }
    }

    fn timed_spawns(&mut self, now_ms: u64, rng: &mut impl Rng) -> Vec<SpawnOrder> {
        let Some(total) = self.total_enemies else {
            return Vec::new();
        };
        if self
            .last_spawn_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.template.spawn_timer_ms)
        {
            return Vec::new();
        }
        self.last_spawn_ms = Some(now_ms);

        let budget = self.template.timed_spawn_count.min(total.saturating_sub(self.spawned));
        self.draw(budget, rng)
    }

    // Auxiliary spawns requested by a living boss.
    pub fn summon(&mut self, count: u32, rng: &mut impl Rng) -> Vec<SpawnOrder> {
        if self.phase != WavePhase::Spawning || self.boss_dead {
            return Vec::new();
        }
        self.draw(count, rng)
    }

    fn draw(&mut self, count: u32, rng: &mut impl Rng) -> Vec<SpawnOrder> {
        let mut planned: HashMap<EnemyKind, u32> = HashMap::new();
        let mut orders = Vec::new();
        for _ in 0..count {
            let alive = &self.alive_by_kind;
            let alive_of = |kind| alive.get(&kind).copied().unwrap_or(0) + planned.get(&kind).copied().unwrap_or(0);
            let Some(kind) = self.pool.get_random_enemy(alive_of, rng) else {
                break;
            };
            *planned.entry(kind).or_insert(0) += 1;
            orders.push(SpawnOrder { kind, boss: false });
        }
        if !orders.is_empty() {
            debug!("wave {} spawning {} enemies", self.index + 1, orders.len());
        }
        orders
    }

    // A drawn enemy could not be placed; its copy goes back in the pool.
    pub fn return_to_pool(&mut self, kind: EnemyKind) {
        self.pool.restore(kind);
    }

    // The boss could not be placed; ask for it again on the next update.
    pub fn requeue_boss(&mut self) {
        if self.is_boss_wave() && self.boss.is_none() {
            self.boss_requested = false;
            self.phase = WavePhase::Started;
        }
    }

    fn check_completion(&mut self, now_ms: u64) {
        let done = if self.is_boss_wave() {
            self.boss_dead && self.alive == 0
        } else {
            self.total_enemies.is_some_and(|total| self.spawned >= total) && self.alive == 0
        };
        if done {
            debug!("wave {} cleared, delaying end", self.index + 1);
            self.phase = WavePhase::DelayedEnd { since_ms: now_ms };
        }
    }

    // ========================================================================
    // Accounting
    // ========================================================================

    pub fn on_spawned(&mut self, kind: EnemyKind, id: NetId, boss: bool) {
        self.spawned += 1;
        self.alive += 1;
        *self.alive_by_kind.entry(kind).or_insert(0) += 1;
        if boss {
            self.boss = Some(id);
        }
    }

    // A revenant rose: one more enemy to clear, once the total is known.
    pub fn on_risen(&mut self) {
        if let Some(total) = self.total_enemies.as_mut() {
            *total += 1;
        }
    }

    // Called once per enemy, when its fade-out finalizes.
    pub fn on_removed(&mut self, kind: EnemyKind, id: NetId) {
        self.alive = self.alive.saturating_sub(1);
        self.killed += 1;
        if let Some(count) = self.alive_by_kind.get_mut(&kind) {
            *count = count.saturating_sub(1);
        }
        if self.boss == Some(id) && !self.boss_dead {
            self.boss_dead = true;
            self.total_enemies = Some(self.killed + self.alive);
            info!("boss down; wave {} total fixed at {}", self.index + 1, self.killed + self.alive);
        }
    }

    pub fn result_mut(&mut self, slot: PlayerSlot) -> Option<&mut WaveResult> {
        self.results.get_mut(slot.0 as usize)
    }

    // Pay out every player's result; call once the wave has finished.
    pub fn settle(&mut self) -> [WaveResult; 2] {
        let multiplier = self.template.money_multiplier;
        for result in &mut self.results {
            result.settle(multiplier);
        }
        self.results
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::waves::template::EnemyTemplate;

    fn simple(count: u32, per_tick: u32) -> WaveTemplate {
        WaveTemplate {
            enemies: vec![EnemyTemplate {
                kind: EnemyKind::Walker,
                count,
                spawn_chance_multiplier: 1.0,
                max_alive: count,
            }],
            spawn_timer_ms: 1000,
            timed_spawn_count: per_tick,
            money_multiplier: 1.0,
            boss: false,
        }
    }

    #[test]
    fn simple_wave_spawns_on_timer_up_to_total() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut wave = WaveDirector::new(0, simple(3, 2));
        assert!(wave.update(0, &mut rng).is_empty());

        wave.start();
        let first = wave.update(0, &mut rng);
        assert_eq!(first.len(), 2);
        for (i, order) in first.iter().enumerate() {
            wave.on_spawned(order.kind, NetId(i as u32), false);
        }
        assert!(wave.update(500, &mut rng).is_empty());
        let second = wave.update(1000, &mut rng);
        assert_eq!(second.len(), 1);
        wave.on_spawned(second[0].kind, NetId(9), false);
        assert!(wave.update(2000, &mut rng).is_empty());
    }

    #[test]
    fn wave_ends_after_delay_once_cleared() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut wave = WaveDirector::new(0, simple(1, 1));
        wave.start();
        let orders = wave.update(0, &mut rng);
        wave.on_spawned(orders[0].kind, NetId(1), false);

        wave.on_removed(EnemyKind::Walker, NetId(1));
        wave.update(100, &mut rng);
        assert_eq!(wave.phase, WavePhase::DelayedEnd { since_ms: 100 });
        wave.update(100 + WAVE_END_DELAY_MS - 1, &mut rng);
        assert!(!wave.is_finished());
        wave.update(100 + WAVE_END_DELAY_MS, &mut rng);
        assert!(wave.is_finished());
        assert_eq!(Some(wave.killed), wave.total_enemies);
    }

    #[test]
    fn boss_wave_fixes_total_when_boss_dies() {
        let mut rng = StdRng::seed_from_u64(1);
        let template = WaveTemplate {
            enemies: vec![
                EnemyTemplate {
                    kind: EnemyKind::Boss,
                    count: 1,
                    spawn_chance_multiplier: 0.0,
                    max_alive: 1,
                },
                EnemyTemplate {
                    kind: EnemyKind::Walker,
                    count: 10,
                    spawn_chance_multiplier: 1.0,
                    max_alive: 10,
                },
            ],
            spawn_timer_ms: 0,
            timed_spawn_count: 0,
            money_multiplier: 2.0,
            boss: true,
        };
        let mut wave = WaveDirector::new(4, template);
        wave.start();

        let orders = wave.update(0, &mut rng);
        assert_eq!(orders, vec![SpawnOrder { kind: EnemyKind::Boss, boss: true }]);
        wave.on_spawned(EnemyKind::Boss, NetId(100), true);
        assert_eq!(wave.total_enemies, None);

        let summoned = wave.summon(2, &mut rng);
        assert_eq!(summoned.len(), 2);
        for (i, order) in summoned.iter().enumerate() {
            wave.on_spawned(order.kind, NetId(i as u32), false);
        }
        wave.on_removed(EnemyKind::Walker, NetId(0));
        wave.on_removed(EnemyKind::Boss, NetId(100));
        assert_eq!(wave.total_enemies, Some(3));
        assert!(wave.summon(2, &mut rng).is_empty());

        wave.update(10, &mut rng);
        assert_eq!(wave.phase, WavePhase::Spawning);
        wave.on_removed(EnemyKind::Walker, NetId(1));
        wave.update(20, &mut rng);
        assert_eq!(wave.phase, WavePhase::DelayedEnd { since_ms: 20 });
        assert_eq!(Some(wave.killed), wave.total_enemies);
    }
}

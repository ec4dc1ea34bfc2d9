use rand::{Rng, distr::weighted::WeightedIndex, prelude::Distribution};
use tracing::trace;

use super::template::EnemyTemplate;
use crate::enemies::EnemyKind;

#[derive(Debug, Clone, PartialEq)]
struct PoolEntry {
    kind: EnemyKind,
    remaining: u32,
    weight: f32,
    max_alive: u32,
    in_table: bool,
}

// Enemy copies still to be spawned this wave, drawn weighted and without replacement.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpawnPool {
    entries: Vec<PoolEntry>,
}

impl SpawnPool {
    #[must_use]
    pub fn new(templates: &[EnemyTemplate]) -> Self {
        let total: f32 = templates.iter().map(|t| t.spawn_chance_multiplier.max(0.0)).sum();
        let entries = templates
            .iter()
            .map(|t| PoolEntry {
                kind: t.kind,
                remaining: t.count,
                weight: if total > 0.0 {
                    t.spawn_chance_multiplier.max(0.0) / total
                } else {
                    0.0
                },
                max_alive: t.max_alive,
                in_table: true,
            })
            .collect();
        Self { entries }
    }

    #[must_use]
    pub fn remaining(&self) -> u32 {
        self.entries.iter().map(|e| e.remaining).sum()
    }

    #[must_use]
    pub fn remaining_of(&self, kind: EnemyKind) -> u32 {
        self.entries.iter().filter(|e| e.kind == kind).map(|e| e.remaining).sum()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    // Draw one enemy type. Types with no copies left leave the table for good; a type at its
    // population cap is passed over for the rest of this call only. `None` means nothing can
    // spawn right now.
    pub fn get_random_enemy(&mut self, alive_of: impl Fn(EnemyKind) -> u32, rng: &mut impl Rng) -> Option<EnemyKind> {
        let mut blocked = vec![false; self.entries.len()];

        loop {
            let candidates: Vec<usize> = (0..self.entries.len())
                .filter(|&i| self.entries[i].in_table && !blocked[i])
                .collect();
            if candidates.is_empty() {
                return None;
            }

            let weights: Vec<f32> = candidates.iter().map(|&i| self.entries[i].weight).collect();
            let pick = match WeightedIndex::new(&weights) {
                Ok(dist) => candidates[dist.sample(rng)],
                // Every remaining weight is zero: fall back to a uniform pick.
                Err(_) => candidates[rng.random_range(0..candidates.len())],
            };

            let entry = &mut self.entries[pick];
            if entry.remaining == 0 {
                entry.in_table = false;
                continue;
            }
            if alive_of(entry.kind) >= entry.max_alive {
                blocked[pick] = true;
                continue;
            }

            entry.remaining -= 1;
            trace!("spawn pool drew {:?}, {} left of that type", entry.kind, entry.remaining);
            return Some(entry.kind);
        }
    }

    // Put back a copy that was drawn but never placed.
    pub fn restore(&mut self, kind: EnemyKind) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.kind == kind) {
            entry.remaining += 1;
            entry.in_table = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    use super::*;

    fn template(kind: EnemyKind, count: u32, max_alive: u32) -> EnemyTemplate {
        EnemyTemplate {
            kind,
            count,
            spawn_chance_multiplier: 1.0,
            max_alive,
        }
    }

    #[test]
    fn exhausts_without_replacement_then_reports_nothing() {
        for seed in 0..32 {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut pool = SpawnPool::new(&[
                template(EnemyKind::Walker, 2, 2),
                template(EnemyKind::Runner, 1, 1),
            ]);
            let mut alive: HashMap<EnemyKind, u32> = HashMap::new();

            for _ in 0..3 {
                let kind = pool
                    .get_random_enemy(|k| alive.get(&k).copied().unwrap_or(0), &mut rng)
                    .expect("pool still has copies");
                *alive.entry(kind).or_insert(0) += 1;
            }

            assert_eq!(alive.get(&EnemyKind::Walker), Some(&2));
            assert_eq!(alive.get(&EnemyKind::Runner), Some(&1));
            assert_eq!(pool.get_random_enemy(|k| alive.get(&k).copied().unwrap_or(0), &mut rng), None);
            assert!(pool.is_exhausted());
        }
    }

    #[test]
    fn capped_types_yield_nothing_without_spinning() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut pool = SpawnPool::new(&[template(EnemyKind::Brute, 5, 1)]);

        assert_eq!(pool.get_random_enemy(|_| 0, &mut rng), Some(EnemyKind::Brute));
        assert_eq!(pool.get_random_enemy(|_| 1, &mut rng), None);
        assert_eq!(pool.remaining(), 4);
        pool.restore(EnemyKind::Brute);
        assert_eq!(pool.remaining_of(EnemyKind::Brute), 5);
        assert_eq!(pool.remaining_of(EnemyKind::Walker), 0);
        // Once the cap frees up the type is drawable again.
        assert_eq!(pool.get_random_enemy(|_| 0, &mut rng), Some(EnemyKind::Brute));
    }

    #[test]
    fn weights_are_normalised() {
        let pool = SpawnPool::new(&[
            EnemyTemplate {
                kind: EnemyKind::Walker,
                count: 1,
                spawn_chance_multiplier: 3.0,
                max_alive: 1,
            },
            EnemyTemplate {
                kind: EnemyKind::Bat,
                count: 1,
                spawn_chance_multiplier: 1.0,
                max_alive: 1,
            },
        ]);
        let sum: f32 = pool.entries.iter().map(|e| e.weight).sum();
        assert!((sum - 1.0).abs() < 1e-6);
        assert!((pool.entries[0].weight - 0.75).abs() < 1e-6);
    }
}

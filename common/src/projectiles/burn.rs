use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::{geometry::Aabb, protocol::NetId, weapons::BurnStats};

// Fire left by a molotov. Damages everything inside on every pulse; repeat hits on the same
// target are intended, so there is no hit ledger here.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct BurnZone {
    pub owner: NetId,
    pub rect: Aabb,
    pub stats: BurnStats,
    pub started_ms: u64,
    pub last_pulse_ms: Option<u64>,
}

impl BurnZone {
    // `ground` is the point the zone sits on (bottom center).
    #[must_use]
    pub fn new(owner: NetId, ground: Vec2, stats: BurnStats, now_ms: u64) -> Self {
        let rect = Aabb::new(
            ground.x - stats.width / 2.0,
            ground.y - stats.height,
            stats.width,
            stats.height,
        );
        Self {
            owner,
            rect,
            stats,
            started_ms: now_ms,
            last_pulse_ms: None,
        }
    }

    #[must_use]
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.started_ms) >= self.stats.duration_ms
    }

    // True when the zone deals damage this tick.
    pub fn pulse(&mut self, now_ms: u64) -> bool {
        if self.expired(now_ms) {
            return false;
        }
        let due = self
            .last_pulse_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= self.stats.interval_ms);
        if due {
            self.last_pulse_ms = Some(now_ms);
        }
        due
    }
}

use super::catalog::{ThrowableKind, ThrowableStats};
use crate::constants::THROW_WINDUP_MS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrowPhase {
    Idle,
    // Fuse is burning in hand.
    Cooking { since_ms: u64 },
    WindUp { started_ms: u64, fuse_started_ms: Option<u64> },
}

// What leaves the hand once the wind-up completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    pub stats: ThrowableStats,
    pub fuse_remaining_ms: u64,
    pub detonate_immediately: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Throwable {
    pub stats: ThrowableStats,
    pub count: u32,
    pub phase: ThrowPhase,
}

impl Throwable {
    #[must_use]
    pub const fn new(kind: ThrowableKind, count: u32) -> Self {
        Self {
            stats: kind.stats(),
            count,
            phase: ThrowPhase::Idle,
        }
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.phase != ThrowPhase::Idle
    }

    pub fn begin_cook(&mut self, now_ms: u64) -> bool {
        if self.count == 0 || self.is_busy() || !self.stats.cookable {
            return false;
        }
        self.phase = ThrowPhase::Cooking { since_ms: now_ms };
        true
    }

    pub fn throw(&mut self, now_ms: u64) -> bool {
        self.phase = match self.phase {
            ThrowPhase::Idle if self.count > 0 => ThrowPhase::WindUp {
                started_ms: now_ms,
                fuse_started_ms: None,
            },
            ThrowPhase::Cooking { since_ms } => ThrowPhase::WindUp {
                started_ms: now_ms,
                fuse_started_ms: Some(since_ms),
            },
            _ => return false,
        };
        true
    }

    pub fn tick(&mut self, now_ms: u64) -> Option<Release> {
        let ThrowPhase::WindUp {
            started_ms,
            fuse_started_ms,
        } = self.phase
        else {
            return None;
        };
        if now_ms.saturating_sub(started_ms) < THROW_WINDUP_MS {
            return None;
        }

        self.phase = ThrowPhase::Idle;
        self.count = self.count.saturating_sub(1);
        let fuse_remaining_ms = fuse_started_ms.map_or(self.stats.fuse_ms, |since| {
            self.stats.fuse_ms.saturating_sub(now_ms.saturating_sub(since))
        });
        Some(Release {
            stats: self.stats,
            fuse_remaining_ms,
            detonate_immediately: fuse_started_ms.is_some() && fuse_remaining_ms == 0,
        })
    }
}

use bevy_ecs::prelude::*;

use crate::constants::{DROPPED_HELMET_FADE_MS, HELMET_BREAK_MS};

// ============================================================================
// Helmet
// ============================================================================

// Headshot-only armor pool sitting in front of true health.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Helmet {
    pub health: f32,
    pub max_health: f32,
    pub stage: u8,
    pub breaking_since: Option<u64>,
}

impl Helmet {
    #[must_use]
    pub const fn new(max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            stage: 0,
            breaking_since: None,
        }
    }

    #[must_use]
    pub fn intact(&self) -> bool {
        self.health > 0.0
    }

    #[must_use]
    pub fn stage_for(fraction: f32) -> u8 {
        if fraction >= 0.66 {
            0
        } else if fraction >= 0.33 {
            1
        } else if fraction > 0.0 {
            2
        } else {
            3
        }
    }

    // Soak a headshot. Returns true only on the call that breaks the helmet.
    pub fn absorb(&mut self, amount: f32, now_ms: u64) -> bool {
        if !self.intact() || amount.is_nan() || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).clamp(0.0, self.max_health);
        self.stage = Self::stage_for(self.health / self.max_health);
        if self.stage == 3 {
            self.breaking_since = Some(now_ms);
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_breaking(&self, now_ms: u64) -> bool {
        self.breaking_since
            .is_some_and(|since| now_ms.saturating_sub(since) < HELMET_BREAK_MS)
    }
}

// ============================================================================
// Dropped Helmet
// ============================================================================

// The helmet after it falls off. Lives on its own fade timer, independent of its wearer.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DroppedHelmet {
    pub dropped_ms: u64,
}

impl DroppedHelmet {
    #[must_use]
    pub fn alpha(&self, now_ms: u64) -> u8 {
        let elapsed = now_ms.saturating_sub(self.dropped_ms).min(DROPPED_HELMET_FADE_MS);
        let remaining = 1.0 - elapsed as f32 / DROPPED_HELMET_FADE_MS as f32;
        (255.0 * remaining).ceil() as u8
    }

    #[must_use]
    pub fn faded(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.dropped_ms) >= DROPPED_HELMET_FADE_MS
    }
}

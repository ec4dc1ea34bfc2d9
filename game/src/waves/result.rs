use common::protocol::{PlayerSlot, WaveResultFrame};

use crate::constants::MONEY_PER_SCORE_DIVISOR;

// One player's tally for one wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WaveResult {
    pub score: u32,
    pub money: u32,
    pub kills: u32,
    pub headshot_kills: u32,
    pub bullets_fired: u32,
    pub bullets_hit: u32,
}

impl WaveResult {
    pub fn credit_kill(&mut self, kill_score: u32, headshot: bool, headshot_score_multiplier: f32) {
        self.kills += 1;
        let award = if headshot {
            self.headshot_kills += 1;
            (kill_score as f32 * headshot_score_multiplier).round() as u32
        } else {
            kill_score
        };
        self.score += award;
    }

    // End-of-wave payout.
    pub fn settle(&mut self, money_multiplier: f32) -> u32 {
        self.money = (self.score as f32 / MONEY_PER_SCORE_DIVISOR * money_multiplier).floor() as u32;
        self.money
    }

    #[must_use]
    pub fn accuracy(&self) -> f32 {
        if self.bullets_fired == 0 {
            0.0
        } else {
            self.bullets_hit as f32 / self.bullets_fired as f32
        }
    }

    #[must_use]
    pub const fn frame(&self, wave_index: u32, slot: PlayerSlot) -> WaveResultFrame {
        WaveResultFrame {
            wave_index,
            slot,
            score: self.score,
            money: self.money,
            kills: self.kills,
            headshot_kills: self.headshot_kills,
            bullets_fired: self.bullets_fired,
            bullets_hit: self.bullets_hit,
        }
    }

    #[must_use]
    pub const fn from_frame(frame: &WaveResultFrame) -> Self {
        Self {
            score: frame.score,
            money: frame.money,
            kills: frame.kills,
            headshot_kills: frame.headshot_kills,
            bullets_fired: frame.bullets_fired,
            bullets_hit: frame.bullets_hit,
        }
    }
}

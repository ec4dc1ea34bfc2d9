pub mod autopilot;
pub mod charges;
pub mod enemies;
pub mod network;
pub mod physics;
pub mod players;
pub mod projectiles;
pub mod waves;

use bevy_ecs::prelude::*;
use bevy_time::Time;

use common::constants::REFERENCE_FPS;

use crate::resources::{PeerRole, SimSettings};

// ============================================================================
// Clock Helpers
// ============================================================================

// Milliseconds since the simulation started; every timed gate compares against this.
#[must_use]
pub fn now_ms(time: &Time) -> u64 {
    u64::try_from(time.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// Frame delta in reference ticks (1.0 at 60 fps).
#[must_use]
pub fn tick_dt(time: &Time) -> f32 {
    time.delta_secs() * REFERENCE_FPS
}

// ============================================================================
// Run Conditions
// ============================================================================

pub fn is_authority(role: Res<PeerRole>) -> bool {
    role.is_authority()
}

pub fn is_guest(role: Res<PeerRole>) -> bool {
    !role.is_authority()
}

pub fn autopilot_enabled(settings: Res<SimSettings>) -> bool {
    settings.autopilot
}

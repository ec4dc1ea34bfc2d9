use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use common::{
    components::{Body, Facing},
    constants::{PLAYER_HAND_HEIGHT, PLAYER_MAX_STAMINA},
    protocol::{AnimFlags, PlayerSlot},
};

// ============================================================================
// Player Components
// ============================================================================

#[derive(Component, Debug, Clone, PartialEq)]
pub struct Player {
    pub slot: PlayerSlot,
    pub stamina: f32,
    pub aim_angle: f32,
    pub downed: bool,
    pub flags: AnimFlags,
    pub money: u32,
    pub score: u32,
}

impl Player {
    #[must_use]
    pub fn new(slot: PlayerSlot) -> Self {
        Self {
            slot,
            stamina: PLAYER_MAX_STAMINA,
            aim_angle: 0.0,
            downed: false,
            flags: AnimFlags::default(),
            money: 0,
            score: 0,
        }
    }
}

// What a locally controlled player wants to do this tick. Written by whatever drives the
// player (autopilot, tests, a front end); one-shot fields are cleared once consumed.
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct PlayerInput {
    pub move_axis: f32, // -1.0 (left) ..= 1.0 (right)
    pub jump: bool,
    pub aim: Option<Vec2>, // world point
    pub trigger: bool,
    pub reload: bool,
    pub switch_to: Option<usize>,
    pub switch_throwable: Option<usize>,
    pub cook: bool,
    pub throw: bool,
}

// Where bullets and charges leave a player's body.
#[must_use]
pub fn hand_position(body: &Body, facing: Facing) -> Vec2 {
    Vec2::new(
        facing.sign().mul_add(body.rect.w / 2.0, body.center().x),
        body.rect.top() + PLAYER_HAND_HEIGHT,
    )
}

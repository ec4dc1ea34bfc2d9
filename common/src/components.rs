use bevy_ecs::prelude::*;
use bevy_math::Vec2;

use crate::geometry::Aabb;

// ============================================================================
// Shared Entity Components
// ============================================================================

// Kinematic state shared by players, enemies, charges and dropped props.
// `previous_rect` is the rect before this tick's movement; collision resolution reads it to
// decide which face of an obstacle was struck.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub rect: Aabb,
    pub previous_rect: Aabb,
    pub velocity: Vec2,
    pub acceleration: Vec2,
    pub gravity_scale: f32,
    pub grounded: bool,
}

impl Body {
    #[must_use]
    pub const fn new(rect: Aabb) -> Self {
        Self {
            rect,
            previous_rect: rect,
            velocity: Vec2::ZERO,
            acceleration: Vec2::ZERO,
            gravity_scale: 1.0,
            grounded: false,
        }
    }

    // A body that ignores gravity (flyers).
    #[must_use]
    pub const fn floating(rect: Aabb) -> Self {
        let mut body = Self::new(rect);
        body.gravity_scale = 0.0;
        body
    }

    // Remember where the body was before anything moves it this tick.
    pub fn begin_tick(&mut self) {
        self.previous_rect = self.rect;
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.rect.center()
    }
}

// Horizontal facing. Sprites flip on change only, so this is stored rather than derived
// from velocity every tick.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    // Facing toward a horizontal offset; `None` when the offset is zero.
    #[must_use]
    pub fn toward(dx: f32) -> Option<Self> {
        if dx > 0.0 {
            Some(Self::Right)
        } else if dx < 0.0 {
            Some(Self::Left)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Left => -1,
            Self::Right => 1,
        }
    }

    #[must_use]
    pub const fn from_i8(value: i8) -> Self {
        if value < 0 { Self::Left } else { Self::Right }
    }
}

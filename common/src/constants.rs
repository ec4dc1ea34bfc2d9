// ============================================================================
// Ticks
// ============================================================================

// Every speed and acceleration is expressed in units per tick at this frame rate;
// the real frame delta is scaled against it.
pub const REFERENCE_FPS: f32 = 60.0;

// Small value for floating-point comparisons (near-zero checks, division guards).
pub const PHYSICS_EPSILON: f32 = 1e-6;

// ============================================================================
// World
// ============================================================================

pub const MAP_WIDTH: f32 = 3200.0;
pub const MAP_HEIGHT: f32 = 900.0;
pub const GROUND_Y: f32 = 760.0; // top face of the floor
pub const WORLD_MARGIN: f32 = 200.0; // projectiles past the map edge + margin are dropped

// ============================================================================
// Physics
// ============================================================================

pub const GRAVITY: f32 = 0.5; // units / tick^2
pub const FRICTION: f32 = -0.12; // applied against horizontal velocity

// ============================================================================
// Player
// ============================================================================

// Dimensions
pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 90.0;
pub const PLAYER_HAND_HEIGHT: f32 = 35.0; // muzzle/throw origin measured from the top

pub const PLAYER_ACCELERATION: f32 = 0.7;
pub const PLAYER_JUMP_VELOCITY: f32 = -12.0;
pub const PLAYER_MAX_HEALTH: f32 = 100.0;
pub const PLAYER_MAX_STAMINA: f32 = 100.0;
pub const STAMINA_REGEN_PER_TICK: f32 = 0.4;

// ============================================================================
// Weapons
// ============================================================================

// fire_rate is rounds per minute, so the cooldown in ms is FIRE_RATE_RATIO / fire_rate.
pub const FIRE_RATE_RATIO: f32 = 60_000.0;
pub const WEAPON_SWITCH_MS: u64 = 350;
pub const MELEE_SWING_VARIANTS: u8 = 3;

// ============================================================================
// Projectiles
// ============================================================================

pub const BULLET_THICKNESS: f32 = 4.0;
pub const BULLET_LENGTH: f32 = 12.0;
pub const EXPLOSION_ANIMATION_MS: u64 = 400;

// Charges (thrown grenades and molotovs)
pub const CHARGE_SIZE: f32 = 14.0;
pub const CHARGE_BOUNCE_RETENTION: f32 = 0.5; // fraction of speed retained after a bounce
pub const CHARGE_REST_SPEED: f32 = 0.8; // bounces slower than this settle
pub const CHARGE_GROUND_FRICTION: f32 = 0.9;
pub const THROW_SPEED: f32 = 13.0;
pub const THROW_WINDUP_MS: u64 = 250;

// ============================================================================
// Simulation Loop
// ============================================================================

pub const DEFAULT_TICK_RATE: u32 = 60;
pub const SNAPSHOT_EVERY_TICKS: u64 = 2; // network send interval

// ============================================================================
// Enemies
// ============================================================================

pub const ENEMY_FADE_OUT_MS: u64 = 1000; // alpha 255 -> 0
pub const ENEMY_STRIKE_FORWARD: f32 = 2.5;
pub const ENEMY_STRIKE_LIFT: f32 = 1.5;

// Armored
pub const HELMET_BREAK_MS: u64 = 500;
pub const DROPPED_HELMET_FADE_MS: u64 = 2500;
pub const DROPPED_HELMET_SIZE: f32 = 26.0;

// Flyer
pub const FLYER_HOVER_BAND: f32 = 260.0; // patrol half-width around home x
pub const FLYER_HOVER_Y: f32 = 260.0;
pub const FLYER_DIVE_DISTANCE: f32 = 380.0; // horizontal distance from the target inside which dives are rolled
pub const FLYER_DIVE_ROLL_MS: u64 = 600;
pub const FLYER_DIVE_CHANCE: f64 = 0.4;
pub const FLYER_DIVE_SPEED: f32 = 6.0;
pub const FLYER_RISE_SPEED: f32 = 4.0;

// Boss
pub const BOSS_BUMP_RANGE: f32 = 110.0;
pub const BOSS_BUMP_DAMAGE_MULTIPLIER: f32 = 0.5;
pub const BOSS_BUMP_FORWARD: f32 = 14.0;
pub const BOSS_BUMP_LIFT: f32 = 8.0;
pub const BOSS_STRIKE_FORWARD: f32 = 7.0;
pub const BOSS_STRIKE_LIFT: f32 = 2.0;
pub const BOSS_SUMMON_INTERVAL_MS: u64 = 7000;
pub const BOSS_SUMMON_COUNT: u32 = 2;

// Revenant
pub const REVENANT_HEALTH_SCALE: f32 = 0.6;

// ============================================================================
// Waves
// ============================================================================

pub const WAVE_END_DELAY_MS: u64 = 3000;
pub const MIN_SPAWN_DISTANCE: f32 = 450.0;
pub const BOSS_WAVE_EVERY: u32 = 5;
pub const MONEY_PER_SCORE_DIVISOR: f32 = 4.0;

// Spawn jitter (fraction of the template value, uniform both ways)
pub const JITTER_HEALTH: f32 = 0.3;
pub const JITTER_SPEED: f32 = 0.2;
pub const JITTER_DAMAGE: f32 = 0.3;

// ============================================================================
// Players
// ============================================================================

pub const PLAYER_SPAWN_X: [f32; 2] = [1500.0, 1700.0];
pub const PLAYER_FRICTION: f32 = -0.18;

// ============================================================================
// Network
// ============================================================================

// Ids allocated by a guest start here so they never collide with the host's.
pub const GUEST_ID_BASE: u32 = 1 << 30;

// ============================================================================
// Autopilot
// ============================================================================

pub const AUTOPILOT_KEEP_AWAY: f32 = 160.0; // back off when an enemy is closer than this
pub const AUTOPILOT_ENGAGE: f32 = 650.0; // walk toward enemies farther than this
pub const AUTOPILOT_SHOTGUN_RANGE: f32 = 260.0;
pub const AUTOPILOT_GRENADE_CROWD: usize = 3;
pub const AUTOPILOT_GRENADE_RADIUS: f32 = 320.0;

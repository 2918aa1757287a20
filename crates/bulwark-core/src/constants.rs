//! Simulation constants and default tuning parameters.
//!
//! Defaults reproduce the classic missile-command environment: a wide, low
//! playfield, six cities on the ground, a single central battery and a slow
//! trickle of enemy missiles.

/// Default RNG seed. Same seed = same episode.
pub const DEFAULT_SEED: u64 = 42;

/// Duration of one step.
pub const DEFAULT_DT: f64 = 1.0;

/// Distance under which a missile counts as having reached its destination.
pub const ARRIVAL_EPSILON: f64 = 1e-6;

/// Step horizon the runner applies when a configuration sets none.
pub const EPISODE_HORIZON: u64 = 1150;

// --- Playfield ---

pub const DEFAULT_WIDTH: f64 = 966.0;
pub const DEFAULT_HEIGHT: f64 = 466.0;

// --- Cities ---

/// Number of cities in the default layout.
pub const CITY_COUNT: usize = 6;

/// Radius around an impact point inside which a city is lost.
pub const CITY_IMPACT_RADIUS: f64 = 24.0;

/// Horizontal slots (eighths of the width) for the default cities.
/// Slot 4 is left free for the battery.
pub const CITY_SLOTS: [f64; CITY_COUNT] = [1.0, 2.0, 3.0, 5.0, 6.0, 7.0];

// --- Enemy missiles ---

/// Missiles per episode.
pub const ENEMY_MISSILE_COUNT: u32 = 19;

/// Per-step launch probability for the Bernoulli arrival process.
pub const ENEMY_ARRIVAL_PROBABILITY: f64 = 0.005;

pub const ENEMY_MISSILE_SPEED: f64 = 1.0;

/// Launch x range on the top edge, as fractions of the width.
pub const ENEMY_SPAWN_X_RANGE: (f64, f64) = (0.0, 1.0);

/// Ground target x range used once no city is left, as fractions of the width.
pub const ENEMY_GROUND_X_RANGE: (f64, f64) = (0.0, 1.0);

/// Range a launch curriculum falls back to once its stages run out.
pub const FULL_WIDTH_RANGE: (f64, f64) = (0.0, 1.0);

// --- Interceptors ---

pub const INTERCEPTOR_SPEED: f64 = 7.0;

/// Flight time after which an interceptor detonates wherever it is aimed.
pub const INTERCEPTOR_MAX_FLIGHT_TIME: f64 = 400.0;

// --- Explosions ---

/// Peak explosion radius.
pub const EXPLOSION_MAX_RADIUS: f64 = 37.0;

/// Explosion lifetime. Grows at 0.5 per step to the peak, then shrinks back.
pub const EXPLOSION_MAX_AGE: f64 = 148.0;

// --- Cursor ---

/// Distance the aim cursor moves per directional action.
pub const CURSOR_STEP: f64 = 4.0;

// --- Reward weights ---

pub const REWARD_CITY_ALIVE: f64 = 0.0;
pub const REWARD_CITY_LOST: f64 = 10.0;
pub const REWARD_ENEMY_DESTROYED: f64 = 15.0;
pub const REWARD_MISSILE_LAUNCHED: f64 = 4.0;
pub const REWARD_STEP_SURVIVED: f64 = 0.0;

//! Episode configuration.
//!
//! Every section has defaults matching the classic environment, so a JSON
//! file only needs to name the values it changes. `validate` is the single
//! gate between user input and the engine: a configuration that passes it
//! can always be simulated.

use std::io::Read;

use glam::DVec2;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::*;
use crate::error::ConfigError;
use crate::types::Playfield;

/// Complete configuration for one episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    pub playfield: Playfield,
    /// Duration of one step.
    pub dt: f64,
    /// Distance at which a missile counts as having reached its destination.
    pub arrival_epsilon: f64,
    /// Optional step horizon. Reaching it ends the episode as truncated.
    pub max_steps: Option<u64>,
    pub cities: CityConfig,
    pub battery: BatteryConfig,
    pub enemy: EnemyConfig,
    pub interceptor: InterceptorConfig,
    pub explosion: ExplosionConfig,
    pub cursor: CursorConfig,
    pub reward: RewardWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CityConfig {
    pub positions: Vec<DVec2>,
    /// Cities within this distance of an enemy impact point are lost.
    pub impact_radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatteryConfig {
    pub position: DVec2,
    /// Steps during which firing is blocked after a launch.
    pub cooldown_steps: u32,
    /// Interceptors available for the episode. `None` means unlimited.
    pub ammo: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Enemy missiles launched over the whole episode.
    pub total: u32,
    pub speed: f64,
    pub arrival: ArrivalProcess,
    /// Launch x range on the top edge, as fractions of the width.
    pub spawn_x_range: (f64, f64),
    /// Ground target x range once every city is gone, as fractions of the width.
    pub ground_x_range: (f64, f64),
    /// Later `spawn_x_range` stages, entered one per curriculum advance.
    /// Once exhausted the range widens to the full playfield.
    pub spawn_x_curriculum: Vec<(f64, f64)>,
    /// Later `ground_x_range` stages, same rules as `spawn_x_curriculum`.
    pub ground_x_curriculum: Vec<(f64, f64)>,
}

/// How enemy launches are distributed over time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArrivalProcess {
    /// One independent draw per step.
    Bernoulli { probability: f64 },
    /// One launch every `interval` steps, first one at step `offset`.
    Periodic {
        interval: u64,
        #[serde(default)]
        offset: u64,
    },
    /// Explicit launches. At most one launch happens per step; launches that
    /// share a step are deferred to the following steps in order.
    Scripted { launches: Vec<ScriptedLaunch> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScriptedLaunch {
    pub step: u64,
    pub origin: DVec2,
    pub destination: DVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterceptorConfig {
    pub speed: f64,
    /// Flight time after which an interceptor detonates regardless of position.
    pub max_flight_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Peak radius, reached at half of `max_age`.
    pub max_radius: f64,
    pub max_age: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Cursor displacement per directional action.
    pub step: f64,
}

/// Weights of the per-step reward terms. Penalty weights are subtracted,
/// so every weight is expected to be non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardWeights {
    /// Multiplies the number of cities alive after the step.
    pub city_alive: f64,
    /// Penalty per city lost during the step.
    pub city_lost: f64,
    /// Bonus per enemy missile intercepted during the step.
    pub enemy_destroyed: f64,
    /// Penalty per interceptor launched during the step.
    pub missile_launched: f64,
    /// Constant bonus for every step played.
    pub step_survived: f64,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            playfield: Playfield::default(),
            dt: DEFAULT_DT,
            arrival_epsilon: ARRIVAL_EPSILON,
            max_steps: None,
            cities: CityConfig::default(),
            battery: BatteryConfig::default(),
            enemy: EnemyConfig::default(),
            interceptor: InterceptorConfig::default(),
            explosion: ExplosionConfig::default(),
            cursor: CursorConfig::default(),
            reward: RewardWeights::default(),
        }
    }
}

impl Default for CityConfig {
    fn default() -> Self {
        let eighth = DEFAULT_WIDTH / 8.0;
        Self {
            positions: CITY_SLOTS
                .iter()
                .map(|slot| DVec2::new(slot * eighth, 0.0))
                .collect(),
            impact_radius: CITY_IMPACT_RADIUS,
        }
    }
}

impl Default for BatteryConfig {
    fn default() -> Self {
        Self {
            position: DVec2::new(DEFAULT_WIDTH * 0.5, 0.0),
            cooldown_steps: 0,
            ammo: None,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            total: ENEMY_MISSILE_COUNT,
            speed: ENEMY_MISSILE_SPEED,
            arrival: ArrivalProcess::Bernoulli {
                probability: ENEMY_ARRIVAL_PROBABILITY,
            },
            spawn_x_range: ENEMY_SPAWN_X_RANGE,
            ground_x_range: ENEMY_GROUND_X_RANGE,
            spawn_x_curriculum: Vec::new(),
            ground_x_curriculum: Vec::new(),
        }
    }
}

impl Default for InterceptorConfig {
    fn default() -> Self {
        Self {
            speed: INTERCEPTOR_SPEED,
            max_flight_time: INTERCEPTOR_MAX_FLIGHT_TIME,
        }
    }
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            max_radius: EXPLOSION_MAX_RADIUS,
            max_age: EXPLOSION_MAX_AGE,
        }
    }
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self { step: CURSOR_STEP }
    }
}

impl Default for RewardWeights {
    fn default() -> Self {
        Self {
            city_alive: REWARD_CITY_ALIVE,
            city_lost: REWARD_CITY_LOST,
            enemy_destroyed: REWARD_ENEMY_DESTROYED,
            missile_launched: REWARD_MISSILE_LAUNCHED,
            step_survived: REWARD_STEP_SURVIVED,
        }
    }
}

impl EpisodeConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON configuration from a reader.
    pub fn from_json_reader(reader: impl Read) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Return a copy with dotted-path overrides applied, e.g.
    /// `("enemy.total", 7)` or `("reward.city_lost", 16.67)`.
    /// Every path segment must name an existing key.
    pub fn with_overrides<'a>(
        &self,
        overrides: impl IntoIterator<Item = (&'a str, Value)>,
    ) -> Result<Self, ConfigError> {
        let mut tree = serde_json::to_value(self)?;
        for (path, value) in overrides {
            let slot = path
                .split('.')
                .try_fold(&mut tree, |node, key| node.get_mut(key))
                .ok_or_else(|| ConfigError::UnknownKey(path.to_string()))?;
            *slot = value;
        }
        let config: Self = serde_json::from_value(tree)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("playfield.width", self.playfield.width)?;
        positive("playfield.height", self.playfield.height)?;
        positive("dt", self.dt)?;
        non_negative("arrival_epsilon", self.arrival_epsilon)?;

        if self.cities.positions.is_empty() {
            return Err(ConfigError::NoCities);
        }
        for &city in &self.cities.positions {
            self.inside("cities.positions", city)?;
        }
        non_negative("cities.impact_radius", self.cities.impact_radius)?;
        self.inside("battery.position", self.battery.position)?;

        positive("enemy.speed", self.enemy.speed)?;
        fraction_range("enemy.spawn_x_range", self.enemy.spawn_x_range)?;
        fraction_range("enemy.ground_x_range", self.enemy.ground_x_range)?;
        for &range in &self.enemy.spawn_x_curriculum {
            fraction_range("enemy.spawn_x_curriculum", range)?;
        }
        for &range in &self.enemy.ground_x_curriculum {
            fraction_range("enemy.ground_x_curriculum", range)?;
        }
        match &self.enemy.arrival {
            ArrivalProcess::Bernoulli { probability } => {
                if !(0.0..=1.0).contains(probability) {
                    return Err(ConfigError::Probability(*probability));
                }
                // No launch ever happens, so only a step limit can end the episode.
                if *probability == 0.0 && self.enemy.total > 0 && self.max_steps.is_none() {
                    return Err(ConfigError::NeverTerminates);
                }
            }
            ArrivalProcess::Periodic { interval, .. } => {
                if *interval == 0 {
                    return Err(ConfigError::ZeroInterval);
                }
            }
            ArrivalProcess::Scripted { launches } => {
                for (index, launch) in launches.iter().enumerate() {
                    if launch.origin.distance(launch.destination) <= self.arrival_epsilon {
                        return Err(ConfigError::DegenerateLaunch { index });
                    }
                }
            }
        }

        positive("interceptor.speed", self.interceptor.speed)?;
        positive("interceptor.max_flight_time", self.interceptor.max_flight_time)?;
        positive("explosion.max_radius", self.explosion.max_radius)?;
        positive("explosion.max_age", self.explosion.max_age)?;
        positive("cursor.step", self.cursor.step)?;

        let reward = &self.reward;
        non_negative("reward.city_alive", reward.city_alive)?;
        non_negative("reward.city_lost", reward.city_lost)?;
        non_negative("reward.enemy_destroyed", reward.enemy_destroyed)?;
        non_negative("reward.missile_launched", reward.missile_launched)?;
        non_negative("reward.step_survived", reward.step_survived)?;
        Ok(())
    }

    fn inside(&self, field: &'static str, point: DVec2) -> Result<(), ConfigError> {
        if self.playfield.contains(point) {
            Ok(())
        } else {
            Err(ConfigError::OutOfPlayfield {
                field,
                x: point.x,
                y: point.y,
            })
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

/// Check that `(lo, hi)` is an ordered pair of width fractions.
pub fn fraction_range(field: &'static str, (lo, hi): (f64, f64)) -> Result<(), ConfigError> {
    if 0.0 <= lo && lo <= hi && hi <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, lo, hi })
    }
}

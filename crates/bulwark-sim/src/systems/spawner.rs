//! Enemy launch scheduling. Decides each step whether one enemy missile
//! appears on the top edge and gives it a straight-line trajectory.

use glam::DVec2;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use bulwark_core::config::{
    fraction_range, ArrivalProcess, EnemyConfig, EpisodeConfig, ScriptedLaunch,
};
use bulwark_core::constants::FULL_WIDTH_RANGE;
use bulwark_core::error::ConfigError;
use bulwark_core::events::SimEvent;

use crate::store::{EnemyLaunch, EntityStore};

/// Active launch and ground-target x ranges, as fractions of the width.
/// Survives episode resets so a curriculum can progress across episodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaunchRanges {
    pub spawn_x: (f64, f64),
    pub ground_x: (f64, f64),
    /// Curriculum advances made so far.
    pub stage: usize,
}

impl LaunchRanges {
    pub fn new(enemy: &EnemyConfig) -> Self {
        Self {
            spawn_x: enemy.spawn_x_range,
            ground_x: enemy.ground_x_range,
            stage: 0,
        }
    }

    /// Enter the next curriculum stage. A list with no stage left widens its
    /// range to the full playfield.
    pub fn advance(&mut self, enemy: &EnemyConfig) {
        let stage = self.stage;
        let next = |stages: &[(f64, f64)]| stages.get(stage).copied().unwrap_or(FULL_WIDTH_RANGE);
        self.spawn_x = next(&enemy.spawn_x_curriculum);
        self.ground_x = next(&enemy.ground_x_curriculum);
        self.stage += 1;
    }
}

impl Default for LaunchRanges {
    fn default() -> Self {
        Self {
            spawn_x: FULL_WIDTH_RANGE,
            ground_x: FULL_WIDTH_RANGE,
            stage: 0,
        }
    }
}

/// Launch bookkeeping carried across steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    launched: u32,
    total: u32,
    /// Scripted launches sorted by step (stable). Empty for random arrivals.
    script: Vec<ScriptedLaunch>,
    next_scripted: usize,
    ranges: LaunchRanges,
}

impl SpawnScheduler {
    pub fn new(config: &EpisodeConfig) -> Self {
        let (script, total) = match &config.enemy.arrival {
            ArrivalProcess::Scripted { launches } => {
                let mut script = launches.clone();
                script.sort_by_key(|launch| launch.step);
                let total = config.enemy.total.min(script.len() as u32);
                (script, total)
            }
            _ => (Vec::new(), config.enemy.total),
        };
        Self {
            launched: 0,
            total,
            script,
            next_scripted: 0,
            ranges: LaunchRanges::new(&config.enemy),
        }
    }

    /// Fresh bookkeeping for a new episode that keeps the current ranges.
    pub fn with_ranges(mut self, ranges: LaunchRanges) -> Self {
        self.ranges = ranges;
        self
    }

    /// Missiles launched so far this episode.
    pub fn launched(&self) -> u32 {
        self.launched
    }

    /// Missiles this episode will launch in total.
    pub fn total(&self) -> u32 {
        self.total
    }

    /// True once no further missile will ever spawn.
    pub fn is_exhausted(&self) -> bool {
        self.launched >= self.total
    }

    /// Scripted launches in firing order.
    pub fn script(&self) -> &[ScriptedLaunch] {
        &self.script
    }

    pub fn ranges(&self) -> &LaunchRanges {
        &self.ranges
    }

    pub fn advance_curriculum(&mut self, enemy: &EnemyConfig) {
        self.ranges.advance(enemy);
        debug!(
            stage = self.ranges.stage,
            spawn_x = ?self.ranges.spawn_x,
            ground_x = ?self.ranges.ground_x,
            "launch curriculum advanced"
        );
    }

    pub fn set_spawn_x_range(&mut self, range: (f64, f64)) -> Result<(), ConfigError> {
        fraction_range("spawn_x_range", range)?;
        self.ranges.spawn_x = range;
        Ok(())
    }

    pub fn set_ground_x_range(&mut self, range: (f64, f64)) -> Result<(), ConfigError> {
        fraction_range("ground_x_range", range)?;
        self.ranges.ground_x = range;
        Ok(())
    }
}

/// Possibly launch one enemy missile. Returns true when a row was appended.
pub fn run(
    scheduler: &mut SpawnScheduler,
    store: &mut EntityStore,
    rng: &mut ChaCha8Rng,
    config: &EpisodeConfig,
    step: u64,
    events: &mut Vec<SimEvent>,
) -> bool {
    if scheduler.is_exhausted() {
        return false;
    }

    let launch = match &config.enemy.arrival {
        ArrivalProcess::Bernoulli { probability } => {
            if !rng.gen_bool(*probability) {
                return false;
            }
            random_launch(&scheduler.ranges, store, rng, config)
        }
        ArrivalProcess::Periodic { interval, offset } => {
            if step < *offset || (step - offset) % interval != 0 {
                return false;
            }
            random_launch(&scheduler.ranges, store, rng, config)
        }
        ArrivalProcess::Scripted { .. } => match scheduler.script.get(scheduler.next_scripted) {
            Some(entry) if entry.step <= step => {
                let entry = *entry;
                scheduler.next_scripted += 1;
                scripted_launch(store, &entry, config)
            }
            _ => return false,
        },
    };

    let Some(launch) = launch else {
        debug!(step, "enemy launch rejected: empty trajectory");
        return false;
    };

    store.enemies.push(launch);
    scheduler.launched += 1;
    debug!(
        step,
        origin_x = launch.origin.x,
        city = ?launch.target_city,
        launched = scheduler.launched,
        "enemy missile launched"
    );
    events.push(SimEvent::EnemySpawned {
        origin: launch.origin,
        destination: launch.destination,
        target_city: launch.target_city,
    });
    true
}

/// Origin on the top edge; destination a uniformly chosen live city, or a
/// ground point once every city is gone.
fn random_launch(
    ranges: &LaunchRanges,
    store: &EntityStore,
    rng: &mut ChaCha8Rng,
    config: &EpisodeConfig,
) -> Option<EnemyLaunch> {
    let field = &config.playfield;
    let (lo, hi) = ranges.spawn_x;
    let origin = DVec2::new(field.x_at(sample(rng, lo, hi)), field.height);

    let alive = store.cities.alive_slots();
    let (destination, target_city) = match alive.choose(rng) {
        Some(&slot) => (store.cities.positions()[slot], Some(slot)),
        None => {
            let (lo, hi) = ranges.ground_x;
            (DVec2::new(field.x_at(sample(rng, lo, hi)), 0.0), None)
        }
    };

    checked(origin, destination, target_city, config)
}

fn scripted_launch(
    store: &EntityStore,
    entry: &ScriptedLaunch,
    config: &EpisodeConfig,
) -> Option<EnemyLaunch> {
    let target_city = store
        .cities
        .positions()
        .iter()
        .position(|city| city.distance(entry.destination) <= config.arrival_epsilon);
    checked(entry.origin, entry.destination, target_city, config)
}

fn checked(
    origin: DVec2,
    destination: DVec2,
    target_city: Option<usize>,
    config: &EpisodeConfig,
) -> Option<EnemyLaunch> {
    (origin.distance(destination) > config.arrival_epsilon).then_some(EnemyLaunch {
        origin,
        destination,
        speed: config.enemy.speed,
        target_city,
    })
}

/// Uniform draw in `[lo, hi)`; returns `lo` for an empty range.
fn sample(rng: &mut ChaCha8Rng, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * rng.gen::<f64>()
}

//! Simulation engine: the `reset` / `step` boundary.
//!
//! `Simulation` owns the entity store, the RNG, the spawn scheduler and the
//! episode controller, and runs the systems in a fixed order each step.
//! Completely headless and deterministic: the same seed and the same action
//! sequence always produce bit-identical outcomes.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use bulwark_core::actions::Action;
use bulwark_core::config::EpisodeConfig;
use bulwark_core::constants::DEFAULT_SEED;
use bulwark_core::error::{ConfigError, SimError};
use bulwark_core::events::SimEvent;
use bulwark_core::state::{Observation, StepOutcome};

use crate::episode::{EpisodeController, EpisodeState, StepDeltas};
use crate::reward;
use crate::store::EntityStore;
use crate::systems;
use crate::systems::spawner::{LaunchRanges, SpawnScheduler};

/// Serializable capture of everything needed to resume an episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub seed: u64,
    pub store: EntityStore,
    pub episode: EpisodeState,
    pub scheduler: SpawnScheduler,
    pub rng: ChaCha8Rng,
}

/// One missile-defense episode.
pub struct Simulation {
    config: EpisodeConfig,
    store: EntityStore,
    episode: EpisodeController,
    scheduler: SpawnScheduler,
    rng: ChaCha8Rng,
    seed: u64,
}

impl Simulation {
    /// Validate `config` and start an episode with the default seed.
    pub fn new(config: EpisodeConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, DEFAULT_SEED)
    }

    /// Validate `config` and start an episode with `seed`.
    pub fn with_seed(config: EpisodeConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            store: EntityStore::new(&config),
            episode: EpisodeController::new(
                config.cities.positions.len(),
                config.max_steps,
                config.dt,
            ),
            scheduler: SpawnScheduler::new(&config),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            config,
        })
    }

    /// Start a fresh episode with `seed` and return the initial observation.
    /// The launch ranges of the curriculum carry over.
    pub fn reset(&mut self, seed: u64) -> Observation {
        self.store = EntityStore::new(&self.config);
        self.episode = EpisodeController::new(
            self.config.cities.positions.len(),
            self.config.max_steps,
            self.config.dt,
        );
        let ranges = self.scheduler.ranges().clone();
        self.scheduler = SpawnScheduler::new(&self.config).with_ranges(ranges);
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        self.seed = seed;
        self.observation()
    }

    /// Advance one step with an action given by index. An invalid index
    /// leaves the simulation untouched.
    pub fn step(&mut self, action: usize) -> Result<StepOutcome, SimError> {
        let action = Action::try_from(action)?;
        Ok(self.apply(action))
    }

    /// Advance one step with a typed action.
    pub fn apply(&mut self, action: Action) -> StepOutcome {
        if self.episode.is_terminated() {
            warn!(
                step = self.episode.state().time.step,
                "step on a terminated episode ignored"
            );
            return StepOutcome {
                observation: self.observation(),
                reward: 0.0,
                done: true,
                info: systems::snapshot::build_info(self.episode.state(), Vec::new()),
            };
        }

        let step = self.episode.state().time.step;
        let mut events = Vec::new();

        let launched = action == Action::Fire
            && systems::launcher::run(&mut self.store, &self.config, step, &mut events);
        let spawned = systems::spawner::run(
            &mut self.scheduler,
            &mut self.store,
            &mut self.rng,
            &self.config,
            step,
            &mut events,
        );
        systems::kinematics::run(&mut self.store, &self.config, action);
        systems::explosions::run(&mut self.store, &self.config, &mut events);

        let outcome = systems::collision::run(
            &self.store,
            self.config.arrival_epsilon,
            self.config.cities.impact_radius,
        );
        systems::collision::apply(&mut self.store, &outcome, &mut events);

        let deltas = StepDeltas {
            spawned: u32::from(spawned),
            launched: u32::from(launched),
            destroyed: outcome.intercepted_count() as u32,
            impacted: outcome.impacted_count() as u32,
            cities_lost: outcome.cities_lost_count() as u32,
            cities_alive: self.store.cities.alive_count() as u32,
        };
        if let Some(reason) = self.episode.advance(
            &deltas,
            self.store.enemies.len(),
            self.scheduler.is_exhausted(),
        ) {
            events.push(SimEvent::EpisodeEnded { reason });
        }
        let reward = reward::compute(&self.config.reward, &deltas);

        trace!(
            step,
            reward,
            enemies = self.store.enemies.len(),
            interceptors = self.store.friendlies.len(),
            explosions = self.store.explosions.len(),
            "step complete"
        );

        StepOutcome {
            observation: self.observation(),
            reward,
            done: self.episode.is_terminated(),
            info: systems::snapshot::build_info(self.episode.state(), events),
        }
    }

    /// Current observation. Never mutates the simulation.
    pub fn observation(&self) -> Observation {
        systems::snapshot::build_observation(&self.store, self.episode.state())
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn episode(&self) -> &EpisodeState {
        self.episode.state()
    }

    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_terminated(&self) -> bool {
        self.episode.is_terminated()
    }

    /// Move enemy launches to the next stage of the configured range
    /// curriculum. Takes effect from the next spawn.
    pub fn advance_curriculum(&mut self) {
        self.scheduler.advance_curriculum(&self.config.enemy);
    }

    /// Override the launch x range (fractions of the width).
    pub fn set_spawn_x_range(&mut self, lo: f64, hi: f64) -> Result<(), ConfigError> {
        self.scheduler.set_spawn_x_range((lo, hi))
    }

    /// Override the ground-target x range (fractions of the width).
    pub fn set_ground_x_range(&mut self, lo: f64, hi: f64) -> Result<(), ConfigError> {
        self.scheduler.set_ground_x_range((lo, hi))
    }

    pub fn launch_ranges(&self) -> &LaunchRanges {
        self.scheduler.ranges()
    }

    /// Capture the full simulation state.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            seed: self.seed,
            store: self.store.clone(),
            episode: self.episode.state().clone(),
            scheduler: self.scheduler.clone(),
            rng: self.rng.clone(),
        }
    }

    /// Resume from a checkpoint taken under a compatible configuration.
    pub fn restore(config: EpisodeConfig, checkpoint: Checkpoint) -> Result<Self, SimError> {
        config.validate()?;
        if checkpoint.store.cities.len() != config.cities.positions.len() {
            return Err(SimError::IncompatibleCheckpoint("city count differs"));
        }
        if !checkpoint.store.is_coherent() {
            return Err(SimError::IncompatibleCheckpoint("entity columns out of sync"));
        }
        if checkpoint.episode.enemies_destroyed + checkpoint.episode.enemies_impacted
            > checkpoint.episode.enemies_spawned
            || checkpoint.episode.enemies_in_flight() as usize != checkpoint.store.enemies.len()
        {
            return Err(SimError::IncompatibleCheckpoint("enemy tallies inconsistent"));
        }
        let schedule = SpawnScheduler::new(&config);
        if schedule.total() != checkpoint.scheduler.total()
            || schedule.script() != checkpoint.scheduler.script()
        {
            return Err(SimError::IncompatibleCheckpoint("spawn schedule differs"));
        }
        if checkpoint.scheduler.launched() != checkpoint.episode.enemies_spawned {
            return Err(SimError::IncompatibleCheckpoint("enemy tallies inconsistent"));
        }

        Ok(Self {
            episode: EpisodeController::from_state(
                checkpoint.episode,
                config.max_steps,
                config.dt,
            ),
            store: checkpoint.store,
            scheduler: checkpoint.scheduler,
            rng: checkpoint.rng,
            seed: checkpoint.seed,
            config,
        })
    }
}

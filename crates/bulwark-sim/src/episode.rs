//! Episode bookkeeping: step counter, running tallies and the
//! Running → Terminated state machine.

use serde::{Deserialize, Serialize};
use tracing::debug;

use bulwark_core::state::{EndReason, EpisodePhase};
use bulwark_core::types::SimTime;

/// Counters for the whole episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EpisodeState {
    pub time: SimTime,
    pub phase: EpisodePhase,
    pub cities_remaining: usize,
    pub enemies_spawned: u32,
    pub enemies_destroyed: u32,
    pub enemies_impacted: u32,
    pub missiles_launched: u32,
    pub end_reason: Option<EndReason>,
}

impl EpisodeState {
    pub fn new(cities: usize) -> Self {
        Self {
            cities_remaining: cities,
            ..Self::default()
        }
    }

    pub fn is_terminated(&self) -> bool {
        self.phase == EpisodePhase::Terminated
    }

    /// Enemy missiles that must still be in flight.
    pub fn enemies_in_flight(&self) -> u32 {
        self.enemies_spawned - self.enemies_destroyed - self.enemies_impacted
    }

    /// True when the episode was cut short by the step horizon.
    pub fn truncated(&self) -> bool {
        self.end_reason == Some(EndReason::StepLimit)
    }
}

/// What changed during a single step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepDeltas {
    pub spawned: u32,
    pub launched: u32,
    pub destroyed: u32,
    pub impacted: u32,
    pub cities_lost: u32,
    /// Cities standing after the step's removals.
    pub cities_alive: u32,
}

/// Owns the `EpisodeState` and decides termination.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeController {
    state: EpisodeState,
    max_steps: Option<u64>,
    dt: f64,
}

impl EpisodeController {
    pub fn new(cities: usize, max_steps: Option<u64>, dt: f64) -> Self {
        Self::from_state(EpisodeState::new(cities), max_steps, dt)
    }

    pub fn from_state(state: EpisodeState, max_steps: Option<u64>, dt: f64) -> Self {
        Self {
            state,
            max_steps,
            dt,
        }
    }

    pub fn state(&self) -> &EpisodeState {
        &self.state
    }

    pub fn is_terminated(&self) -> bool {
        self.state.is_terminated()
    }

    /// Fold one step's deltas into the tallies, advance the step counter and
    /// evaluate termination. `enemies_alive` is the enemy batch length after
    /// compaction. Returns the end reason on the step the episode ends.
    pub fn advance(
        &mut self,
        deltas: &StepDeltas,
        enemies_alive: usize,
        spawner_exhausted: bool,
    ) -> Option<EndReason> {
        assert!(
            !self.is_terminated(),
            "advance called on a terminated episode"
        );

        let state = &mut self.state;
        state.enemies_spawned += deltas.spawned;
        state.missiles_launched += deltas.launched;
        state.enemies_destroyed += deltas.destroyed;
        state.enemies_impacted += deltas.impacted;
        debug_assert!(
            deltas.cities_alive as usize <= state.cities_remaining,
            "cities resurrected: {} -> {}",
            state.cities_remaining,
            deltas.cities_alive
        );
        state.cities_remaining = deltas.cities_alive as usize;
        state.time.advance(self.dt);

        debug_assert_eq!(
            state.enemies_in_flight() as usize,
            enemies_alive,
            "enemy conservation violated"
        );

        let reason = if state.cities_remaining == 0 {
            Some(EndReason::AllCitiesLost)
        } else if enemies_alive == 0 && spawner_exhausted {
            Some(EndReason::MissionComplete)
        } else if self.max_steps.is_some_and(|limit| state.time.step >= limit) {
            Some(EndReason::StepLimit)
        } else {
            None
        };

        if let Some(reason) = reason {
            state.phase = EpisodePhase::Terminated;
            state.end_reason = Some(reason);
            debug!(
                step = state.time.step,
                ?reason,
                cities = state.cities_remaining,
                destroyed = state.enemies_destroyed,
                "episode terminated"
            );
        }
        reason
    }
}

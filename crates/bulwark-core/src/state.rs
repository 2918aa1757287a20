//! Read-only views returned by the step boundary.
//!
//! An `Observation` is rebuilt from the entity store after every step, so it
//! never references an entity removed during that step.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::events::SimEvent;

/// Episode lifecycle. `Terminated` is absorbing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EpisodePhase {
    #[default]
    Running,
    Terminated,
}

/// Why an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// Every city was destroyed.
    AllCitiesLost,
    /// No enemy missile left in flight and none left to launch.
    MissionComplete,
    /// The configured step horizon was reached.
    StepLimit,
}

/// Complete visible state after a step.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub step: u64,
    pub cursor: DVec2,
    pub battery: BatteryView,
    pub cities: Vec<CityView>,
    pub enemy_missiles: Vec<MissileView>,
    pub friendly_missiles: Vec<MissileView>,
    pub explosions: Vec<ExplosionView>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatteryView {
    pub position: DVec2,
    /// Steps until the battery can fire again.
    pub cooldown: u64,
    /// Interceptors left, `None` when unlimited.
    pub ammo: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CityView {
    pub position: DVec2,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissileView {
    pub position: DVec2,
    pub origin: DVec2,
    pub destination: DVec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExplosionView {
    pub center: DVec2,
    pub radius: f64,
}

/// Episode counters and this step's events.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StepInfo {
    pub step: u64,
    pub cities_remaining: usize,
    pub missiles_launched: u32,
    pub missiles_destroyed: u32,
    pub enemies_spawned: u32,
    pub enemies_impacted: u32,
    /// True when the episode ended on the step horizon rather than on its own.
    pub truncated: bool,
    pub events: Vec<SimEvent>,
}

/// Result of one step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepOutcome {
    pub observation: Observation,
    pub reward: f64,
    pub done: bool,
    pub info: StepInfo,
}

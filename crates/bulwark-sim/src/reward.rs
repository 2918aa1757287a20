//! Per-step reward.

use bulwark_core::config::RewardWeights;

use crate::episode::StepDeltas;

/// Linear combination of the step's deltas.
pub fn compute(weights: &RewardWeights, deltas: &StepDeltas) -> f64 {
    weights.city_alive * f64::from(deltas.cities_alive)
        - weights.city_lost * f64::from(deltas.cities_lost)
        + weights.enemy_destroyed * f64::from(deltas.destroyed)
        - weights.missile_launched * f64::from(deltas.launched)
        + weights.step_survived
}

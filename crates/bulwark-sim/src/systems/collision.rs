//! Collision detection between explosions, enemy missiles and cities.
//!
//! Detection is read-only and produces boolean masks over the current slots;
//! `apply` then performs every removal in one compaction. Pair checks are
//! evaluated for the full cross product with no early exit, so the result is
//! independent of slot order.

use glam::DVec2;
use tracing::debug;

use bulwark_core::events::SimEvent;

use crate::store::EntityStore;

/// Masks computed for one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionOutcome {
    /// Enemy slots inside at least one explosion.
    pub intercepted: Vec<bool>,
    /// Enemy slots that reached their destination without being intercepted.
    pub impacted: Vec<bool>,
    /// City slots lost this step (only cities that were alive).
    pub cities_lost: Vec<bool>,
}

impl CollisionOutcome {
    pub fn intercepted_count(&self) -> usize {
        count(&self.intercepted)
    }

    pub fn impacted_count(&self) -> usize {
        count(&self.impacted)
    }

    pub fn cities_lost_count(&self) -> usize {
        count(&self.cities_lost)
    }
}

fn count(mask: &[bool]) -> usize {
    mask.iter().filter(|&&b| b).count()
}

/// Compute interception, impact and city-loss masks.
pub fn run(store: &EntityStore, arrival_epsilon: f64, impact_radius: f64) -> CollisionOutcome {
    let enemies = &store.enemies;

    let intercepted = explosion_hits(
        store.explosions.centers(),
        store.explosions.radii(),
        enemies.positions(),
    );

    let arrived = arrivals(
        enemies.positions(),
        enemies.destinations(),
        enemies.directions(),
        arrival_epsilon,
    );
    // Interception takes precedence over impact within the same step.
    let impacted: Vec<bool> = arrived
        .iter()
        .zip(&intercepted)
        .map(|(&arrived, &hit)| arrived & !hit)
        .collect();

    let cities_lost = city_hits(store, &impacted, impact_radius);

    CollisionOutcome {
        intercepted,
        impacted,
        cities_lost,
    }
}

/// A missile is hit when, for any explosion, `distance <= radius`.
/// Evaluates the full explosions × missiles matrix.
pub fn explosion_hits(centers: &[DVec2], radii: &[f64], missiles: &[DVec2]) -> Vec<bool> {
    let mut hit = vec![false; missiles.len()];
    for (&center, &radius) in centers.iter().zip(radii) {
        let radius_sq = radius * radius;
        for (flag, &position) in hit.iter_mut().zip(missiles) {
            *flag |= center.distance_squared(position) <= radius_sq;
        }
    }
    hit
}

/// A missile has arrived when it is within `epsilon` of its destination or
/// has moved past it along its direction of travel.
pub fn arrivals(
    positions: &[DVec2],
    destinations: &[DVec2],
    directions: &[DVec2],
    epsilon: f64,
) -> Vec<bool> {
    positions
        .iter()
        .zip(destinations)
        .zip(directions)
        .map(|((&position, &destination), &direction)| {
            let to_go = destination - position;
            (to_go.length() <= epsilon) | (to_go.dot(direction) <= 0.0)
        })
        .collect()
}

/// Cities lost to this step's impacts: the impacting missile's own target
/// city, plus any city within `impact_radius` of the impact point. Cities
/// already destroyed are never reported again.
fn city_hits(store: &EntityStore, impacted: &[bool], impact_radius: f64) -> Vec<bool> {
    let cities = &store.cities;
    let enemies = &store.enemies;
    let radius_sq = impact_radius * impact_radius;

    let mut hit = vec![false; cities.len()];
    for ((&impact, &position), &target) in impacted
        .iter()
        .zip(enemies.positions())
        .zip(enemies.target_cities())
    {
        for (slot, (flag, &city)) in hit.iter_mut().zip(cities.positions()).enumerate() {
            let in_blast = city.distance_squared(position) <= radius_sq;
            *flag |= impact & (in_blast | (target == Some(slot)));
        }
    }

    for (flag, &alive) in hit.iter_mut().zip(cities.alive()) {
        *flag &= alive;
    }
    hit
}

/// Remove intercepted and impacted missiles and mark lost cities.
/// Events are emitted before compaction so they carry the final positions.
pub fn apply(store: &mut EntityStore, outcome: &CollisionOutcome, events: &mut Vec<SimEvent>) {
    let enemies = &store.enemies;
    for ((&position, &intercepted), &impacted) in enemies
        .positions()
        .iter()
        .zip(&outcome.intercepted)
        .zip(&outcome.impacted)
    {
        debug_assert!(
            !(intercepted && impacted),
            "missile counted as intercepted and impacted"
        );
        if intercepted {
            events.push(SimEvent::EnemyIntercepted { position });
        } else if impacted {
            events.push(SimEvent::EnemyImpact { position });
        }
    }

    let keep: Vec<bool> = outcome
        .intercepted
        .iter()
        .zip(&outcome.impacted)
        .map(|(&hit, &impact)| !(hit | impact))
        .collect();
    store.enemies.retain(&keep);

    store.cities.destroy(&outcome.cities_lost);
    for city in outcome
        .cities_lost
        .iter()
        .enumerate()
        .filter_map(|(city, &lost)| lost.then_some(city))
    {
        debug!(city, "city lost");
        events.push(SimEvent::CityLost { city });
    }
}

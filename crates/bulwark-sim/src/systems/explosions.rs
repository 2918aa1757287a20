//! Explosion lifecycle: interceptor → explosion transitions and expiry.

use tracing::debug;

use bulwark_core::config::EpisodeConfig;
use bulwark_core::events::SimEvent;

use crate::store::EntityStore;

/// Counts of what happened to explosions this step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DetonationResult {
    /// Interceptors that reached their aim point.
    pub arrived: usize,
    /// Interceptors that exceeded their flight time.
    pub timed_out: usize,
    /// Explosions removed for exceeding their lifetime.
    pub expired: usize,
}

/// Remove expired explosions, then detonate interceptors that arrived or ran
/// out of flight time. Expiry only sees explosions that existed before this
/// call, and new explosions start at age 0, so the two never interact.
pub fn run(
    store: &mut EntityStore,
    config: &EpisodeConfig,
    events: &mut Vec<SimEvent>,
) -> DetonationResult {
    let expired = expire(store);
    let (arrived, timed_out) = detonate(store, config, events);
    DetonationResult {
        arrived,
        timed_out,
        expired,
    }
}

fn expire(store: &mut EntityStore) -> usize {
    let explosions = &mut store.explosions;
    let keep: Vec<bool> = explosions
        .ages
        .iter()
        .zip(&explosions.max_ages)
        .map(|(age, max_age)| age <= max_age)
        .collect();
    let expired = keep.iter().filter(|&&k| !k).count();
    if expired > 0 {
        explosions.retain(&keep);
    }
    expired
}

fn detonate(
    store: &mut EntityStore,
    config: &EpisodeConfig,
    events: &mut Vec<SimEvent>,
) -> (usize, usize) {
    let friendlies = &store.friendlies;
    let arrived: Vec<bool> = friendlies
        .positions
        .iter()
        .zip(&friendlies.destinations)
        .map(|(position, destination)| position.distance(*destination) <= config.arrival_epsilon)
        .collect();
    let timed_out: Vec<bool> = friendlies
        .flight_times
        .iter()
        .map(|&t| t > config.interceptor.max_flight_time)
        .collect();

    let mut keep = Vec::with_capacity(arrived.len());
    let (mut arrived_count, mut timed_out_count) = (0, 0);
    for (i, (&at_aim, &expired)) in arrived.iter().zip(&timed_out).enumerate() {
        if !(at_aim || expired) {
            keep.push(true);
            continue;
        }
        keep.push(false);

        let center = store.friendlies.destinations[i];
        store
            .explosions
            .push(center, config.explosion.max_radius, config.explosion.max_age);
        let timed_out = expired && !at_aim;
        if timed_out {
            timed_out_count += 1;
        } else {
            arrived_count += 1;
        }
        debug!(x = center.x, y = center.y, timed_out, "interceptor detonated");
        events.push(SimEvent::Detonation { center, timed_out });
    }

    if arrived_count + timed_out_count > 0 {
        store.friendlies.retain(&keep);
    }
    (arrived_count, timed_out_count)
}

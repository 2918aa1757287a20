//! Snapshot system: builds the `Observation` and `StepInfo` views.
//!
//! Read-only. Called after compaction, so removed entities never appear.

use glam::DVec2;

use bulwark_core::events::SimEvent;
use bulwark_core::state::*;

use crate::episode::EpisodeState;
use crate::store::EntityStore;

/// Build the observation for the current store contents.
pub fn build_observation(store: &EntityStore, episode: &EpisodeState) -> Observation {
    let step = episode.time.step;
    Observation {
        step,
        cursor: store.cursor,
        battery: BatteryView {
            position: store.battery.position,
            cooldown: store.battery.ready_at_step.saturating_sub(step),
            ammo: store.battery.ammo,
        },
        cities: store
            .cities
            .positions()
            .iter()
            .zip(store.cities.alive())
            .map(|(&position, &alive)| CityView { position, alive })
            .collect(),
        enemy_missiles: missiles(
            store.enemies.positions(),
            store.enemies.origins(),
            store.enemies.destinations(),
        ),
        friendly_missiles: missiles(
            store.friendlies.positions(),
            store.friendlies.origins(),
            store.friendlies.destinations(),
        ),
        explosions: store
            .explosions
            .centers()
            .iter()
            .zip(store.explosions.radii())
            .map(|(&center, &radius)| ExplosionView { center, radius })
            .collect(),
    }
}

fn missiles(positions: &[DVec2], origins: &[DVec2], destinations: &[DVec2]) -> Vec<MissileView> {
    positions
        .iter()
        .zip(origins)
        .zip(destinations)
        .map(|((&position, &origin), &destination)| MissileView {
            position,
            origin,
            destination,
        })
        .collect()
}

/// Build the info block from the episode tallies and this step's events.
pub fn build_info(episode: &EpisodeState, events: Vec<SimEvent>) -> StepInfo {
    StepInfo {
        step: episode.time.step,
        cities_remaining: episode.cities_remaining,
        missiles_launched: episode.missiles_launched,
        missiles_destroyed: episode.enemies_destroyed,
        enemies_spawned: episode.enemies_spawned,
        enemies_impacted: episode.enemies_impacted,
        truncated: episode.truncated(),
        events,
    }
}

//! Kinematic integration system.
//!
//! Straight-line motion at constant speed for both missile batches, explosion
//! aging, and aim cursor movement. No collision logic and no removals.

use glam::DVec2;

use bulwark_core::actions::Action;
use bulwark_core::config::EpisodeConfig;

use crate::store::EntityStore;

/// Advance every entity by one step of `config.dt`.
pub fn run(store: &mut EntityStore, config: &EpisodeConfig, action: Action) {
    let dt = config.dt;

    let enemies = &mut store.enemies;
    advance_along(
        &mut enemies.positions,
        &enemies.destinations,
        &enemies.directions,
        &enemies.speeds,
        dt,
    );

    let friendlies = &mut store.friendlies;
    advance_along(
        &mut friendlies.positions,
        &friendlies.destinations,
        &friendlies.directions,
        &friendlies.speeds,
        dt,
    );
    for flight_time in &mut friendlies.flight_times {
        *flight_time += dt;
    }

    let explosions = &mut store.explosions;
    for (((age, radius), &max_age), &max_radius) in explosions
        .ages
        .iter_mut()
        .zip(explosions.radii.iter_mut())
        .zip(&explosions.max_ages)
        .zip(&explosions.max_radii)
    {
        *age += dt;
        *radius = explosion_radius(*age, max_age, max_radius);
    }

    store.cursor = move_cursor(store.cursor, action, config);
}

/// Move each position along its fixed direction by `speed * dt`, never past
/// the destination.
pub fn advance_along(
    positions: &mut [DVec2],
    destinations: &[DVec2],
    directions: &[DVec2],
    speeds: &[f64],
    dt: f64,
) {
    for (((position, &destination), &direction), &speed) in positions
        .iter_mut()
        .zip(destinations)
        .zip(directions)
        .zip(speeds)
    {
        let remaining = (destination - *position).dot(direction).max(0.0);
        *position += direction * (speed * dt).min(remaining);
    }
}

/// Triangular radius profile: zero at age 0, linear rise to `max_radius` at
/// half of `max_age`, linear fall back to zero at `max_age` and beyond.
pub fn explosion_radius(age: f64, max_age: f64, max_radius: f64) -> f64 {
    let phase = (age / max_age).clamp(0.0, 1.0);
    let radius = max_radius * (1.0 - (2.0 * phase - 1.0).abs());
    debug_assert!(radius >= 0.0, "negative explosion radius {radius}");
    radius.clamp(0.0, max_radius)
}

/// Cursor moves one `cursor.step` along the action's axis, clamped to the
/// playfield.
pub fn move_cursor(cursor: DVec2, action: Action, config: &EpisodeConfig) -> DVec2 {
    config
        .playfield
        .clamp(cursor + action.cursor_direction() * config.cursor.step)
}

//! Battery fire control. Turns a `Fire` action into an interceptor aimed at
//! the cursor, subject to cooldown and ammunition.

use tracing::debug;

use bulwark_core::config::EpisodeConfig;
use bulwark_core::events::{LaunchBlock, SimEvent};

use crate::store::EntityStore;

/// Why the battery cannot fire at `step`, if anything.
pub fn blocked(store: &EntityStore, step: u64) -> Option<LaunchBlock> {
    let battery = &store.battery;
    if battery.ammo == Some(0) {
        Some(LaunchBlock::OutOfAmmo)
    } else if step < battery.ready_at_step {
        Some(LaunchBlock::CoolingDown)
    } else {
        None
    }
}

/// Attempt a launch at `step`. Returns true when an interceptor was added.
/// A blocked launch is not an error: it is reported as an event and the
/// step continues.
pub fn run(
    store: &mut EntityStore,
    config: &EpisodeConfig,
    step: u64,
    events: &mut Vec<SimEvent>,
) -> bool {
    if let Some(reason) = blocked(store, step) {
        debug!(step, ?reason, "launch blocked");
        events.push(SimEvent::LaunchBlocked { reason });
        return false;
    }

    let origin = store.battery.position;
    let destination = store.cursor;
    store
        .friendlies
        .push(origin, destination, config.interceptor.speed);

    let battery = &mut store.battery;
    battery.ready_at_step = step + 1 + u64::from(config.battery.cooldown_steps);
    if let Some(ammo) = battery.ammo.as_mut() {
        *ammo -= 1;
    }

    debug!(
        step,
        x = destination.x,
        y = destination.y,
        ammo = ?battery.ammo,
        "interceptor launched"
    );
    events.push(SimEvent::InterceptorLaunched { destination });
    true
}

//! Columnar entity storage.
//!
//! Each batch keeps one `Vec` per attribute, all of the same length and
//! indexed by slot. Rows are appended with `push` and removed only through
//! `retain`, which compacts every column with one keep-mask in a single
//! pass. Slot indices are only meaningful until the next compaction.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use bulwark_core::config::EpisodeConfig;

/// Drop the rows of `column` whose `keep` flag is false, preserving order.
fn compact<T>(column: &mut Vec<T>, keep: &[bool]) {
    let mut flags = keep.iter().copied();
    column.retain(|_| flags.next().unwrap_or(false));
}

fn direction(origin: DVec2, destination: DVec2) -> DVec2 {
    (destination - origin).normalize_or_zero()
}

/// Parameters for a new enemy missile row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyLaunch {
    pub origin: DVec2,
    pub destination: DVec2,
    pub speed: f64,
    /// City slot the missile is aimed at, `None` for a ground point.
    pub target_city: Option<usize>,
}

/// Hostile missiles in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnemyMissiles {
    pub(crate) positions: Vec<DVec2>,
    pub(crate) origins: Vec<DVec2>,
    pub(crate) destinations: Vec<DVec2>,
    /// Unit vectors from origin to destination, fixed at launch.
    pub(crate) directions: Vec<DVec2>,
    pub(crate) speeds: Vec<f64>,
    pub(crate) target_cities: Vec<Option<usize>>,
}

impl EnemyMissiles {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, launch: EnemyLaunch) {
        self.positions.push(launch.origin);
        self.origins.push(launch.origin);
        self.destinations.push(launch.destination);
        self.directions
            .push(direction(launch.origin, launch.destination));
        self.speeds.push(launch.speed);
        self.target_cities.push(launch.target_city);
        self.debug_assert_coherent();
    }

    /// Keep only the rows flagged in `keep` (one flag per row).
    pub fn retain(&mut self, keep: &[bool]) {
        assert_eq!(keep.len(), self.len(), "keep-mask length mismatch");
        compact(&mut self.positions, keep);
        compact(&mut self.origins, keep);
        compact(&mut self.destinations, keep);
        compact(&mut self.directions, keep);
        compact(&mut self.speeds, keep);
        compact(&mut self.target_cities, keep);
        self.debug_assert_coherent();
    }

    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    pub fn origins(&self) -> &[DVec2] {
        &self.origins
    }

    pub fn destinations(&self) -> &[DVec2] {
        &self.destinations
    }

    pub fn directions(&self) -> &[DVec2] {
        &self.directions
    }

    pub fn speeds(&self) -> &[f64] {
        &self.speeds
    }

    pub fn target_cities(&self) -> &[Option<usize>] {
        &self.target_cities
    }

    fn is_coherent(&self) -> bool {
        let n = self.positions.len();
        self.origins.len() == n
            && self.destinations.len() == n
            && self.directions.len() == n
            && self.speeds.len() == n
            && self.target_cities.len() == n
    }

    #[inline]
    fn debug_assert_coherent(&self) {
        debug_assert!(self.is_coherent(), "enemy columns out of sync");
    }
}

/// Interceptors in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FriendlyMissiles {
    pub(crate) positions: Vec<DVec2>,
    pub(crate) origins: Vec<DVec2>,
    /// Aim point at fire time. Never retargeted.
    pub(crate) destinations: Vec<DVec2>,
    pub(crate) directions: Vec<DVec2>,
    pub(crate) speeds: Vec<f64>,
    pub(crate) flight_times: Vec<f64>,
}

impl FriendlyMissiles {
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn push(&mut self, origin: DVec2, destination: DVec2, speed: f64) {
        self.positions.push(origin);
        self.origins.push(origin);
        self.destinations.push(destination);
        self.directions.push(direction(origin, destination));
        self.speeds.push(speed);
        self.flight_times.push(0.0);
        self.debug_assert_coherent();
    }

    pub fn retain(&mut self, keep: &[bool]) {
        assert_eq!(keep.len(), self.len(), "keep-mask length mismatch");
        compact(&mut self.positions, keep);
        compact(&mut self.origins, keep);
        compact(&mut self.destinations, keep);
        compact(&mut self.directions, keep);
        compact(&mut self.speeds, keep);
        compact(&mut self.flight_times, keep);
        self.debug_assert_coherent();
    }

    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    pub fn origins(&self) -> &[DVec2] {
        &self.origins
    }

    pub fn destinations(&self) -> &[DVec2] {
        &self.destinations
    }

    pub fn flight_times(&self) -> &[f64] {
        &self.flight_times
    }

    fn is_coherent(&self) -> bool {
        let n = self.positions.len();
        self.origins.len() == n
            && self.destinations.len() == n
            && self.directions.len() == n
            && self.speeds.len() == n
            && self.flight_times.len() == n
    }

    #[inline]
    fn debug_assert_coherent(&self) {
        debug_assert!(self.is_coherent(), "interceptor columns out of sync");
    }
}

/// Active explosions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Explosions {
    pub(crate) centers: Vec<DVec2>,
    pub(crate) radii: Vec<f64>,
    pub(crate) ages: Vec<f64>,
    pub(crate) max_ages: Vec<f64>,
    pub(crate) max_radii: Vec<f64>,
}

impl Explosions {
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Append a fresh explosion (age 0, radius 0).
    pub fn push(&mut self, center: DVec2, max_radius: f64, max_age: f64) {
        self.centers.push(center);
        self.radii.push(0.0);
        self.ages.push(0.0);
        self.max_ages.push(max_age);
        self.max_radii.push(max_radius);
        self.debug_assert_coherent();
    }

    pub fn retain(&mut self, keep: &[bool]) {
        assert_eq!(keep.len(), self.len(), "keep-mask length mismatch");
        compact(&mut self.centers, keep);
        compact(&mut self.radii, keep);
        compact(&mut self.ages, keep);
        compact(&mut self.max_ages, keep);
        compact(&mut self.max_radii, keep);
        self.debug_assert_coherent();
    }

    pub fn centers(&self) -> &[DVec2] {
        &self.centers
    }

    pub fn radii(&self) -> &[f64] {
        &self.radii
    }

    pub fn ages(&self) -> &[f64] {
        &self.ages
    }

    pub fn max_ages(&self) -> &[f64] {
        &self.max_ages
    }

    pub fn max_radii(&self) -> &[f64] {
        &self.max_radii
    }

    fn is_coherent(&self) -> bool {
        let n = self.centers.len();
        self.radii.len() == n
            && self.ages.len() == n
            && self.max_ages.len() == n
            && self.max_radii.len() == n
    }

    #[inline]
    fn debug_assert_coherent(&self) {
        debug_assert!(self.is_coherent(), "explosion columns out of sync");
    }
}

/// Defended cities. The slot count is fixed for the episode; only the
/// alive flags change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cities {
    pub(crate) positions: Vec<DVec2>,
    pub(crate) alive: Vec<bool>,
}

impl Cities {
    pub fn new(positions: Vec<DVec2>) -> Self {
        let alive = vec![true; positions.len()];
        Self { positions, alive }
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn positions(&self) -> &[DVec2] {
        &self.positions
    }

    pub fn alive(&self) -> &[bool] {
        &self.alive
    }

    pub fn alive_count(&self) -> usize {
        self.alive.iter().filter(|&&a| a).count()
    }

    /// Slots of the cities still standing, in slot order.
    pub fn alive_slots(&self) -> Vec<usize> {
        self.alive
            .iter()
            .enumerate()
            .filter_map(|(i, &alive)| alive.then_some(i))
            .collect()
    }

    /// Flip the flagged cities to destroyed. Each flagged city must still be
    /// alive: a city is lost exactly once.
    pub fn destroy(&mut self, lost: &[bool]) -> usize {
        assert_eq!(lost.len(), self.len(), "city mask length mismatch");
        let mut count = 0;
        for (alive, &hit) in self.alive.iter_mut().zip(lost) {
            if hit {
                assert!(*alive, "city destroyed twice");
                *alive = false;
                count += 1;
            }
        }
        count
    }
}

/// The player's launcher. Fixed in place and indestructible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    pub position: DVec2,
    /// First step at which the battery may fire again.
    pub ready_at_step: u64,
    /// Interceptors left, `None` when unlimited.
    pub ammo: Option<u32>,
}

/// All mutable entity state for one episode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityStore {
    pub enemies: EnemyMissiles,
    pub friendlies: FriendlyMissiles,
    pub explosions: Explosions,
    pub cities: Cities,
    pub battery: Battery,
    /// Aim cursor position.
    pub cursor: DVec2,
}

impl EntityStore {
    /// Initial layout: cities and battery from the configuration, no
    /// missiles or explosions, cursor centered.
    pub fn new(config: &EpisodeConfig) -> Self {
        Self {
            enemies: EnemyMissiles::default(),
            friendlies: FriendlyMissiles::default(),
            explosions: Explosions::default(),
            cities: Cities::new(config.cities.positions.clone()),
            battery: Battery {
                position: config.battery.position,
                ready_at_step: 0,
                ammo: config.battery.ammo,
            },
            cursor: config.playfield.center(),
        }
    }

    /// Whether every batch has same-length columns and every city reference
    /// points at an existing slot.
    pub fn is_coherent(&self) -> bool {
        self.enemies.is_coherent()
            && self.friendlies.is_coherent()
            && self.explosions.is_coherent()
            && self.cities.alive.len() == self.cities.positions.len()
            && self
                .enemies
                .target_cities
                .iter()
                .flatten()
                .all(|&slot| slot < self.cities.len())
    }
}

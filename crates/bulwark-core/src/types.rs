//! Fundamental geometric and simulation types.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Rectangular playfield in world units.
/// x runs left to right over `[0, width]`, y runs from the ground (`0`)
/// up to the top edge (`height`) where enemy missiles appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

impl Playfield {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Center of the playfield (initial aim cursor position).
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width * 0.5, self.height * 0.5)
    }

    /// Upper corner of the playfield.
    pub fn max(&self) -> DVec2 {
        DVec2::new(self.width, self.height)
    }

    /// Clamp a point into the playfield, each axis independently.
    pub fn clamp(&self, point: DVec2) -> DVec2 {
        DVec2::new(
            point.x.clamp(0.0, self.width),
            point.y.clamp(0.0, self.height),
        )
    }

    /// Whether a point lies inside the playfield (bounds inclusive).
    pub fn contains(&self, point: DVec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Map a fraction of the width (`0.0..=1.0`) to an x coordinate.
    pub fn x_at(&self, fraction: f64) -> f64 {
        fraction * self.width
    }
}

impl Default for Playfield {
    fn default() -> Self {
        Self::new(
            crate::constants::DEFAULT_WIDTH,
            crate::constants::DEFAULT_HEIGHT,
        )
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of completed steps.
    pub step: u64,
    /// Elapsed simulation time (`step * dt`, accumulated).
    pub elapsed: f64,
}

impl SimTime {
    /// Advance by one step of length `dt`.
    pub fn advance(&mut self, dt: f64) {
        self.step += 1;
        self.elapsed += dt;
    }
}

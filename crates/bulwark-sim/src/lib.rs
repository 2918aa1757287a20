//! Simulation engine for BULWARK.
//!
//! Owns the columnar entity store, runs the step systems in a fixed order
//! and produces observations, rewards and episode status. Completely
//! headless and single-threaded, so a seed plus an action sequence always
//! reproduces the same episode.

pub mod engine;
pub mod episode;
pub mod reward;
pub mod store;
pub mod systems;

pub use bulwark_core as core;
pub use engine::{Checkpoint, Simulation};

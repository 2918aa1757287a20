//! Core types and definitions for the BULWARK simulation.
//!
//! This crate defines the vocabulary shared by the engine and the tooling:
//! player actions, episode configuration, per-step views, events, errors
//! and tuning defaults. It has no dependency on the engine itself.

pub mod actions;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;

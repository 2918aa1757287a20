//! Step systems that operate on the entity store.
//!
//! Systems are free functions over `&mut EntityStore` (or `&EntityStore` when
//! read-only). They keep no entity state of their own between steps.

pub mod collision;
pub mod explosions;
pub mod kinematics;
pub mod launcher;
pub mod snapshot;
pub mod spawner;

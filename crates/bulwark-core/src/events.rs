//! Events emitted by the simulation during a step.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::state::EndReason;

/// Something notable that happened during a step, in the order it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A new enemy missile entered from the top edge.
    EnemySpawned {
        origin: DVec2,
        destination: DVec2,
        target_city: Option<usize>,
    },
    /// An interceptor left the battery.
    InterceptorLaunched { destination: DVec2 },
    /// A fire action was ignored.
    LaunchBlocked { reason: LaunchBlock },
    /// An interceptor turned into an explosion.
    Detonation { center: DVec2, timed_out: bool },
    /// An enemy missile was caught by an explosion.
    EnemyIntercepted { position: DVec2 },
    /// An enemy missile reached its destination.
    EnemyImpact { position: DVec2 },
    /// A city was destroyed.
    CityLost { city: usize },
    EpisodeEnded { reason: EndReason },
}

/// Why a fire action had no effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaunchBlock {
    CoolingDown,
    OutOfAmmo,
}

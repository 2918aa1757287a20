//! The discrete player action set.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::SimError;

/// All possible player actions, numbered as the environment exposes them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Noop,
    /// Move the aim cursor up (towards the top edge).
    Up,
    /// Move the aim cursor down (towards the ground).
    Down,
    Left,
    Right,
    /// Launch an interceptor from the battery towards the aim cursor.
    Fire,
}

impl Action {
    /// Size of the discrete action space.
    pub const COUNT: usize = 6;

    /// Every action, in index order.
    pub const ALL: [Action; Action::COUNT] = [
        Action::Noop,
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Fire,
    ];

    /// Index of this action in the discrete action space.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Unit cursor displacement for this action (zero for non-movement actions).
    pub fn cursor_direction(self) -> DVec2 {
        match self {
            Action::Up => DVec2::Y,
            Action::Down => DVec2::NEG_Y,
            Action::Left => DVec2::NEG_X,
            Action::Right => DVec2::X,
            Action::Noop | Action::Fire => DVec2::ZERO,
        }
    }
}

impl TryFrom<usize> for Action {
    type Error = SimError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Action::ALL
            .get(index)
            .copied()
            .ok_or(SimError::InvalidAction {
                index,
                count: Action::COUNT,
            })
    }
}

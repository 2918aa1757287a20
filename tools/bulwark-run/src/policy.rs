//! Built-in action policies for headless runs.

use clap::ValueEnum;
use glam::DVec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use bulwark_sim::core::actions::Action;
use bulwark_sim::core::state::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Never moves, never fires.
    Idle,
    /// Uniformly random action every step.
    Random,
    /// Chases the lowest enemy missile with the cursor and fires on it.
    Tracker,
}

/// Chooses one action per step from the current observation.
pub trait Policy {
    fn act(&mut self, observation: &Observation) -> Action;
}

pub fn build(kind: PolicyKind, seed: u64, cursor_step: f64) -> Box<dyn Policy> {
    match kind {
        PolicyKind::Idle => Box::new(Idle),
        PolicyKind::Random => Box::new(RandomPolicy {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }),
        PolicyKind::Tracker => Box::new(Tracker { cursor_step }),
    }
}

struct Idle;

impl Policy for Idle {
    fn act(&mut self, _observation: &Observation) -> Action {
        Action::Noop
    }
}

struct RandomPolicy {
    rng: ChaCha8Rng,
}

impl Policy for RandomPolicy {
    fn act(&mut self, _observation: &Observation) -> Action {
        Action::ALL[self.rng.gen_range(0..Action::COUNT)]
    }
}

struct Tracker {
    cursor_step: f64,
}

impl Tracker {
    /// One cursor move toward `target` along the axis with the larger gap.
    fn steer(&self, cursor: DVec2, target: DVec2) -> Option<Action> {
        let gap = target - cursor;
        if gap.x.abs() <= self.cursor_step && gap.y.abs() <= self.cursor_step {
            return None;
        }
        Some(if gap.x.abs() >= gap.y.abs() {
            if gap.x > 0.0 {
                Action::Right
            } else {
                Action::Left
            }
        } else if gap.y > 0.0 {
            Action::Up
        } else {
            Action::Down
        })
    }
}

impl Policy for Tracker {
    fn act(&mut self, observation: &Observation) -> Action {
        let lowest = observation
            .enemy_missiles
            .iter()
            .min_by(|a, b| a.position.y.total_cmp(&b.position.y));
        let Some(missile) = lowest else {
            return Action::Noop;
        };

        // Lead the missile by two cursor steps along its path.
        let heading = (missile.destination - missile.position).normalize_or_zero();
        let target = missile.position + heading * 2.0 * self.cursor_step;

        match self.steer(observation.cursor, target) {
            Some(action) => action,
            None => {
                let battery = &observation.battery;
                let armed = battery.cooldown == 0 && battery.ammo != Some(0);
                if armed {
                    Action::Fire
                } else {
                    Action::Noop
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bulwark_sim::core::state::MissileView;

    fn observation_with_missile(cursor: DVec2, position: DVec2) -> Observation {
        Observation {
            cursor,
            enemy_missiles: vec![MissileView {
                position,
                origin: DVec2::new(position.x, 400.0),
                destination: DVec2::new(position.x, 0.0),
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_tracker_idles_without_targets() {
        let mut policy = build(PolicyKind::Tracker, 0, 4.0);
        assert_eq!(policy.act(&Observation::default()), Action::Noop);
    }

    #[test]
    fn test_tracker_steers_then_fires() {
        let mut policy = build(PolicyKind::Tracker, 0, 4.0);
        let far = observation_with_missile(DVec2::new(100.0, 100.0), DVec2::new(200.0, 108.0));
        assert_eq!(policy.act(&far), Action::Right);

        let close = observation_with_missile(DVec2::new(200.0, 100.0), DVec2::new(200.0, 108.0));
        assert_eq!(policy.act(&close), Action::Fire);
    }

    #[test]
    fn test_random_policy_is_seeded() {
        let mut a = build(PolicyKind::Random, 9, 4.0);
        let mut b = build(PolicyKind::Random, 9, 4.0);
        let obs = Observation::default();
        for _ in 0..50 {
            assert_eq!(a.act(&obs), b.act(&obs));
        }
    }
}

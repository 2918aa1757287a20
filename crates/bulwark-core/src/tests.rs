//! Tests for actions, configuration validation and serde shapes.

use glam::DVec2;
use serde_json::json;

use crate::actions::Action;
use crate::config::*;
use crate::error::{ConfigError, SimError};
use crate::events::{LaunchBlock, SimEvent};
use crate::state::{EndReason, Observation, StepInfo};
use crate::types::{Playfield, SimTime};

// ---- Actions ----

#[test]
fn test_action_indices_match_discrete_space() {
    for (i, action) in Action::ALL.iter().enumerate() {
        assert_eq!(action.index(), i);
        assert_eq!(Action::try_from(i).unwrap(), *action);
    }
    assert_eq!(Action::try_from(5).unwrap(), Action::Fire);
}

#[test]
fn test_action_out_of_range_is_rejected() {
    let err = Action::try_from(Action::COUNT).unwrap_err();
    assert!(
        matches!(err, SimError::InvalidAction { index: 6, count: 6 }),
        "unexpected error: {err:?}"
    );
    assert!(Action::try_from(usize::MAX).is_err());
}

#[test]
fn test_cursor_directions() {
    assert_eq!(Action::Up.cursor_direction(), DVec2::new(0.0, 1.0));
    assert_eq!(Action::Down.cursor_direction(), DVec2::new(0.0, -1.0));
    assert_eq!(Action::Left.cursor_direction(), DVec2::new(-1.0, 0.0));
    assert_eq!(Action::Right.cursor_direction(), DVec2::new(1.0, 0.0));
    assert_eq!(Action::Fire.cursor_direction(), DVec2::ZERO);
    assert_eq!(Action::Noop.cursor_direction(), DVec2::ZERO);
}

// ---- Types ----

#[test]
fn test_playfield_clamp_is_per_axis() {
    let field = Playfield::new(100.0, 50.0);
    assert_eq!(field.clamp(DVec2::new(-5.0, 20.0)), DVec2::new(0.0, 20.0));
    assert_eq!(field.clamp(DVec2::new(120.0, 80.0)), DVec2::new(100.0, 50.0));
    assert_eq!(field.center(), DVec2::new(50.0, 25.0));
    assert!(field.contains(DVec2::new(100.0, 0.0)));
    assert!(!field.contains(DVec2::new(100.1, 0.0)));
}

#[test]
fn test_sim_time_advance() {
    let mut time = SimTime::default();
    for _ in 0..4 {
        time.advance(0.25);
    }
    assert_eq!(time.step, 4);
    assert!((time.elapsed - 1.0).abs() < 1e-12);
}

// ---- Configuration ----

#[test]
fn test_default_config_is_valid() {
    let config = EpisodeConfig::default();
    config.validate().unwrap();
    assert_eq!(config.cities.positions.len(), 6);
    assert!(config
        .cities
        .positions
        .iter()
        .all(|c| c.y == 0.0 && c.x != config.battery.position.x));
}

#[test]
fn test_config_rejects_zero_cities() {
    let mut config = EpisodeConfig::default();
    config.cities.positions.clear();
    assert!(matches!(config.validate(), Err(ConfigError::NoCities)));
}

#[test]
fn test_config_rejects_non_positive_speeds() {
    let mut config = EpisodeConfig::default();
    config.enemy.speed = 0.0;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::NonPositive {
            field: "enemy.speed",
            ..
        })
    ));

    let mut config = EpisodeConfig::default();
    config.interceptor.speed = -7.0;
    assert!(config.validate().is_err());

    let mut config = EpisodeConfig::default();
    config.dt = f64::NAN;
    assert!(config.validate().is_err(), "NaN dt must be rejected");
}

#[test]
fn test_config_rejects_bad_arrival_process() {
    let mut config = EpisodeConfig::default();
    config.enemy.arrival = ArrivalProcess::Bernoulli { probability: 1.5 };
    assert!(matches!(config.validate(), Err(ConfigError::Probability(_))));

    config.enemy.arrival = ArrivalProcess::Periodic {
        interval: 0,
        offset: 0,
    };
    assert!(matches!(config.validate(), Err(ConfigError::ZeroInterval)));

    config.enemy.arrival = ArrivalProcess::Scripted {
        launches: vec![ScriptedLaunch {
            step: 0,
            origin: DVec2::new(10.0, 10.0),
            destination: DVec2::new(10.0, 10.0),
        }],
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::DegenerateLaunch { index: 0 })
    ));
}

#[test]
fn test_config_rejects_zero_probability_without_horizon() {
    let mut config = EpisodeConfig::default();
    config.enemy.arrival = ArrivalProcess::Bernoulli { probability: 0.0 };
    assert!(config.enemy.total > 0);
    assert!(config.max_steps.is_none());
    assert!(matches!(config.validate(), Err(ConfigError::NeverTerminates)));

    config.max_steps = Some(100);
    assert!(config.validate().is_ok());

    config.max_steps = None;
    config.enemy.total = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_rejects_bad_curriculum_stage() {
    let mut config = EpisodeConfig::default();
    config.enemy.spawn_x_curriculum = vec![(0.2, 0.4), (0.9, 0.1)];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRange {
            field: "enemy.spawn_x_curriculum",
            ..
        })
    ));

    config.enemy.spawn_x_curriculum = vec![(0.2, 0.4)];
    config.enemy.ground_x_curriculum = vec![(0.0, 1.2)];
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRange {
            field: "enemy.ground_x_curriculum",
            ..
        })
    ));

    config.enemy.ground_x_curriculum = vec![(0.0, 1.0)];
    assert!(config.validate().is_ok());
}

#[test]
fn test_curriculum_lists_default_empty_in_json() {
    let config = EpisodeConfig::from_json_str(r#"{"enemy": {"total": 3}}"#).unwrap();
    assert!(config.enemy.spawn_x_curriculum.is_empty());
    assert!(config.enemy.ground_x_curriculum.is_empty());

    let config = EpisodeConfig::from_json_str(
        r#"{"enemy": {"spawn_x_curriculum": [[0.3, 0.7]]}}"#,
    )
    .unwrap();
    assert_eq!(config.enemy.spawn_x_curriculum, vec![(0.3, 0.7)]);
}

#[test]
fn test_config_rejects_city_outside_playfield() {
    let mut config = EpisodeConfig::default();
    config.cities.positions.push(DVec2::new(-1.0, 0.0));
    assert!(matches!(
        config.validate(),
        Err(ConfigError::OutOfPlayfield { .. })
    ));
}

#[test]
fn test_config_rejects_inverted_spawn_range() {
    let mut config = EpisodeConfig::default();
    config.enemy.spawn_x_range = (0.8, 0.2);
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidRange { .. })
    ));
}

#[test]
fn test_partial_json_uses_defaults() {
    let config = EpisodeConfig::from_json_str(
        r#"{
            "enemy": { "total": 7, "arrival": { "kind": "bernoulli", "probability": 0.07 } },
            "reward": { "city_lost": 16.67, "enemy_destroyed": 28.57, "missile_launched": 0.57 }
        }"#,
    )
    .unwrap();
    assert_eq!(config.enemy.total, 7);
    assert_eq!(
        config.enemy.arrival,
        ArrivalProcess::Bernoulli { probability: 0.07 }
    );
    assert_eq!(config.enemy.speed, EnemyConfig::default().speed);
    assert_eq!(config.reward.city_lost, 16.67);
    assert_eq!(config.reward.step_survived, 0.0);
    assert_eq!(config.playfield, Playfield::default());
}

#[test]
fn test_json_rejects_invalid_values() {
    let err = EpisodeConfig::from_json_str(r#"{ "cities": { "positions": [] } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::NoCities));

    let err = EpisodeConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_scripted_arrival_json_shape() {
    let config = EpisodeConfig::from_json_str(
        r#"{
            "playfield": { "width": 100.0, "height": 100.0 },
            "cities": { "positions": [[50.0, 0.0]], "impact_radius": 1.0 },
            "battery": { "position": [0.0, 0.0] },
            "enemy": {
                "total": 1,
                "speed": 10.0,
                "arrival": { "kind": "scripted", "launches": [
                    { "step": 0, "origin": [50.0, 100.0], "destination": [50.0, 0.0] }
                ] }
            }
        }"#,
    )
    .unwrap();
    match &config.enemy.arrival {
        ArrivalProcess::Scripted { launches } => {
            assert_eq!(launches.len(), 1);
            assert_eq!(launches[0].origin, DVec2::new(50.0, 100.0));
        }
        other => panic!("expected scripted arrival, got {other:?}"),
    }
}

#[test]
fn test_overrides_apply_dotted_paths() {
    let base = EpisodeConfig::default();
    let config = base
        .with_overrides([
            ("enemy.total", json!(7)),
            ("enemy.arrival.probability", json!(0.07)),
            ("reward.city_lost", json!(16.67)),
            ("max_steps", json!(1150)),
        ])
        .unwrap();
    assert_eq!(config.enemy.total, 7);
    assert_eq!(
        config.enemy.arrival,
        ArrivalProcess::Bernoulli { probability: 0.07 }
    );
    assert_eq!(config.reward.city_lost, 16.67);
    assert_eq!(config.max_steps, Some(1150));
    assert_eq!(base.enemy.total, 19, "base config must be untouched");
}

#[test]
fn test_overrides_reject_unknown_keys_and_invalid_values() {
    let base = EpisodeConfig::default();
    let err = base
        .with_overrides([("enemy.count", json!(7))])
        .unwrap_err();
    assert!(matches!(err, ConfigError::UnknownKey(ref k) if k == "enemy.count"));

    let err = base
        .with_overrides([("enemy.speed", json!(-1.0))])
        .unwrap_err();
    assert!(matches!(err, ConfigError::NonPositive { .. }));

    let err = base
        .with_overrides([("enemy.total", json!("many"))])
        .unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

// ---- Serde shapes ----

#[test]
fn test_config_json_round_trip() {
    let config = EpisodeConfig::default();
    let json = serde_json::to_string(&config).unwrap();
    let back: EpisodeConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, back);
}

#[test]
fn test_event_tagging() {
    let event = SimEvent::LaunchBlocked {
        reason: LaunchBlock::OutOfAmmo,
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "LaunchBlocked");
    assert_eq!(json["reason"], "OutOfAmmo");

    let ended = SimEvent::EpisodeEnded {
        reason: EndReason::MissionComplete,
    };
    let back: SimEvent = serde_json::from_str(&serde_json::to_string(&ended).unwrap()).unwrap();
    assert_eq!(back, ended);
}

#[test]
fn test_default_views_serialize() {
    let json = serde_json::to_string(&Observation::default()).unwrap();
    assert!(json.contains("\"enemy_missiles\":[]"));
    let json = serde_json::to_string(&StepInfo::default()).unwrap();
    assert!(json.contains("\"cities_remaining\":0"));
}

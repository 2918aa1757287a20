//! Error types for configuration and stepping.

use thiserror::Error;

/// Malformed episode configuration. Always detected before any state exists.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("at least one city is required")]
    NoCities,
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} ({x}, {y}) lies outside the playfield")]
    OutOfPlayfield { field: &'static str, x: f64, y: f64 },
    #[error("arrival probability {0} is outside [0, 1]")]
    Probability(f64),
    #[error("periodic arrival interval must be at least 1 step")]
    ZeroInterval,
    #[error("arrival probability 0 with enemy missiles to launch requires max_steps")]
    NeverTerminates,
    #[error("{field} range ({lo}, {hi}) must satisfy 0 <= lo <= hi <= 1")]
    InvalidRange {
        field: &'static str,
        lo: f64,
        hi: f64,
    },
    #[error("scripted launch {index} has identical origin and destination")]
    DegenerateLaunch { index: usize },
    #[error("unknown configuration key `{0}`")]
    UnknownKey(String),
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the step boundary.
#[derive(Debug, Error)]
pub enum SimError {
    /// Action index outside the discrete action set. The step is not applied.
    #[error("invalid action index {index} (expected 0..{count})")]
    InvalidAction { index: usize, count: usize },
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A checkpoint that does not fit the configuration it is restored with.
    #[error("incompatible checkpoint: {0}")]
    IncompatibleCheckpoint(&'static str),
}

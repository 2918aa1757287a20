//! bulwark-run: headless episode runner.
//!
//! Usage:
//!   bulwark-run --episodes 10 --policy tracker
//!   bulwark-run --config episode.json --set enemy.total=7 --set reward.city_lost=16.67 --json

mod policy;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use bulwark_sim::core::config::EpisodeConfig;
use bulwark_sim::core::constants::{DEFAULT_SEED, EPISODE_HORIZON};
use bulwark_sim::core::state::EndReason;
use bulwark_sim::Simulation;

use crate::policy::PolicyKind;

#[derive(Parser, Debug)]
#[command(
    name = "bulwark-run",
    version,
    about = "Run headless missile-defense episodes with a built-in policy"
)]
struct Cli {
    /// JSON episode configuration. Missing keys take their defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed of the first episode; episode `i` uses `seed + i`.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Number of episodes to run.
    #[arg(short = 'n', long, default_value_t = 1)]
    episodes: u64,

    #[arg(long, value_enum, default_value_t = PolicyKind::Tracker)]
    policy: PolicyKind,

    /// Override a configuration value by dotted path (e.g. enemy.total=7).
    /// The value is parsed as JSON, falling back to a plain string.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    overrides: Vec<String>,

    /// Print one JSON object per episode instead of plain text.
    #[arg(long)]
    json: bool,

    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

/// Result of one episode.
#[derive(Debug, Serialize)]
struct EpisodeSummary {
    episode: u64,
    seed: u64,
    steps: u64,
    total_reward: f64,
    cities_remaining: usize,
    enemies_spawned: u32,
    enemies_destroyed: u32,
    enemies_impacted: u32,
    missiles_launched: u32,
    end_reason: Option<EndReason>,
}

/// Running mean of episode rewards; memory stays constant in `--episodes`.
#[derive(Debug, Default)]
struct RewardMean {
    sum: f64,
    count: u64,
}

impl RewardMean {
    fn add(&mut self, reward: f64) {
        self.sum += reward;
        self.count += 1;
    }

    fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = load_config(&cli)?;
    info!(
        policy = ?cli.policy,
        episodes = cli.episodes,
        seed = cli.seed,
        horizon = ?config.max_steps,
        "starting run"
    );

    let mut sim = Simulation::with_seed(config, cli.seed).context("invalid configuration")?;
    let mut rewards = RewardMean::default();
    for episode in 0..cli.episodes {
        let summary = run_episode(&mut sim, cli.policy, episode, cli.seed.wrapping_add(episode));
        rewards.add(summary.total_reward);
        report(&summary, cli.json)?;
    }

    if let (false, Some(mean)) = (cli.json, rewards.mean()) {
        println!("mean reward over {} episodes: {mean:.2}", rewards.count);
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<EpisodeConfig> {
    // Validation happens once, after the horizon and overrides are in place.
    let mut base: EpisodeConfig = match &cli.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config: {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("invalid config file: {}", path.display()))?
        }
        None => EpisodeConfig::default(),
    };
    if base.max_steps.is_none() {
        debug!(horizon = EPISODE_HORIZON, "no max_steps configured, using default horizon");
        base.max_steps = Some(EPISODE_HORIZON);
    }

    let overrides = cli
        .overrides
        .iter()
        .map(|raw| parse_override(raw))
        .collect::<Result<Vec<_>>>()?;
    base.with_overrides(overrides)
        .context("invalid configuration")
}

fn parse_override(raw: &str) -> Result<(&str, Value)> {
    let Some((key, value)) = raw.split_once('=') else {
        bail!("override `{raw}` must have the form KEY=VALUE");
    };
    let key = key.trim();
    if key.is_empty() {
        bail!("override `{raw}` has an empty key");
    }
    let value = serde_json::from_str::<Value>(value.trim())
        .unwrap_or_else(|_| Value::String(value.trim().to_string()));
    Ok((key, value))
}

fn run_episode(sim: &mut Simulation, kind: PolicyKind, episode: u64, seed: u64) -> EpisodeSummary {
    let mut observation = sim.reset(seed);
    let mut policy = policy::build(kind, seed, sim.config().cursor.step);
    let mut total_reward = 0.0;

    loop {
        let outcome = sim.apply(policy.act(&observation));
        total_reward += outcome.reward;
        observation = outcome.observation;
        if outcome.done {
            break;
        }
    }

    let state = sim.episode();
    EpisodeSummary {
        episode,
        seed,
        steps: state.time.step,
        total_reward,
        cities_remaining: state.cities_remaining,
        enemies_spawned: state.enemies_spawned,
        enemies_destroyed: state.enemies_destroyed,
        enemies_impacted: state.enemies_impacted,
        missiles_launched: state.missiles_launched,
        end_reason: state.end_reason,
    }
}

fn report(summary: &EpisodeSummary, json: bool) -> Result<()> {
    if json {
        let line = serde_json::to_string(summary).context("failed to encode summary")?;
        println!("{line}");
    } else {
        println!(
            "episode {:>3} seed {:>6}: {:>5} steps, reward {:>8.2}, cities {}, destroyed {}/{}, impacted {}, launched {}, {:?}",
            summary.episode,
            summary.seed,
            summary.steps,
            summary.total_reward,
            summary.cities_remaining,
            summary.enemies_destroyed,
            summary.enemies_spawned,
            summary.enemies_impacted,
            summary.missiles_launched,
            summary.end_reason,
        );
    }
    Ok(())
}

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;
use thiserror::Error;
use tracing::info;

use taktnet_config::{ConfigError, ScenarioConfig};
use taktnet_core::{NetBuilder, NetError, PetriNet, TokenNet, TransitionId};
use taktnet_telemetry::{EventLogger, MetricsRecorder};
use taktnet_time::{ClockError, FiringWindow, TimedNet};

#[derive(Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a timed-net scenario deterministically
    Simulate(SimulateArgs),
    /// Load and validate a scenario file
    Validate(ValidateArgs),
}

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    /// Scenario file to run
    #[arg(short, long)]
    pub scenario: PathBuf,
    /// Override the scenario seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Override the scenario step limit
    #[arg(long)]
    pub max_steps: Option<usize>,
    /// Print the metrics report after the run
    #[arg(long, default_value_t = false)]
    pub metrics: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Scenario file to check
    #[arg(short, long)]
    pub scenario: PathBuf,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Net(#[from] NetError),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error("metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

pub fn run_simulation(args: SimulateArgs, metrics: MetricsRecorder) -> Result<(), CliError> {
    let config = ScenarioConfig::load_from_path(&args.scenario)?;
    let seed = args.seed.unwrap_or(config.run.seed);
    let max_steps = args.max_steps.unwrap_or(config.run.max_steps);

    let mut net = build_timed_net(&config)?;
    info!(scenario = %config.name, seed, max_steps, "starting simulation");

    let time = simulate(&mut net, seed, max_steps, &metrics)?;

    info!(time, "simulation finished");
    for (place, config_place) in config.places.iter().enumerate() {
        info!(
            place = %config_place.name,
            tokens = net.base().tokens(place),
            "final marking"
        );
    }
    if args.metrics {
        println!("{}", metrics.gather_metrics()?);
    }
    Ok(())
}

pub fn run_validate(args: ValidateArgs) -> Result<(), CliError> {
    let config = ScenarioConfig::load_from_path(&args.scenario)?;
    // Window construction re-checks the bounds the config layer validated.
    let net = build_timed_net(&config)?;
    info!(
        scenario = %config.name,
        places = net.base().place_count(),
        transitions = net.base().transition_count(),
        "scenario is valid"
    );
    Ok(())
}

/// Build a timed net from a validated scenario.
pub fn build_timed_net(config: &ScenarioConfig) -> Result<TimedNet<PetriNet>, CliError> {
    let mut builder = NetBuilder::new();
    let mut place_ids = HashMap::new();
    for place in &config.places {
        place_ids.insert(place.name.clone(), builder.place(&place.name, place.tokens)?);
    }

    let mut windows = Vec::with_capacity(config.transitions.len());
    for transition in &config.transitions {
        let t = builder.transition(&transition.name)?;
        for arc in &transition.inputs {
            builder.input_arc(place_ids[arc.place.as_str()], t, arc.weight)?;
        }
        for arc in &transition.outputs {
            builder.output_arc(t, place_ids[arc.place.as_str()], arc.weight)?;
        }
        let window = match transition.max_time {
            Some(max_time) => FiringWindow::bounded(transition.min_time, max_time)?,
            None => FiringWindow::after(transition.min_time)?,
        };
        windows.push((t, window));
    }
    Ok(TimedNet::with_windows(builder.build(), windows)?)
}

/// The deterministic simulation loop; returns the accumulated logical time.
///
/// Each step either fires one timed-enabled transition (chosen by the seeded
/// RNG) or advances the clock by the computed maximal step. A stalled clock
/// with nothing enabled ends the run.
pub fn simulate(
    net: &mut TimedNet<PetriNet>,
    seed: u64,
    max_steps: usize,
    metrics: &MetricsRecorder,
) -> Result<f64, CliError> {
    net.resync();
    let mut rng = StdRng::seed_from_u64(seed);
    let mut time = 0.0;

    for _ in 0..max_steps {
        let enabled: Vec<TransitionId> = (0..net.base().transition_count())
            .filter(|&t| net.is_enabled(t, &(), false))
            .collect();
        if let Some(&t) = enabled.choose(&mut rng) {
            let name = net.base().transition_name(t).to_string();
            net.fire(t, &())?;
            metrics.record_firing();
            EventLogger::log_firing(&name, time);
            continue;
        }
        match net.advance()? {
            Some(step) => {
                time += step;
                metrics.record_advance(time);
                EventLogger::log_advance(step, time);
            }
            None => {
                info!(time, "clock stalled, stopping");
                break;
            }
        }
    }
    Ok(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taktnet_config::{ArcConfig, PlaceConfig, RunConfig, TransitionConfig};

    /// idle(1) --send[1,2]--> waiting --ack[0.5,∞)--> done
    fn handshake() -> ScenarioConfig {
        ScenarioConfig {
            name: "handshake".to_string(),
            places: vec![
                PlaceConfig {
                    name: "idle".to_string(),
                    tokens: 1,
                },
                PlaceConfig {
                    name: "waiting".to_string(),
                    tokens: 0,
                },
                PlaceConfig {
                    name: "done".to_string(),
                    tokens: 0,
                },
            ],
            transitions: vec![
                TransitionConfig {
                    name: "send".to_string(),
                    min_time: 1.0,
                    max_time: Some(2.0),
                    inputs: vec![ArcConfig {
                        place: "idle".to_string(),
                        weight: 1,
                    }],
                    outputs: vec![ArcConfig {
                        place: "waiting".to_string(),
                        weight: 1,
                    }],
                },
                TransitionConfig {
                    name: "ack".to_string(),
                    min_time: 0.5,
                    max_time: None,
                    inputs: vec![ArcConfig {
                        place: "waiting".to_string(),
                        weight: 1,
                    }],
                    outputs: vec![ArcConfig {
                        place: "done".to_string(),
                        weight: 1,
                    }],
                },
            ],
            run: RunConfig {
                seed: 7,
                max_steps: 100,
            },
        }
    }

    #[test]
    fn test_build_wires_windows_and_arcs() {
        let net = build_timed_net(&handshake()).unwrap();
        assert_eq!(net.base().place_count(), 3);
        assert_eq!(net.base().transition_count(), 2);
        assert_eq!(net.window(0).min_time(), 1.0);
        assert_eq!(net.window(0).max_time(), Some(2.0));
        assert_eq!(net.window(1).max_time(), None);
        assert_eq!(net.base().postset(0), &[0]);
        assert_eq!(net.base().tokens(0), 1);
    }

    #[test]
    fn test_handshake_runs_to_completion() {
        let config = handshake();
        let mut net = build_timed_net(&config).unwrap();
        let metrics = MetricsRecorder::new();
        let time = simulate(&mut net, config.run.seed, config.run.max_steps, &metrics).unwrap();

        // send waits 1.0, ack waits another 0.5; the token ends in 'done'.
        assert_eq!(time, 1.5);
        assert_eq!(net.base().tokens(0), 0);
        assert_eq!(net.base().tokens(1), 0);
        assert_eq!(net.base().tokens(2), 1);
    }

    #[test]
    fn test_same_seed_same_run() {
        let config = handshake();
        let metrics = MetricsRecorder::new();

        let mut first = build_timed_net(&config).unwrap();
        let t1 = simulate(&mut first, 99, 100, &metrics).unwrap();
        let mut second = build_timed_net(&config).unwrap();
        let t2 = simulate(&mut second, 99, 100, &metrics).unwrap();

        assert_eq!(t1, t2);
        assert_eq!(first.base().marking(), second.base().marking());
    }
}

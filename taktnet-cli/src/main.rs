//! ## taktnet-cli
//! **Scenario runner for timed nets**
//!
//! Loads a YAML scenario, builds the timed net, and drives the simulation
//! loop deterministically: fire a seeded-RNG choice among the timed-enabled
//! transitions, otherwise advance the clock, until the net stalls or the
//! step limit is reached.

use clap::Parser;
use taktnet_telemetry::{EventLogger, MetricsRecorder};

mod commands;

use commands::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    EventLogger::init();
    let metrics = MetricsRecorder::new();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate(args) => commands::run_simulation(args, metrics)?,
        Commands::Validate(args) => commands::run_validate(args)?,
    }
    Ok(())
}

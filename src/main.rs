//! Quad Dodge entry point
//!
//! Headless driver: loads the field configuration, runs the simulation with
//! the autopilot at the wheel and reports how the run ended.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use quad_dodge::SimConfig;
use quad_dodge::platform::Autopilot;
use quad_dodge::render::LogSink;
use quad_dodge::runner::Runner;
use quad_dodge::sim::SimulationState;

#[derive(Parser)]
#[command(name = "quad-dodge")]
#[command(about = "Dodge-the-swarm simulation with a quadtree broad phase")]
struct Cli {
    /// Path to a JSON config file (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many ticks
    #[arg(long)]
    max_ticks: Option<u64>,

    /// Pace ticks to wall-clock time instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Log a status line every N frames
    #[arg(long, default_value_t = 60)]
    log_every: u64,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    summary_json: bool,

    /// Print the default configuration as JSON and exit
    #[arg(long)]
    dump_default_config: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.dump_default_config {
        let json = serde_json::to_string_pretty(&SimConfig::default())?;
        println!("{json}");
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => SimConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::default(),
    };
    let seed = cli.seed.unwrap_or_else(time_seed);

    log::info!("Quad Dodge starting...");
    let mut state = SimulationState::new(config, seed).context("building simulation")?;
    let mut input = Autopilot::new();
    let mut sink = LogSink::new(cli.log_every);
    let mut runner = Runner::new();

    let summary = if cli.realtime {
        runner.run_realtime(&mut state, &mut input, &mut sink, cli.max_ticks)
    } else {
        runner.run(&mut state, &mut input, &mut sink, cli.max_ticks)
    };

    log::info!(
        "Run ended ({:?}) after {} ticks: score {}, level {}",
        summary.stop,
        summary.ticks,
        summary.score,
        summary.level
    );
    if cli.summary_json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}

fn time_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use heliofield::{FieldSimulation, LayoutMode, SimulationConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LayoutArg {
    Ring,
    FixedRadius,
}

impl From<LayoutArg> for LayoutMode {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Ring => LayoutMode::Ring,
            LayoutArg::FixedRadius => LayoutMode::FixedRadius,
        }
    }
}

/// Estimates the optical power a mirror field delivers to its collector.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Scenario file (JSON). Built-in defaults are used when omitted.
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Panel layout strategy.
    #[arg(short, long, value_enum, default_value_t = LayoutArg::FixedRadius)]
    layout: LayoutArg,

    /// Time of day in fractional hours, overrides the scenario.
    #[arg(short, long)]
    time: Option<f64>,
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.input {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(time) = args.time {
        config.time = time;
    }

    let mut sim = FieldSimulation::new(config).context("Invalid scenario")?;
    sim.layout(args.layout.into())?;
    sim.generate()
        .with_context(|| format!("Simulation failed at t = {} h", sim.sun().time()))?;
    sim.assign_panel_power();

    let summary = serde_json::to_string_pretty(&sim.summary())?;
    println!("{summary}");
    Ok(())
}

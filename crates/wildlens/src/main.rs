use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use wildlens::{SimConfig, Simulation};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// RON config file (default: ./wildlens.ron if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed, overrides the config
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds, overrides the config
    #[arg(long)]
    duration: Option<f32>,

    /// Tick creatures on a single thread
    #[arg(long)]
    sequential: bool,

    /// Write the run report as RON to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the effective configuration as RON and exit
    #[arg(long)]
    print_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = SimConfig::load(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(duration) = args.duration {
        config.simulation.duration_secs = duration;
    }
    if args.sequential {
        config.simulation.parallel = false;
    }

    if args.print_config {
        let ron = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default())
            .context("Failed to serialize configuration")?;
        println!("{ron}");
        return Ok(());
    }

    log::info!("Starting Wildlens");
    let report = Simulation::new(config)?.run();

    println!("{}", report.summary());
    if let Some(path) = args.report {
        report.save_ron(path)?;
    }

    Ok(())
}

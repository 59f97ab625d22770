//! Compare a reference recording against a live recording at their flexion extrema.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use pose_angle_compare::app::{AppConfig, ComparisonApp};
use pose_angle_compare::config::Config;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Landmark CSV of the reference (clip) recording
    #[arg(short, long)]
    reference: PathBuf,

    /// Landmark CSV of the live (patient) recording
    #[arg(short, long)]
    live: PathBuf,

    /// Output directory (overrides the configuration file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logger
    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    info!("Pose Angle Compare");

    let settings = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            Config::from_file(path).with_context(|| format!("Failed to load config {}", path.display()))?
        }
        None => Config::default(),
    };

    let config = AppConfig {
        reference: args.reference,
        live: args.live,
        output_dir: args.output.unwrap_or_else(|| settings.export.output_dir.clone()),
        settings,
    };

    let app = ComparisonApp::new(config)?;
    let summary = app.run()?;

    println!(
        "Replayed {} reference and {} live frames, {} match events",
        summary.frames.reference, summary.frames.live, summary.events
    );
    for (joint, rate) in summary.pass_rates.iter() {
        match rate {
            Some(rate) => println!("{}: {:.0}% of reference extrema Good", joint.label(), rate * 100.0),
            None => println!("{}: no reference extrema", joint.label()),
        }
    }
    for path in &summary.written {
        println!("Wrote {}", path.display());
    }

    Ok(())
}

//! Crossway viewer entry point

use anyhow::Context;
use clap::Parser;
use crossway_viewer::{run, ViewerConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "crossway-viewer")]
#[command(about = "Real-time 3D viewer for the traffic simulation server")]
struct Args {
    /// Simulation server base URL
    #[arg(long)]
    server: Option<String>,

    /// Map file path passed to the server's init call
    #[arg(long)]
    map_file: Option<String>,

    /// Map dictionary path passed to the server's init call
    #[arg(long)]
    map_dict: Option<String>,

    /// Frames between server polls
    #[arg(long)]
    poll_frames: Option<u32>,

    /// Frames a position update is interpolated over
    #[arg(long)]
    cycle_frames: Option<u32>,

    /// Seed for stable vehicle colors and building heights
    #[arg(long)]
    seed: Option<u32>,

    /// Load configuration from this file instead of the layered defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start in borderless fullscreen
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ViewerConfig::load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ViewerConfig::load().context("failed to load configuration")?,
    };

    // Command-line flags win over every config layer
    if let Some(server) = args.server {
        config.server_url = server;
    }
    if let Some(map_file) = args.map_file {
        config.map_file = map_file;
    }
    if let Some(map_dict) = args.map_dict {
        config.map_dict = map_dict;
    }
    if let Some(poll_frames) = args.poll_frames {
        config.poll_frames = poll_frames;
    }
    if let Some(cycle_frames) = args.cycle_frames {
        config.cycle_frames = cycle_frames;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    config.fullscreen = args.fullscreen;

    println!(
        "Connecting to {} (poll every {} frames)",
        config.server_url, config.poll_frames
    );

    run(config)
}

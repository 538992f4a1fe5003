//! Command-line interface for Emberfall
//!
//! The binary only drives headless encounters; front ends embed the library.

use clap::Parser;
use std::path::PathBuf;

/// Combat core for a third-person action RPG
#[derive(Parser, Debug)]
#[command(name = "emberfall")]
#[command(about = "Run scripted combat encounters headlessly")]
#[command(version)]
pub struct Args {
    /// Run the encounter described by this JSON config file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub headless: Option<PathBuf>,

    /// Player class when no config file is given
    #[arg(long, default_value = "Warrior")]
    pub class: String,

    /// Output path for the combat log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Maximum encounter duration in seconds
    #[arg(long)]
    pub max_duration: Option<f32>,

    /// Random seed for a reproducible encounter
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}

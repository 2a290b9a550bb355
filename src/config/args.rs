//! Command-line argument parsing for pressure profile runs

use clap::Parser;

/// Radial z-z pressure profile of water in a nanotube, from an XYZ trajectory
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "config.yaml")]
    pub config_file: String,

    /// Override trajectory path
    #[arg(short, long)]
    pub trajectory: Option<String>,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Worker threads (default: all cores)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Override maximum number of processed frames
    #[arg(long)]
    pub max_frames: Option<usize>,

    /// Override frame stride
    #[arg(long)]
    pub stride: Option<usize>,

    /// Override temperature (K)
    #[arg(long)]
    pub temperature: Option<f64>,
}

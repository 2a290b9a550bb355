mod progress;
mod report;
mod runner;

pub use runner::{run_profile, RunSettings};

use self::report::{report_summary, write_reports};
use crate::config::{Args, Config};
use crate::io::{load_frames, setup_output, FrameSelection};
use crate::pressure_impl::VirialEngine;
use clap::Parser;
use color_eyre::eyre::{eyre, Result, WrapErr};
use std::fs;
use std::path::Path;
use tracing::info;

pub struct PressureApplication {
    args: Args,
    config: Config,
}

impl PressureApplication {
    pub fn from_cli() -> Result<Self> {
        let args = Args::parse();
        let mut config = load_config(&args)?;
        config.apply_args(&args);
        Ok(Self { args, config })
    }

    pub fn run(self) -> Result<()> {
        setup_output(self.args.output.as_ref());
        info!("Configuration loaded from {}", self.args.config_file);

        if let Some(threads) = self.args.threads {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .wrap_err("Failed to configure the worker pool")?;
        }
        info!("Using {} worker threads", rayon::current_num_threads());

        self.config.validate().wrap_err("Invalid configuration")?;
        let settings = RunSettings {
            engine: VirialEngine::new(
                self.config.profile_region()?,
                self.config.force_field()?,
                self.config.ewald_params()?,
            )?,
            temperature: self.config.temperature()?,
            progress_interval: self.config.output.progress_interval.unwrap_or(10),
        };

        let path = self
            .config
            .trajectory
            .path
            .clone()
            .ok_or_else(|| eyre!("No trajectory given: set trajectory.path or pass --trajectory"))?;
        let selection = FrameSelection {
            first: self.config.trajectory.first_frame.unwrap_or(0),
            stride: self.config.trajectory.stride.unwrap_or(1),
            max_frames: self.config.trajectory.max_frames,
        };
        let frames = load_frames(
            Path::new(&path),
            &self.config.frame_layout()?,
            &settings.engine.region.cell_center(),
            &selection,
        )
        .wrap_err_with(|| format!("Failed to load trajectory: {}", path))?;

        let profile = run_profile(&settings, &frames)?;
        report_summary(&profile);

        let output = &self.config.output;
        write_reports(
            &profile,
            output.density_report.as_deref().unwrap_or("density_profile.dat"),
            output.pressure_report.as_deref().unwrap_or("pressure_profile.dat"),
        )
    }
}

fn load_config(args: &Args) -> Result<Config> {
    let config_content = fs::read_to_string(&args.config_file)
        .wrap_err_with(|| format!("Unable to read configuration file: {}", args.config_file))?;

    let config = serde_yml::from_str::<Config>(&config_content)
        .wrap_err("Failed to parse configuration file")?
        .with_defaults();

    Ok(config)
}

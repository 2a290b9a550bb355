//! Output formatting and logging utilities

use crate::pressure_impl::PressureProfile;
use std::fmt;
use std::fs::File;
use std::io::{self, Write};
use std::time::SystemTime as StdSystemTime;
use tracing::info;
use tracing_subscriber::{
    fmt::format::Writer, fmt::layer, fmt::time::FormatTime, layer::SubscriberExt,
    util::SubscriberInitExt, Registry,
};

/// Custom time formatter that shows only seconds
struct SecondPrecisionTimer;

impl FormatTime for SecondPrecisionTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> fmt::Result {
        let now = StdSystemTime::now();
        let duration = now.duration_since(std::time::UNIX_EPOCH).unwrap_or_default();

        // Format as HH:MM:SS (only seconds precision)
        let total_seconds = duration.as_secs();
        let hours = (total_seconds / 3600) % 24;
        let minutes = (total_seconds / 60) % 60;
        let seconds = total_seconds % 60;

        write!(w, "{:02}:{:02}:{:02}", hours, minutes, seconds)
    }
}

/// Setup output logging to file or stdout
pub fn setup_output(output_path: Option<&String>) {
    match output_path {
        Some(path) => {
            if let Ok(log) = File::create(path) {
                let file_layer = layer()
                    .with_writer(log)
                    .with_timer(SecondPrecisionTimer)
                    .with_ansi(false);
                Registry::default().with(file_layer).init();
                info!("Output will be written to: {}", path);
            } else {
                eprintln!("Could not create output file: {}", path);
            }
        }
        None => {
            let stdout_layer = layer()
                .with_writer(std::io::stdout)
                .with_timer(SecondPrecisionTimer)
                .with_ansi(true);
            Registry::default().with(stdout_layer).init();
            info!("Output will be printed to stdout");
        }
    }
}

/// Radial density table: one row per bin.
pub fn write_density_report<W: Write>(writer: &mut W, profile: &PressureProfile) -> io::Result<()> {
    writeln!(
        writer,
        "# radial density, {} frames, dr = {:.4} A",
        profile.frames, profile.dr
    )?;
    writeln!(
        writer,
        "# {:>10} {:>16} {:>16} {:>16}",
        "r[A]", "rho_w[g/cm3]", "n_w[1/A3]", "n_wall[1/A3]"
    )?;
    for row in &profile.rows {
        writeln!(
            writer,
            "  {:>10.4} {:>16.8e} {:>16.8e} {:>16.8e}",
            row.radius, row.water_mass_density, row.water_number_density, row.wall_number_density
        )?;
    }
    Ok(())
}

/// Radial P_zz table in bar: kinetic, fluid-fluid channels, fluid-wall, total.
pub fn write_pressure_report<W: Write>(
    writer: &mut W,
    profile: &PressureProfile,
) -> io::Result<()> {
    writeln!(
        writer,
        "# radial P_zz [bar], {} frames, T = {:.2} K, dr = {:.4} A",
        profile.frames, profile.temperature, profile.dr
    )?;
    writeln!(
        writer,
        "# {:>10} {:>14} {:>14} {:>14} {:>14} {:>14} {:>14}",
        "r[A]", "kinetic", "ff_real", "ff_recip", "ff_lj", "fw_lj", "total"
    )?;
    for row in &profile.rows {
        writeln!(
            writer,
            "  {:>10.4} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e} {:>14.6e}",
            row.radius,
            row.kinetic,
            row.real_coulomb,
            row.reciprocal,
            row.lennard_jones,
            row.wall_lennard_jones,
            row.total
        )?;
    }
    Ok(())
}

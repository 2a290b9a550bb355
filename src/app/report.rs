use crate::io::{write_density_report, write_pressure_report};
use crate::pressure_impl::{PressureProfile, ProfileRow};
use color_eyre::eyre::{Result, WrapErr};
use std::fs::File;
use std::io::BufWriter;
use tracing::info;

pub fn report_summary(profile: &PressureProfile) {
    info!("\nPressure profile finished over {} frames.", profile.frames);
    let populated: Vec<_> = profile.rows.iter().filter(|r| r.water_number_density > 0.0).collect();
    if populated.is_empty() {
        info!("No water centers fell inside the profile region");
        return;
    }

    let peak = populated
        .iter()
        .max_by(|a, b| a.water_mass_density.total_cmp(&b.water_mass_density))
        .map(|r| (r.radius, r.water_mass_density));
    if let Some((radius, density)) = peak {
        info!("  Density peak: {:.4} g/cm3 at r = {:.3} A", density, radius);
    }

    let n = populated.len() as f64;
    let mean = |f: fn(&&ProfileRow) -> f64| populated.iter().map(f).sum::<f64>() / n;
    info!("  Mean over {} populated bins (bar):", populated.len());
    info!("    kinetic      {:>14.4}", mean(|r| r.kinetic));
    info!("    ff real      {:>14.4}", mean(|r| r.real_coulomb));
    info!("    ff recip     {:>14.4}", mean(|r| r.reciprocal));
    info!("    ff LJ        {:>14.4}", mean(|r| r.lennard_jones));
    info!("    fw LJ        {:>14.4}", mean(|r| r.wall_lennard_jones));
    info!("    total        {:>14.4}", mean(|r| r.total));
}

pub fn write_reports(
    profile: &PressureProfile,
    density_path: &str,
    pressure_path: &str,
) -> Result<()> {
    let mut density = BufWriter::new(
        File::create(density_path)
            .wrap_err_with(|| format!("Unable to create density report: {}", density_path))?,
    );
    write_density_report(&mut density, profile).wrap_err("Failed to write density report")?;
    info!("Density profile written to {}", density_path);

    let mut pressure = BufWriter::new(
        File::create(pressure_path)
            .wrap_err_with(|| format!("Unable to create pressure report: {}", pressure_path))?,
    );
    write_pressure_report(&mut pressure, profile).wrap_err("Failed to write pressure report")?;
    info!("Pressure profile written to {}", pressure_path);
    Ok(())
}

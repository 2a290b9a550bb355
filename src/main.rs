//! Pressure profile command-line interface
//!
//! Reads a YAML configuration and an XYZ trajectory, writes the radial
//! density and P_zz reports.

use color_eyre::eyre::Result;
use harasima::app::PressureApplication;

fn main() -> Result<()> {
    color_eyre::install()?;
    PressureApplication::from_cli()?.run()
}

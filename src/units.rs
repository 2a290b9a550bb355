//! Physical constants and unit conversions (CODATA 2018)
//!
//! Working units: lengths in Å, energies in K (k_B = 1), charges in e.

use std::f64::consts::PI;

pub const ELEMENTARY_CHARGE: f64 = 1.602_176_634e-19; // C
pub const VACUUM_PERMITTIVITY: f64 = 8.854_187_812_8e-12; // F/m
pub const BOLTZMANN: f64 = 1.380_649e-23; // J/K
pub const AVOGADRO: f64 = 6.022_140_76e23; // 1/mol
pub const ANGSTROM: f64 = 1.0e-10; // m

/// e²/(4πε₀) expressed in K·Å, so `COULOMB * qi * qj / r` is an energy in K.
pub const COULOMB: f64 =
    ELEMENTARY_CHARGE * ELEMENTARY_CHARGE / (4.0 * PI * VACUUM_PERMITTIVITY * BOLTZMANN * ANGSTROM);

/// K/Å³ -> bar
pub const KELVIN_PER_CUBIC_ANGSTROM_TO_BAR: f64 =
    BOLTZMANN / (ANGSTROM * ANGSTROM * ANGSTROM) * 1.0e-5;

pub const MASS_OXYGEN: f64 = 15.9994; // g/mol
pub const MASS_HYDROGEN: f64 = 1.008; // g/mol
pub const MASS_WATER: f64 = MASS_OXYGEN + 2.0 * MASS_HYDROGEN;

/// Molecules/Å³ -> g/cm³ for water.
pub const WATER_NUMBER_TO_MASS_DENSITY: f64 = MASS_WATER / AVOGADRO * 1.0e24;

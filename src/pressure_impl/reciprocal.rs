//! Reciprocal-space share of each molecule in the axial virial
//!
//! The energy over the half space is `(4π/V)·K_e·Σ g(k)·|S(k)|²`. A molecule's
//! share is its marginal interaction with `S_rest = S − s_m`, halved so that
//! summing over molecules counts every pair once, and corrected for the
//! intramolecular lever `(z_a − Z_m)·F_a,z` of its sites.

use super::accumulator::{Category, Channel, PressureTensor};
use super::contour::ContourGeometry;
use super::ewald::{EwaldSetup, PhaseTables};
use crate::frame::{Frame, Water};
use crate::units::COULOMB;
#[cfg(test)]
use nalgebra::Vector3;
use num_complex::Complex64;
use rayon::prelude::*;
use std::f64::consts::PI;

/// `S(k) = Σ q·exp(i k·r)` over every charged site, one entry per wave vector.
///
/// `charges[s]` belongs to site `s` of `tables`.
pub fn structure_factor(
    setup: &EwaldSetup,
    tables: &PhaseTables,
    charges: &[f64],
) -> Vec<Complex64> {
    setup
        .vectors
        .par_iter()
        .map(|v| {
            charges
                .iter()
                .enumerate()
                .map(|(site, &q)| tables.phase(site, &v.n) * q)
                .sum()
        })
        .collect()
}

/// Share of molecule `m` in the axial molecular virial, K.
///
/// The sites of `m` are `3m..3m+3` in `tables`.
pub fn molecular_virial(
    setup: &EwaldSetup,
    tables: &PhaseTables,
    s_total: &[Complex64],
    charges: &[f64; 3],
    m: usize,
    water: &Water,
) -> f64 {
    let levers = water.sites.map(|r| r.z - water.com.z);
    let first = 3 * m;

    let virial: f64 = setup
        .vectors
        .iter()
        .zip(s_total)
        .map(|(v, &s)| {
            let phases = [0, 1, 2].map(|a| tables.phase(first + a, &v.n));
            let s_m: Complex64 = phases.iter().zip(charges).map(|(p, &q)| *p * q).sum();
            let s_rest = s - s_m;

            let lever_term: f64 = phases
                .iter()
                .zip(charges)
                .zip(&levers)
                .map(|((p, &q), &dz)| q * dz * (s_rest.conj() * *p).im)
                .sum();
            v.weight * (v.zz * (s_m.conj() * s_rest).re - 2.0 * v.k.z * lever_term)
        })
        .sum();

    prefactor(setup) * virial
}

/// Net reciprocal force on molecule `m` from the rest of the system, K/Å.
#[cfg(test)]
pub(crate) fn molecular_force(
    setup: &EwaldSetup,
    tables: &PhaseTables,
    s_total: &[Complex64],
    charges: &[f64; 3],
    m: usize,
) -> Vector3<f64> {
    let first = 3 * m;
    let force = setup.vectors.iter().zip(s_total).fold(Vector3::<f64>::zeros(), |force, (v, &s)| {
        let s_m: Complex64 = (0..3).map(|a| tables.phase(first + a, &v.n) * charges[a]).sum();
        let s_rest = s - s_m;
        force + v.k * (v.weight * (s_rest.conj() * s_m).im)
    });
    force * (2.0 * prefactor(setup))
}

fn prefactor(setup: &EwaldSetup) -> f64 {
    4.0 * PI / setup.volume * COULOMB
}

/// Bin `−W_m/h` at the radius of every molecule inside the profile region.
pub fn reciprocal_contribution(
    frame: &Frame,
    geometry: &ContourGeometry,
    setup: &EwaldSetup,
    tables: &PhaseTables,
    s_total: &[Complex64],
    charges: &[f64; 3],
) -> PressureTensor {
    let grid = &geometry.grid;
    let height = geometry.window.height();

    frame
        .waters
        .par_iter()
        .enumerate()
        .fold(
            || PressureTensor::new(grid.n_bins),
            |mut tensor, (m, water)| {
                let clr = geometry.radius(&water.com);
                if clr >= grid.cutoff || !geometry.window.contains(water.com.z) {
                    return tensor;
                }
                let virial = molecular_virial(setup, tables, s_total, charges, m, water);
                let value = -virial / height;
                tensor.deposit(grid, Category::FluidFluid, Channel::Reciprocal, clr, value);
                tensor
            },
        )
        .reduce(
            || PressureTensor::new(grid.n_bins),
            |mut a, b| {
                a.merge(&b);
                a
            },
        )
}

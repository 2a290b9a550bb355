//! Real-space pair forces: cutoff Lennard-Jones and Ewald-damped Coulomb

use super::accumulator::{Category, Channel, PressureTensor};
use super::contour::ContourGeometry;
use crate::error::{PressureError, PressureResult};
use crate::frame::{minimum_image_component, Frame};
use crate::units::COULOMB;
use rayon::prelude::*;
use std::f64::consts::PI;

/// Extra reach of the molecule-center prefilter beyond the Coulomb cutoff, Å.
/// Covers the site offsets of two rigid waters.
pub const PAIR_SEARCH_MARGIN: f64 = 2.0;

/// 12-6 Lennard-Jones parameters. σ in Å, ε in K.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LennardJonesPair {
    pub sigma: f64,
    pub epsilon: f64,
}

impl LennardJonesPair {
    pub fn lorentz_berthelot(a: &LennardJonesPair, b: &LennardJonesPair) -> Self {
        Self {
            sigma: 0.5 * (a.sigma + b.sigma),
            epsilon: (a.epsilon * b.epsilon).sqrt(),
        }
    }

    /// `dU/dr = 24ε/r · ((σ/r)^6 − 2(σ/r)^12)`
    #[inline]
    pub fn du_dr(&self, r: f64) -> f64 {
        let sr2 = (self.sigma / r).powi(2);
        let sr6 = sr2 * sr2 * sr2;
        24.0 * self.epsilon / r * (sr6 - 2.0 * sr6 * sr6)
    }
}

/// Radial derivative of `K_e·qq·erfc(αr)/r`, in K/Å.
#[inline]
pub fn damped_coulomb_du_dr(qq: f64, r: f64, alpha: f64) -> f64 {
    let ar = alpha * r;
    -qq * COULOMB * (2.0 * alpha * (-ar * ar).exp() / (PI.sqrt() * r) + libm::erfc(ar) / (r * r))
}

/// Rigid cylindrical wall; its sites carry no charge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallModel {
    pub oxygen_wall: LennardJonesPair,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub half_length: f64,
    pub center_z: f64,
}

/// Rigid three-site water with an oxygen-only Lennard-Jones center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceField {
    pub q_oxygen: f64,
    pub q_hydrogen: f64,
    pub oxygen_oxygen: LennardJonesPair,
    pub lj_cutoff: f64,
    pub coulomb_cutoff: f64,
    pub alpha: f64,
    pub wall: Option<WallModel>,
}

impl ForceField {
    /// Charges in site storage order (O, H, H).
    pub fn site_charges(&self) -> [f64; 3] {
        [self.q_oxygen, self.q_hydrogen, self.q_hydrogen]
    }

    /// Molecule-center distance beyond which no site pair can interact.
    pub fn search_radius(&self) -> f64 {
        self.coulomb_cutoff + PAIR_SEARCH_MARGIN
    }

    pub fn validate(&self) -> PressureResult<()> {
        if !(self.lj_cutoff > 0.0) || !(self.coulomb_cutoff > 0.0) {
            return Err(PressureError::Invalid(format!(
                "cutoffs must be positive, got lj={} coulomb={}",
                self.lj_cutoff, self.coulomb_cutoff
            )));
        }
        if self.lj_cutoff > self.coulomb_cutoff {
            return Err(PressureError::CutoffOrdering {
                lj: self.lj_cutoff,
                coulomb: self.coulomb_cutoff,
            });
        }
        let mut pairs = vec![("oxygen-oxygen", self.oxygen_oxygen)];
        if let Some(wall) = &self.wall {
            pairs.push(("oxygen-wall", wall.oxygen_wall));
            if !(wall.outer_radius >= wall.inner_radius) || wall.half_length < 0.0 {
                return Err(PressureError::Invalid(format!(
                    "wall needs inner_radius <= outer_radius and a non-negative half_length, got {} / {} / {}",
                    wall.inner_radius, wall.outer_radius, wall.half_length
                )));
            }
        }
        for (name, lj) in pairs {
            if !(lj.sigma > 0.0) || lj.epsilon < 0.0 {
                return Err(PressureError::Invalid(format!(
                    "{} Lennard-Jones needs sigma > 0 and epsilon >= 0, got {} / {}",
                    name, lj.sigma, lj.epsilon
                )));
            }
        }
        Ok(())
    }
}

/// Fluid-fluid real-space axial contributions of one frame.
///
/// Each surviving molecule pair adds `0.5·dU/dr·Δz_mol·Δz_site/(r·h)` per site
/// pair and channel, and the pair totals go to both molecules' shells.
pub fn fluid_fluid(frame: &Frame, geometry: &ContourGeometry, ff: &ForceField) -> PressureTensor {
    let grid = &geometry.grid;
    let window = &geometry.window;
    let sim_box = &frame.sim_box;
    let height = window.height();
    let charges = ff.site_charges();
    let search2 = ff.search_radius().powi(2);
    let rc2 = ff.coulomb_cutoff * ff.coulomb_cutoff;
    let radii: Vec<f64> = frame.waters.iter().map(|w| geometry.radius(&w.com)).collect();
    let n = frame.waters.len();

    (0..n)
        .into_par_iter()
        .fold(
            || PressureTensor::new(grid.n_bins),
            |mut tensor, i| {
                let wi = &frame.waters[i];
                for j in (i + 1)..n {
                    if radii[i] > grid.cutoff && radii[j] > grid.cutoff {
                        continue;
                    }
                    let wj = &frame.waters[j];
                    let d_mol = sim_box.minimum_image(wi.com - wj.com);
                    let lever = window.lever(wi.com.z, d_mol.z);
                    if lever == 0.0 || d_mol.norm_squared() > search2 {
                        continue;
                    }

                    let mut coulomb = 0.0;
                    let mut lj = 0.0;
                    for (a, sa) in wi.sites.iter().enumerate() {
                        for (b, sb) in wj.sites.iter().enumerate() {
                            let d = sim_box.minimum_image(sa - sb);
                            let r2 = d.norm_squared();
                            if r2 > rc2 {
                                continue;
                            }
                            let r = r2.sqrt();
                            let scale = 0.5 * lever * d.z / (r * height);
                            let qq = charges[a] * charges[b];
                            coulomb += scale * damped_coulomb_du_dr(qq, r, ff.alpha);
                            if a == 0 && b == 0 && r <= ff.lj_cutoff {
                                lj += scale * ff.oxygen_oxygen.du_dr(r);
                            }
                        }
                    }

                    for clr in [radii[i], radii[j]] {
                        tensor.deposit(
                            grid,
                            Category::FluidFluid,
                            Channel::RealCoulomb,
                            clr,
                            coulomb,
                        );
                        tensor.deposit(grid, Category::FluidFluid, Channel::LennardJones, clr, lj);
                    }
                }
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

/// Water oxygen against the wall sites, Lennard-Jones only.
///
/// Returns an empty tensor when the wall is disabled, whatever the frame holds.
pub fn fluid_wall(frame: &Frame, geometry: &ContourGeometry, ff: &ForceField) -> PressureTensor {
    let grid = &geometry.grid;
    let Some(wall) = ff.wall.as_ref() else {
        return PressureTensor::new(grid.n_bins);
    };
    let window = &geometry.window;
    let sim_box = &frame.sim_box;
    let height = window.height();
    let rc = ff.lj_cutoff;
    let wall_radii: Vec<f64> = frame.wall.iter().map(|p| geometry.radius(p)).collect();

    frame
        .waters
        .par_iter()
        .fold(
            || PressureTensor::new(grid.n_bins),
            |mut tensor, water| {
                let oxygen = water.oxygen();
                let r_o = geometry.radius(oxygen);
                if r_o < wall.inner_radius - rc || r_o > wall.outer_radius + rc {
                    return tensor;
                }
                let axial = minimum_image_component(oxygen.z - wall.center_z, sim_box.lengths.z);
                if axial.abs() > wall.half_length + rc {
                    return tensor;
                }

                for (site, &r_site) in frame.wall.iter().zip(&wall_radii) {
                    let d = sim_box.minimum_image(oxygen - site);
                    let r2 = d.norm_squared();
                    if r2 > rc * rc {
                        continue;
                    }
                    let d_com = sim_box.minimum_image(water.com - site);
                    let lever = window.lever(water.com.z, d_com.z);
                    if lever == 0.0 {
                        continue;
                    }
                    let r = r2.sqrt();
                    let value = 0.5 * wall.oxygen_wall.du_dr(r) * lever * d.z / (r * height);
                    tensor.deposit(grid, Category::FluidWall, Channel::LennardJones, r_o, value);
                    tensor.deposit(grid, Category::FluidWall, Channel::LennardJones, r_site, value);
                }
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

//! Harasima contour binning
//!
//! Each axial contribution is attributed, with full weight, to the radial
//! shell containing the particle it belongs to. Nothing is spread along the
//! line of centers.

use crate::error::{PressureError, PressureResult};
use crate::frame::{minimum_image_component, SimBox, TubeAxis};
use std::f64::consts::PI;

/// Concentric shells of equal thickness around the tube axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialGrid {
    pub n_bins: usize,
    pub cutoff: f64,
    pub dr: f64,
}

impl RadialGrid {
    pub fn new(cutoff: f64, n_bins: usize) -> PressureResult<Self> {
        if n_bins == 0 {
            return Err(PressureError::Invalid("rden_bins must be at least 1".into()));
        }
        if !(cutoff > 0.0) {
            return Err(PressureError::Invalid(format!(
                "rden_cut must be positive, got {}",
                cutoff
            )));
        }
        Ok(Self {
            n_bins,
            cutoff,
            dr: cutoff / n_bins as f64,
        })
    }

    /// Radius at the middle of shell `bin` (0-based).
    #[inline]
    pub fn center(&self, bin: usize) -> f64 {
        (bin as f64 + 0.5) * self.dr
    }

    /// Shell selected by the unit-step pair
    /// `H(clr - posr + dr/2) · H(posr + dr/2 - clr)`, closed below and open above.
    ///
    /// Only the shell under `clr` and its two neighbours are tested; the test
    /// itself decides, so ties at shell edges resolve the same way as a full scan.
    #[inline]
    pub fn bin_of(&self, clr: f64) -> Option<usize> {
        if !(clr >= 0.0) || clr >= self.cutoff {
            return None;
        }
        let guess = (clr / self.dr) as usize;
        let half = 0.5 * self.dr;
        let lo = guess.saturating_sub(1);
        let hi = (guess + 1).min(self.n_bins - 1);
        (lo..=hi).find(|&bin| {
            let posr = self.center(bin);
            clr - posr + half >= 0.0 && posr + half - clr > 0.0
        })
    }

    /// Annulus area `π·(2i−1)·dr²` of the 1-based shell i.
    #[inline]
    pub fn shell_area(&self, bin: usize) -> f64 {
        PI * (2 * bin + 1) as f64 * self.dr * self.dr
    }

    /// `2π·posr·dr`, the same annulus area written through the shell center.
    #[inline]
    pub fn contour_area(&self, bin: usize) -> f64 {
        2.0 * PI * self.center(bin) * self.dr
    }
}

/// Axial slab `[zlo, zhi]` over which the profile is averaged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxialWindow {
    pub zlo: f64,
    pub zhi: f64,
    /// box length along the axis, for periodic overlap
    pub lz: f64,
}

impl AxialWindow {
    /// Window of height `fraction · lz` centered on `center`.
    pub fn centered(center: f64, fraction: f64, lz: f64) -> Self {
        let half = 0.5 * fraction * lz;
        Self {
            zlo: center - half,
            zhi: center + half,
            lz,
        }
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.zhi - self.zlo
    }

    pub fn contains(&self, z: f64) -> bool {
        let mid = 0.5 * (self.zlo + self.zhi);
        let dz = minimum_image_component(z - mid, self.lz);
        dz.abs() <= 0.5 * self.height()
    }

    /// Signed length of the axial segment from `z_a - dz` to `z_a` that lies
    /// inside the window, counting every periodic image of the window.
    ///
    /// For a segment wholly inside the window this is `dz` itself.
    pub fn lever(&self, z_a: f64, dz: f64) -> f64 {
        let (a, b) = if dz >= 0.0 { (z_a - dz, z_a) } else { (z_a, z_a - dz) };
        let overlap: f64 = (-1..=1)
            .map(|image| {
                let shift = image as f64 * self.lz;
                let lo = a.max(self.zlo + shift);
                let hi = b.min(self.zhi + shift);
                (hi - lo).max(0.0)
            })
            .sum();
        overlap.copysign(dz)
    }
}

/// Everything the binner needs to place a contribution in one frame.
#[derive(Debug, Clone, Copy)]
pub struct ContourGeometry {
    pub grid: RadialGrid,
    pub axis: TubeAxis,
    pub window: AxialWindow,
    pub sim_box: SimBox,
}

impl ContourGeometry {
    pub fn new(
        grid: RadialGrid,
        axis: TubeAxis,
        window_center: f64,
        window_fraction: f64,
        sim_box: SimBox,
    ) -> Self {
        Self {
            grid,
            axis,
            window: AxialWindow::centered(window_center, window_fraction, sim_box.lengths.z),
            sim_box,
        }
    }

    #[inline]
    pub fn radius(&self, p: &nalgebra::Vector3<f64>) -> f64 {
        self.axis.radius(p, &self.sim_box)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn full_scan(grid: &RadialGrid, clr: f64) -> Vec<usize> {
        let half = 0.5 * grid.dr;
        (0..grid.n_bins)
            .filter(|&bin| {
                let posr = grid.center(bin);
                clr - posr + half >= 0.0 && posr + half - clr > 0.0
            })
            .collect()
    }

    #[test]
    fn test_every_radius_lands_in_exactly_one_bin() {
        let mut rng = StdRng::seed_from_u64(42);
        for &(cutoff, bins) in &[(7.0, 70), (12.5, 33), (1.0, 1), (9.3, 250)] {
            let grid = RadialGrid::new(cutoff, bins).unwrap();
            for _ in 0..20_000 {
                let clr: f64 = rng.gen_range(0.0..cutoff);
                let hits = full_scan(&grid, clr);
                assert_eq!(hits.len(), 1, "r={} hits={:?}", clr, hits);
                assert_eq!(grid.bin_of(clr), Some(hits[0]));
            }
        }
    }

    #[test]
    fn test_bin_edges() {
        let grid = RadialGrid::new(5.0, 50).unwrap();
        assert_eq!(grid.bin_of(0.0), Some(0));
        assert_eq!(grid.bin_of(0.05), Some(0));
        assert_eq!(grid.bin_of(4.999), Some(49));
        assert_eq!(grid.bin_of(5.0), None);
        assert_eq!(grid.bin_of(8.0), None);
        assert_eq!(grid.bin_of(-0.1), None);
    }

    #[test]
    fn test_shell_areas_tile_the_disk() {
        let grid = RadialGrid::new(6.0, 24).unwrap();
        let total: f64 = (0..grid.n_bins).map(|b| grid.shell_area(b)).sum();
        assert_relative_eq!(total, PI * 36.0, max_relative = 1e-12);
        for bin in 0..grid.n_bins {
            assert_relative_eq!(grid.shell_area(bin), grid.contour_area(bin), max_relative = 1e-12);
        }
    }

    #[test]
    fn test_lever_inside_window_is_separation() {
        let window = AxialWindow::centered(0.0, 0.8, 30.0);
        assert_relative_eq!(window.height(), 24.0);
        assert_relative_eq!(window.lever(2.0, 3.0), 3.0);
        assert_relative_eq!(window.lever(2.0, -3.0), -3.0);
    }

    #[test]
    fn test_lever_clips_to_window() {
        let window = AxialWindow::centered(0.0, 0.2, 50.0); // [-5, 5]
        // segment [3, 8]
        assert_relative_eq!(window.lever(8.0, 5.0), 2.0);
        // both above
        assert_eq!(window.lever(9.0, 2.0), 0.0);
        // both below
        assert_eq!(window.lever(-9.0, -3.0), 0.0);
        // straddling the whole window
        assert_relative_eq!(window.lever(7.0, 14.0), 10.0);
    }

    #[test]
    fn test_lever_counts_periodic_image() {
        // full-box window, segment crossing the periodic boundary
        let window = AxialWindow::centered(0.0, 1.0, 20.0); // [-10, 10]
        // from 9 to 11 (image of -9)
        assert_relative_eq!(window.lever(9.0, -2.0), -2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_window_contains_is_periodic() {
        let window = AxialWindow::centered(0.0, 0.5, 40.0); // [-10, 10]
        assert!(window.contains(0.0));
        assert!(window.contains(10.0));
        assert!(!window.contains(15.0));
        assert!(window.contains(38.0));
    }
}

//! Per-frame configuration: periodic box, rigid waters and nanotube sites
//!
//! Water sites are stored whole around their center of mass; only the center
//! of mass itself is folded into the primary cell.

use crate::error::{PressureError, PressureResult};
use crate::units::{MASS_HYDROGEN, MASS_OXYGEN, MASS_WATER};
use nalgebra::Vector3;

/// Sites per water molecule, in storage order.
pub const WATER_SITES: [SiteKind; 3] = [SiteKind::Oxygen, SiteKind::Hydrogen, SiteKind::Hydrogen];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    Oxygen,
    Hydrogen,
}

impl SiteKind {
    pub fn mass(self) -> f64 {
        match self {
            SiteKind::Oxygen => MASS_OXYGEN,
            SiteKind::Hydrogen => MASS_HYDROGEN,
        }
    }
}

/// Wrap one separation component into `[-l/2, l/2)`.
#[inline]
pub fn minimum_image_component(d: f64, l: f64) -> f64 {
    let mut w = d - l * (d / l + 0.5).floor();
    // floor() can land one image off when d/l + 0.5 rounds to an integer
    if w >= 0.5 * l {
        w -= l;
    } else if w < -0.5 * l {
        w += l;
    }
    w
}

/// Orthorhombic periodic box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBox {
    pub lengths: Vector3<f64>,
}

impl SimBox {
    pub fn new(lengths: Vector3<f64>) -> PressureResult<Self> {
        if lengths.iter().any(|&l| !(l > 0.0) || !l.is_finite()) {
            return Err(PressureError::Invalid(format!(
                "box lengths must be positive, got [{}, {}, {}]",
                lengths.x, lengths.y, lengths.z
            )));
        }
        Ok(Self { lengths })
    }

    pub fn volume(&self) -> f64 {
        self.lengths.x * self.lengths.y * self.lengths.z
    }

    pub fn min_edge(&self) -> f64 {
        self.lengths.min()
    }

    pub fn max_edge(&self) -> f64 {
        self.lengths.max()
    }

    // Apply minimum-image convention
    pub fn minimum_image(&self, mut d: Vector3<f64>) -> Vector3<f64> {
        for k in 0..3 {
            d[k] = minimum_image_component(d[k], self.lengths[k]);
        }
        d
    }

    /// Fold a point into the cell `[center - L/2, center + L/2)`.
    pub fn fold(&self, p: Vector3<f64>, center: &Vector3<f64>) -> Vector3<f64> {
        center + self.minimum_image(p - center)
    }
}

/// Nanotube axis, parallel to z through `(x, y)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TubeAxis {
    pub x: f64,
    pub y: f64,
}

impl TubeAxis {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Radial distance from the axis, taken through the nearest periodic image.
    pub fn radius(&self, p: &Vector3<f64>, sim_box: &SimBox) -> f64 {
        let dx = minimum_image_component(p.x - self.x, sim_box.lengths.x);
        let dy = minimum_image_component(p.y - self.y, sim_box.lengths.y);
        dx.hypot(dy)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Water {
    /// O, H, H, kept whole around `com`
    pub sites: [Vector3<f64>; 3],
    /// Center of mass in the primary cell
    pub com: Vector3<f64>,
}

impl Water {
    /// Rebuild a molecule from possibly wrapped site coordinates.
    ///
    /// Hydrogens are unwrapped next to the oxygen, the mass-weighted center is
    /// folded into the cell centered at `cell_center`, and the sites are moved
    /// along with it.
    pub fn reconstruct(
        raw: [Vector3<f64>; 3],
        sim_box: &SimBox,
        cell_center: &Vector3<f64>,
    ) -> Self {
        let oxygen = raw[0];
        let mut sites = [oxygen; 3];
        for k in 1..3 {
            sites[k] = oxygen + sim_box.minimum_image(raw[k] - oxygen);
        }

        let com = WATER_SITES
            .iter()
            .zip(sites.iter())
            .fold(Vector3::<f64>::zeros(), |acc, (kind, r)| acc + r * kind.mass())
            / MASS_WATER;
        let folded = sim_box.fold(com, cell_center);
        let shift = folded - com;
        for site in sites.iter_mut() {
            *site += shift;
        }

        Water {
            sites,
            com: folded,
        }
    }

    pub fn oxygen(&self) -> &Vector3<f64> {
        &self.sites[0]
    }
}

/// Site counts expected in every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLayout {
    pub n_molecules: usize,
    pub n_wall_sites: usize,
}

impl FrameLayout {
    pub fn n_atoms(&self) -> usize {
        WATER_SITES.len() * self.n_molecules + self.n_wall_sites
    }
}

#[derive(Debug, Clone)]
pub struct Frame {
    pub index: usize,
    pub sim_box: SimBox,
    pub waters: Vec<Water>,
    pub wall: Vec<Vector3<f64>>,
}

impl Frame {
    /// Assemble a frame from a flat coordinate list laid out as
    /// `n_molecules` × (O, H, H) followed by the wall sites.
    pub fn from_coordinates(
        index: usize,
        sim_box: SimBox,
        coords: &[Vector3<f64>],
        layout: &FrameLayout,
        cell_center: &Vector3<f64>,
    ) -> PressureResult<Self> {
        if coords.len() != layout.n_atoms() {
            return Err(PressureError::SiteCountMismatch {
                frame: index,
                expected: layout.n_atoms(),
                found: coords.len(),
            });
        }

        let n_water_sites = WATER_SITES.len() * layout.n_molecules;
        let waters = coords[..n_water_sites]
            .chunks_exact(3)
            .map(|c| Water::reconstruct([c[0], c[1], c[2]], &sim_box, cell_center))
            .collect();
        let wall = coords[n_water_sites..].to_vec();

        Ok(Frame {
            index,
            sim_box,
            waters,
            wall,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_minimum_image_half_open() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let l = rng.gen_range(0.5..80.0);
            let d = rng.gen_range(-5.0 * l..5.0 * l);
            let w = minimum_image_component(d, l);
            assert!(w >= -0.5 * l && w < 0.5 * l, "d={} l={} w={}", d, l, w);
            // still the same periodic image class
            let shift = (d - w) / l;
            assert_relative_eq!(shift, shift.round(), epsilon = 1e-9);
        }
    }

    #[test]
    fn test_minimum_image_boundaries() {
        assert_relative_eq!(minimum_image_component(5.0, 10.0), -5.0);
        assert_relative_eq!(minimum_image_component(-5.0, 10.0), -5.0);
        assert_relative_eq!(minimum_image_component(14.0, 10.0), 4.0);
    }

    #[test]
    fn test_radius_uses_nearest_image() {
        let sim_box = SimBox::new(Vector3::new(20.0, 20.0, 30.0)).unwrap();
        let axis = TubeAxis::new(0.0, 0.0);
        let p = Vector3::new(19.0, 0.0, 3.0);
        assert_relative_eq!(axis.radius(&p, &sim_box), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_water_reconstruction_unwraps_hydrogens() {
        let sim_box = SimBox::new(Vector3::new(10.0, 10.0, 10.0)).unwrap();
        let center = Vector3::zeros();
        // oxygen near the +x face, one hydrogen wrapped to the -x face
        let raw = [
            Vector3::new(4.9, 0.0, 0.0),
            Vector3::new(-4.7, 0.8, 0.0),
            Vector3::new(4.6, -0.8, 0.0),
        ];
        let water = Water::reconstruct(raw, &sim_box, &center);

        let oh = water.sites[1] - water.sites[0];
        assert!(oh.norm() < 1.2);
        assert!(water.com.x >= -5.0 && water.com.x < 5.0);

        let hydrogens = water.sites[1] + water.sites[2];
        let expected = (water.sites[0] * MASS_OXYGEN + hydrogens * MASS_HYDROGEN) / MASS_WATER;
        assert_relative_eq!(water.com, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_frame_rejects_wrong_site_count() {
        let sim_box = SimBox::new(Vector3::new(10.0, 10.0, 10.0)).unwrap();
        let layout = FrameLayout {
            n_molecules: 2,
            n_wall_sites: 1,
        };
        let coords = vec![Vector3::zeros(); 6];
        let err =
            Frame::from_coordinates(3, sim_box, &coords, &layout, &Vector3::zeros()).unwrap_err();
        assert!(matches!(
            err,
            PressureError::SiteCountMismatch {
                frame: 3,
                expected: 7,
                found: 6
            }
        ));
    }

    #[test]
    fn test_box_rejects_non_positive_edges() {
        assert!(SimBox::new(Vector3::new(10.0, 0.0, 10.0)).is_err());
        assert!(SimBox::new(Vector3::new(10.0, -1.0, 10.0)).is_err());
    }
}

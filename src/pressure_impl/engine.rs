//! Per-frame driver tying the pair sweeps, the Ewald sum and the binner together

use super::accumulator::{DensityProfile, FrameContribution, PressureTensor};
use super::contour::{ContourGeometry, RadialGrid};
use super::ewald::{EwaldParams, EwaldSetup, PhaseTables};
use super::real_space::ForceField;
use super::{real_space, reciprocal};
use crate::error::{PressureError, PressureResult};
use crate::frame::{Frame, SimBox, TubeAxis};
use nalgebra::Vector3;
use tracing::debug;

/// Where the profile is taken.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileRegion {
    pub grid: RadialGrid,
    pub axis: TubeAxis,
    pub window_center: f64,
    pub window_fraction: f64,
}

impl ProfileRegion {
    pub fn geometry(&self, sim_box: SimBox) -> ContourGeometry {
        ContourGeometry::new(
            self.grid,
            self.axis,
            self.window_center,
            self.window_fraction,
            sim_box,
        )
    }

    /// Center of the cell molecule centers are folded into.
    pub fn cell_center(&self) -> Vector3<f64> {
        Vector3::new(self.axis.x, self.axis.y, self.window_center)
    }
}

#[derive(Debug, Clone)]
pub struct VirialEngine {
    pub region: ProfileRegion,
    pub force_field: ForceField,
    pub ewald: EwaldParams,
}

impl VirialEngine {
    pub fn new(
        region: ProfileRegion,
        force_field: ForceField,
        ewald: EwaldParams,
    ) -> PressureResult<Self> {
        if !(region.window_fraction > 0.0 && region.window_fraction <= 1.0) {
            return Err(PressureError::Invalid(format!(
                "window_fraction must lie in (0, 1], got {}",
                region.window_fraction
            )));
        }
        force_field.validate()?;
        ewald.validate()?;
        Ok(Self {
            region,
            force_field,
            ewald,
        })
    }

    /// Box-dependent preconditions: the pair search must fit in half the
    /// smallest edge and the wave-vector set must fit the ceiling.
    pub fn check_frame(&self, frame: &Frame) -> PressureResult<EwaldSetup> {
        let required = self.force_field.search_radius();
        let half_edge = 0.5 * frame.sim_box.min_edge();
        if required > half_edge {
            return Err(PressureError::BoxTooSmall {
                frame: frame.index,
                required,
                half_edge,
            });
        }
        EwaldSetup::new(&self.ewald, &frame.sim_box)
    }

    pub fn process_frame(&self, frame: &Frame) -> PressureResult<FrameContribution> {
        let setup = self.check_frame(frame)?;
        let geometry = self.region.geometry(frame.sim_box);

        let sites: Vec<Vector3<f64>> = frame.waters.iter().flat_map(|w| w.sites).collect();
        let charges = self.force_field.site_charges();
        let site_charges: Vec<f64> = (0..frame.waters.len()).flat_map(|_| charges).collect();

        let tables = PhaseTables::build(&setup, &frame.sim_box, &sites);
        let s_total = reciprocal::structure_factor(&setup, &tables, &site_charges);

        let mut tensor = PressureTensor::new(geometry.grid.n_bins);
        tensor.merge(&real_space::fluid_fluid(frame, &geometry, &self.force_field));
        tensor.merge(&real_space::fluid_wall(frame, &geometry, &self.force_field));
        tensor.merge(&reciprocal::reciprocal_contribution(
            frame, &geometry, &setup, &tables, &s_total, &charges,
        ));

        debug!(
            "frame {}: {} waters, {} wall sites, {} wave vectors (kmax = {})",
            frame.index,
            frame.waters.len(),
            frame.wall.len(),
            setup.len(),
            setup.kmax
        );

        Ok(FrameContribution {
            tensor,
            density: DensityProfile::sample(frame, &geometry),
        })
    }
}

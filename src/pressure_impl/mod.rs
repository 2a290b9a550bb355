//! Radial z-z pressure tensor of a fluid confined in a nanotube
//!
//! The axial pressure at radius r is taken on the Harasima contour: every
//! configurational contribution is attributed, whole, to the cylindrical shell
//! holding the molecule it belongs to,
//!
//! P_zz(r) = ρ(r)·k_B·T − 1/(2π·r·dr) · Σ_shell ⟨W_zz⟩ / h
//!
//! where h is the height of the axial averaging window and W_zz the molecular
//! virial split into
//! - fluid-fluid real-space damped Coulomb,
//! - fluid-fluid reciprocal space (Ewald),
//! - fluid-fluid Lennard-Jones,
//! - fluid-wall Lennard-Jones.
//!
//! # Usage
//!
//! ```ignore
//! let engine = VirialEngine::new(region, force_field, ewald)?;
//! let mut acc = ProfileAccumulator::new(region.grid);
//! for frame in &frames {
//!     acc.fold_frame(&engine.process_frame(frame)?);
//! }
//! let profile = acc.finalize(temperature);
//! ```

mod accumulator;
mod contour;
mod engine;
mod ewald;
mod real_space;
mod reciprocal;

pub use accumulator::{
    Category, Channel, DensityProfile, FrameContribution, PressureProfile, PressureTensor,
    ProfileAccumulator, ProfileRow, Species,
};
pub use contour::{AxialWindow, ContourGeometry, RadialGrid};
pub use engine::{ProfileRegion, VirialEngine};
pub use ewald::{EwaldParams, EwaldSetup, PhaseTables, WaveVector};
pub use real_space::{
    damped_coulomb_du_dr, fluid_fluid, fluid_wall, ForceField, LennardJonesPair, WallModel,
    PAIR_SEARCH_MARGIN,
};
pub use reciprocal::{molecular_virial, reciprocal_contribution, structure_factor};

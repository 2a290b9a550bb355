//! Per-bin tensor and density accumulators, and the final normalization

use super::contour::{ContourGeometry, RadialGrid};
use crate::frame::Frame;
use crate::units::{KELVIN_PER_CUBIC_ANGSTROM_TO_BAR, WATER_NUMBER_TO_MASS_DENSITY};

/// Which pair of bodies produced a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    FluidWall,
    FluidFluid,
}

/// Which part of the force field produced a contribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    RealCoulomb,
    Reciprocal,
    LennardJones,
}

impl Category {
    pub const ALL: [Category; 2] = [Category::FluidWall, Category::FluidFluid];

    fn index(self) -> usize {
        match self {
            Category::FluidWall => 0,
            Category::FluidFluid => 1,
        }
    }
}

impl Channel {
    pub const ALL: [Channel; 3] = [
        Channel::RealCoulomb,
        Channel::Reciprocal,
        Channel::LennardJones,
    ];

    fn index(self) -> usize {
        match self {
            Channel::RealCoulomb => 0,
            Channel::Reciprocal => 1,
            Channel::LennardJones => 2,
        }
    }
}

/// Axial contributions per (category, channel, bin).
///
/// Values are in K/Å (already divided by the window height); the contour
/// normalization turns them into pressures.
#[derive(Debug, Clone, PartialEq)]
pub struct PressureTensor {
    cells: [[Vec<f64>; 3]; 2],
}

impl PressureTensor {
    pub fn new(n_bins: usize) -> Self {
        let row = || [vec![0.0; n_bins], vec![0.0; n_bins], vec![0.0; n_bins]];
        Self {
            cells: [row(), row()],
        }
    }

    pub fn get(&self, category: Category, channel: Channel) -> &[f64] {
        &self.cells[category.index()][channel.index()]
    }

    #[inline]
    pub fn add(&mut self, category: Category, channel: Channel, bin: usize, value: f64) {
        self.cells[category.index()][channel.index()][bin] += value;
    }

    /// Bin `value` at radius `clr`; radii outside the grid are dropped.
    #[inline]
    pub fn deposit(
        &mut self,
        grid: &RadialGrid,
        category: Category,
        channel: Channel,
        clr: f64,
        value: f64,
    ) {
        if let Some(bin) = grid.bin_of(clr) {
            self.add(category, channel, bin, value);
        }
    }

    pub fn merge(&mut self, other: &PressureTensor) {
        for (mine, theirs) in self.cells.iter_mut().flatten().zip(other.cells.iter().flatten()) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
    }

    /// Sum over all bins of one cell.
    pub fn total(&self, category: Category, channel: Channel) -> f64 {
        self.get(category, channel).iter().sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Species {
    Water,
    WallSite,
}

impl Species {
    fn index(self) -> usize {
        match self {
            Species::Water => 0,
            Species::WallSite => 1,
        }
    }
}

/// Number density per (bin, species), in Å⁻³.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityProfile {
    cells: [Vec<f64>; 2],
}

impl DensityProfile {
    pub fn new(n_bins: usize) -> Self {
        Self {
            cells: [vec![0.0; n_bins], vec![0.0; n_bins]],
        }
    }

    pub fn get(&self, species: Species) -> &[f64] {
        &self.cells[species.index()]
    }

    pub fn merge(&mut self, other: &DensityProfile) {
        for (mine, theirs) in self.cells.iter_mut().zip(other.cells.iter()) {
            for (a, b) in mine.iter_mut().zip(theirs) {
                *a += b;
            }
        }
    }

    /// Count water centers of mass and wall sites inside the window.
    pub fn sample(frame: &Frame, geometry: &ContourGeometry) -> Self {
        let grid = &geometry.grid;
        let height = geometry.window.height();
        let mut profile = Self::new(grid.n_bins);

        let positions = frame
            .waters
            .iter()
            .map(|w| (Species::Water, &w.com))
            .chain(frame.wall.iter().map(|p| (Species::WallSite, p)));
        for (species, p) in positions {
            if !geometry.window.contains(p.z) {
                continue;
            }
            if let Some(bin) = grid.bin_of(geometry.radius(p)) {
                profile.cells[species.index()][bin] += 1.0 / (grid.shell_area(bin) * height);
            }
        }
        profile
    }
}

/// What a single frame adds to the run.
#[derive(Debug, Clone)]
pub struct FrameContribution {
    pub tensor: PressureTensor,
    pub density: DensityProfile,
}

/// One row of the final radial profile. Pressures in bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileRow {
    pub radius: f64,
    pub water_mass_density: f64,
    pub water_number_density: f64,
    pub wall_number_density: f64,
    pub kinetic: f64,
    pub real_coulomb: f64,
    pub reciprocal: f64,
    pub lennard_jones: f64,
    pub wall_lennard_jones: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PressureProfile {
    pub frames: usize,
    pub temperature: f64,
    pub dr: f64,
    pub rows: Vec<ProfileRow>,
}

/// Run-long accumulator; the only state that outlives a frame.
#[derive(Debug, Clone)]
pub struct ProfileAccumulator {
    grid: RadialGrid,
    tensor: PressureTensor,
    density: DensityProfile,
    frames: usize,
}

impl ProfileAccumulator {
    pub fn new(grid: RadialGrid) -> Self {
        Self {
            grid,
            tensor: PressureTensor::new(grid.n_bins),
            density: DensityProfile::new(grid.n_bins),
            frames: 0,
        }
    }

    pub fn fold_frame(&mut self, contribution: &FrameContribution) {
        self.tensor.merge(&contribution.tensor);
        self.density.merge(&contribution.density);
        self.frames += 1;
    }

    /// Frame-average everything and convert to the reported profile.
    ///
    /// The kinetic term is the ideal-gas `ρ·k_B·T` of the sampled number
    /// density; no velocities are read, so this assumes local equilibrium at
    /// the bulk temperature.
    pub fn finalize(&self, temperature: f64) -> PressureProfile {
        let grid = &self.grid;
        let norm = if self.frames > 0 {
            1.0 / self.frames as f64
        } else {
            0.0
        };
        // −1/(2π·posr·dr) · Σ, averaged over frames, in bar
        let channel = |category: Category, channel: Channel, bin: usize| {
            -self.tensor.get(category, channel)[bin] * norm / grid.contour_area(bin)
                * KELVIN_PER_CUBIC_ANGSTROM_TO_BAR
        };

        let rows = (0..grid.n_bins)
            .map(|bin| {
                let water = self.density.get(Species::Water)[bin] * norm;
                let wall = self.density.get(Species::WallSite)[bin] * norm;
                let kinetic = water * temperature * KELVIN_PER_CUBIC_ANGSTROM_TO_BAR;
                let real_coulomb = channel(Category::FluidFluid, Channel::RealCoulomb, bin);
                let reciprocal = channel(Category::FluidFluid, Channel::Reciprocal, bin);
                let lennard_jones = channel(Category::FluidFluid, Channel::LennardJones, bin);
                let wall_lennard_jones = channel(Category::FluidWall, Channel::LennardJones, bin);
                ProfileRow {
                    radius: grid.center(bin),
                    water_mass_density: water * WATER_NUMBER_TO_MASS_DENSITY,
                    water_number_density: water,
                    wall_number_density: wall,
                    kinetic,
                    real_coulomb,
                    reciprocal,
                    lennard_jones,
                    wall_lennard_jones,
                    total: kinetic + real_coulomb + reciprocal + lennard_jones + wall_lennard_jones,
                }
            })
            .collect();

        PressureProfile {
            frames: self.frames,
            temperature,
            dr: grid.dr,
            rows,
        }
    }
}

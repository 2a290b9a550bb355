//! Configuration management for pressure profile runs
//!
//! This module handles the YAML configuration structures, their defaults,
//! validation, and the conversion into the engine's parameter types.

mod args;

pub use args::Args;

use crate::error::{PressureError, PressureResult};
use crate::frame::{FrameLayout, TubeAxis};
use crate::pressure_impl::{
    EwaldParams, ForceField, LennardJonesPair, ProfileRegion, RadialGrid, WallModel,
};
use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemParams,
    #[serde(default)]
    pub charges: ChargeParams,
    #[serde(default)]
    pub lennard_jones: LennardJonesParams,
    #[serde(default)]
    pub electrostatics: ElectrostaticsParams,
    #[serde(default)]
    pub wall: WallParams,
    #[serde(default)]
    pub profile: ProfileParams,
    #[serde(default)]
    pub trajectory: TrajectoryParams,
    #[serde(default)]
    pub output: OutputParams,
}

/// Thermodynamic state and system composition
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SystemParams {
    /// Bulk temperature in K, used for the kinetic term
    pub temperature: Option<f64>,
    pub n_molecules: Option<usize>,
    /// Tube axis position in the xy plane, Å
    pub axis_x: Option<f64>,
    pub axis_y: Option<f64>,
}

impl Default for SystemParams {
    fn default() -> Self {
        SystemParams {
            temperature: Some(300.0),
            n_molecules: None,
            axis_x: Some(0.0),
            axis_y: Some(0.0),
        }
    }
}

impl SystemParams {
    /// Apply default values to any missing parameters
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.temperature.is_none() {
            self.temperature = defaults.temperature;
        }
        if self.axis_x.is_none() {
            self.axis_x = defaults.axis_x;
        }
        if self.axis_y.is_none() {
            self.axis_y = defaults.axis_y;
        }
        self
    }
}

/// Site charges in units of e (SPC/E by default)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChargeParams {
    pub oxygen: Option<f64>,
    pub hydrogen: Option<f64>,
}

impl Default for ChargeParams {
    fn default() -> Self {
        ChargeParams {
            oxygen: Some(-0.8476),
            hydrogen: Some(0.4238),
        }
    }
}

impl ChargeParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.oxygen.is_none() {
            self.oxygen = defaults.oxygen;
        }
        if self.hydrogen.is_none() {
            self.hydrogen = defaults.hydrogen;
        }
        self
    }
}

/// Oxygen-oxygen Lennard-Jones, σ in Å and ε in K
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LennardJonesParams {
    pub sigma_oo: Option<f64>,
    pub epsilon_oo: Option<f64>,
    pub cutoff: Option<f64>,
}

impl Default for LennardJonesParams {
    fn default() -> Self {
        LennardJonesParams {
            sigma_oo: Some(3.166),
            epsilon_oo: Some(78.2),
            cutoff: Some(10.0),
        }
    }
}

impl LennardJonesParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.sigma_oo.is_none() {
            self.sigma_oo = defaults.sigma_oo;
        }
        if self.epsilon_oo.is_none() {
            self.epsilon_oo = defaults.epsilon_oo;
        }
        if self.cutoff.is_none() {
            self.cutoff = defaults.cutoff;
        }
        self
    }
}

/// Ewald summation parameters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElectrostaticsParams {
    /// Splitting parameter α, Å⁻¹
    pub alpha: Option<f64>,
    /// Relative precision ε of the reciprocal sum
    pub precision: Option<f64>,
    /// Real-space Coulomb cutoff, Å
    pub cutoff: Option<f64>,
    pub max_wave_vectors: Option<usize>,
}

impl Default for ElectrostaticsParams {
    fn default() -> Self {
        ElectrostaticsParams {
            alpha: Some(0.3),
            precision: Some(1e-5),
            cutoff: Some(10.0),
            max_wave_vectors: Some(200_000),
        }
    }
}

impl ElectrostaticsParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.alpha.is_none() {
            self.alpha = defaults.alpha;
        }
        if self.precision.is_none() {
            self.precision = defaults.precision;
        }
        if self.cutoff.is_none() {
            self.cutoff = defaults.cutoff;
        }
        if self.max_wave_vectors.is_none() {
            self.max_wave_vectors = defaults.max_wave_vectors;
        }
        self
    }
}

/// Rigid nanotube wall
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WallParams {
    pub enabled: Option<bool>,
    pub n_sites: Option<usize>,
    /// Wall site Lennard-Jones, used for Lorentz-Berthelot mixing
    pub sigma_wall: Option<f64>,
    pub epsilon_wall: Option<f64>,
    /// Explicit oxygen-wall parameters, override the mixing rule
    pub sigma_ow: Option<f64>,
    pub epsilon_ow: Option<f64>,
    pub inner_radius: Option<f64>,
    pub outer_radius: Option<f64>,
    pub half_length: Option<f64>,
    pub center_z: Option<f64>,
}

impl Default for WallParams {
    fn default() -> Self {
        WallParams {
            enabled: Some(false),
            n_sites: Some(0),
            // graphitic carbon
            sigma_wall: Some(3.4),
            epsilon_wall: Some(28.0),
            sigma_ow: None,
            epsilon_ow: None,
            inner_radius: None,
            outer_radius: None,
            half_length: None,
            center_z: Some(0.0),
        }
    }
}

impl WallParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.enabled.is_none() {
            self.enabled = defaults.enabled;
        }
        if self.n_sites.is_none() {
            self.n_sites = defaults.n_sites;
        }
        if self.sigma_wall.is_none() {
            self.sigma_wall = defaults.sigma_wall;
        }
        if self.epsilon_wall.is_none() {
            self.epsilon_wall = defaults.epsilon_wall;
        }
        if self.center_z.is_none() {
            self.center_z = defaults.center_z;
        }
        self
    }
}

/// Radial grid and axial window
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileParams {
    pub rden_cut: Option<f64>,
    pub rden_bins: Option<usize>,
    pub window_center: Option<f64>,
    pub window_fraction: Option<f64>,
}

impl Default for ProfileParams {
    fn default() -> Self {
        ProfileParams {
            rden_cut: Some(8.0),
            rden_bins: Some(80),
            window_center: Some(0.0),
            window_fraction: Some(0.5),
        }
    }
}

impl ProfileParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.rden_cut.is_none() {
            self.rden_cut = defaults.rden_cut;
        }
        if self.rden_bins.is_none() {
            self.rden_bins = defaults.rden_bins;
        }
        if self.window_center.is_none() {
            self.window_center = defaults.window_center;
        }
        if self.window_fraction.is_none() {
            self.window_fraction = defaults.window_fraction;
        }
        self
    }
}

/// Trajectory selection
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrajectoryParams {
    pub path: Option<String>,
    pub first_frame: Option<usize>,
    pub stride: Option<usize>,
    /// Cap on processed frames, all when absent
    pub max_frames: Option<usize>,
}

impl Default for TrajectoryParams {
    fn default() -> Self {
        TrajectoryParams {
            path: None,
            first_frame: Some(0),
            stride: Some(1),
            max_frames: None,
        }
    }
}

impl TrajectoryParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.first_frame.is_none() {
            self.first_frame = defaults.first_frame;
        }
        if self.stride.is_none() {
            self.stride = defaults.stride;
        }
        self
    }
}

/// Report files and progress cadence
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputParams {
    pub density_report: Option<String>,
    pub pressure_report: Option<String>,
    /// Log a progress line every this many frames
    pub progress_interval: Option<usize>,
}

impl Default for OutputParams {
    fn default() -> Self {
        OutputParams {
            density_report: Some("density_profile.dat".to_string()),
            pressure_report: Some("pressure_profile.dat".to_string()),
            progress_interval: Some(10),
        }
    }
}

impl OutputParams {
    pub fn with_defaults(mut self) -> Self {
        let defaults = Self::default();
        if self.density_report.is_none() {
            self.density_report = defaults.density_report;
        }
        if self.pressure_report.is_none() {
            self.pressure_report = defaults.pressure_report;
        }
        if self.progress_interval.is_none() {
            self.progress_interval = defaults.progress_interval;
        }
        self
    }
}

fn require<T: Copy>(value: Option<T>, key: &str) -> PressureResult<T> {
    value.ok_or_else(|| PressureError::Invalid(format!("missing required parameter {}", key)))
}

impl Config {
    /// Apply default values to every section
    pub fn with_defaults(self) -> Self {
        Config {
            system: self.system.with_defaults(),
            charges: self.charges.with_defaults(),
            lennard_jones: self.lennard_jones.with_defaults(),
            electrostatics: self.electrostatics.with_defaults(),
            wall: self.wall.with_defaults(),
            profile: self.profile.with_defaults(),
            trajectory: self.trajectory.with_defaults(),
            output: self.output.with_defaults(),
        }
    }

    /// Fold command-line overrides into the file settings, ahead of `validate`.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(path) = &args.trajectory {
            self.trajectory.path = Some(path.clone());
        }
        if let Some(stride) = args.stride {
            self.trajectory.stride = Some(stride);
        }
        if let Some(max_frames) = args.max_frames {
            self.trajectory.max_frames = Some(max_frames);
        }
        if let Some(temperature) = args.temperature {
            self.system.temperature = Some(temperature);
        }
    }

    /// Check every parameter the run depends on before any frame is read.
    pub fn validate(&self) -> PressureResult<()> {
        let temperature = self.temperature()?;
        if !(temperature >= 0.0) {
            return Err(PressureError::Invalid(format!(
                "temperature must be non-negative, got {}",
                temperature
            )));
        }
        let layout = self.frame_layout()?;
        if layout.n_molecules == 0 {
            return Err(PressureError::Invalid("n_molecules must be at least 1".into()));
        }
        if require(self.trajectory.stride, "trajectory.stride")? == 0 {
            return Err(PressureError::Invalid("trajectory.stride must be at least 1".into()));
        }
        if self.trajectory.max_frames == Some(0) {
            return Err(PressureError::NoFrames);
        }
        if require(self.output.progress_interval, "output.progress_interval")? == 0 {
            return Err(PressureError::Invalid(
                "output.progress_interval must be at least 1".into(),
            ));
        }

        let region = self.profile_region()?;
        if !(region.window_fraction > 0.0 && region.window_fraction <= 1.0) {
            return Err(PressureError::Invalid(format!(
                "window_fraction must lie in (0, 1], got {}",
                region.window_fraction
            )));
        }
        self.force_field()?.validate()?;
        self.ewald_params()?.validate()
    }

    pub fn temperature(&self) -> PressureResult<f64> {
        require(self.system.temperature, "system.temperature")
    }

    pub fn frame_layout(&self) -> PressureResult<FrameLayout> {
        Ok(FrameLayout {
            n_molecules: require(self.system.n_molecules, "system.n_molecules")?,
            n_wall_sites: require(self.wall.n_sites, "wall.n_sites")?,
        })
    }

    pub fn profile_region(&self) -> PressureResult<ProfileRegion> {
        let grid = RadialGrid::new(
            require(self.profile.rden_cut, "profile.rden_cut")?,
            require(self.profile.rden_bins, "profile.rden_bins")?,
        )?;
        Ok(ProfileRegion {
            grid,
            axis: TubeAxis::new(
                require(self.system.axis_x, "system.axis_x")?,
                require(self.system.axis_y, "system.axis_y")?,
            ),
            window_center: require(self.profile.window_center, "profile.window_center")?,
            window_fraction: require(self.profile.window_fraction, "profile.window_fraction")?,
        })
    }

    pub fn ewald_params(&self) -> PressureResult<EwaldParams> {
        Ok(EwaldParams {
            alpha: require(self.electrostatics.alpha, "electrostatics.alpha")?,
            precision: require(self.electrostatics.precision, "electrostatics.precision")?,
            max_wave_vectors: require(
                self.electrostatics.max_wave_vectors,
                "electrostatics.max_wave_vectors",
            )?,
        })
    }

    pub fn force_field(&self) -> PressureResult<ForceField> {
        let oxygen_oxygen = LennardJonesPair {
            sigma: require(self.lennard_jones.sigma_oo, "lennard_jones.sigma_oo")?,
            epsilon: require(self.lennard_jones.epsilon_oo, "lennard_jones.epsilon_oo")?,
        };
        let wall = if require(self.wall.enabled, "wall.enabled")? {
            Some(self.wall_model(&oxygen_oxygen)?)
        } else {
            None
        };
        Ok(ForceField {
            q_oxygen: require(self.charges.oxygen, "charges.oxygen")?,
            q_hydrogen: require(self.charges.hydrogen, "charges.hydrogen")?,
            oxygen_oxygen,
            lj_cutoff: require(self.lennard_jones.cutoff, "lennard_jones.cutoff")?,
            coulomb_cutoff: require(self.electrostatics.cutoff, "electrostatics.cutoff")?,
            alpha: require(self.electrostatics.alpha, "electrostatics.alpha")?,
            wall,
        })
    }

    fn wall_model(&self, oxygen_oxygen: &LennardJonesPair) -> PressureResult<WallModel> {
        let wall_site = LennardJonesPair {
            sigma: require(self.wall.sigma_wall, "wall.sigma_wall")?,
            epsilon: require(self.wall.epsilon_wall, "wall.epsilon_wall")?,
        };
        let mixed = LennardJonesPair::lorentz_berthelot(oxygen_oxygen, &wall_site);
        Ok(WallModel {
            oxygen_wall: LennardJonesPair {
                sigma: self.wall.sigma_ow.unwrap_or(mixed.sigma),
                epsilon: self.wall.epsilon_ow.unwrap_or(mixed.epsilon),
            },
            inner_radius: require(self.wall.inner_radius, "wall.inner_radius")?,
            outer_radius: require(self.wall.outer_radius, "wall.outer_radius")?,
            half_length: require(self.wall.half_length, "wall.half_length")?,
            center_z: require(self.wall.center_z, "wall.center_z")?,
        })
    }
}

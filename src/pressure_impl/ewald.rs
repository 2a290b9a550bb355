//! Reciprocal-space working set, rebuilt for every frame

use crate::error::{PressureError, PressureResult};
use crate::frame::SimBox;
use itertools::iproduct;
use nalgebra::Vector3;
use num_complex::Complex64;
use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EwaldParams {
    /// Splitting parameter α, Å⁻¹
    pub alpha: f64,
    /// Target relative precision ε of the truncated sums
    pub precision: f64,
    /// Largest number of half-space wave vectors a frame may need
    pub max_wave_vectors: usize,
}

impl EwaldParams {
    fn log_precision(&self) -> f64 {
        (-self.precision.ln()).sqrt()
    }

    /// `kc = 2α·sqrt(−ln ε)`
    pub fn k_cutoff(&self) -> f64 {
        2.0 * self.alpha * self.log_precision()
    }

    /// Largest integer index along an axis of length `l`.
    pub fn axis_max(&self, l: f64) -> i32 {
        (self.alpha * l / PI * self.log_precision()).ceil() as i32
    }

    pub fn validate(&self) -> PressureResult<()> {
        if !(self.alpha > 0.0) {
            return Err(PressureError::Invalid(format!(
                "ewald alpha must be positive, got {}",
                self.alpha
            )));
        }
        if !(self.precision > 0.0 && self.precision < 1.0) {
            return Err(PressureError::Invalid(format!(
                "ewald precision must lie in (0, 1), got {}",
                self.precision
            )));
        }
        Ok(())
    }
}

/// One admissible wave vector; it stands for both `k` and `-k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveVector {
    pub n: [i32; 3],
    pub k: Vector3<f64>,
    pub k2: f64,
    /// `exp(−k²/4α²)/k²`
    pub weight: f64,
    /// `1 − 2k_z²(1/k² + 1/4α²)`, the strain derivative of `weight·|S|²` along z
    pub zz: f64,
}

#[derive(Debug, Clone)]
pub struct EwaldSetup {
    pub alpha: f64,
    pub k_cutoff: f64,
    pub n_max: [i32; 3],
    /// index bound along the longest edge, reported in logs and errors
    pub kmax: i32,
    pub volume: f64,
    pub vectors: Vec<WaveVector>,
}

impl EwaldSetup {
    /// Enumerate the half-space `nx > 0 ∨ (nx = 0 ∧ ny > 0) ∨ (nx = ny = 0 ∧ nz > 0)`
    /// inside the sphere `|k| ≤ kc`.
    pub fn new(params: &EwaldParams, sim_box: &SimBox) -> PressureResult<Self> {
        params.validate()?;
        let k_cutoff = params.k_cutoff();
        let kc2 = k_cutoff * k_cutoff;
        let lengths = sim_box.lengths;
        let n_max = [
            params.axis_max(lengths.x),
            params.axis_max(lengths.y),
            params.axis_max(lengths.z),
        ];
        let kmax = params.axis_max(sim_box.max_edge());
        let unit = Vector3::new(2.0 * PI / lengths.x, 2.0 * PI / lengths.y, 2.0 * PI / lengths.z);
        let inv_four_alpha2 = 1.0 / (4.0 * params.alpha * params.alpha);

        // counted before anything is stored
        let required = admissible(n_max, unit, kc2).count();
        if required > params.max_wave_vectors {
            return Err(PressureError::WaveVectorBudget {
                required,
                ceiling: params.max_wave_vectors,
                kmax,
            });
        }

        let mut vectors = Vec::with_capacity(required);
        vectors.extend(admissible(n_max, unit, kc2).map(|(n, k, k2)| WaveVector {
            n,
            k,
            k2,
            weight: (-k2 * inv_four_alpha2).exp() / k2,
            zz: 1.0 - 2.0 * k.z * k.z * (1.0 / k2 + inv_four_alpha2),
        }));

        Ok(Self {
            alpha: params.alpha,
            k_cutoff,
            n_max,
            kmax,
            volume: sim_box.volume(),
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }
}

/// Half-space index triples inside `|k|² ≤ kc2`, with their `k` and `k²`.
fn admissible(
    n_max: [i32; 3],
    unit: Vector3<f64>,
    kc2: f64,
) -> impl Iterator<Item = ([i32; 3], Vector3<f64>, f64)> {
    iproduct!(0..=n_max[0], -n_max[1]..=n_max[1], -n_max[2]..=n_max[2])
    .filter(|&(nx, ny, nz)| nx > 0 || (nx == 0 && (ny > 0 || (ny == 0 && nz > 0))))
    .filter_map(move |(nx, ny, nz)| {
        let k = Vector3::new(nx as f64 * unit.x, ny as f64 * unit.y, nz as f64 * unit.z);
        let k2 = k.norm_squared();
        (k2 <= kc2).then_some(([nx, ny, nz], k, k2))
    })
}

/// Per-site `exp(i·n·2π·x_d/L_d)` for `n = 0..=n_max[d]` along each axis.
///
/// Negative indices are served as complex conjugates.
#[derive(Debug, Clone)]
pub struct PhaseTables {
    stride: [usize; 3],
    tables: [Vec<Complex64>; 3],
}

impl PhaseTables {
    pub fn build(setup: &EwaldSetup, sim_box: &SimBox, sites: &[Vector3<f64>]) -> Self {
        let stride = setup.n_max.map(|n| n as usize + 1);
        let tables = [0, 1, 2].map(|d| {
            let mut table = Vec::with_capacity(sites.len() * stride[d]);
            for site in sites {
                let step = Complex64::from_polar(1.0, 2.0 * PI * site[d] / sim_box.lengths[d]);
                let mut phase = Complex64::new(1.0, 0.0);
                for _ in 0..stride[d] {
                    table.push(phase);
                    phase *= step;
                }
            }
            table
        });
        Self { stride, tables }
    }

    #[inline]
    fn axis(&self, d: usize, site: usize, n: i32) -> Complex64 {
        let c = self.tables[d][site * self.stride[d] + n.unsigned_abs() as usize];
        if n < 0 {
            c.conj()
        } else {
            c
        }
    }

    /// `exp(i k·r)` of `site` for the wave vector with indices `n`.
    #[inline]
    pub fn phase(&self, site: usize, n: &[i32; 3]) -> Complex64 {
        self.axis(0, site, n[0]) * self.axis(1, site, n[1]) * self.axis(2, site, n[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params() -> EwaldParams {
        EwaldParams {
            alpha: 0.3,
            precision: 1e-6,
            max_wave_vectors: 100_000,
        }
    }

    #[test]
    fn test_cutoff_and_axis_bounds() {
        let p = params();
        let sim_box = SimBox::new(Vector3::new(20.0, 20.0, 40.0)).unwrap();
        let setup = EwaldSetup::new(&p, &sim_box).unwrap();
        let root = (-(1e-6f64).ln()).sqrt();
        assert_relative_eq!(setup.k_cutoff, 0.6 * root, max_relative = 1e-12);
        assert_eq!(setup.n_max[0], (0.3 * 20.0 / PI * root).ceil() as i32);
        assert_eq!(setup.kmax, setup.n_max[2]);
    }

    #[test]
    fn test_half_space_has_no_mirror_pairs() {
        let sim_box = SimBox::new(Vector3::new(18.0, 22.0, 25.0)).unwrap();
        let setup = EwaldSetup::new(&params(), &sim_box).unwrap();
        assert!(!setup.is_empty());
        let set: std::collections::HashSet<[i32; 3]> = setup.vectors.iter().map(|v| v.n).collect();
        assert_eq!(set.len(), setup.len());
        for v in &setup.vectors {
            assert!(!set.contains(&[-v.n[0], -v.n[1], -v.n[2]]));
            assert!(v.k2 > 0.0 && v.k2 <= setup.k_cutoff * setup.k_cutoff);
        }
    }

    #[test]
    fn test_budget_is_enforced() {
        let sim_box = SimBox::new(Vector3::new(30.0, 30.0, 30.0)).unwrap();
        let tight = EwaldParams {
            max_wave_vectors: 10,
            ..params()
        };
        match EwaldSetup::new(&tight, &sim_box) {
            Err(PressureError::WaveVectorBudget { required, ceiling, .. }) => {
                assert!(required > 10);
                assert_eq!(ceiling, 10);
            }
            other => panic!("expected budget error, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_ceiling_is_exact() {
        let sim_box = SimBox::new(Vector3::new(24.0, 26.0, 30.0)).unwrap();
        let full = EwaldSetup::new(&params(), &sim_box).unwrap();
        let exact = EwaldParams {
            max_wave_vectors: full.len(),
            ..params()
        };
        assert_eq!(EwaldSetup::new(&exact, &sim_box).unwrap().len(), full.len());

        let one_short = EwaldParams {
            max_wave_vectors: full.len() - 1,
            ..params()
        };
        assert!(matches!(
            EwaldSetup::new(&one_short, &sim_box),
            Err(PressureError::WaveVectorBudget { required, .. }) if required == full.len()
        ));
    }

    #[test]
    fn test_huge_set_is_rejected_by_count() {
        // about two million admissible vectors against a ceiling of a thousand
        let sim_box = SimBox::new(Vector3::new(60.0, 60.0, 60.0)).unwrap();
        let greedy = EwaldParams {
            alpha: 1.0,
            precision: 1e-12,
            max_wave_vectors: 1000,
        };
        match EwaldSetup::new(&greedy, &sim_box) {
            Err(PressureError::WaveVectorBudget { required, ceiling, kmax }) => {
                assert!(required > 1_000_000);
                assert_eq!(ceiling, 1000);
                assert_eq!(kmax, greedy.axis_max(60.0));
            }
            other => panic!("expected budget error, got {:?}", other.map(|s| s.len())),
        }
    }

    #[test]
    fn test_phase_matches_direct_exponential() {
        let sim_box = SimBox::new(Vector3::new(15.0, 17.0, 19.0)).unwrap();
        let setup = EwaldSetup::new(&params(), &sim_box).unwrap();
        // one site inside the cell, one far outside it
        let sites = [Vector3::new(1.3, -4.2, 7.7), Vector3::new(-31.0, 40.5, 12.25)];
        let tables = PhaseTables::build(&setup, &sim_box, &sites);
        for (s, r) in sites.iter().enumerate() {
            for v in setup.vectors.iter().step_by(37) {
                let direct = Complex64::from_polar(1.0, v.k.dot(r));
                let tabled = tables.phase(s, &v.n);
                assert_relative_eq!(tabled.re, direct.re, epsilon = 1e-9);
                assert_relative_eq!(tabled.im, direct.im, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_rejects_bad_precision() {
        let sim_box = SimBox::new(Vector3::new(30.0, 30.0, 30.0)).unwrap();
        let bad = EwaldParams {
            precision: 1.5,
            ..params()
        };
        assert!(matches!(EwaldSetup::new(&bad, &sim_box), Err(PressureError::Invalid(_))));
    }
}

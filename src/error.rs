//! Error types for the pressure profile pipeline
//!
//! Every variant here is fatal: they are configuration or precondition
//! violations, so the run stops at the first one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PressureError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("Lennard-Jones cutoff {lj} Å exceeds Coulomb cutoff {coulomb} Å")]
    CutoffOrdering { lj: f64, coulomb: f64 },

    #[error(
        "frame {frame}: pair search radius {required:.3} Å exceeds half the smallest box edge ({half_edge:.3} Å)"
    )]
    BoxTooSmall {
        frame: usize,
        required: f64,
        half_edge: f64,
    },

    #[error("frame {frame}: expected {expected} atoms from configuration, found {found}")]
    SiteCountMismatch {
        frame: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "reciprocal space needs {required} wave vectors (kmax = {kmax}) but only {ceiling} are provisioned"
    )]
    WaveVectorBudget {
        required: usize,
        ceiling: usize,
        kmax: i32,
    },

    #[error("trajectory yielded no frames")]
    NoFrames,
}

pub type PressureResult<T> = Result<T, PressureError>;

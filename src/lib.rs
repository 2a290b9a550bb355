//! Harasima-contour radial pressure profile of water confined in a nanotube
//!
//! Post-processes a molecular dynamics trajectory into the axial (z-z)
//! component of the pressure tensor as a function of distance from the tube
//! axis, with Ewald electrostatics split into real and reciprocal space.

pub mod app;
pub mod config;
pub mod error;
pub mod frame;
pub mod io;
pub mod pressure_impl;
pub mod units;

pub use error::{PressureError, PressureResult};

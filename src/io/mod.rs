//! Input/Output operations for pressure profile runs
//!
//! This module handles trajectory reading, logging setup, and report writing.

mod output;
mod trajectory;

pub use output::{setup_output, write_density_report, write_pressure_report};
pub use trajectory::{load_frames, read_frames, FrameSelection, RawFrame, XyzReader};

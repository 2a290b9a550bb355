use super::progress::Progress;
use crate::error::{PressureError, PressureResult};
use crate::frame::Frame;
use crate::pressure_impl::{PressureProfile, ProfileAccumulator, VirialEngine};
use tracing::info;

/// Everything a run needs besides the frames themselves.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub engine: VirialEngine,
    pub temperature: f64,
    pub progress_interval: usize,
}

/// One pass over the frames.
///
/// The first frame is checked against the box and wave-vector preconditions
/// before any work starts; every later frame is checked again as it comes.
pub fn run_profile(settings: &RunSettings, frames: &[Frame]) -> PressureResult<PressureProfile> {
    let first = frames.first().ok_or(PressureError::NoFrames)?;
    let setup = settings.engine.check_frame(first)?;
    info!(
        "Ewald setup on frame {}: kc = {:.4} 1/A, kmax = {}, {} wave vectors",
        first.index,
        setup.k_cutoff,
        setup.kmax,
        setup.len()
    );

    let grid = settings.engine.region.grid;
    info!(
        "Profile: {} bins of {:.4} A up to {:.3} A, window fraction {:.3}",
        grid.n_bins, grid.dr, grid.cutoff, settings.engine.region.window_fraction
    );

    let mut accumulator = ProfileAccumulator::new(grid);
    let progress = Progress::new(frames.len(), settings.progress_interval);
    for (done, frame) in frames.iter().enumerate() {
        let contribution = settings.engine.process_frame(frame)?;
        accumulator.fold_frame(&contribution);
        progress.frame_done(done + 1);
    }

    Ok(accumulator.finalize(settings.temperature))
}

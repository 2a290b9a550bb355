use std::time::{Duration, Instant};
use tracing::info;

/// Periodic "frame i/N, percent, ETA" lines.
pub struct Progress {
    total: usize,
    interval: usize,
    started: Instant,
}

impl Progress {
    pub fn new(total: usize, interval: usize) -> Self {
        Self {
            total,
            interval: interval.max(1),
            started: Instant::now(),
        }
    }

    pub fn frame_done(&self, done: usize) {
        if done % self.interval == 0 || done == self.total {
            let (fraction, eta) = estimate(done, self.total, self.started.elapsed());
            info!(
                "frame {}/{} ({:.1}%), remaining ~{}",
                done,
                self.total,
                100.0 * fraction,
                format_duration(eta)
            );
        }
    }
}

/// Fraction complete and remaining time extrapolated from the mean frame time.
fn estimate(done: usize, total: usize, elapsed: Duration) -> (f64, Duration) {
    if done == 0 || total == 0 {
        return (0.0, Duration::ZERO);
    }
    let fraction = done as f64 / total as f64;
    let per_frame = elapsed.as_secs_f64() / done as f64;
    let remaining = per_frame * total.saturating_sub(done) as f64;
    (fraction, Duration::from_secs_f64(remaining))
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

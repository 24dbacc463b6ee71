//! Generation timing utilities.

use std::time::Instant;
use tracing::info;

/// A simple timer for measuring how long a phase took.
pub struct Timer {
    name: String,
    start: Instant,
}

impl Timer {
    /// Start a new timer with the given phase name.
    pub fn start(name: &str) -> Self {
        Self {
            name: name.to_string(),
            start: Instant::now(),
        }
    }

    /// Finish the timer and log the elapsed time.
    pub fn finish(self) {
        let ms = self.start.elapsed().as_secs_f64() * 1000.0;
        if ms >= 1000.0 {
            info!("  [{:.1}s] {}", ms / 1000.0, self.name);
        } else {
            info!("  [{:.1}ms] {}", ms, self.name);
        }
    }
}

//! Timing utilities for detection passes and TWAP runs.

use log::{debug, info};
use std::time::{Duration, Instant};

/// A timer for measuring operation durations
#[derive(Debug)]
pub struct Timer {
    start_time: Instant,
    operation_name: String,
    checkpoints: Vec<(String, Instant)>,
}

impl Timer {
    pub fn start(operation_name: &str) -> Self {
        debug!("Starting timer for: {}", operation_name);
        Self {
            start_time: Instant::now(),
            operation_name: operation_name.to_string(),
            checkpoints: Vec::new(),
        }
    }

    /// Record an intermediate point, e.g. one TWAP step.
    pub fn checkpoint(&mut self, checkpoint_name: &str) {
        let now = Instant::now();
        debug!(
            "{} - {}: {}ms",
            self.operation_name,
            checkpoint_name,
            now.duration_since(self.start_time).as_millis()
        );
        self.checkpoints.push((checkpoint_name.to_string(), now));
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn finish(self) -> Duration {
        let total_duration = self.start_time.elapsed();
        if self.checkpoints.is_empty() {
            debug!(
                "{} completed in {}ms",
                self.operation_name,
                total_duration.as_millis()
            );
        } else {
            info!(
                "{} completed in {}ms over {} checkpoints",
                self.operation_name,
                total_duration.as_millis(),
                self.checkpoints.len()
            );
            let mut last_time = self.start_time;
            for (name, time) in &self.checkpoints {
                debug!("   {}: {}ms", name, time.duration_since(last_time).as_millis());
                last_time = *time;
            }
        }
        total_duration
    }
}

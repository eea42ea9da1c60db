//! Progress reporting for hash jobs: smoothed rate, ETA, and the emission
//! throttle that keeps the status sink from being saturated on fast disks.

use std::time::{Duration, Instant};

use crate::units;

/// Smoothing weights for the throughput estimate. The previous estimate
/// dominates so bursty reads do not whip the ETA around.
const SMOOTH_KEEP: f64 = 0.7;
const SMOOTH_BLEND: f64 = 0.3;

/// Snapshot of hashing progress for one job, consumed by the event sink.
#[derive(Debug, Clone)]
pub struct ProgressSample {
    /// Bytes absorbed so far.
    pub bytes_done: u64,
    /// Total file size in bytes.
    pub total_bytes: u64,
    /// Integer percent complete, 0-100.
    pub percent: u8,
    /// Smoothed throughput in bytes per second (0 while unknown).
    pub bytes_per_sec: f64,
}

impl ProgressSample {
    /// Estimated seconds remaining (None while the rate is unknown, 0 once
    /// everything is absorbed).
    pub fn eta_secs(&self) -> Option<f64> {
        let remaining = self.total_bytes.saturating_sub(self.bytes_done);
        if remaining == 0 {
            return Some(0.0);
        }
        if self.bytes_per_sec <= 0.0 {
            return None;
        }
        Some(remaining as f64 / self.bytes_per_sec)
    }

    /// Rendered ETA, MM:SS or `--:--`.
    pub fn eta_clock(&self) -> String {
        units::format_clock(self.eta_secs())
    }

    /// Status line for the UI sink: `"<done> / <total> | left: MM:SS"`.
    pub fn status_line(&self) -> String {
        format!(
            "{} / {} | left: {}",
            units::format_bytes(self.bytes_done),
            units::format_bytes(self.total_bytes),
            self.eta_clock()
        )
    }
}

/// Integer percent complete; a zero-byte file is immediately 100%.
pub fn percent_of(bytes_done: u64, total_bytes: u64) -> u8 {
    if total_bytes == 0 {
        return 100;
    }
    ((bytes_done as u128 * 100) / total_bytes as u128).min(100) as u8
}

/// Exponentially-smoothed throughput, one per job.
#[derive(Debug, Default)]
pub struct SpeedEstimator {
    smoothed: f64,
}

impl SpeedEstimator {
    /// Fold in a new observation and return the updated estimate. The first
    /// observation seeds the estimate directly.
    pub fn update(&mut self, bytes_done: u64, elapsed_secs: f64) -> f64 {
        if elapsed_secs <= 0.0 {
            return self.smoothed;
        }
        let instant = bytes_done as f64 / elapsed_secs;
        self.smoothed = if self.smoothed == 0.0 {
            instant
        } else {
            self.smoothed * SMOOTH_KEEP + instant * SMOOTH_BLEND
        };
        self.smoothed
    }

    pub fn bytes_per_sec(&self) -> f64 {
        self.smoothed
    }
}

/// Decides when a progress notification may fire.
///
/// A window opens when percent reaches 100, moves at least `percent_step`
/// since the last emission, or `max_quiet` has elapsed; within an open window
/// the notification is still suppressed unless the percent or the rendered
/// ETA actually changed.
#[derive(Debug)]
pub struct ProgressThrottle {
    percent_step: u32,
    max_quiet: Duration,
    last_emit: Option<Instant>,
    last_percent: Option<u8>,
    last_eta: String,
}

impl ProgressThrottle {
    pub fn new(percent_step: u32, max_quiet: Duration) -> Self {
        Self {
            percent_step: percent_step.max(1),
            max_quiet,
            last_emit: None,
            last_percent: None,
            last_eta: String::new(),
        }
    }

    /// Offer a sample; returns true (and records it) if the caller should
    /// emit a notification for it.
    pub fn offer(&mut self, percent: u8, eta_clock: &str, now: Instant) -> bool {
        let window_open = percent == 100
            || match self.last_percent {
                None => true,
                Some(last) => u32::from(percent.abs_diff(last)) >= self.percent_step,
            }
            || match self.last_emit {
                None => true,
                Some(at) => now.duration_since(at) >= self.max_quiet,
            };
        if !window_open {
            return false;
        }
        if self.last_percent == Some(percent) && self.last_eta == eta_clock {
            return false;
        }
        self.last_emit = Some(now);
        self.last_percent = Some(percent);
        self.last_eta = eta_clock.to_string();
        true
    }

    /// Percent of the last emitted notification, if any.
    pub fn last_percent(&self) -> Option<u8> {
        self.last_percent
    }
}

//! Per-bar frame timing.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Frame timing counters, updated once per tick while enabled.
///
/// Times are in seconds. Counters only grow; disabling and re-enabling
/// metrics on a bar starts a fresh record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Metrics {
    /// Number of frames recorded.
    pub frames_rendered: u64,
    /// Sum of all frame times.
    pub total_time: f64,
    /// `total_time / frames_rendered`.
    pub avg_frame_time: f64,
    /// Slowest frame seen.
    pub peak_frame_time: f64,
    /// Most recent frame.
    pub last_frame_time: f64,
}

impl Metrics {
    /// Adds one frame to the record.
    pub fn record_frame(&mut self, frame_time: Duration) {
        let secs = frame_time.as_secs_f64();
        self.frames_rendered += 1;
        self.total_time += secs;
        self.last_frame_time = secs;
        self.avg_frame_time = self.total_time / self.frames_rendered as f64;
        self.peak_frame_time = self.peak_frame_time.max(secs);
    }
}

impl fmt::Display for Metrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Frames: {}, Avg: {:.2}ms, Peak: {:.2}ms",
            self.frames_rendered,
            self.avg_frame_time * 1000.0,
            self.peak_frame_time * 1000.0
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_frame() {
        let mut m = Metrics::default();
        m.record_frame(Duration::from_millis(2));
        m.record_frame(Duration::from_millis(4));

        assert_eq!(m.frames_rendered, 2);
        assert!((m.total_time - 0.006).abs() < 1e-9);
        assert!((m.avg_frame_time - 0.003).abs() < 1e-9);
        assert!((m.peak_frame_time - 0.004).abs() < 1e-9);
        assert!((m.last_frame_time - 0.004).abs() < 1e-9);
    }

    #[test]
    fn test_display() {
        let mut m = Metrics::default();
        m.record_frame(Duration::from_micros(1500));
        assert_eq!(m.to_string(), "Frames: 1, Avg: 1.50ms, Peak: 1.50ms");
    }
}
